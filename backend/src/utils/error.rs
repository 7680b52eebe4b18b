use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// Semua kegagalan handler berakhir sebagai salah satu varian ini,
/// lalu diubah menjadi response JSON oleh `IntoResponse`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request tidak membawa field `file`.
    #[error("No file was provided.")]
    InputMissing,

    /// Body multipart rusak atau tidak bisa dibaca.
    #[error("{0}")]
    BadRequest(String),

    /// Upload melebihi `max_upload_bytes`.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Converter keluar dengan status non-zero (atau melewati batas waktu).
    #[error("Conversion failed")]
    ConversionFailed { details: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl AppError {
    /// Helper untuk membungkus `std::io::Error` dengan keterangan operasi.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InputMissing | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ConversionFailed { .. } | Self::Io { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Pesan yang aman dikirim ke client. Detail internal hanya masuk log.
    fn body(&self) -> ErrorBody<'_> {
        match self {
            Self::InputMissing => ErrorBody {
                error: "No file was provided.",
                details: None,
            },
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) => ErrorBody {
                error: msg,
                details: None,
            },
            Self::ConversionFailed { details } => ErrorBody {
                error: "Conversion failed",
                details: Some(details.as_str()),
            },
            Self::Io { .. } | Self::Internal(_) => ErrorBody {
                error: "Internal server error",
                details: None,
            },
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge(err.body_text()),
            _ => Self::BadRequest(err.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Io { .. } | Self::Internal(_) => tracing::error!("Internal error: {:#}", self),
            Self::ConversionFailed { details } => {
                tracing::warn!(details = %details, "Converter failed")
            }
            Self::InputMissing | Self::BadRequest(_) | Self::PayloadTooLarge(_) => {
                tracing::debug!("Client error: {}", self)
            }
        }

        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn body_json(err: &AppError) -> Value {
        serde_json::to_value(err.body()).unwrap()
    }

    #[test]
    fn input_missing_is_bad_request_with_exact_message() {
        let err = AppError::InputMissing;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&err), json!({ "error": "No file was provided." }));
    }

    #[test]
    fn conversion_failure_carries_details() {
        let err = AppError::ConversionFailed {
            details: "Invalid data found when processing input\n".into(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&err),
            json!({
                "error": "Conversion failed",
                "details": "Invalid data found when processing input\n"
            })
        );
    }

    #[test]
    fn io_error_does_not_leak_paths() {
        let err = AppError::io(
            "Gagal menulis /tmp/secret.webp",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&err), json!({ "error": "Internal server error" }));
        assert!(err.to_string().contains("/tmp/secret.webp"));
    }
}
