use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::services::converter_service::convert_file;
use crate::utils::error::AppError;
use crate::utils::scratch::ScratchFiles;
use crate::AppState;

/// Nama field multipart yang membawa file.
pub const FILE_FIELD: &str = "file";
/// Media type hasil konversi.
pub const OUTPUT_MEDIA_TYPE: &str = "image/png";

#[derive(Debug)]
struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// Ambil part `file` pertama yang benar-benar file (punya `filename`).
/// Text field, termasuk yang bernama `file`, diabaikan.
async fn find_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            tracing::debug!("Field `{FILE_FIELD}` tanpa filename diabaikan");
            continue;
        };

        let data = field.bytes().await?;
        return Ok(Some(UploadedFile { filename, data }));
    }

    Ok(None)
}

fn attachment_response(filename: &str, body: Vec<u8>) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(format!("Nama file tidak valid untuk header: {e}")))?;

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(OUTPUT_MEDIA_TYPE)),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((StatusCode::OK, headers, body).into_response())
}

/// `POST /convert`
///
/// Alur: ambil upload → tulis ke scratch `.webp` → jalankan converter →
/// baca `.png` → kirim sebagai attachment. `ScratchFiles` dihapus lewat
/// `remove()`; jalur `?` lain tetap dibersihkan oleh `Drop`.
pub async fn convert(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let upload = match multipart {
        Ok(multipart) => find_upload(multipart).await?,
        Err(rejection) => {
            tracing::debug!("Request bukan multipart: {}", rejection.body_text());
            None
        }
    }
    .ok_or(AppError::InputMissing)?;

    tracing::debug!(filename = %upload.filename, bytes = upload.data.len(), "Upload received");

    let scratch = ScratchFiles::create(&state.config.scratch_dir(), &upload.data).await?;
    let converted = convert_file(state.resolver.as_ref(), &scratch, state.config.timeout()).await;
    let download_name = scratch.download_name();
    scratch.remove().await;
    let converted = converted?;

    tracing::info!(
        filename = %upload.filename,
        input_bytes = upload.data.len(),
        output_bytes = converted.len(),
        "Conversion finished"
    );

    attachment_response(&download_name, converted)
}
