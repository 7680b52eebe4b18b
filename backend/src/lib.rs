//! Server HTTP yang mengonversi upload WebP menjadi PNG dengan memanggil
//! ffmpeg sebagai subprocess.
//!
//! Satu endpoint: `POST /convert` (multipart, field `file`).

pub mod config;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
use services::resolver::{ConverterResolver, LayoutResolver};

/// State bersama yang immutable; aman di-clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<dyn ConverterResolver>,
}

impl AppState {
    /// State produksi: converter dicari lewat `LayoutResolver`.
    pub fn from_config(config: Config) -> Self {
        let resolver = LayoutResolver::from_config(&config);
        Self::with_resolver(config, resolver)
    }

    pub fn with_resolver(config: Config, resolver: impl ConverterResolver + 'static) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    routes::routes()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
