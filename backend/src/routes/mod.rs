pub mod convert;

use axum::{routing::post, Router};
use convert::convert;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/convert", post(convert))
}
