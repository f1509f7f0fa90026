use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Every failure surfaces to the caller as the same opaque 500.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct AppError(#[from] pub ln_core::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
