use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::{ErrorEnvelope, FolioError};
use tracing::error;

pub struct AppError {
    pub status: StatusCode,
    pub body: ErrorEnvelope,
}

impl AppError {
    pub fn not_found(slug: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorEnvelope::not_found(slug),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

impl From<FolioError> for AppError {
    fn from(err: FolioError) -> Self {
        let status = match &err {
            FolioError::IndexUnavailable { .. }
            | FolioError::MalformedIndex { .. }
            | FolioError::ContentUnavailable { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(error = %err, status = status.as_u16(), "upstream failure");
        Self {
            status,
            body: ErrorEnvelope::from(&err),
        }
    }
}
