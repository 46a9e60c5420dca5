use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Rejections raised by the CSRF guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CsrfError {
    /// Protected route reached without a valid `_csrf_token`.
    #[error("Invalid CSRF token passed")]
    InvalidCsrfToken,
}

impl CsrfError {
    pub fn status(&self) -> StatusCode {
        match self {
            CsrfError::InvalidCsrfToken => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for CsrfError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
