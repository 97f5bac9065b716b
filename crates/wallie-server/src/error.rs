use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wallie_core::error::WallieError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Error returned by handlers. The status is picked from the underlying
/// [`WallieError`] when there is one; everything else is a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<WallieError>() {
            Some(e) => status_for(e),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn status_for(err: &WallieError) -> StatusCode {
    match err {
        WallieError::InvalidProjectId(_) => StatusCode::NOT_FOUND,
        WallieError::InvalidIssueKey(_) => StatusCode::BAD_REQUEST,
        WallieError::Auth(_) | WallieError::LoginFlow => StatusCode::BAD_REQUEST,
        WallieError::Fetch { .. }
        | WallieError::FetchStalled { .. }
        | WallieError::TooManyPages(_)
        | WallieError::Update { .. }
        | WallieError::Config(_)
        | WallieError::Http(_)
        | WallieError::Io(_)
        | WallieError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %format!("{:#}", self.0), "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        (status, format!("{}\n", self.0)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
