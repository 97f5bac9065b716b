use thiserror::Error;

#[derive(Debug, Error)]
pub enum WallieError {
    #[error("invalid project ID '{0}'")]
    InvalidProjectId(String),

    #[error("invalid issue key '{0}': must look like ABC-123")]
    InvalidIssueKey(String),

    #[error("issue search failed at offset {start_at}: {reason}")]
    Fetch { start_at: usize, reason: String },

    #[error("issue search stalled at offset {start_at}: tracker reported {total} issues, received {received}")]
    FetchStalled {
        start_at: usize,
        total: usize,
        received: usize,
    },

    #[error("issue search gave up after {0} pages")]
    TooManyPages(usize),

    #[error("issue update rejected: {status} => {body}")]
    Update { status: u16, body: String },

    #[error("login failed: {0}")]
    Auth(String),

    #[error("login flow broken: no pending redirect")]
    LoginFlow,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WallieError>;
