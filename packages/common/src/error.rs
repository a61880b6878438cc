use thiserror::Error;

/// Failure reported by a persistence collaborator
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Form not found: {0}")]
    NotFound(String),

    #[error("Save rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a submission sink
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
