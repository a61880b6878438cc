use crate::error::{PersistenceError, SinkError};

/// Result of a persistence call
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Result of a submission sink call
pub type SinkResult<T> = Result<T, SinkError>;
