use formcraft_common::{PersistenceError, SinkError};
use formcraft_fields::{ElementId, FieldError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Form {0} is not published")]
    NotPublished(String),

    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<ElementId>),

    #[error("Form was already submitted")]
    AlreadySubmitted,

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}
