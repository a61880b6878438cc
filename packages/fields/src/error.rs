//! Error types for field construction and (de)serialization

use thiserror::Error;

use crate::FieldKind;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Element has no id")]
    MissingId,

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Invalid attributes for {kind}: {reason}")]
    InvalidAttributes { kind: FieldKind, reason: String },

    #[error("Cannot change kind of element {id} from {from} to {to}")]
    KindMismatch {
        id: String,
        from: FieldKind,
        to: FieldKind,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
