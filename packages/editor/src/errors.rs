//! Error types for the editor

use formcraft_common::PersistenceError;
use formcraft_fields::FieldError;
use thiserror::Error;

use crate::autosave::AutosaveError;
use crate::drag::DragError;
use crate::generation::GenerationError;
use crate::mutations::MutationError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Drag error: {0}")]
    Drag(#[from] DragError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Autosave error: {0}")]
    Autosave(#[from] AutosaveError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Cannot select missing element: {0}")]
    SelectionNotFound(String),

    #[error("Form is published and read-only")]
    ReadOnly,

    #[error("Cannot publish a form without elements")]
    EmptyDocument,

    #[error("Designer is not attached to persistence")]
    NotPersisted,
}
