//! # Formcraft Editor
//!
//! The form designer engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ fields: kinds, attributes, validation       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Designer                            │
//! │  - Apply mutations to the ordered list      │
//! │  - Undo/redo over document snapshots        │
//! │  - Resolve drag-and-drop gestures           │
//! │  - Ingest generated elements                │
//! │  - Throttled autosave + publish             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ common: Persistence, Notifier               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Element list is the source of truth**: selection, save state and
//!    history are derived bookkeeping around it
//! 2. **Whole-list replacement**: each mutation swaps in a new list, which
//!    makes snapshot history and autosave cheap
//! 3. **Structural no-ops are free**: they touch neither history nor the
//!    save state
//! 4. **Publish is terminal**: a published form is read-only
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formcraft_editor::{Designer, DesignerConfig};
//!
//! let mut designer = Designer::open(form_id, store, notifier, DesignerConfig::default()).await?;
//!
//! let email = designer.new_element(FieldKind::EmailField);
//! designer.add_element(0, email)?;
//! designer.undo()?;
//!
//! designer.publish().await?;
//! ```

mod autosave;
mod config;
mod designer;
mod document;
mod drag;
mod errors;
mod generation;
mod history;
mod mutations;

pub use autosave::{
    AutosaveCoordinator, AutosaveError, AutosaveHandle, SaveEvent, SaveState, Snapshot,
    SAVE_FAILED_MESSAGE,
};
pub use config::{DesignerConfig, HistoryPolicy};
pub use designer::{Designer, DropOutcome, PUBLISHED_MESSAGE};
pub use document::Document;
pub use drag::{resolve_drop, DragError, DragSource, DropAction, DropTarget};
pub use errors::EditorError;
pub use generation::{parse_generation_response, GenerationError};
pub use history::{History, HistoryFrame};
pub use mutations::{move_destination, Mutation, MutationError};
