//! # Drag-and-Drop Resolution
//!
//! Translates a completed drag gesture into the mutation it implies.
//! Resolution is pure: it inspects the current element list and returns an
//! action; the designer applies it.
//!
//! | source          | target              | action                         |
//! |-----------------|---------------------|--------------------------------|
//! | palette item    | empty drop area     | insert at end                  |
//! | palette item    | top half of `e`     | insert at index of `e`         |
//! | palette item    | bottom half of `e`  | insert at index of `e` + 1     |
//! | placed element  | top/bottom of `e`   | move (same indices as above)   |
//! | placed element  | empty drop area     | cancel                         |
//! | anything        | no target           | cancel                         |
//!
//! A palette drop of the generator field opens the generation flow at the
//! target index instead of inserting an element.

use formcraft_fields::{Element, ElementId, FieldKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mutations::position;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragSource {
    PaletteItem { kind: FieldKind },
    PlacedElement { element_id: ElementId },
}

/// Where it was released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    DropArea,
    ElementTopHalf { element_id: ElementId },
    ElementBottomHalf { element_id: ElementId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    Cancel,
    Insert { kind: FieldKind, index: usize },
    Move { element_id: ElementId, index: usize },
    OpenGenerator { index: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DragError {
    #[error("Dragged element not found: {0}")]
    SourceNotFound(String),

    #[error("Drop target element not found: {0}")]
    TargetNotFound(String),
}

/// Resolve a drop gesture against the current element list.
///
/// Indices are computed before the dragged element is taken out; the move
/// mutation performs the shift.
pub fn resolve_drop(
    elements: &[Element],
    source: &DragSource,
    target: Option<&DropTarget>,
) -> Result<DropAction, DragError> {
    let Some(target) = target else {
        return Ok(DropAction::Cancel);
    };

    if let DragSource::PlacedElement { element_id } = source {
        if position(elements, element_id).is_none() {
            return Err(DragError::SourceNotFound(element_id.to_string()));
        }
    }

    let index = match target {
        DropTarget::DropArea => match source {
            DragSource::PaletteItem { .. } => elements.len(),
            DragSource::PlacedElement { .. } => return Ok(DropAction::Cancel),
        },
        DropTarget::ElementTopHalf { element_id } => target_index(elements, element_id)?,
        DropTarget::ElementBottomHalf { element_id } => target_index(elements, element_id)? + 1,
    };

    let action = match source {
        DragSource::PaletteItem {
            kind: FieldKind::GenerateField,
        } => DropAction::OpenGenerator { index },
        DragSource::PaletteItem { kind } => DropAction::Insert { kind: *kind, index },
        DragSource::PlacedElement { element_id } => DropAction::Move {
            element_id: element_id.clone(),
            index,
        },
    };

    tracing::debug!(?action, "Resolved drop");
    Ok(action)
}

fn target_index(elements: &[Element], element_id: &ElementId) -> Result<usize, DragError> {
    position(elements, element_id).ok_or_else(|| DragError::TargetNotFound(element_id.to_string()))
}
