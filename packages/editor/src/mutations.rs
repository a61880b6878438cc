//! # Document Mutations
//!
//! The complete set of content-changing operations on a form design.
//!
//! ## Design Principles
//!
//! 1. **Replace, don't mutate**: every mutation produces a new element list;
//!    untouched elements keep their attribute allocations
//! 2. **Validated**: structural constraints (unique ids, immutable kinds) are
//!    checked before anything changes
//! 3. **No-op friendly**: a mutation that nets out to the same content yields
//!    a structurally equal list, which callers treat as "nothing happened"
//!
//! ## Mutation Semantics
//!
//! ### AddElement
//! - Index is clamped to `[0, len]`
//! - Fails if the id is already present
//!
//! ### MoveElement
//! - Remove, then re-insert. When the element started before the requested
//!   index, the index shifts down by one, so "move to N" means the same slot
//!   in either direction
//!
//! ### RemoveElement
//! - Absent id is a no-op
//!
//! ### UpdateElement
//! - Replaces attributes wholesale; the kind cannot change

use std::collections::HashSet;

use formcraft_fields::{Element, ElementId, FieldError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content-changing operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Replace the entire ordered list
    SetElements { elements: Vec<Element> },

    /// Insert an element at index
    AddElement { index: usize, element: Element },

    /// Remove an element by id
    RemoveElement { element_id: ElementId },

    /// Move an element to a new index
    MoveElement { element_id: ElementId, index: usize },

    /// Clear the document
    RemoveAllElements,

    /// Replace the attributes of an element
    UpdateElement { element_id: ElementId, element: Element },
}

#[derive(Error, Debug)]
pub enum MutationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}

impl Mutation {
    /// Compute the element list that results from applying this mutation
    pub fn apply(&self, elements: &[Element]) -> Result<Vec<Element>, MutationError> {
        match self {
            Mutation::SetElements { elements: next } => Self::apply_set(next),

            Mutation::AddElement { index, element } => Self::apply_add(elements, *index, element),

            Mutation::RemoveElement { element_id } => Ok(elements
                .iter()
                .filter(|e| e.id() != element_id)
                .cloned()
                .collect()),

            Mutation::MoveElement { element_id, index } => {
                Self::apply_move(elements, element_id, *index)
            }

            Mutation::RemoveAllElements => Ok(Vec::new()),

            Mutation::UpdateElement { element_id, element } => {
                Self::apply_update(elements, element_id, element)
            }
        }
    }

    /// Whether the mutation counts as an edit even when nothing changed
    pub fn always_marks_unsaved(&self) -> bool {
        matches!(self, Mutation::RemoveAllElements)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetElements { .. } => "SetElements",
            Mutation::AddElement { .. } => "AddElement",
            Mutation::RemoveElement { .. } => "RemoveElement",
            Mutation::MoveElement { .. } => "MoveElement",
            Mutation::RemoveAllElements => "RemoveAllElements",
            Mutation::UpdateElement { .. } => "UpdateElement",
        }
    }

    fn apply_set(next: &[Element]) -> Result<Vec<Element>, MutationError> {
        let mut seen = HashSet::with_capacity(next.len());
        for element in next {
            if !seen.insert(element.id()) {
                return Err(MutationError::DuplicateId(element.id().to_string()));
            }
        }
        Ok(next.to_vec())
    }

    fn apply_add(
        elements: &[Element],
        index: usize,
        element: &Element,
    ) -> Result<Vec<Element>, MutationError> {
        if position(elements, element.id()).is_some() {
            return Err(MutationError::DuplicateId(element.id().to_string()));
        }

        let mut next = elements.to_vec();
        next.insert(index.min(next.len()), element.clone());
        Ok(next)
    }

    fn apply_move(
        elements: &[Element],
        element_id: &ElementId,
        index: usize,
    ) -> Result<Vec<Element>, MutationError> {
        let from = position(elements, element_id)
            .ok_or_else(|| MutationError::ElementNotFound(element_id.to_string()))?;

        let mut next = elements.to_vec();
        let moving = next.remove(from);
        let to = move_destination(from, index, next.len());
        next.insert(to, moving);
        Ok(next)
    }

    fn apply_update(
        elements: &[Element],
        element_id: &ElementId,
        element: &Element,
    ) -> Result<Vec<Element>, MutationError> {
        let at = position(elements, element_id)
            .ok_or_else(|| MutationError::ElementNotFound(element_id.to_string()))?;

        let current = &elements[at];
        if current.shares_attributes(element) || current.attributes() == element.attributes() {
            return Ok(elements.to_vec());
        }

        let mut next = elements.to_vec();
        next[at] = current.with_attributes(element.attributes().clone())?;
        Ok(next)
    }
}

/// Index of an element by id
pub fn position(elements: &[Element], element_id: &ElementId) -> Option<usize> {
    elements.iter().position(|e| e.id() == element_id)
}

/// Slot an element lands in when moved from `from` to `index`, given the
/// length of the list after the element was taken out.
pub fn move_destination(from: usize, index: usize, remaining: usize) -> usize {
    let adjusted = if from < index { index - 1 } else { index };
    adjusted.min(remaining)
}
