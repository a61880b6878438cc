//! # Designer Document
//!
//! The ordered element list plus the current selection.
//!
//! The list lives behind an `Arc` so history frames and autosave snapshots
//! can hold it without copying. Whenever the list is replaced, a selection
//! that no longer refers to a present element is dropped.

use std::sync::Arc;

use formcraft_fields::{deserialize_elements, serialize_elements, Element, ElementId, FieldError};

use crate::mutations::position;

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Arc<Vec<Element>>,
    selected: Option<ElementId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from serialized content. Empty content is an empty document.
    pub fn from_content(content: &str) -> Result<Self, FieldError> {
        Ok(Self {
            elements: Arc::new(deserialize_elements(content)?),
            selected: None,
        })
    }

    pub fn to_content(&self) -> Result<String, FieldError> {
        serialize_elements(&self.elements)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn shared_elements(&self) -> Arc<Vec<Element>> {
        Arc::clone(&self.elements)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index_of(&self, element_id: &ElementId) -> Option<usize> {
        position(&self.elements, element_id)
    }

    pub fn get(&self, element_id: &ElementId) -> Option<&Element> {
        self.index_of(element_id).map(|i| &self.elements[i])
    }

    pub fn selected_element_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub(crate) fn replace_elements(&mut self, elements: Arc<Vec<Element>>) {
        self.elements = elements;
        if let Some(id) = &self.selected {
            if position(&self.elements, id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Select a present element; returns false if `element_id` is absent
    pub(crate) fn select(&mut self, element_id: &ElementId) -> bool {
        if self.index_of(element_id).is_none() {
            return false;
        }
        self.selected = Some(element_id.clone());
        true
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }
}
