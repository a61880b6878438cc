//! # Undo/Redo History
//!
//! Snapshot-based history of the designer document.
//!
//! ## Design
//!
//! - Each recorded step stores the frame from *before* a content change
//! - Frames share element lists by `Arc`, so a step costs one pointer per
//!   element rather than a deep copy
//! - A change that nets out to structurally equal content records nothing
//! - New steps clear the redo stack
//! - Batches group several changes into one step
//! - Pausing suppresses recording entirely (used while hydrating)
//!
//! Selection and save-time bookkeeping are never part of a frame.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//! history.record(before, &after);
//!
//! if let Some(previous) = history.undo(current) {
//!     // restore `previous`
//! }
//! ```

use std::sync::Arc;

use formcraft_fields::Element;

/// The recorded part of designer state
#[derive(Debug, Clone)]
pub struct HistoryFrame {
    pub elements: Arc<Vec<Element>>,
    pub unsaved_changes: bool,
}

impl HistoryFrame {
    pub fn new(elements: Arc<Vec<Element>>, unsaved_changes: bool) -> Self {
        Self {
            elements,
            unsaved_changes,
        }
    }

    /// Structural equality of the element lists
    pub fn same_content(&self, other: &HistoryFrame) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements) || self.elements == other.elements
    }
}

impl PartialEq for HistoryFrame {
    fn eq(&self, other: &Self) -> bool {
        self.unsaved_changes == other.unsaved_changes && self.same_content(other)
    }
}

/// Undo/redo stacks of document frames
#[derive(Debug)]
pub struct History {
    /// Frames to restore on undo (most recent last)
    past: Vec<HistoryFrame>,

    /// Frames to restore on redo (most recent last)
    future: Vec<HistoryFrame>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Nesting depth of `pause` calls
    paused: usize,

    /// Frame captured when the current batch began
    batch_start: Option<HistoryFrame>,
}

impl History {
    /// Create a history with the default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_levels,
            paused: 0,
            batch_start: None,
        }
    }

    /// Record a content change from `before` to `after`.
    ///
    /// Returns whether a new undo step was pushed.
    pub fn record(&mut self, before: HistoryFrame, after: &HistoryFrame) -> bool {
        if self.is_paused() || before.same_content(after) {
            return false;
        }

        if self.batch_start.is_some() {
            // Folded into the batch; `end_batch` pushes the step
            return false;
        }

        self.push(before);
        true
    }

    /// Start grouping changes into a single undo step
    pub fn begin_batch(&mut self, current: HistoryFrame) {
        if self.batch_start.is_none() && !self.is_paused() {
            self.batch_start = Some(current);
        }
    }

    /// Close the current batch. Returns whether a step was pushed.
    pub fn end_batch(&mut self, current: &HistoryFrame) -> bool {
        match self.batch_start.take() {
            Some(start) if !start.same_content(current) => {
                self.push(start);
                true
            }
            _ => false,
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_start.is_some()
    }

    /// Suppress recording until the matching `resume`
    pub fn pause(&mut self) {
        self.paused += 1;
    }

    pub fn resume(&mut self) {
        self.paused = self.paused.saturating_sub(1);
    }

    pub fn is_paused(&self) -> bool {
        self.paused > 0
    }

    fn push(&mut self, frame: HistoryFrame) {
        self.past.push(frame);

        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.remove(0);
        }

        self.future.clear();
    }

    /// Step back. `current` moves onto the redo stack and the frame to
    /// restore is returned.
    pub fn undo(&mut self, current: HistoryFrame) -> Option<HistoryFrame> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward. `current` moves onto the undo stack and the frame to
    /// restore is returned.
    pub fn redo(&mut self, current: HistoryFrame) -> Option<HistoryFrame> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Drop all recorded steps
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch_start = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_fields::{registry, ElementId, FieldKind};

    fn frame(ids: &[&str]) -> HistoryFrame {
        let elements = ids
            .iter()
            .map(|id| registry::construct(FieldKind::SeparatorField, ElementId::new(*id)))
            .collect();
        HistoryFrame::new(Arc::new(elements), true)
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut history = History::new();
        let s0 = frame(&[]);
        let s1 = frame(&["a"]);

        assert!(history.record(s0.clone(), &s1));
        assert!(history.can_undo());

        let restored = history.undo(s1.clone()).unwrap();
        assert!(restored.same_content(&s0));
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert!(again.same_content(&s1));
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_structurally_equal_change_is_not_recorded() {
        let mut history = History::new();
        assert!(!history.record(frame(&["a"]), &frame(&["a"])));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_step_clears_redo() {
        let mut history = History::new();
        history.record(frame(&[]), &frame(&["a"]));
        history.undo(frame(&["a"]));
        assert_eq!(history.redo_levels(), 1);

        history.record(frame(&[]), &frame(&["b"]));
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_batch_is_one_step() {
        let mut history = History::new();
        history.begin_batch(frame(&[]));
        assert!(!history.record(frame(&[]), &frame(&["a"])));
        assert!(!history.record(frame(&["a"]), &frame(&["a", "b"])));
        assert!(history.end_batch(&frame(&["a", "b"])));

        assert_eq!(history.undo_levels(), 1);
        let restored = history.undo(frame(&["a", "b"])).unwrap();
        assert!(restored.elements.is_empty());
    }

    #[test]
    fn test_empty_batch_pushes_nothing() {
        let mut history = History::new();
        history.begin_batch(frame(&["a"]));
        assert!(!history.end_batch(&frame(&["a"])));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_pause_suppresses_recording() {
        let mut history = History::new();
        history.pause();
        history.pause();
        history.resume();
        assert!(!history.record(frame(&[]), &frame(&["a"])));

        history.resume();
        assert!(history.record(frame(&[]), &frame(&["a"])));
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut history = History::with_max_levels(2);
        history.record(frame(&[]), &frame(&["a"]));
        history.record(frame(&["a"]), &frame(&["a", "b"]));
        history.record(frame(&["a", "b"]), &frame(&["a", "b", "c"]));

        assert_eq!(history.undo_levels(), 2);
        let oldest_kept = {
            history.undo(frame(&["a", "b", "c"]));
            history.undo(frame(&["a", "b"])).unwrap()
        };
        assert_eq!(oldest_kept.elements.len(), 1);
    }
}
