//! # Designer Engine
//!
//! One editing session over one form. Owns the document, the undo history
//! and the save bookkeeping; forwards every content change to the autosave
//! worker when one is attached.
//!
//! Every content-changing operation goes through [`Designer::apply`]:
//!
//! 1. reject if the form is published
//! 2. compute the next element list
//! 3. bail out if it is structurally equal to the current one
//! 4. swap it in (dropping a selection that no longer exists)
//! 5. mark unsaved and hand a snapshot to autosave
//! 6. record the previous frame in history
//!
//! Selection changes never touch history or the save state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use formcraft_common::{FormId, FormRecord, Notification, Notifier, Persistence};
use formcraft_fields::{deserialize_elements, registry, Element, ElementDraft, ElementId, FieldKind, IdGenerator};

use crate::autosave::{AutosaveCoordinator, AutosaveHandle, SaveEvent, SaveState, Snapshot};
use crate::config::{DesignerConfig, HistoryPolicy};
use crate::document::Document;
use crate::drag::{resolve_drop, DragSource, DropAction, DropTarget};
use crate::generation::parse_generation_response;
use crate::history::{History, HistoryFrame};
use crate::mutations::Mutation;
use crate::EditorError;

pub const PUBLISHED_MESSAGE: &str = "Your form is now available to the public";

/// Result of a completed drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Cancelled,
    Inserted { element_id: ElementId },
    Moved { element_id: ElementId },
    /// The drop resolved to the element's current position
    Unchanged,
    /// The generator was dropped; generated elements go in at `index`
    OpenGenerator { index: usize },
}

pub struct Designer {
    form_id: FormId,
    document: Document,
    history: History,
    save_state: SaveState,
    /// Bumped on every change that marks the document unsaved
    revision: u64,
    ids: IdGenerator,
    notifier: Arc<dyn Notifier>,
    autosave: Option<AutosaveHandle>,
    published: bool,
    config: DesignerConfig,
}

impl Designer {
    pub fn new(form_id: FormId, notifier: Arc<dyn Notifier>, config: DesignerConfig) -> Self {
        Self {
            ids: IdGenerator::new(form_id.as_str()),
            form_id,
            document: Document::new(),
            history: History::with_max_levels(config.max_history),
            save_state: SaveState::default(),
            revision: 0,
            notifier,
            autosave: None,
            published: false,
            config,
        }
    }

    /// Build a designer over a stored record without attaching autosave
    pub fn from_record(
        record: &FormRecord,
        notifier: Arc<dyn Notifier>,
        config: DesignerConfig,
    ) -> Result<Self, EditorError> {
        let mut designer = Self::new(record.id.clone(), notifier, config);
        designer.hydrate(deserialize_elements(&record.content)?)?;
        designer.published = record.published;
        Ok(designer)
    }

    /// Load a form and start autosaving it. Published forms open read-only
    /// with no autosave.
    pub async fn open(
        form_id: FormId,
        persistence: Arc<dyn Persistence>,
        notifier: Arc<dyn Notifier>,
        config: DesignerConfig,
    ) -> Result<Self, EditorError> {
        let loaded = persistence
            .load(&form_id)
            .await
            .map_err(EditorError::from)
            .and_then(|record| Self::from_record(&record, Arc::clone(&notifier), config));

        let mut designer = match loaded {
            Ok(designer) => designer,
            Err(e) => {
                tracing::error!(form = %form_id, "Failed to open form: {}", e);
                notifier.notify(Notification::error("Something went wrong while loading the form."));
                return Err(e);
            }
        };

        if !designer.published {
            let coordinator = AutosaveCoordinator::new(
                form_id,
                persistence,
                notifier,
                designer.config.throttle(),
            );
            let handle = coordinator.spawn(designer.snapshot());
            designer.attach_autosave(handle);
        }

        tracing::info!(
            form = %designer.form_id,
            elements = designer.document.len(),
            published = designer.published,
            "Opened designer"
        );
        Ok(designer)
    }

    pub fn attach_autosave(&mut self, handle: AutosaveHandle) {
        self.autosave = Some(handle);
    }

    /// Stop autosave, flushing anything pending
    pub async fn close(mut self) {
        if let Some(handle) = self.autosave.take() {
            handle.shutdown().await;
        }
    }

    pub fn form_id(&self) -> &FormId {
        &self.form_id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn elements(&self) -> &[Element] {
        self.document.elements()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.document.selected_element()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save_state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn content(&self) -> Result<String, EditorError> {
        Ok(self.document.to_content()?)
    }

    // Mutations

    /// Apply a content mutation. Returns whether the content changed.
    pub fn apply(&mut self, mutation: Mutation, mark_unsaved: bool) -> Result<bool, EditorError> {
        self.ensure_editable()?;

        let next = mutation.apply(self.document.elements())?;
        if next.as_slice() == self.document.elements() {
            tracing::debug!(mutation = mutation.name(), "Mutation left content unchanged");
            if mark_unsaved && mutation.always_marks_unsaved() {
                self.mark_unsaved();
            }
            return Ok(false);
        }

        let before = self.frame();
        self.document.replace_elements(Arc::new(next));
        if mark_unsaved {
            self.mark_unsaved();
        }
        let after = self.frame();
        self.history.record(before, &after);

        tracing::debug!(
            mutation = mutation.name(),
            elements = self.document.len(),
            "Applied mutation"
        );
        Ok(true)
    }

    pub fn set_elements(&mut self, elements: Vec<Element>, mark_unsaved: bool) -> Result<bool, EditorError> {
        self.apply(Mutation::SetElements { elements }, mark_unsaved)
    }

    /// Replace content without recording history or marking unsaved
    pub fn hydrate(&mut self, elements: Vec<Element>) -> Result<(), EditorError> {
        self.history.pause();
        let result = self.set_elements(elements, false);
        self.history.resume();
        result.map(|_| ())
    }

    pub fn add_element(&mut self, index: usize, element: Element) -> Result<bool, EditorError> {
        self.apply(Mutation::AddElement { index, element }, true)
    }

    pub fn remove_element(&mut self, element_id: &ElementId) -> Result<bool, EditorError> {
        self.apply(
            Mutation::RemoveElement {
                element_id: element_id.clone(),
            },
            true,
        )
    }

    pub fn move_element(&mut self, element_id: &ElementId, index: usize) -> Result<bool, EditorError> {
        self.apply(
            Mutation::MoveElement {
                element_id: element_id.clone(),
                index,
            },
            true,
        )
    }

    pub fn remove_all_elements(&mut self) -> Result<bool, EditorError> {
        self.apply(Mutation::RemoveAllElements, true)
    }

    pub fn update_element(&mut self, element_id: &ElementId, element: Element) -> Result<bool, EditorError> {
        self.apply(
            Mutation::UpdateElement {
                element_id: element_id.clone(),
                element,
            },
            true,
        )
    }

    /// A new element of `kind` with default attributes and a fresh id
    pub fn new_element(&mut self, kind: FieldKind) -> Element {
        let id = self.fresh_id();
        registry::construct(kind, id)
    }

    fn fresh_id(&mut self) -> ElementId {
        loop {
            let id = self.ids.new_id();
            if self.document.index_of(&id).is_none() {
                return id;
            }
        }
    }

    // Selection

    pub fn set_selected_element(&mut self, element_id: Option<&ElementId>) -> Result<(), EditorError> {
        match element_id {
            None => self.document.clear_selection(),
            Some(id) => {
                if !self.document.select(id) {
                    return Err(EditorError::SelectionNotFound(id.to_string()));
                }
            }
        }
        Ok(())
    }

    // History

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        self.end_batch();

        let Some(previous) = self.history.undo(self.frame()) else {
            return Ok(false);
        };
        self.restore(previous);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        self.end_batch();

        let Some(next) = self.history.redo(self.frame()) else {
            return Ok(false);
        };
        self.restore(next);
        Ok(true)
    }

    fn restore(&mut self, frame: HistoryFrame) {
        self.document.replace_elements(frame.elements);
        self.document.clear_selection();
        self.mark_unsaved();
    }

    pub fn pause_history(&mut self) {
        self.history.pause();
    }

    pub fn resume_history(&mut self) {
        self.history.resume();
    }

    /// Group following mutations into one undo step
    pub fn begin_batch(&mut self) {
        let current = self.frame();
        self.history.begin_batch(current);
    }

    pub fn end_batch(&mut self) {
        let current = self.frame();
        self.history.end_batch(&current);
    }

    fn frame(&self) -> HistoryFrame {
        HistoryFrame::new(self.document.shared_elements(), self.save_state.unsaved_changes)
    }

    // Drag and drop

    pub fn drop_dragged(
        &mut self,
        source: &DragSource,
        target: Option<&DropTarget>,
    ) -> Result<DropOutcome, EditorError> {
        match resolve_drop(self.document.elements(), source, target)? {
            DropAction::Cancel => Ok(DropOutcome::Cancelled),
            DropAction::OpenGenerator { index } => Ok(DropOutcome::OpenGenerator { index }),
            DropAction::Insert { kind, index } => {
                self.ensure_editable()?;
                let element = self.new_element(kind);
                let element_id = element.id().clone();
                self.add_element(index, element)?;
                Ok(DropOutcome::Inserted { element_id })
            }
            DropAction::Move { element_id, index } => {
                if self.move_element(&element_id, index)? {
                    Ok(DropOutcome::Moved { element_id })
                } else {
                    Ok(DropOutcome::Unchanged)
                }
            }
        }
    }

    // Generation

    /// Replace the whole document with generated elements (one undo step)
    pub fn replace_with_generated(&mut self, raw: &str) -> Result<usize, EditorError> {
        self.ensure_editable()?;
        let drafts = self.parse_generated(raw)?;
        let count = drafts.len();

        let elements = drafts
            .into_iter()
            .map(|draft| {
                let id = self.fresh_id();
                draft.into_element(id)
            })
            .collect();
        self.set_elements(elements, true)?;

        tracing::info!(count, "Replaced document with generated elements");
        Ok(count)
    }

    /// Insert generated elements in order starting at `index` (one undo step)
    pub fn insert_generated(&mut self, index: usize, raw: &str) -> Result<usize, EditorError> {
        self.ensure_editable()?;
        let drafts = self.parse_generated(raw)?;
        let count = drafts.len();
        let index = index.min(self.document.len());

        // Nest inside a batch the caller already opened
        let owns_batch = !self.history.is_batching();
        if owns_batch {
            self.begin_batch();
        }
        let mut result = Ok(());
        for (offset, draft) in drafts.into_iter().enumerate() {
            let id = self.fresh_id();
            if let Err(e) = self.add_element(index + offset, draft.into_element(id)) {
                result = Err(e);
                break;
            }
        }
        if owns_batch {
            self.end_batch();
        }
        result?;

        tracing::info!(count, index, "Inserted generated elements");
        Ok(count)
    }

    fn parse_generated(&self, raw: &str) -> Result<Vec<ElementDraft>, EditorError> {
        parse_generation_response(raw).map_err(|e| {
            tracing::warn!("Rejected generation response: {}", e);
            self.notifier
                .notify(Notification::error("The generated form could not be used. Please try again."));
            EditorError::from(e)
        })
    }

    // Saving

    fn ensure_editable(&self) -> Result<(), EditorError> {
        if self.published {
            return Err(EditorError::ReadOnly);
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            elements: self.document.shared_elements(),
        }
    }

    fn mark_unsaved(&mut self) {
        self.save_state.unsaved_changes = true;
        self.revision += 1;

        let snapshot = self.snapshot();
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.schedule(snapshot);
        }
    }

    /// Ask autosave to write the latest content after a failure
    pub fn retry_save(&self) -> bool {
        self.autosave.as_ref().is_some_and(AutosaveHandle::retry)
    }

    /// Apply save progress reported by the autosave worker so far
    pub fn sync_save_state(&mut self) -> &SaveState {
        loop {
            let Some(event) = self.autosave.as_mut().and_then(AutosaveHandle::try_next_event) else {
                break;
            };
            self.apply_save_event(&event);
        }
        &self.save_state
    }

    /// Wait for the next save event and apply it
    pub async fn next_save_event(&mut self) -> Option<SaveEvent> {
        let event = self.autosave.as_mut()?.next_event().await?;
        self.apply_save_event(&event);
        Some(event)
    }

    fn apply_save_event(&mut self, event: &SaveEvent) {
        match event {
            SaveEvent::Started { .. } => self.save_state.save_in_flight = true,
            SaveEvent::Saved { revision, at } => {
                self.save_state.save_in_flight = false;
                if self.save_state.saved_at.map_or(true, |prev| *at >= prev) {
                    self.save_state.saved_at = Some(*at);
                }
                // A change made while the write was in flight stays unsaved
                if *revision == self.revision {
                    self.save_state.unsaved_changes = false;
                    if self.config.history_policy == HistoryPolicy::ClearOnSave {
                        self.history.clear();
                    }
                }
            }
            SaveEvent::Failed { .. } => self.save_state.save_in_flight = false,
        }
    }

    /// Write the current content immediately with the published flag set.
    /// The designer is read-only afterwards.
    pub async fn publish(&mut self) -> Result<DateTime<Utc>, EditorError> {
        self.ensure_editable()?;
        if self.document.is_empty() {
            return Err(EditorError::EmptyDocument);
        }

        self.end_batch();
        let snapshot = self.snapshot();
        let autosave = self.autosave.as_mut().ok_or(EditorError::NotPersisted)?;
        let at = autosave.publish(snapshot).await?;

        self.sync_save_state();
        self.published = true;
        self.save_state = SaveState {
            unsaved_changes: false,
            saved_at: Some(at),
            save_in_flight: false,
        };
        self.history.clear();
        self.document.clear_selection();

        tracing::info!(form = %self.form_id, "Form published");
        self.notifier.notify(Notification::success(PUBLISHED_MESSAGE));
        Ok(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_common::RecordingNotifier;
    use formcraft_fields::{FieldAttributes, InputAttributes};

    fn designer() -> (Designer, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let designer = Designer::new(
            FormId::new("form-test"),
            notifier.clone(),
            DesignerConfig::default(),
        );
        (designer, notifier)
    }

    fn ids(designer: &Designer) -> Vec<String> {
        designer.elements().iter().map(|e| e.id().to_string()).collect()
    }

    #[test]
    fn test_add_marks_unsaved_and_records_history() {
        let (mut designer, _) = designer();
        let element = designer.new_element(FieldKind::TextField);

        assert!(designer.add_element(0, element).unwrap());
        assert!(designer.save_state().unsaved_changes);
        assert_eq!(designer.history().undo_levels(), 1);
        assert_eq!(designer.revision(), 1);
    }

    #[test]
    fn test_hydrate_is_silent() {
        let (mut designer, _) = designer();
        let element = registry::construct(FieldKind::TextField, ElementId::new("a"));

        designer.hydrate(vec![element]).unwrap();
        assert_eq!(designer.elements().len(), 1);
        assert!(!designer.save_state().unsaved_changes);
        assert!(!designer.history().can_undo());
    }

    #[test]
    fn test_removing_selected_element_clears_selection() {
        let (mut designer, _) = designer();
        let a = designer.new_element(FieldKind::TextField);
        let a_id = a.id().clone();
        designer.add_element(0, a).unwrap();
        designer.set_selected_element(Some(&a_id)).unwrap();

        designer.remove_element(&a_id).unwrap();
        assert!(designer.selected_element().is_none());
        assert!(designer.elements().is_empty());
    }

    #[test]
    fn test_selecting_missing_element_fails() {
        let (mut designer, _) = designer();
        let result = designer.set_selected_element(Some(&ElementId::new("ghost")));
        assert!(matches!(result, Err(EditorError::SelectionNotFound(_))));
    }

    #[test]
    fn test_remove_all_on_empty_document_still_marks_unsaved() {
        let (mut designer, _) = designer();
        assert!(!designer.remove_all_elements().unwrap());
        assert!(designer.save_state().unsaved_changes);
        assert!(!designer.history().can_undo());
    }

    #[test]
    fn test_undo_clears_selection() {
        let (mut designer, _) = designer();
        let a = designer.new_element(FieldKind::TextField);
        let a_id = a.id().clone();
        designer.add_element(0, a).unwrap();
        let b = designer.new_element(FieldKind::TextField);
        designer.add_element(1, b).unwrap();
        designer.set_selected_element(Some(&a_id)).unwrap();

        assert!(designer.undo().unwrap());
        assert_eq!(ids(&designer), vec![a_id.to_string()]);
        assert!(designer.selected_element().is_none());
    }

    #[test]
    fn test_update_changes_attributes() {
        let (mut designer, _) = designer();
        let a = designer.new_element(FieldKind::TextField);
        let a_id = a.id().clone();
        designer.add_element(0, a.clone()).unwrap();

        let relabeled = a
            .with_attributes(FieldAttributes::Text(InputAttributes {
                label: "Full name".to_string(),
                helper_text: String::new(),
                required: true,
                placeholder: String::new(),
            }))
            .unwrap();

        assert!(designer.update_element(&a_id, relabeled).unwrap());
        assert!(designer.elements()[0].attributes().required());
        assert_eq!(designer.history().undo_levels(), 2);
    }

    #[test]
    fn test_palette_drop_inserts_fresh_element() {
        let (mut designer, _) = designer();
        let outcome = designer
            .drop_dragged(
                &DragSource::PaletteItem { kind: FieldKind::DateField },
                Some(&DropTarget::DropArea),
            )
            .unwrap();

        match outcome {
            DropOutcome::Inserted { element_id } => {
                assert_eq!(designer.elements()[0].id(), &element_id);
                assert_eq!(designer.elements()[0].kind(), FieldKind::DateField);
            }
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[test]
    fn test_generation_failure_leaves_document_untouched() {
        let (mut designer, notifier) = designer();
        let a = designer.new_element(FieldKind::TextField);
        designer.add_element(0, a).unwrap();
        let before = designer.elements().to_vec();

        let result = designer.replace_with_generated(r#"{"elements": [{"type": "Nope"}]}"#);
        assert!(matches!(result, Err(EditorError::Generation(_))));
        assert_eq!(designer.elements(), before.as_slice());
        assert_eq!(notifier.errors(), 1);
    }

    #[test]
    fn test_insert_generated_is_one_undo_step() {
        let (mut designer, _) = designer();
        let a = designer.new_element(FieldKind::TitleField);
        designer.add_element(0, a).unwrap();

        let raw = r#"[{"type":"TextField"},{"type":"EmailField"},{"type":"CheckboxField"}]"#;
        assert_eq!(designer.insert_generated(1, raw).unwrap(), 3);
        assert_eq!(designer.elements().len(), 4);
        assert_eq!(designer.elements()[2].kind(), FieldKind::EmailField);

        assert!(designer.undo().unwrap());
        assert_eq!(designer.elements().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_requires_persistence_and_content() {
        let (mut designer, _) = designer();
        assert!(matches!(designer.publish().await, Err(EditorError::EmptyDocument)));

        let a = designer.new_element(FieldKind::TextField);
        designer.add_element(0, a).unwrap();
        assert!(matches!(designer.publish().await, Err(EditorError::NotPersisted)));
        assert!(!designer.is_published());
    }
}
