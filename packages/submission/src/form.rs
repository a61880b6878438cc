//! # Submission Form
//!
//! Replays a published document to collect and validate user values.
//!
//! Values are held per element id for the lifetime of the form. A failed
//! validation or a rejected submission leaves them in place so the user can
//! correct and resubmit.

use std::collections::{BTreeSet, HashMap};

use formcraft_common::{
    FormId, FormPatch, FormRecord, Notification, Notifier, Persistence, SerializedValues,
    Submission, SubmissionSink,
};
use formcraft_fields::{deserialize_elements, registry, Element, ElementId};

use crate::SubmissionError;

pub const INVALID_FORM_MESSAGE: &str = "please check the form for errors";
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong";

/// A frozen, published form
#[derive(Debug, Clone)]
pub struct PublishedForm {
    form_id: FormId,
    name: String,
    elements: Vec<Element>,
}

impl PublishedForm {
    pub fn from_record(record: &FormRecord) -> Result<Self, SubmissionError> {
        if !record.published {
            return Err(SubmissionError::NotPublished(record.id.to_string()));
        }

        Ok(Self {
            form_id: record.id.clone(),
            name: record.name.clone(),
            elements: deserialize_elements(&record.content)?,
        })
    }

    pub async fn load(persistence: &dyn Persistence, form_id: &FormId) -> Result<Self, SubmissionError> {
        let record = persistence.load(form_id).await?;
        Self::from_record(&record)
    }

    /// Load a form for filling in and count the visit.
    ///
    /// Drafts are rejected before anything is counted. A failed count is
    /// logged and does not block the visitor.
    pub async fn visit(persistence: &dyn Persistence, form_id: &FormId) -> Result<Self, SubmissionError> {
        let form = Self::load(persistence, form_id).await?;
        if let Err(e) = persistence.save(form_id, FormPatch::visit()).await {
            tracing::warn!(form = %form_id, "Failed to count visit: {}", e);
        }
        Ok(form)
    }

    pub fn form_id(&self) -> &FormId {
        &self.form_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements that contribute a value, in document order
    pub fn input_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| registry::strategy(e.kind()).collects_input())
    }

    fn input_element(&self, element_id: &ElementId) -> Option<&Element> {
        self.input_elements().find(|e| e.id() == element_id)
    }
}

/// Values being entered into a published form
#[derive(Debug)]
pub struct SubmissionForm {
    form: PublishedForm,
    values: HashMap<ElementId, String>,
    invalid: BTreeSet<ElementId>,
    submitted: bool,
}

impl SubmissionForm {
    pub fn new(form: PublishedForm) -> Self {
        Self {
            form,
            values: HashMap::new(),
            invalid: BTreeSet::new(),
            submitted: false,
        }
    }

    pub fn form(&self) -> &PublishedForm {
        &self.form
    }

    /// Record a value and validate it inline.
    ///
    /// Returns whether the value is valid. Ids that do not name an
    /// input-collecting element are ignored.
    pub fn set_value(&mut self, element_id: &ElementId, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(element) = self.form.input_element(element_id) else {
            tracing::warn!(element = %element_id, "Ignoring value for unknown field");
            return false;
        };

        let valid = registry::validate(element, &value);
        if valid {
            self.invalid.remove(element_id);
        } else {
            self.invalid.insert(element_id.clone());
        }

        self.values.insert(element_id.clone(), value);
        valid
    }

    pub fn value(&self, element_id: &ElementId) -> Option<&str> {
        self.values.get(element_id).map(String::as_str)
    }

    /// Ids currently marked invalid
    pub fn invalid_fields(&self) -> &BTreeSet<ElementId> {
        &self.invalid
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Validate every input element. Missing values count as empty.
    ///
    /// On success returns the values to submit; otherwise the failing ids in
    /// document order.
    pub fn validate(&mut self) -> Result<SerializedValues, Vec<ElementId>> {
        let mut values = SerializedValues::new();
        let mut failing = Vec::new();

        for element in self.form.input_elements() {
            let value = self.values.get(element.id()).map(String::as_str).unwrap_or("");
            if registry::validate(element, value) {
                values.insert(element.id().to_string(), value.to_string());
            } else {
                failing.push(element.id().clone());
            }
        }

        self.invalid = failing.iter().cloned().collect();
        if failing.is_empty() {
            Ok(values)
        } else {
            Err(failing)
        }
    }

    /// Validate, hand the values to the sink and bump the form's
    /// submission counter
    pub async fn submit(
        &mut self,
        persistence: &dyn Persistence,
        sink: &dyn SubmissionSink,
        notifier: &dyn Notifier,
    ) -> Result<(), SubmissionError> {
        if self.submitted {
            return Err(SubmissionError::AlreadySubmitted);
        }

        let content = match self.validate() {
            Ok(content) => content,
            Err(failing) => {
                tracing::debug!(form = %self.form.form_id, failing = failing.len(), "Submission blocked");
                notifier.notify(Notification::error(INVALID_FORM_MESSAGE));
                return Err(SubmissionError::Invalid(failing));
            }
        };

        let submission = Submission {
            form_id: self.form.form_id.clone(),
            content,
        };
        if let Err(e) = sink.submit(submission).await {
            tracing::warn!(form = %self.form.form_id, "Submission failed: {}", e);
            notifier.notify(Notification::error(SUBMIT_FAILED_MESSAGE));
            return Err(e.into());
        }

        self.submitted = true;
        // The values are stored; a stale counter is not worth failing over
        if let Err(e) = persistence.save(&self.form.form_id, FormPatch::submission()).await {
            tracing::warn!(form = %self.form.form_id, "Failed to count submission: {}", e);
        }
        tracing::info!(form = %self.form.form_id, "Form submitted");
        Ok(())
    }
}
