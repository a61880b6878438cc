//! # Formcraft Submission
//!
//! Collects and validates user-entered values against a published form and
//! hands them to a submission sink.
//!
//! ```rust,ignore
//! let form = PublishedForm::load(&store, &form_id).await?;
//! let mut submission = SubmissionForm::new(form);
//!
//! submission.set_value(&email_id, "me@example.com");
//! submission.submit(&sink, &notifier).await?;
//! ```

mod error;
mod form;

pub use error::SubmissionError;
pub use form::{PublishedForm, SubmissionForm, INVALID_FORM_MESSAGE, SUBMIT_FAILED_MESSAGE};
