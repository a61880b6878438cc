//! # Submission Sink
//!
//! Receives validated submissions: a flat map from element id to the value
//! the user entered.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::{FormId, SinkError, SinkResult};

/// Element id → entered value
pub type SerializedValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: FormId,
    pub content: SerializedValues,
}

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, submission: Submission) -> SinkResult<()>;
}

/// In-memory sink with failure injection
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: Mutex<Vec<Submission>>,
    failures: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reject the next `count` submissions
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn submit(&self, submission: Submission) -> SinkResult<()> {
        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(SinkError::Rejected("injected failure".to_string()));
        }

        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(submission);
        Ok(())
    }
}

/// Appends submissions as JSON lines to `<root>/submissions/<form-id>.jsonl`
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, form_id: &FormId) -> PathBuf {
        self.root
            .join("submissions")
            .join(format!("{}.jsonl", form_id))
    }

    /// Previously stored submissions for a form
    pub async fn read(&self, form_id: &FormId) -> SinkResult<Vec<Submission>> {
        let raw = match tokio::fs::read_to_string(self.path(form_id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(SinkError::from))
            .collect()
    }
}

#[async_trait]
impl SubmissionSink for FileSink {
    async fn submit(&self, submission: Submission) -> SinkResult<()> {
        let path = self.path(&submission.form_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_vec(&submission)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::info!("Stored submission for form {}", submission.form_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(form: &str, value: &str) -> Submission {
        Submission {
            form_id: FormId::new(form),
            content: BTreeMap::from([("field-1".to_string(), value.to_string())]),
        }
    }

    #[tokio::test]
    async fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.submit(submission("f", "one")).await.unwrap();
        sink.submit(submission("f", "two")).await.unwrap();

        let stored = sink.read(&FormId::new("f")).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].content["field-1"], "two");
        assert!(sink.read(&FormId::new("other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_sink_failure_injection() {
        let sink = MemorySink::new();
        sink.fail_next(1);

        assert!(sink.submit(submission("f", "a")).await.is_err());
        assert!(sink.submit(submission("f", "b")).await.is_ok());
        assert_eq!(sink.submissions().len(), 1);
    }
}
