//! # Form Persistence
//!
//! The persistence collaborator stores one record per form. The designer
//! content travels as a single serialized string; writes are partial patches
//! and the store applies them last-write-wins.
//!
//! Implementations:
//! - **MemoryStore**: in-process, with save logging and failure injection for tests
//! - **FileStore**: one JSON file per form under a directory

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PersistenceError, PersistenceResult};

/// Form record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id derived from the current time
    pub fn generate() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self(format!("form-{:x}", nanos))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One stored form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: FormId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    /// Serialized designer content (`[{id, kind, attributes}]`)
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Times the published form was opened for filling in
    #[serde(default)]
    pub visits: u64,
    /// Submissions accepted by the sink
    #[serde(default)]
    pub submissions: u64,
}

impl FormRecord {
    pub fn new(id: FormId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            published: false,
            content: String::new(),
            updated_at: None,
            visits: 0,
            submissions: 0,
        }
    }

    /// Apply a patch in place. Counter bumps leave `updated_at` alone.
    pub fn apply(&mut self, patch: &FormPatch, at: DateTime<Utc>) {
        let mut edited = false;
        if let Some(name) = &patch.name {
            self.name = name.clone();
            edited = true;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
            edited = true;
        }
        if let Some(published) = patch.published {
            self.published = published;
            edited = true;
        }
        if edited {
            self.updated_at = Some(at);
        }

        if patch.visit {
            self.visits += 1;
        }
        if patch.submission {
            self.submissions += 1;
        }
    }
}

/// Totals across a set of forms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStats {
    pub visits: u64,
    pub submissions: u64,
    /// Percentage of visits that ended in a submission
    pub submission_rate: f64,
    pub bounce_rate: f64,
}

impl FormStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FormRecord>) -> Self {
        let (visits, submissions) = records
            .into_iter()
            .fold((0, 0), |(v, s), r| (v + r.visits, s + r.submissions));

        let submission_rate = if visits > 0 {
            (submissions as f64 / visits as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            visits,
            submissions,
            submission_rate,
            bounce_rate: 100.0 - submission_rate,
        }
    }
}

/// Partial update of a form record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// Count one visit
    #[serde(default, skip_serializing_if = "is_false")]
    pub visit: bool,
    /// Count one submission
    #[serde(default, skip_serializing_if = "is_false")]
    pub submission: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FormPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn publish(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            published: Some(true),
            ..Self::default()
        }
    }

    pub fn visit() -> Self {
        Self {
            visit: true,
            ..Self::default()
        }
    }

    pub fn submission() -> Self {
        Self {
            submission: true,
            ..Self::default()
        }
    }
}

/// Persistence collaborator
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn load(&self, form_id: &FormId) -> PersistenceResult<FormRecord>;

    async fn save(&self, form_id: &FormId, patch: FormPatch) -> PersistenceResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<FormId, FormRecord>>,
    saves: Mutex<Vec<(FormId, FormPatch)>>,
    failures: AtomicUsize,
    save_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every save takes `delay` before acknowledging
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    pub fn insert(&self, record: FormRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record);
    }

    /// Create an empty draft form
    pub fn create(&self, name: impl Into<String>) -> FormId {
        let id = FormId::generate();
        self.insert(FormRecord::new(id.clone(), name));
        id
    }

    pub fn record(&self, form_id: &FormId) -> Option<FormRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(form_id)
            .cloned()
    }

    /// Every patch received, including failed ones, in arrival order
    pub fn saves(&self) -> Vec<(FormId, FormPatch)> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reject the next `count` saves
    pub fn fail_next_saves(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn load(&self, form_id: &FormId) -> PersistenceResult<FormRecord> {
        self.record(form_id)
            .ok_or_else(|| PersistenceError::NotFound(form_id.to_string()))
    }

    async fn save(&self, form_id: &FormId, patch: FormPatch) -> PersistenceResult<()> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((form_id.clone(), patch.clone()));

        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(PersistenceError::Rejected("injected failure".to_string()));
        }

        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let record = records
            .get_mut(form_id)
            .ok_or_else(|| PersistenceError::NotFound(form_id.to_string()))?;
        record.apply(&patch, Utc::now());
        Ok(())
    }
}

/// Directory-backed store: `<root>/forms/<form-id>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn forms_dir(&self) -> PathBuf {
        self.root.join("forms")
    }

    fn record_path(&self, form_id: &FormId) -> PathBuf {
        self.forms_dir().join(format!("{}.json", form_id))
    }

    /// Create an empty draft form
    pub async fn create(&self, name: impl Into<String>) -> PersistenceResult<FormRecord> {
        let record = FormRecord::new(FormId::generate(), name);
        self.write(&record).await?;
        tracing::info!("Created form {} ({})", record.id, record.name);
        Ok(record)
    }

    /// All stored forms, sorted by id
    pub async fn list(&self) -> PersistenceResult<Vec<FormRecord>> {
        let dir = self.forms_dir();
        if !tokio::fs::try_exists(&dir).await? {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                let raw = tokio::fs::read_to_string(&path).await?;
                records.push(serde_json::from_str::<FormRecord>(&raw)?);
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn write(&self, record: &FormRecord) -> PersistenceResult<()> {
        tokio::fs::create_dir_all(self.forms_dir()).await?;

        let path = self.record_path(&record.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(record)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl Persistence for FileStore {
    async fn load(&self, form_id: &FormId) -> PersistenceResult<FormRecord> {
        let path = self.record_path(form_id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(form_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, form_id: &FormId, patch: FormPatch) -> PersistenceResult<()> {
        let mut record = self.load(form_id).await?;
        record.apply(&patch, Utc::now());
        self.write(&record).await?;
        tracing::debug!("Wrote form {} ({} content bytes)", form_id, record.content.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut record = FormRecord::new(FormId::new("f"), "Signup");
        record.content = "[]".to_string();

        let now = Utc::now();
        record.apply(&FormPatch { published: Some(true), ..FormPatch::default() }, now);

        assert_eq!(record.name, "Signup");
        assert_eq!(record.content, "[]");
        assert!(record.published);
        assert_eq!(record.updated_at, Some(now));
    }

    #[test]
    fn test_counter_patches_do_not_touch_content() {
        let mut record = FormRecord::new(FormId::new("f"), "Signup");
        record.content = "[]".to_string();

        let now = Utc::now();
        record.apply(&FormPatch::visit(), now);
        record.apply(&FormPatch::visit(), now);
        record.apply(&FormPatch::submission(), now);

        assert_eq!(record.visits, 2);
        assert_eq!(record.submissions, 1);
        assert_eq!(record.content, "[]");
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn test_records_without_counters_still_load() {
        let record: FormRecord =
            serde_json::from_str(r#"{"id":"f","name":"Old","published":true}"#).unwrap();
        assert_eq!(record.visits, 0);
        assert_eq!(record.submissions, 0);
    }

    #[test]
    fn test_stats_sum_counters() {
        let mut a = FormRecord::new(FormId::new("a"), "A");
        a.visits = 6;
        a.submissions = 3;
        let mut b = FormRecord::new(FormId::new("b"), "B");
        b.visits = 2;
        b.submissions = 1;

        let stats = FormStats::from_records([&a, &b]);
        assert_eq!(stats.visits, 8);
        assert_eq!(stats.submissions, 4);
        assert_eq!(stats.submission_rate, 50.0);
        assert_eq!(stats.bounce_rate, 50.0);

        let empty = FormStats::from_records(&[]);
        assert_eq!(empty.submission_rate, 0.0);
        assert_eq!(empty.bounce_rate, 100.0);
    }

    #[test]
    fn test_patch_serialization_skips_absent_fields() {
        let json = serde_json::to_value(FormPatch::content("[]")).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "[]" }));
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryStore::new();
        let id = store.create("Survey");

        store.fail_next_saves(1);
        assert!(store.save(&id, FormPatch::content("[1]")).await.is_err());
        assert!(store.save(&id, FormPatch::content("[2]")).await.is_ok());

        assert_eq!(store.saves().len(), 2);
        assert_eq!(store.record(&id).unwrap().content, "[2]");
    }

    #[tokio::test]
    async fn test_memory_store_missing_form() {
        let store = MemoryStore::new();
        let result = store.load(&FormId::new("nope")).await;
        assert!(matches!(result, Err(PersistenceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let created = store.create("Feedback").await.unwrap();
        store
            .save(&created.id, FormPatch::publish("[]"))
            .await
            .unwrap();

        let loaded = store.load(&created.id).await.unwrap();
        assert_eq!(loaded.name, "Feedback");
        assert!(loaded.published);
        assert_eq!(loaded.content, "[]");
        assert!(loaded.updated_at.is_some());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_missing_form() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let result = store.load(&FormId::new("missing")).await;
        assert!(matches!(result, Err(PersistenceError::NotFound(_))));
        assert!(store.list().await.unwrap().is_empty());
    }
}
