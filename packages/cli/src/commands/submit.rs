use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formcraft_common::{FileSink, FileStore, FormId, TracingNotifier};
use formcraft_fields::ElementId;
use formcraft_submission::{PublishedForm, SubmissionError, SubmissionForm};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Form id
    pub form_id: String,

    /// JSON object mapping element ids to values
    pub values: PathBuf,
}

pub async fn submit(args: SubmitArgs, config: &Config, cwd: &str) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.values)
        .await
        .with_context(|| format!("Cannot read {}", args.values.display()))?;
    let values: BTreeMap<String, String> =
        serde_json::from_str(&raw).context("Values must be a JSON object of strings")?;

    let store_dir = config.get_store_dir(cwd);
    let store = FileStore::new(&store_dir);
    let sink = FileSink::new(&store_dir);

    let form = PublishedForm::visit(&store, &FormId::new(args.form_id)).await?;
    let mut submission = SubmissionForm::new(form);
    for (id, value) in values {
        submission.set_value(&ElementId::new(id), value);
    }

    match submission.submit(&store, &sink, &TracingNotifier).await {
        Ok(()) => {
            println!(
                "{} Submitted {}",
                "✓".green(),
                submission.form().name().bright_white().bold()
            );
            Ok(())
        }
        Err(SubmissionError::Invalid(failing)) => {
            println!("{} Some fields need attention:", "✗".red());
            for id in &failing {
                let value = submission.value(id).unwrap_or("");
                println!("    {} {:?}", id.as_str().yellow(), value);
            }
            anyhow::bail!("{} field(s) failed validation", failing.len())
        }
        Err(e) => Err(e.into()),
    }
}
