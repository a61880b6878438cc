use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formcraft_common::{FileStore, FormId, TracingNotifier};
use formcraft_editor::Designer;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Form id
    pub form_id: String,

    /// File holding the generation response
    pub response: PathBuf,

    /// Insert at this index instead of replacing the whole form
    #[arg(long)]
    pub at: Option<usize>,
}

pub async fn generate(args: GenerateArgs, config: &Config, cwd: &str) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.response)
        .await
        .with_context(|| format!("Cannot read {}", args.response.display()))?;

    let store = Arc::new(FileStore::new(config.get_store_dir(cwd)));
    let mut designer = Designer::open(
        FormId::new(args.form_id),
        store,
        Arc::new(TracingNotifier),
        config.designer.clone(),
    )
    .await?;

    let count = match args.at {
        Some(index) => designer.insert_generated(index, &raw)?,
        None => designer.replace_with_generated(&raw)?,
    };
    let total = designer.elements().len();
    let form_id = designer.form_id().clone();
    designer.close().await;

    println!(
        "{} Added {} generated element(s) to {} ({} total)",
        "✓".green(),
        count.to_string().bright_white().bold(),
        form_id.as_str().cyan(),
        total
    );
    Ok(())
}
