use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formcraft_common::{FileStore, FormId, TracingNotifier};
use formcraft_editor::Designer;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Form id
    pub form_id: String,
}

pub async fn publish(args: PublishArgs, config: &Config, cwd: &str) -> Result<()> {
    let store = Arc::new(FileStore::new(config.get_store_dir(cwd)));
    let mut designer = Designer::open(
        FormId::new(args.form_id),
        store,
        Arc::new(TracingNotifier),
        config.designer.clone(),
    )
    .await?;

    let published_at = designer.publish().await?;
    let form_id = designer.form_id().clone();
    designer.close().await;

    println!(
        "{} Published {} at {}",
        "✓".green(),
        form_id.as_str().bright_white().bold(),
        published_at.to_rfc3339()
    );
    Ok(())
}
