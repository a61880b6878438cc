use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formcraft_common::{FileStore, FormId, Persistence};
use formcraft_fields::deserialize_elements;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Form name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Form id
    pub form_id: String,
}

pub async fn create(args: CreateArgs, config: &Config, cwd: &str) -> Result<()> {
    let store = FileStore::new(config.get_store_dir(cwd));
    let record = store.create(args.name).await?;

    println!("{} Created form {}", "✓".green(), record.id.as_str().bright_white().bold());
    Ok(())
}

pub async fn list(config: &Config, cwd: &str) -> Result<()> {
    let store = FileStore::new(config.get_store_dir(cwd));
    let records = store.list().await?;

    if records.is_empty() {
        println!("{}", "No forms yet".yellow());
        return Ok(());
    }

    for record in records {
        let status = if record.published {
            "published".green()
        } else {
            "draft".yellow()
        };
        println!("  {:<28} {:<10} {}", record.id.as_str().bright_white(), status, record.name);
    }
    Ok(())
}

pub async fn show(args: ShowArgs, config: &Config, cwd: &str) -> Result<()> {
    let store = FileStore::new(config.get_store_dir(cwd));
    let record = store.load(&FormId::new(args.form_id)).await?;
    let elements = deserialize_elements(&record.content)?;

    println!("{} {}", record.name.bright_white().bold(), format!("({})", record.id).dimmed());
    println!(
        "  Status:  {}",
        if record.published { "published".green() } else { "draft".yellow() }
    );
    if let Some(updated_at) = record.updated_at {
        println!("  Updated: {}", updated_at.to_rfc3339());
    }
    println!();

    if elements.is_empty() {
        println!("  {}", "(no elements)".dimmed());
    }
    for (i, element) in elements.iter().enumerate() {
        let required = if element.attributes().required() { "*".red() } else { " ".normal() };
        println!(
            "  {:>2}. {:<18} {}{}",
            i,
            element.kind().as_str().cyan(),
            element.id(),
            required
        );
    }
    Ok(())
}
