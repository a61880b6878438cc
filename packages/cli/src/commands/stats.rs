use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formcraft_common::{FileSink, FileStore, FormId, FormRecord, FormStats, Persistence};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Limit to one form
    pub form_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct SubmissionsArgs {
    /// Form id
    pub form_id: String,
}

pub async fn stats(args: StatsArgs, config: &Config, cwd: &str) -> Result<()> {
    let store = FileStore::new(config.get_store_dir(cwd));
    let records: Vec<FormRecord> = match args.form_id {
        Some(id) => vec![store.load(&FormId::new(id)).await?],
        None => store.list().await?,
    };
    let stats = FormStats::from_records(&records);

    println!("  Visits:          {}", stats.visits.to_string().bright_white().bold());
    println!("  Submissions:     {}", stats.submissions.to_string().bright_white().bold());
    println!("  Submission rate: {}", format!("{:.1}%", stats.submission_rate).green());
    println!("  Bounce rate:     {}", format!("{:.1}%", stats.bounce_rate).yellow());
    Ok(())
}

pub async fn submissions(args: SubmissionsArgs, config: &Config, cwd: &str) -> Result<()> {
    let store_dir = config.get_store_dir(cwd);
    let form_id = FormId::new(args.form_id);

    // Fails for unknown forms
    let record = FileStore::new(&store_dir).load(&form_id).await?;
    let stored = FileSink::new(&store_dir).read(&form_id).await?;

    if stored.is_empty() {
        println!("{}", format!("No submissions for {} yet", record.name).yellow());
        return Ok(());
    }

    println!("{} {}", record.name.bright_white().bold(), format!("({} submissions)", stored.len()).dimmed());
    for (i, submission) in stored.iter().enumerate() {
        println!();
        println!("  {}", format!("#{}", i + 1).cyan());
        for (element_id, value) in &submission.content {
            println!("    {:<24} {}", element_id, value);
        }
    }
    Ok(())
}
