use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formcraft_editor::DesignerConfig;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for form records and submissions
    #[arg(short, long, default_value = ".formcraft")]
    pub store_dir: String,

    /// Autosave throttle in milliseconds
    #[arg(short, long, default_value = "500")]
    pub throttle_ms: u64,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Formcraft project...".bright_blue().bold());

    let config = Config {
        store_dir: args.store_dir.clone(),
        designer: DesignerConfig {
            throttle_ms: args.throttle_ms,
            ..DesignerConfig::default()
        },
    };

    let store_dir = config.get_store_dir(cwd);
    if !store_dir.exists() {
        fs::create_dir_all(store_dir.join("forms"))?;
        println!("  {} Created {}/", "✓".green(), args.store_dir);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: formcraft create \"My form\"");
    println!("  2. Run: formcraft generate <form-id> response.json");
    println!("  3. Run: formcraft publish <form-id>");

    Ok(())
}
