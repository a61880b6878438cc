mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    create, generate, init, kinds, list, publish, show, stats, submissions, submit, CreateArgs,
    GenerateArgs, InitArgs, PublishArgs, ShowArgs, StatsArgs, SubmissionsArgs, SubmitArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Formcraft CLI - Build, publish and fill in forms
#[derive(Parser, Debug)]
#[command(name = "formcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Formcraft store
    Init(InitArgs),

    /// List the field kinds available in the designer palette
    Kinds,

    /// Create an empty draft form
    Create(CreateArgs),

    /// List stored forms
    List,

    /// Show the elements of a form
    Show(ShowArgs),

    /// Apply a generated element list to a draft form
    Generate(GenerateArgs),

    /// Publish a draft form, making it read-only
    Publish(PublishArgs),

    /// Submit values to a published form
    Submit(SubmitArgs),

    /// Show visit and submission totals
    Stats(StatsArgs),

    /// List stored submissions of a form
    Submissions(SubmissionsArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .expect("Cannot get current directory")
        .display()
        .to_string();

    let result = run(cli.command, &cwd).await;

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

async fn run(command: Command, cwd: &str) -> anyhow::Result<()> {
    tracing::debug!(cwd, ?command, "Running command");

    match command {
        Command::Init(args) => init(args, cwd),
        Command::Kinds => kinds(),
        Command::Create(args) => create(args, &Config::load(cwd)?, cwd).await,
        Command::List => list(&Config::load(cwd)?, cwd).await,
        Command::Show(args) => show(args, &Config::load(cwd)?, cwd).await,
        Command::Generate(args) => generate(args, &Config::load(cwd)?, cwd).await,
        Command::Publish(args) => publish(args, &Config::load(cwd)?, cwd).await,
        Command::Submit(args) => submit(args, &Config::load(cwd)?, cwd).await,
        Command::Stats(args) => stats(args, &Config::load(cwd)?, cwd).await,
        Command::Submissions(args) => submissions(args, &Config::load(cwd)?, cwd).await,
    }
}
