use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sagar", about = "eDNA biodiversity analysis and the SeaSage assistant")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a FASTQ/FASTA file and report species, diversity and alerts
    Analyze(commands::analyze::AnalyzeArgs),
    /// Ask the SeaSage assistant a question
    Chat(commands::chat::ChatArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args).await,
        Commands::Chat(args) => commands::chat::run(args).await,
        Commands::Config(args) => commands::config::run(args),
    }
}
