//! examgen CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examgen",
    version,
    about = "Randomized multiple-choice exam models with answer keys"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate exam models from a question bank
    Generate(GenerateArgs),

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Config file path (for extra anchor phrases)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the answer key of a generated exam set
    Key {
        /// Exam set JSON written by `generate`
        #[arg(long)]
        exam: PathBuf,

        /// Only show this model version (e.g. "B")
        #[arg(long = "model")]
        model: Option<String>,
    },

    /// Create starter config and example bank
    Init,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the .toml question bank
    #[arg(long)]
    pub bank: PathBuf,

    /// Number of exam models (versions)
    #[arg(long)]
    pub models: Option<u32>,

    /// Seed for the random source (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Question IDs to include (comma-separated)
    #[arg(long)]
    pub ids: Option<String>,

    /// Recipe TOML with per block/topic/difficulty counts
    #[arg(long)]
    pub recipe: Option<PathBuf>,

    /// Base question order: by-block, random, manual, by-id
    #[arg(long, default_value = "by-block")]
    pub order: String,

    /// Keep the base question order in every model
    #[arg(long)]
    pub no_shuffle_questions: bool,

    /// Keep canonical option order in every model
    #[arg(long)]
    pub no_shuffle_options: bool,

    /// Extra anchor phrases (comma-separated)
    #[arg(long)]
    pub anchors: Option<String>,

    /// Ignore extra anchor phrases, use only the built-in ones
    #[arg(long)]
    pub no_auto_anchor: bool,

    /// Base name for output files
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format: csv, json, md, all
    #[arg(long, default_value = "all")]
    pub format: String,

    /// Record today's date as `used` for the exported questions
    #[arg(long)]
    pub mark_used: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examgen_core=info".parse().unwrap())
                .add_directive("examgen_cli=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Validate { bank, config } => commands::validate::execute(bank, config),
        Commands::Key { exam, model } => commands::key::execute(exam, model),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
