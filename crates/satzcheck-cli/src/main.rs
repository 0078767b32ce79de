//! satzcheck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "satzcheck", version, about = "German grammar feedback for learners")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,

        /// Path to a deck .toml file or directory (default: built-in deck)
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate one answer against a flashcard
    Eval {
        /// Flashcard id
        #[arg(long)]
        card: u32,

        /// The learner's German sentence
        #[arg(long)]
        answer: String,

        /// Path to a deck .toml file or directory (default: built-in deck)
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Evaluate a JSON file of attempts
    Batch {
        /// Path to a JSON array of {flashcard_id, user_german}
        #[arg(long)]
        attempts: PathBuf,

        /// Path to a deck .toml file or directory (default: built-in deck)
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Max concurrent evaluations
        #[arg(long, default_value = "4")]
        parallelism: usize,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the flashcards in a deck
    Cards {
        /// Path to a deck .toml file or directory (default: built-in deck)
        #[arg(long)]
        deck: Option<PathBuf>,
    },

    /// Validate deck TOML files
    Validate {
        /// Path to a deck file or directory
        #[arg(long)]
        deck: PathBuf,
    },

    /// Create starter config and example deck
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("satzcheck_cli=info".parse().unwrap())
                .add_directive("satzcheck_core=info".parse().unwrap())
                .add_directive("satzcheck_parsers=info".parse().unwrap())
                .add_directive("satzcheck_server=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { addr, deck, config } => commands::serve::execute(addr, deck, config).await,
        Commands::Eval {
            card,
            answer,
            deck,
            config,
            format,
        } => commands::eval::execute(card, &answer, deck, config, &format).await,
        Commands::Batch {
            attempts,
            deck,
            config,
            parallelism,
            format,
        } => commands::batch::execute(attempts, deck, config, parallelism, &format).await,
        Commands::Cards { deck } => commands::cards::execute(deck),
        Commands::Validate { deck } => commands::validate::execute(deck),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
