//! conceptquiz CLI — search ConceptNet and play guessing games.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "conceptquiz", version, about = "ConceptNet guessing games")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search relations of a concept and save them for the games
    Search {
        /// Concept to search for, e.g. "cat" or "ice cream"
        term: String,

        /// Restrict to one relation type (e.g. "UsedFor")
        #[arg(long)]
        rel: Option<String>,

        /// Number of pages to show
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Relations per page (overrides config)
        #[arg(long, allow_hyphen_values = true)]
        per_page: Option<i64>,

        /// Browse with n/p/q commands read from stdin
        #[arg(long)]
        interactive: bool,

        /// Do not save the shown relations
        #[arg(long)]
        no_save: bool,
    },

    /// List saved relations
    Saved {
        /// Filter by relation type
        #[arg(long)]
        rel: Option<String>,
    },

    /// Name every end of a relation ("cat CapableOf ???")
    Recall,

    /// Decide whether a statement is true ("cat IsA ? animal")
    TrueFalse,

    /// Guess a concept from clues revealed one by one
    GuessWho,

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("conceptquiz=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Search {
            term,
            rel,
            pages,
            per_page,
            interactive,
            no_save,
        } => {
            commands::search::execute(
                commands::search::SearchArgs {
                    term,
                    rel,
                    pages,
                    per_page,
                    interactive,
                    save: !no_save,
                },
                config,
            )
            .await
        }
        Commands::Saved { rel } => commands::saved::execute(rel, config),
        Commands::Recall => commands::play::recall(config),
        Commands::TrueFalse => commands::play::true_false(config),
        Commands::GuessWho => commands::play::guess_who(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
