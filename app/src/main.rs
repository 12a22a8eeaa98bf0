#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

mod command;

use command::{
    AnnotateInput, AnnotateStrategy, CommandStrategy, InfoStrategy, InitStrategy,
    SessionsInput, SessionsStrategy, ShowInput, ShowStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "portraits")]
#[command(about = "Who-is-speaking annotator for chat transcripts", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/portraits/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show resolved configuration
    Info,
    /// Run messages through a session and print the panel
    Annotate {
        /// Session to continue (a new one is created if omitted)
        #[arg(short, long)]
        session: Option<Uuid>,

        /// Transcript file (JSON array or JSON Lines)
        #[arg(short, long, conflicts_with = "message")]
        transcript: Option<PathBuf>,

        /// Single message text
        #[arg(short, long)]
        message: Option<String>,

        /// Role of the single message
        #[arg(short, long, default_value = "assistant")]
        role: String,

        /// Author name of the single message
        #[arg(short, long)]
        author: Option<String>,
    },
    /// Print the panel for a stored session
    Show {
        session: Uuid,
    },
    /// List stored sessions
    Sessions {
        /// Delete the given session instead of listing
        #[arg(long)]
        clear: Option<Uuid>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(cli.config).await,
        Commands::Annotate {
            session,
            transcript,
            message,
            role,
            author,
        } => {
            AnnotateStrategy
                .execute(AnnotateInput {
                    config_path: cli.config,
                    session_id: session,
                    transcript,
                    message,
                    role,
                    author,
                })
                .await
        }
        Commands::Show { session } => {
            ShowStrategy
                .execute(ShowInput {
                    config_path: cli.config,
                    session_id: session,
                })
                .await
        }
        Commands::Sessions { clear } => {
            SessionsStrategy
                .execute(SessionsInput {
                    config_path: cli.config,
                    clear,
                })
                .await
        }
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
