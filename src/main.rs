//! # docsum CLI
//!
//! The `docsum` binary starts the HTTP server or runs the summarization
//! pipeline directly from the command line.
//!
//! ## Usage
//!
//! ```bash
//! docsum [--config ./docsum.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docsum serve` | Start the HTTP server |
//! | `docsum summarize <file>` | Summarize a local `.txt` or `.pdf` file |
//! | `docsum get <name>` | Print a stored summary |
//! | `docsum list` | List stored summaries |
//!
//! Logging is controlled with `RUST_LOG` (default `docsum=info,tower_http=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsum::{commands, config, server};

/// docsum: summarize uploaded text and PDF documents.
///
/// Without `--config`, built-in defaults are used: listen on `0.0.0.0:8000`,
/// store summaries under `./output`, truncation summarizer.
#[derive(Parser)]
#[command(
    name = "docsum",
    about = "docsum: summarize uploaded text and PDF documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves the upload form, `POST /upload`,
    /// and `GET /download/{filename}`.
    Serve,

    /// Summarize a local file and store the result.
    ///
    /// Runs the same pipeline as `POST /upload`: the format is taken from
    /// the file extension (`.txt` or `.pdf`).
    Summarize {
        /// File to summarize.
        path: PathBuf,
    },

    /// Print a stored summary by artifact name.
    Get {
        /// Artifact name, e.g. `riassunto_20250101_120000.txt`.
        name: String,
    },

    /// List stored summaries, oldest first.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsum=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Summarize { path } => {
            commands::run_summarize(&cfg, &path).await?;
        }
        Commands::Get { name } => {
            commands::run_get(&cfg, &name).await?;
        }
        Commands::List => {
            commands::run_list(&cfg).await?;
        }
    }

    Ok(())
}
