//! # labscan CLI
//!
//! The `labscan` binary is the primary interface to the duplication
//! analysis engine. It provides commands for database initialization, owner
//! registration, submission + analysis, listing, and starting the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! labscan --config ./config/labscan.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `labscan init` | Create the SQLite database and run schema migrations |
//! | `labscan owner add <id>` | Register a submitter |
//! | `labscan owner list` | List registered submitters |
//! | `labscan submit` | Ingest files for an owner and print duplicate matches |
//! | `labscan list` | List all submissions |
//! | `labscan serve` | Start the HTTP API server |

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use labscan::analyze::run_analysis;
use labscan::models::Owner;
use labscan::store::sqlite::SqliteStore;
use labscan::store::SubmissionStore;
use labscan::{config, db, migrate, server};

/// labscan — a submission ingestion and duplication analysis engine for
/// lab-style code submissions.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/labscan.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "labscan",
    about = "labscan — ingest lab submissions and report duplicated lines across submitters",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/labscan.toml`. Database path, analysis
    /// settings, and the server bind address are read from this file.
    #[arg(long, global = true, default_value = "./config/labscan.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and all required tables (owners,
    /// submissions, submitted_files). Idempotent — running it multiple
    /// times is safe.
    Init,

    /// Manage registered owners (submitters).
    ///
    /// Submissions are only accepted for owners that exist; unknown owner
    /// ids are rejected before anything is persisted.
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// Ingest files as one submission and run duplication analysis.
    ///
    /// Reads the given files, stores them atomically as a new submission
    /// for the owner, compares them against every stored file belonging to
    /// other owners, and prints the resulting matches. Press Ctrl-C to
    /// cancel a long-running analysis.
    Submit {
        /// Owner id the submission belongs to.
        #[arg(long)]
        owner: String,

        /// Display name for the submission (e.g., "Lab 3").
        #[arg(long)]
        name: String,

        /// Files to include in the submission.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List all submissions with their file counts, newest first.
    List,

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and exposes
    /// `POST /api/analyze`, `GET /api/submissions`, and `GET /health`.
    Serve,
}

/// Owner management subcommands.
#[derive(Subcommand)]
enum OwnerAction {
    /// Register a new owner id.
    Add {
        /// Owner id (any stable identifier, e.g., a student number).
        id: String,
        /// Human-readable display name.
        #[arg(long)]
        name: String,
    },
    /// List all registered owners.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Owner { action } => match action {
            OwnerAction::Add { id, name } => {
                let pool = db::connect(&cfg).await?;
                let store = SqliteStore::new(pool);
                store
                    .add_owner(&Owner {
                        id: id.clone(),
                        name,
                        registered_at: Utc::now().timestamp(),
                    })
                    .await?;
                println!("owner registered: {}", id);
            }
            OwnerAction::List => {
                let pool = db::connect(&cfg).await?;
                let store = SqliteStore::new(pool);
                let owners = store.list_owners().await?;
                println!("owners: {}", owners.len());
                for owner in owners {
                    println!("  {}  {}", owner.id, owner.name);
                }
            }
        },
        Commands::Submit { owner, name, paths } => {
            let files = read_files(&paths)?;
            let pool = db::connect(&cfg).await?;
            let store = SqliteStore::new(pool);

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            let result = run_analysis(
                &store,
                &store,
                &owner,
                &name,
                &files,
                cfg.analysis.min_percentage,
                &cancel,
            )
            .await?;

            println!("submit \"{}\" (owner {})", name, owner);
            println!("  files: {}", files.len());
            println!("  matches: {}", result.matches.len());
            for m in &result.matches {
                println!(
                    "  {} ~ {}: {:.2}% ({} shared lines)",
                    m.file_id,
                    m.duplicate_with,
                    m.duplicate_percentage,
                    m.duplicated_lines.len()
                );
            }
            println!("ok");
        }
        Commands::List => {
            let pool = db::connect(&cfg).await?;
            let store = SqliteStore::new(pool);
            let submissions = store.list_submissions().await?;
            println!("submissions: {}", submissions.len());
            for s in submissions {
                println!(
                    "  {}  owner={} files={} \"{}\"",
                    s.id, s.owner_id, s.file_count, s.name
                );
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

/// Read submission files from disk into the filename → base64 payload map
/// the ingestion contract expects. Duplicate basenames are rejected since
/// the payload is keyed by filename; path directories are dropped.
fn read_files(paths: &[PathBuf]) -> Result<HashMap<String, String>> {
    let mut files = HashMap::new();
    for path in paths {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        if files.insert(file_name.clone(), STANDARD.encode(bytes)).is_some() {
            bail!("duplicate file name in submission: {}", file_name);
        }
    }
    Ok(files)
}
