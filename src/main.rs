//! # Milestone Lookup CLI (`milestones`)
//!
//! ## Usage
//!
//! ```bash
//! milestones --config ./config/milestones.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `milestones init` | Create the SQLite database and schema |
//! | `milestones import` | Load the reference CSV if the database is empty |
//! | `milestones lookup "<message>"` | Answer a query message |
//! | `milestones codes` | List distinct milestone codes |
//! | `milestones domains` | List distinct domains |
//! | `milestones serve` | Start the HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! milestones init
//! milestones import --csv ./data/vb_mapp_milestones.csv
//! milestones lookup "MAN-1"
//! milestones lookup "Domain: Mand, Level: 1"
//! milestones serve --bind 0.0.0.0:3001
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use milestone_lookup::{config, import, listing, logging, lookup, migrate, server};

/// Milestone Lookup: a developmental-milestone catalog with a
/// message-based query API.
#[derive(Parser)]
#[command(name = "milestones", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/milestones.toml")]
    config: PathBuf,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it more than once is safe.
    Init,

    /// Load the reference CSV into an empty database.
    ///
    /// Does nothing if the database already holds milestones.
    Import {
        /// CSV file to load instead of `[import].csv_path`.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Answer a query message.
    ///
    /// Accepts a skill code (`MAN-1`) or `"Domain: <name>, Level: <n>"`.
    Lookup {
        message: String,
    },

    /// List distinct milestone codes.
    Codes,

    /// List distinct domains.
    Domains,

    /// Start the HTTP server.
    Serve {
        /// Override `[server].bind`.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { csv } => {
            import::run_import(&cfg, csv.as_deref()).await?;
        }
        Commands::Lookup { message } => {
            lookup::run_lookup(&cfg, &message).await?;
        }
        Commands::Codes => {
            listing::run_codes(&cfg).await?;
        }
        Commands::Domains => {
            listing::run_domains(&cfg).await?;
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
