use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::Runtime;
use vsc_catalog::SearchFilter;

#[derive(Parser)]
#[command(name = "vsc")]
#[command(about = "Voice shop core: tool sessions and catalog utilities", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> env -> local ...)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Directory that relative data paths are resolved against
    /// (overrides VSC_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shopping session: one JSON tool call per stdin line, one JSON reply per stdout line
    Shop,

    /// Fraud-alert session over the fraud case store (same JSON-lines protocol)
    Fraud,

    /// One-shot catalog search
    Search {
        /// Substring of name or description
        #[arg(long, short)]
        query: Option<String>,

        /// Category; synonyms such as "phones" or "tees" are understood
        #[arg(long)]
        category: Option<String>,

        /// Inclusive price ceiling
        #[arg(long)]
        max_price: Option<i64>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Print the most recent persisted order
    LastOrder,

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let loaded = vsc_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Shop => {
            let rt = Runtime::load(&cli.config_paths, cli.data_dir.as_deref())?;
            let mut session = rt.shop_session();
            let stdin = io::stdin();
            commands::serve_lines(stdin.lock(), io::stdout().lock(), |line| {
                session.handle_line(line)
            })?;
        }

        Commands::Fraud => {
            let rt = Runtime::load(&cli.config_paths, cli.data_dir.as_deref())?;
            let mut session = rt.fraud_session();
            let stdin = io::stdin();
            commands::serve_lines(stdin.lock(), io::stdout().lock(), |line| {
                session.handle_line(line)
            })?;
        }

        Commands::Search {
            query,
            category,
            max_price,
            color,
        } => {
            let rt = Runtime::load(&cli.config_paths, cli.data_dir.as_deref())?;
            let text = commands::search(
                &rt,
                SearchFilter {
                    query,
                    category,
                    max_price,
                    color,
                },
            );
            println!("{text}");
        }

        Commands::LastOrder => {
            let rt = Runtime::load(&cli.config_paths, cli.data_dir.as_deref())?;
            println!("{}", commands::last_order(&rt));
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries tool replies only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
