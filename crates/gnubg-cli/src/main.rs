//! gnubg-hint: ask the native backgammon engine for move and cube hints.
//!
//! This is the command-line driver around `lib-engine-ffi`.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib_engine_ffi::{EngineLibrary, EngineSession};
use lib_types::HintRequest;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gnubg-hint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Path to the engine configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the engine shared library (overrides the config file)
    #[arg(short, long)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single position
    Hint {
        /// Position identifier, e.g. XGID=-b----E-C---eE---c-e----B-:0:0:1:52:0:0:0:5:10
        position: String,

        /// Search depth in plies
        #[arg(short, long)]
        depth: Option<u32>,
    },

    /// Evaluate every position listed in a file, one per line
    Batch {
        /// File of position identifiers; blank lines and `#` comments are skipped
        file: PathBuf,

        /// Search depth in plies
        #[arg(short, long)]
        depth: Option<u32>,
    },

    /// Load and initialize the engine, then shut it down
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = config::resolve_config(cli.config.as_deref(), cli.library)?;

    let requests = match &cli.command {
        Commands::Hint { position, depth } => {
            vec![HintRequest::new(position.clone(), depth.unwrap_or(config.default_depth))]
        }
        Commands::Batch { file, depth } => {
            let depth = depth.unwrap_or(config.default_depth);
            read_batch(file)?
                .into_iter()
                .map(|position| HintRequest::new(position, depth))
                .collect()
        }
        Commands::Check => Vec::new(),
    };

    let mut session = open_session(&config)?;

    for request in &requests {
        let result = session
            .evaluate_request(request)
            .with_context(|| format!("Failed to evaluate {}", request.position_id))?;
        println!("{}", output::render(request, &result, cli.format)?.trim_end());
    }

    session.teardown().context("Engine shutdown failed")?;

    if matches!(cli.command, Commands::Check) {
        let library = config.library_path()?.display().to_string();
        println!("{}", output::render_check(&library, cli.format)?);
    }
    Ok(())
}

/// Load the library and bring the engine to the ready state.
fn open_session(config: &config::EngineConfig) -> Result<EngineSession> {
    let library_path = config.library_path()?;
    tracing::info!("Loading engine from {:?}", library_path);

    let library = EngineLibrary::load_with_symbols(library_path, &config.symbols)?;
    let info = library.info();
    tracing::debug!(path = %info.path, format = ?info.format, "Engine library resolved");

    // The engine opens its data files relative to the working directory
    // during init, so switch only after the library path has been used.
    if let Some(dir) = &config.working_dir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to enter working directory: {:?}", dir))?;
    }

    let mut session = EngineSession::new(library);
    session.initialize().context("Engine initialization failed")?;
    Ok(session)
}

fn read_batch(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {:?}", path))?;
    Ok(parse_batch(&content))
}

fn parse_batch(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
