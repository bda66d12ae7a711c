//! Engine configuration loading and validation.

use anyhow::{Context, Result};
use lib_engine_ffi::{LibraryFormat, SymbolNames};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the engine shared library.
    pub library: Option<PathBuf>,

    /// Directory the engine resolves its data files against.
    ///
    /// The engine reads `./data/...` relative to the process working
    /// directory during `init`.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Search depth in plies when none is given on the command line.
    #[serde(default = "default_depth")]
    pub default_depth: u32,

    /// Exported names of the engine entry points.
    #[serde(default)]
    pub symbols: SymbolNames,
}

fn default_depth() -> u32 { 2 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            library: None,
            working_dir: None,
            default_depth: default_depth(),
            symbols: SymbolNames::default(),
        }
    }
}

impl EngineConfig {
    /// The configured library path.
    pub fn library_path(&self) -> Result<&Path> {
        self.library
            .as_deref()
            .context("No engine library configured; pass --library or set 'library' in the config file")
    }
}

/// Load configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content, path.extension().map_or(false, |e| e == "json"))
        .with_context(|| format!("Failed to parse config file: {:?}", path))
}

fn parse_config(content: &str, json: bool) -> Result<EngineConfig> {
    let config = if json {
        serde_json::from_str(content)?
    } else {
        toml::from_str(content)?
    };
    Ok(config)
}

/// Build the effective configuration: file (if any), then command-line
/// overrides, then validation.
pub fn resolve_config(path: Option<&Path>, library: Option<PathBuf>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    if library.is_some() {
        config.library = library;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration.
fn validate_config(config: &EngineConfig) -> Result<()> {
    let library = config.library_path()?;
    if !library.exists() {
        anyhow::bail!("Engine library not found: {:?}", library);
    }

    let format = LibraryFormat::from_path(library);
    if !format.is_native() {
        tracing::warn!(
            "Library {:?} has format {:?}, expected {:?} on this platform",
            library,
            format,
            LibraryFormat::native()
        );
    }

    if let Some(dir) = &config.working_dir {
        if !dir.is_dir() {
            anyhow::bail!("Working directory not found: {:?}", dir);
        }
    }

    Ok(())
}
