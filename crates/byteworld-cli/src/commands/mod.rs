//! CLI commands and argument parsing.

pub mod lookup;
pub mod serve;
pub mod stats;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use byteworld_registry::{RegistryError, RegistryLayout, RegistryStore};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

/// Byte World - network-resource registry tooling
#[derive(Parser)]
#[command(name = "byteworld")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate the whole registry and report every violation
    Validate(validate::ValidateArgs),

    /// Serve the lookup API over HTTP
    Serve(serve::ServeArgs),

    /// Look up a single registry entry
    Lookup(lookup::LookupArgs),

    /// Print per-category registry counts
    Stats,

    /// Print version information
    Version,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where the registry lives.
#[derive(Args, Debug, Clone)]
pub struct RegistryArgs {
    /// Registry base directory
    #[arg(long, global = true, env = "BYTEWORLD_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Layout file overriding the standard layout under the root
    #[arg(long, global = true, env = "BYTEWORLD_LAYOUT")]
    pub layout: Option<PathBuf>,
}

impl RegistryArgs {
    /// Resolves the registry layout.
    pub fn layout(&self) -> Result<RegistryLayout> {
        match &self.layout {
            Some(path) => RegistryLayout::from_file(path)
                .with_context(|| format!("Failed to load layout {}", path.display())),
            None => Ok(RegistryLayout::standard(&self.root)),
        }
    }

    /// Loads and publishes the registry, logging every violation if it does
    /// not validate.
    pub fn load(&self) -> Result<Arc<RegistryStore>> {
        let layout = self.layout()?;
        info!(root = %self.root.display(), "Loading registry");

        let store = Arc::new(RegistryStore::new());
        if let Err(err) = store.reload(&layout) {
            log_violations(&err);
            return Err(err).context("Registry failed to load");
        }
        Ok(store)
    }
}

/// Logs each violation carried by a failed load.
pub fn log_violations(err: &RegistryError) {
    if let RegistryError::Invalid { violations } = err {
        for violation in violations {
            error!(
                kind = %violation.kind,
                file = %violation.file.display(),
                "{}",
                violation.message
            );
        }
    }
}
