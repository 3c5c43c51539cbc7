//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, CollectorConfig, ConfigError};

/// Default config path of existing installations.
pub const DEFAULT_CONFIG: &str = "/usr/local/bin/datacollector/myconfig.json";

#[derive(Debug, Parser)]
#[command(name = "datacollector")]
#[command(
    about = "Service for starting data collection and syncing time on registration",
    long_about = None
)]
pub struct Cli {
    /// Config file (.json for the flat layout, TOML otherwise)
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// File to write the log to (overrides the config file)
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

impl Cli {
    /// Read the config file, apply overrides, then validate the result.
    pub fn load_config(&self) -> Result<CollectorConfig, ConfigError> {
        let mut config = config::read_config(&self.config)?;
        self.apply(&mut config);
        config::validate(&config)?;
        Ok(config)
    }

    /// Apply command line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut CollectorConfig) {
        if let Some(log) = &self.log {
            config.logging.file = log.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
