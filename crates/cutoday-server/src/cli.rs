//! Command-line interface definition.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CutodayConfig;

/// cutoday - ConnectUtahToday event API
#[derive(Debug, Parser)]
#[command(name = "cutoday")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CUTODAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Address to bind (overrides config)
    #[arg(long, env = "CUTODAY_BIND")]
    pub bind: Option<IpAddr>,

    /// Port to listen on (overrides config)
    #[arg(long, short, env = "PORT")]
    pub port: Option<u16>,

    /// SQLite database path (overrides config)
    #[arg(long, env = "CUTODAY_DATABASE")]
    pub database: Option<PathBuf>,

    /// Log format: pretty, compact or json (overrides config)
    #[arg(long)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Check the configuration and resolve secret references
    Validate,
    /// Print the default configuration path
    Path,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut CutodayConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref database) = self.database {
            config.server.database_path = Some(database.clone());
        }
        if let Some(ref format) = self.log_format {
            config.server.log_format = format.clone();
        }
    }
}
