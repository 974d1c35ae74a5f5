//! CLI argument definitions for glassbox-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use glassbox_core::config::GlassboxConfig;

/// Glassbox infrastructure transparency monitor.
///
/// Periodically scans configured infrastructure providers and
/// materializes each snapshot as a versioned subgraph in Neo4j.
#[derive(Parser, Debug)]
#[command(name = "glassbox-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to glassbox.toml configuration file.
    #[arg(short, long, default_value = "/etc/glassbox/glassbox.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,

    /// Override PID file path (takes precedence over config file).
    #[arg(long)]
    pub pid_file: Option<String>,
}

impl DaemonCli {
    /// Apply CLI overrides onto a loaded configuration.
    pub fn apply_overrides(&self, config: &mut GlassboxConfig) {
        if let Some(log_level) = &self.log_level {
            config.general.log_level = log_level.clone();
        }
        if let Some(log_format) = &self.log_format {
            config.general.log_format = log_format.clone();
        }
        if let Some(pid_file) = &self.pid_file {
            config.general.pid_file = pid_file.clone();
        }
    }
}
