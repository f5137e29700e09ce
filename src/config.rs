//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then the
//! `LISTEN` environment variable, then command-line flags.

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4221";
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "rawhttpd")]
#[command(version = "0.1.0")]
#[command(about = "A minimal HTTP/1.1 server on raw TCP sockets", long_about = None)]
pub struct CliArgs {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 127.0.0.1:4221)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Base directory served under /files
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Close connections idle for this many seconds
    #[arg(long)]
    pub read_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Bytes requested from the socket per read call.
    pub read_buffer_size: usize,
    /// Upper bound on a single buffered request, headers and body included.
    pub max_request_size: usize,
    pub read_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            read_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
}

impl Config {
    /// Builds the full configuration from parsed command-line arguments.
    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env();

        if let Some(listen) = &args.listen {
            cfg.server.listen_addr = listen.clone();
        }
        if let Some(dir) = &args.directory {
            cfg.files.directory = Some(dir.clone());
        }
        if let Some(secs) = args.read_timeout_secs {
            cfg.server.read_timeout_secs = Some(secs);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    fn apply_env(&mut self) {
        if let Ok(listen) = std::env::var("LISTEN") {
            self.server.listen_addr = listen;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.read_buffer_size == 0 {
            anyhow::bail!("server.read_buffer_size must be greater than zero");
        }
        if self.server.max_request_size < self.server.read_buffer_size {
            anyhow::bail!("server.max_request_size must be at least server.read_buffer_size");
        }
        if let Some(dir) = &self.files.directory {
            if !dir.is_dir() {
                anyhow::bail!("files directory {} does not exist", dir.display());
            }
        }
        Ok(())
    }
}
