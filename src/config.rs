// src/config.rs

//! Manages server configuration: loading from a TOML file and applying defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The server's runtime configuration. Every field has a default, so an empty
/// file (or no file at all) yields a working loopback server on port 6379.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// The address the listener binds to.
    #[serde(default = "default_host")]
    pub host: String,
    /// The TCP port to listen on. Overridable with the `--port` flag.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The default tracing filter; the `RUST_LOG` environment variable wins.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read config file \"{path}\""))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("could not parse config file \"{path}\""))?;
        Ok(config)
    }
}
