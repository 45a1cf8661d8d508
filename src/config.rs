use crate::errors::ConfigError;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const VIEWS_DIR_NAME: &str = "views";
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_CHANNEL: &str = "#general";

/// Command line flags shared by the server and the weekly report job.
#[derive(Debug, Parser)]
pub struct Cli {
    /// Configs dir path
    #[arg(short = 'c', value_name = "DIR")]
    pub configs_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db: DbConfig,
    #[serde(rename = "host")]
    pub server_host: String,
    #[serde(rename = "log_dir", default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(rename = "plot_output_dir", default = "default_plot_dir")]
    pub plot_output_dir: PathBuf,
    pub slack: SlackConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub client: String,
    pub connection: DbConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConnection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    pub token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Channel that receives result messages and weekly charts.
    #[serde(default = "default_channel")]
    pub channel: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_plot_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

impl Config {
    /// Reads `config.json` from the configs directory.
    pub fn load(configs_dir: &Path) -> Result<Self, ConfigError> {
        if !configs_dir.exists() {
            return Err(ConfigError::MissingDir(configs_dir.to_path_buf()));
        }

        let path = configs_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path));
        }

        let bytes = std::fs::read(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse { path, source })
    }
}

pub fn views_dir(configs_dir: &Path) -> PathBuf {
    configs_dir.join(VIEWS_DIR_NAME)
}
