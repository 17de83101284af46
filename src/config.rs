//! Configuration management
//!
//! All runtime settings live in one TOML file. Mail credentials are the only
//! exception: they are read from the `EMAIL` / `PASSWORD` environment
//! variables once at load time, so nothing deeper in the crate touches the
//! environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server and store settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Mail relay settings
    #[serde(default)]
    pub mail: MailConfig,
    /// Loan period and warning policy
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static assets served at the root path
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// JSON file holding the loan collection
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_store_path() -> PathBuf {
    PathBuf::from("libros.json")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            store_path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// Implicit-TLS (SMTPS) port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Sender address
    #[serde(default = "default_from")]
    pub from: String,
    /// Filled from the EMAIL env var at load time, never persisted
    #[serde(skip)]
    pub username: Option<String>,
    /// Filled from the PASSWORD env var at load time, never persisted
    #[serde(skip)]
    pub password: Option<String>,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from() -> String {
    "correoprueba072024@gmail.com".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            from: default_from(),
            username: None,
            password: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Days until a loan is due, counted from the loan date
    #[serde(default = "default_loan_days")]
    pub loan_days: u64,
    /// Listing warns when a due date is this many days away or less
    #[serde(default = "default_warning_days")]
    pub warning_days: i64,
    /// Hours between reminder sweeps
    #[serde(default = "default_sweep_hours")]
    pub sweep_interval_hours: u64,
}

fn default_loan_days() -> u64 {
    10
}

fn default_warning_days() -> i64 {
    3
}

fn default_sweep_hours() -> u64 {
    24
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            loan_days: default_loan_days(),
            warning_days: default_warning_days(),
            sweep_interval_hours: default_sweep_hours(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            mail: MailConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating a default file on first run,
    /// then resolve mail credentials from the environment.
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        let mut config: Config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        config.mail.username = std::env::var("EMAIL").ok();
        config.mail.password = std::env::var("PASSWORD").ok();

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent().context("Config path has no parent")?;

        std::fs::create_dir_all(parent).context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "loan-tracker", "loan-tracker")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}
