//! Layered configuration for Calculator Pro+

use crate::logging::{LogConfig, LogFormat};
use crate::{Error, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the environment-specific config file
pub const ENV_SELECTOR: &str = "CALCPRO_ENV";

/// Prefix of environment variable overrides (`CALCPRO_STORAGE__DATA_DIR=...`)
pub const ENV_PREFIX: &str = "CALCPRO_";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CalcProConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Logging section
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub console: bool,
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            console: true,
            file: None,
        }
    }
}

impl LoggingSettings {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level.clone(),
            console: self.console,
            file: self.file.clone(),
            format: self.format,
            ..LogConfig::default()
        }
    }
}

/// Local persistence section (history, memory, preferences, exports)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Disable to keep everything in memory only
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: default_data_dir(),
            state_file: default_state_file(),
            export_dir: default_export_dir(),
        }
    }
}

impl StorageSettings {
    /// Full path of the persisted session snapshot
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file)
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_state_file() -> String {
    "calculator-state.json".to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./exports")
}

/// Load configuration from multiple sources
///
/// Priority (highest to lowest):
/// 1. Environment variables (`CALCPRO_` prefix, `__` for nesting)
/// 2. Local config file (config/local.*)
/// 3. Environment-specific file (config/{CALCPRO_ENV}.*)
/// 4. Default config file (config/default.*)
/// 5. Default values
pub fn load_config() -> Result<CalcProConfig> {
    let env = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string());

    let figment = Figment::new()
        .merge(Toml::file("config/default.toml"))
        .merge(Yaml::file("config/default.yaml"))
        .merge(Json::file("config/default.json"))
        .merge(Toml::file(format!("config/{}.toml", env)))
        .merge(Yaml::file(format!("config/{}.yaml", env)))
        .merge(Json::file(format!("config/{}.json", env)))
        .merge(Toml::file("config/local.toml"))
        .merge(Yaml::file("config/local.yaml"))
        .merge(Json::file("config/local.json"))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["env"]).split("__"));

    figment
        .extract()
        .map_err(|e| Error::Config(format!("Failed to load configuration: {}", e)))
}

/// Load configuration from a specific file
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<CalcProConfig> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Config("Config file must have an extension".to_string()))?;

    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let figment = match extension {
        "toml" => Figment::new().merge(Toml::file(path)),
        "yaml" | "yml" => Figment::new().merge(Yaml::file(path)),
        "json" => Figment::new().merge(Json::file(path)),
        _ => {
            return Err(Error::Config(format!(
                "Unsupported config file format: {}",
                extension
            )))
        }
    };

    figment
        .extract()
        .map_err(|e| Error::Config(format!("Failed to load configuration from file: {}", e)))
}
