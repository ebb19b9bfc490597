use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file; `~` is expanded when the config is loaded
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Maximum number of pooled connections (default: 4)
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("gallery.db")
}

fn default_pool_size() -> u32 {
    gallery_db::pool::DEFAULT_POOL_SIZE
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    crate::logging::DEFAULT_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
