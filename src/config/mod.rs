pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./gallery.toml",
        "~/.config/gallery/config.toml",
        "/etc/gallery/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn expand_paths(config: &mut Config) {
    let raw = config.database.path.to_string_lossy().into_owned();
    config.database.path = PathBuf::from(shellexpand::tilde(&raw).as_ref());
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    if config.database.pool_size == 0 {
        anyhow::bail!("Database pool size cannot be 0");
    }

    if config.logging.filter.trim().is_empty() {
        tracing::warn!("Empty log filter; falling back to {}", crate::logging::DEFAULT_FILTER);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [database]
            path = "/var/lib/gallery/gallery.db"
            pool_size = 8

            [logging]
            filter = "gallery=debug"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/gallery/gallery.db"));
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.logging.filter, "gallery=debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = write_config("");

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.path, PathBuf::from("gallery.db"));
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.logging.filter, crate::logging::DEFAULT_FILTER);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let file = write_config(
            r#"
            [database]
            path = "~/gallery/gallery.db"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert!(!config.database.path.to_string_lossy().starts_with('~'));
        assert!(config.database.path.ends_with("gallery/gallery.db"));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let file = write_config(
            r#"
            [database]
            pool_size = 0
            "#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("pool size"));
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let file = write_config(
            r#"
            [database]
            path = ""
            "#,
        );

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let file = write_config("[database\npath = 1");

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(load_config_or_default(Some(&missing)).is_err());
    }
}
