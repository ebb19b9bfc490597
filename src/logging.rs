//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "gallery=info,gallery_db=info,gallery_common=info";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `filter` when set. Returns `Ok(false)`
/// when a global subscriber was already installed, so calling this more
/// than once (e.g. from several tests) is harmless.
pub fn init(filter: &str) -> Result<bool> {
    let env_filter = build_filter(&resolve_filter(std::env::var("RUST_LOG").ok(), filter))?;

    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_ok())
}

/// Install the global subscriber from the `[logging]` config section.
pub fn init_from_config(config: &LoggingConfig) -> Result<bool> {
    init(&config.filter)
}

fn resolve_filter(env: Option<String>, configured: &str) -> String {
    match env {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ if !configured.trim().is_empty() => configured.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

fn build_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .with_context(|| format!("Invalid log filter: {:?}", directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_config() {
        let filter = resolve_filter(Some("gallery=trace".to_string()), "gallery=info");
        assert_eq!(filter, "gallery=trace");
    }

    #[test]
    fn test_config_used_without_env() {
        assert_eq!(resolve_filter(None, "gallery=warn"), "gallery=warn");
        assert_eq!(resolve_filter(Some("  ".to_string()), "gallery=warn"), "gallery=warn");
    }

    #[test]
    fn test_default_when_both_empty() {
        assert_eq!(resolve_filter(None, ""), DEFAULT_FILTER);
    }

    #[test]
    fn test_build_filter() {
        assert!(build_filter(DEFAULT_FILTER).is_ok());
        assert!(build_filter("gallery=notalevel").is_err());
    }

    #[test]
    fn test_init_is_repeatable() {
        init("gallery=debug").unwrap();
        assert!(!init("gallery=debug").unwrap());
    }
}
