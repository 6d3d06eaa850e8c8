//! Configuration validation logic.

use std::path::Path;

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Upper bound for download and extraction concurrency.
pub const MAX_CONCURRENCY: usize = 16;

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 10;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_concurrency("max_concurrency", config.options.max_concurrency)?;
    validate_concurrency("extract_concurrency", config.options.extract_concurrency)?;
    validate_media_extension(&config.options.media_extension)?;
    validate_user_agent(&config.network.user_agent)?;
    validate_timeout(
        "connect_timeout_seconds",
        config.network.connect_timeout_seconds,
    )?;
    validate_timeout(
        "request_timeout_seconds",
        config.network.request_timeout_seconds,
    )?;
    validate_timeout("read_timeout_seconds", config.network.read_timeout_seconds)?;
    validate_delay(
        config.network.request_delay_min_ms,
        config.network.request_delay_max_ms,
    )?;

    validate_path("catalog", &config.paths.catalog)?;
    validate_path("extracted_cache", &config.paths.extracted_cache)?;
    validate_path("state", &config.paths.state)?;
    validate_path("output_directory", &config.paths.output_directory)?;

    Ok(())
}

/// Validate a worker count.
pub fn validate_concurrency(field: &str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_CONCURRENCY {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Must be between 1 and {} (got {})", MAX_CONCURRENCY, value),
        });
    }

    Ok(())
}

/// Validate the media extension (no leading dot, alphanumeric).
pub fn validate_media_extension(extension: &str) -> Result<()> {
    if extension.is_empty() {
        return Err(Error::MissingConfig("media_extension".to_string()));
    }

    let pattern = Regex::new(r"^[A-Za-z0-9]{1,8}$").map_err(|e| Error::Config(e.to_string()))?;
    if !pattern.is_match(extension) {
        return Err(Error::ConfigValidation {
            field: "media_extension".to_string(),
            message: format!(
                "Extension '{}' must be 1-8 alphanumeric characters without a leading dot",
                extension
            ),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

fn validate_delay(min_ms: u64, max_ms: u64) -> Result<()> {
    if min_ms > max_ms {
        return Err(Error::ConfigValidation {
            field: "request_delay_min_ms".to_string(),
            message: format!(
                "Minimum delay ({} ms) exceeds maximum delay ({} ms)",
                min_ms, max_ms
            ),
        });
    }

    Ok(())
}

fn validate_path(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(validate_concurrency("max_concurrency", 1).is_ok());
        assert!(validate_concurrency("max_concurrency", MAX_CONCURRENCY).is_ok());
        assert!(validate_concurrency("max_concurrency", 0).is_err());
        assert!(validate_concurrency("max_concurrency", MAX_CONCURRENCY + 1).is_err());
    }

    #[test]
    fn test_media_extension() {
        assert!(validate_media_extension("mp4").is_ok());
        assert!(validate_media_extension("webm").is_ok());
        assert!(validate_media_extension(".mp4").is_err());
        assert!(validate_media_extension("").is_err());
        assert!(validate_media_extension("mp4/../x").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.network.read_timeout_seconds = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { ref field, .. } if field == "read_timeout_seconds"));
    }

    #[test]
    fn test_inverted_delay_rejected() {
        let mut config = Config::default();
        config.network.request_delay_min_ms = 900;
        config.network.request_delay_max_ms = 100;
        assert!(validate_config(&config).is_err());

        config.network.request_delay_min_ms = 0;
        config.network.request_delay_max_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut config = Config::default();
        config.paths.state = PathBuf::new();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));
    }
}
