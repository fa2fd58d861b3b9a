//! Configuration validation.
//!
//! Checks paths, ports, and retry-policy ranges, collecting every
//! problem into a single `ConfigError` so the operator sees the whole
//! list at once instead of fixing one field per run.

use crate::schema::SkipperConfig;
use skipper_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SkipperConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if !config.apps.primary.is_configured() {
        errors.push("apps.primary.path is not set".into());
    }
    if !config.apps.secondary.is_configured() {
        errors.push("apps.secondary.path is not set".into());
    }

    if config.service.port == 0 {
        errors.push("service.port must not be 0".into());
    }
    if config.service.host.is_empty() {
        errors.push("service.host must not be empty".into());
    }
    if config.service.poll_interval_ms == 0 {
        errors.push("service.poll_interval_ms must be at least 1".into());
    }
    if !config.service.url.is_empty()
        && !config.service.url.starts_with("http://")
        && !config.service.url.starts_with("https://")
    {
        errors.push(format!(
            "service.url must be an http(s) URL, got: {}",
            config.service.url
        ));
    }

    if config.placement.max_attempts == 0 {
        errors.push("placement.max_attempts must be at least 1".into());
    }
    if config.placement.retry_delay_ms == 0 {
        errors.push("placement.retry_delay_ms must be at least 1".into());
    }
    if config.placement.search_poll_ms == 0 {
        errors.push("placement.search_poll_ms must be at least 1".into());
    }
    if config.placement.ancestry_max_depth == 0 {
        errors.push("placement.ancestry_max_depth must be at least 1".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn configured() -> SkipperConfig {
        let mut config = SkipperConfig::default();
        config.apps.primary.path = PathBuf::from("/opt/station/remote_ctrl");
        config.apps.secondary.path = PathBuf::from("/opt/station/chart_server");
        config
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&configured()).is_ok());
    }

    #[test]
    fn default_config_fails_on_paths() {
        let err = validate(&SkipperConfig::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("apps.primary.path"));
        assert!(msg.contains("apps.secondary.path"));
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = configured();
        config.service.port = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("service.port"));
    }

    #[test]
    fn non_http_url_rejected() {
        let mut config = configured();
        config.service.url = "ftp://example.com/chart".into();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("service.url"));
    }

    #[test]
    fn zero_retry_values_rejected() {
        let mut config = configured();
        config.placement.max_attempts = 0;
        config.placement.retry_delay_ms = 0;
        let err = validate(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("max_attempts"));
        assert!(msg.contains("retry_delay_ms"));
    }

    #[test]
    fn errors_are_collected_not_first_only() {
        let mut config = SkipperConfig::default();
        config.service.port = 0;
        let err = validate(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("apps.primary.path"));
        assert!(msg.contains("service.port"));
    }
}
