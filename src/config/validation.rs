use crate::config::types::{Config, EngineConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine)?;
    Ok(())
}

/// Validates worker pool configuration
fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 256 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 256, got {}",
            config.workers
        )));
    }

    if config.idle_poll_interval_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "idle-poll-interval-ms must be >= 1, got {}",
            config.idle_poll_interval_ms
        )));
    }

    if config.max_idle_polls < 1 {
        return Err(ConfigError::Validation(format!(
            "max-idle-polls must be >= 1, got {}",
            config.max_idle_polls
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default();
        config.engine.workers = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_excessive_workers_rejected() {
        let mut config = Config::default();
        config.engine.workers = 1000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = Config::default();
        config.engine.idle_poll_interval_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_idle_polls_rejected() {
        let mut config = Config::default();
        config.engine.max_idle_polls = 0;
        assert!(validate(&config).is_err());
    }
}
