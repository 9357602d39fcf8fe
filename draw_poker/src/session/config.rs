//! Game actor configuration.

use std::time::Duration;

/// Settings shared by every game actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bounded inbox size per actor (default: 100)
    pub inbox_capacity: usize,

    /// Time without a message before an actor stops (default: 5 minutes).
    /// The session stays in the store and is reloaded on next access.
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: 100,
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be at least 1".to_string());
        }
        if self.idle_timeout.is_zero() {
            return Err("Idle timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = SessionConfig {
            inbox_capacity: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            idle_timeout: Duration::ZERO,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
