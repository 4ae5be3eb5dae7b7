//! Group configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default cap on queued events processed in one tick.
pub const DEFAULT_MAX_EVENTS_PER_TICK: NonZeroUsize = NonZeroUsize::new(100_000).unwrap();

/// Environment variable overriding [`GroupConfig::max_events_per_tick`].
pub const MAX_EVENTS_ENV: &str = "ZKIT_MAX_EVENTS_PER_TICK";

/// Settings for an [`EventGroup`](crate::EventGroup).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Queued events a single tick may process before it is aborted as a
    /// suspected infinite loop.
    pub max_events_per_tick: NonZeroUsize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_events_per_tick: DEFAULT_MAX_EVENTS_PER_TICK,
        }
    }
}

impl GroupConfig {
    /// Set the per-tick cap, rejecting zero.
    pub fn with_max_events_per_tick(mut self, limit: usize) -> Result<Self, ConfigError> {
        self.max_events_per_tick = NonZeroUsize::new(limit).ok_or(ConfigError::ZeroLimit)?;
        Ok(self)
    }

    /// Defaults, overridden by `ZKIT_MAX_EVENTS_PER_TICK` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through
    /// `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self::default();
        let Some(raw) = lookup(MAX_EVENTS_ENV) else {
            return Ok(config);
        };
        let limit: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: MAX_EVENTS_ENV,
            value: raw.clone(),
        })?;
        config.with_max_events_per_tick(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        assert_eq!(GroupConfig::default().max_events_per_tick.get(), 100_000);
    }

    #[test]
    fn test_lookup_override() {
        let config = GroupConfig::from_lookup(|var| {
            (var == MAX_EVENTS_ENV).then(|| String::from(" 250 "))
        })
        .unwrap();
        assert_eq!(config.max_events_per_tick.get(), 250);
    }

    #[test]
    fn test_lookup_missing_uses_default() {
        let config = GroupConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GroupConfig::default());
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = GroupConfig::from_lookup(|_| Some(String::from("lots"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = GroupConfig::from_lookup(|_| Some(String::from("0"))).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroLimit));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GroupConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GroupConfig::default());

        let config: GroupConfig =
            serde_json::from_str(r#"{"max_events_per_tick": 12}"#).unwrap();
        assert_eq!(config.max_events_per_tick.get(), 12);
    }

    #[test]
    fn test_builder_rejects_zero_limit() {
        let err = GroupConfig::default().with_max_events_per_tick(0).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroLimit));

        let config = GroupConfig::default().with_max_events_per_tick(1).unwrap();
        assert_eq!(config.max_events_per_tick.get(), 1);
    }

    #[test]
    fn test_deserialize_rejects_zero_limit() {
        assert!(serde_json::from_str::<GroupConfig>(r#"{"max_events_per_tick": 0}"#).is_err());
    }
}
