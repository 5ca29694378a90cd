//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::cache::{Budget, PressurePolicy};
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables. The defaults
/// describe an unbounded cache that sheds 10% of its entries when an
/// allocation fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries, None = unbounded
    pub max_entries: Option<usize>,
    /// Maximum key + value bytes, None = unbounded
    pub max_bytes: Option<usize>,
    /// What to do when a write cannot be admitted
    pub policy: PressurePolicy,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Absent or unparsable values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `LRU_MAX_ENTRIES` - Maximum cache entries (default: unbounded)
    /// - `LRU_MAX_BYTES` - Maximum key + value bytes (default: unbounded)
    /// - `LRU_PRESSURE_POLICY` - `shed`, `shed:<percent>` or `make-room` (default: `shed`)
    /// - `LRU_EVICTION_PERCENT` - Share evicted per shedding pass (default: 10)
    pub fn from_env() -> Self {
        let mut policy: PressurePolicy = env::var("LRU_PRESSURE_POLICY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        if let PressurePolicy::Shed { percent } = &mut policy {
            if let Some(p) = env::var("LRU_EVICTION_PERCENT")
                .ok()
                .and_then(|v| v.parse::<u8>().ok())
            {
                *percent = p;
            }
        }

        Self {
            max_entries: env::var("LRU_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok()),
            max_bytes: env::var("LRU_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok()),
            policy,
        }
    }

    /// Admission limits described by this configuration.
    pub fn budget(&self) -> Budget {
        Budget {
            max_entries: self.max_entries,
            max_bytes: self.max_bytes,
        }
    }

    /// Rejects limits and percentages the cache cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than 0".to_string(),
            ));
        }
        if self.max_bytes == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_bytes must be greater than 0".to_string(),
            ));
        }
        self.policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 4] = [
        "LRU_MAX_ENTRIES",
        "LRU_MAX_BYTES",
        "LRU_PRESSURE_POLICY",
        "LRU_EVICTION_PERCENT",
    ];

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, None);
        assert_eq!(config.max_bytes, None);
        assert_eq!(config.policy, PressurePolicy::Shed { percent: 10 });
        assert!(config.budget().is_unbounded());
        assert!(config.validate().is_ok());
    }

    // Both env scenarios live in one test so they cannot race each other.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("LRU_MAX_ENTRIES", "500");
        env::set_var("LRU_MAX_BYTES", "not-a-number");
        env::set_var("LRU_EVICTION_PERCENT", "25");
        let config = CacheConfig::from_env();
        assert_eq!(config.max_entries, Some(500));
        assert_eq!(config.max_bytes, None);
        assert_eq!(config.policy, PressurePolicy::Shed { percent: 25 });

        env::set_var("LRU_PRESSURE_POLICY", "make-room");
        let config = CacheConfig::from_env();
        assert_eq!(config.policy, PressurePolicy::MakeRoom);

        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_validate_rejects_zero_limits() {
        let config = CacheConfig {
            max_entries: Some(0),
            ..CacheConfig::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidConfig(_))));

        let config = CacheConfig {
            max_bytes: Some(0),
            ..CacheConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_rejects_bad_percent() {
        let config = CacheConfig {
            policy: PressurePolicy::Shed { percent: 0 },
            ..CacheConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
