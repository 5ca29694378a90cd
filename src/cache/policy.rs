//! Eviction Policy Module
//!
//! Admission limits and what the cache does when a write cannot be admitted.

use std::fmt;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Share of entries one shedding pass removes, in percent.
pub const DEFAULT_EVICTION_PERCENT: u8 = 10;

// == Budget ==
/// Explicit admission limits. Unbounded by default, in which case only a
/// failed allocation puts the cache under pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    /// Maximum number of entries
    pub max_entries: Option<usize>,
    /// Maximum key + value bytes across all entries
    pub max_bytes: Option<usize>,
}

impl Budget {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_entries.is_none() && self.max_bytes.is_none()
    }

    // == Admit ==
    /// Checks the totals the cache would hold after a write.
    pub fn admit(&self, entries: usize, bytes: usize) -> Result<()> {
        let entries_ok = self.max_entries.map_or(true, |max| entries <= max);
        let bytes_ok = self.max_bytes.map_or(true, |max| bytes <= max);
        if entries_ok && bytes_ok {
            Ok(())
        } else {
            Err(CacheError::BudgetExceeded { entries, bytes })
        }
    }
}

// == Pressure Policy ==
/// Recovery strategy when a write cannot be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressurePolicy {
    /// Evict `percent`% of the entries (at least one) from the tail and drop
    /// the write.
    Shed { percent: u8 },
    /// Evict from the tail until the write fits, then complete it.
    MakeRoom,
}

impl Default for PressurePolicy {
    fn default() -> Self {
        PressurePolicy::Shed {
            percent: DEFAULT_EVICTION_PERCENT,
        }
    }
}

impl PressurePolicy {
    /// Percentage used by `LruCache::eviction_pass`.
    pub fn shed_percent(&self) -> u8 {
        match self {
            PressurePolicy::Shed { percent } => *percent,
            PressurePolicy::MakeRoom => DEFAULT_EVICTION_PERCENT,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            PressurePolicy::Shed { percent } if !(1..=100).contains(percent) => {
                Err(CacheError::InvalidConfig(format!(
                    "eviction percent must be within 1..=100, got {percent}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PressurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressurePolicy::Shed { percent } => write!(f, "shed:{percent}"),
            PressurePolicy::MakeRoom => f.write_str("make-room"),
        }
    }
}

impl FromStr for PressurePolicy {
    type Err = CacheError;

    /// Accepts `shed`, `shed:<percent>` and `make-room`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shed" => Ok(PressurePolicy::default()),
            "make-room" | "make_room" => Ok(PressurePolicy::MakeRoom),
            other => {
                let percent = other
                    .strip_prefix("shed:")
                    .and_then(|p| p.parse::<u8>().ok())
                    .ok_or_else(|| {
                        CacheError::InvalidConfig(format!("unknown pressure policy: {s}"))
                    })?;
                let policy = PressurePolicy::Shed { percent };
                policy.validate()?;
                Ok(policy)
            }
        }
    }
}

// == Shed Count ==
/// Entries one shedding pass removes from a cache holding `len`:
/// ⌈len × percent / 100⌉, at least one, zero for an empty cache.
pub fn shed_count(len: usize, percent: u8) -> usize {
    if len == 0 {
        return 0;
    }
    let percent = u128::from(percent.clamp(1, 100));
    let count = (len as u128 * percent).div_ceil(100);
    (count as usize).clamp(1, len)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shed_count_minimum_one() {
        assert_eq!(shed_count(1, 10), 1);
        assert_eq!(shed_count(5, 10), 1);
        assert_eq!(shed_count(10, 10), 1);
    }

    #[test]
    fn test_shed_count_rounds_up() {
        assert_eq!(shed_count(11, 10), 2);
        assert_eq!(shed_count(100, 10), 10);
        assert_eq!(shed_count(101, 10), 11);
        assert_eq!(shed_count(3, 50), 2);
    }

    #[test]
    fn test_shed_count_empty_and_full() {
        assert_eq!(shed_count(0, 10), 0);
        assert_eq!(shed_count(7, 100), 7);
    }

    #[test]
    fn test_budget_unbounded_admits_everything() {
        let budget = Budget::unbounded();
        assert!(budget.is_unbounded());
        assert!(budget.admit(usize::MAX, usize::MAX).is_ok());
    }

    #[test]
    fn test_budget_limits() {
        let budget = Budget::unbounded().with_max_entries(2).with_max_bytes(10);
        assert!(budget.admit(2, 10).is_ok());
        assert!(matches!(
            budget.admit(3, 5),
            Err(CacheError::BudgetExceeded { entries: 3, .. })
        ));
        assert!(budget.admit(1, 11).is_err());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "shed".parse::<PressurePolicy>().unwrap(),
            PressurePolicy::Shed { percent: 10 }
        );
        assert_eq!(
            "shed:25".parse::<PressurePolicy>().unwrap(),
            PressurePolicy::Shed { percent: 25 }
        );
        assert_eq!(
            "Make-Room".parse::<PressurePolicy>().unwrap(),
            PressurePolicy::MakeRoom
        );
        assert!("shed:0".parse::<PressurePolicy>().is_err());
        assert!("shed:101".parse::<PressurePolicy>().is_err());
        assert!("random".parse::<PressurePolicy>().is_err());
    }

    #[test]
    fn test_policy_display_roundtrips() {
        for policy in [PressurePolicy::Shed { percent: 30 }, PressurePolicy::MakeRoom] {
            assert_eq!(policy.to_string().parse::<PressurePolicy>().unwrap(), policy);
        }
    }
}
