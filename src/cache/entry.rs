//! Cache Entry Module
//!
//! Defines the unit stored in either cache layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached value with its creation and expiry timestamps.
///
/// Entries are never extended in place: refreshing a key replaces the
/// whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds), diagnostics only
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped at `now_ms` that lives for `ttl`.
    ///
    /// A sub-millisecond TTL is rounded up so that `expires_at > stored_at`.
    pub fn new(value: V, ttl: Duration, now_ms: u64) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        Self {
            value,
            stored_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: the entry is expired once `now_ms` reaches
    /// `expires_at`, so a value is only served while `now_ms < expires_at`.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}

/// Picks the TTL for a write: the requested one, or `default` when the
/// caller passed none or a zero duration.
pub(crate) fn resolve_ttl(ttl: Option<Duration>, default: Duration) -> Duration {
    match ttl {
        Some(ttl) if !ttl.is_zero() => ttl,
        _ => default,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60), 1_000);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.stored_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert!(!entry.is_expired_at(1_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", Duration::from_millis(500), 10_000);

        assert!(!entry.is_expired_at(10_499));
        assert!(entry.is_expired_at(10_500), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(20_000));
    }

    #[test]
    fn test_zero_ttl_still_expires_after_creation() {
        let entry = CacheEntry::new(1u8, Duration::ZERO, 5);
        assert!(entry.expires_at > entry.stored_at);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new((), Duration::MAX, 1_000);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired_at(1_000));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new((), Duration::from_secs(10), 0);

        assert_eq!(entry.ttl_remaining_ms(0), 10_000);
        assert_eq!(entry.ttl_remaining_ms(9_000), 1_000);
        assert_eq!(entry.ttl_remaining_ms(11_000), 0);
    }

    #[test]
    fn test_resolve_ttl() {
        let default = Duration::from_secs(300);

        assert_eq!(resolve_ttl(None, default), default);
        assert_eq!(resolve_ttl(Some(Duration::ZERO), default), default);
        assert_eq!(
            resolve_ttl(Some(Duration::from_secs(5)), default),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = CacheEntry::new(serde_json::json!({"total": 4}), Duration::from_secs(1), 0);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"value\":{\"total\":4}"));
        assert!(json.contains("\"expires_at\":1000"));

        let parsed: CacheEntry<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
