//! Unix timestamp utilities for credential expiry bookkeeping.
//!
//! This module provides the [`UnixTimestamp`] type used to anchor credential
//! lifetimes to absolute points in time, together with the [`Clock`] trait
//! that lets callers inject a time source. Production code uses
//! [`SystemClock`]; tests substitute a manual clock to pin expiry arithmetic
//! to exact instants.

use std::fmt::{Display, Formatter};
use std::ops::Add;
use std::time::SystemTime;

/// A Unix timestamp representing seconds since the Unix epoch (1970-01-01T00:00:00Z).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Ord, Eq)]
pub struct UnixTimestamp(u64);

impl Display for UnixTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add<u64> for UnixTimestamp {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl UnixTimestamp {
    /// Creates a new [`UnixTimestamp`] from a raw seconds value.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the current system time as a [`UnixTimestamp`].
    ///
    /// # Panics
    ///
    /// Panics if the system clock is set to a time before the Unix epoch,
    /// which should never happen on properly configured systems.
    #[must_use]
    pub fn now() -> Self {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("SystemTime before UNIX epoch?!?")
            .as_secs();
        Self(now)
    }

    /// Returns the timestamp as raw seconds since the Unix epoch.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

/// A source of the current time.
///
/// Expiry decisions take "now" from an injected clock rather than reading the
/// system time inline, so tests can drive the cache through exact expiry and
/// margin boundaries.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> UnixTimestamp;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_extends_a_timestamp() {
        let ts = UnixTimestamp::from_secs(100) + 3600;
        assert_eq!(ts.as_secs(), 3700);
    }

    #[test]
    fn add_saturates_instead_of_wrapping() {
        let ts = UnixTimestamp::from_secs(u64::MAX) + 1;
        assert_eq!(ts.as_secs(), u64::MAX);
    }

    #[test]
    fn ordering_follows_seconds() {
        assert!(UnixTimestamp::from_secs(1) < UnixTimestamp::from_secs(2));
    }

    #[test]
    fn system_clock_is_anchored_to_the_epoch() {
        // 2023-01-01T00:00:00Z; anything earlier would mean a broken clock.
        assert!(SystemClock.now() > UnixTimestamp::from_secs(1_672_531_200));
    }

    #[test]
    fn displays_as_plain_seconds() {
        assert_eq!(UnixTimestamp::from_secs(3600).to_string(), "3600");
    }
}
