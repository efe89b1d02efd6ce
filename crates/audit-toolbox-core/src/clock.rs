// crates/audit-toolbox-core/src/clock.rs
// ============================================================================
// Module: Gateway Clock
// Description: Millisecond clock abstraction for rate-limit window expiry.
// Purpose: Keep admission-control time deterministic and testable.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Admission-control state never reads wall-clock time directly; the host
//! injects a [`Clock`] so window expiry is deterministically testable.
//! Production code uses [`SystemClock`]; tests use [`ManualClock`] and
//! advance it explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

// ============================================================================
// SECTION: Clock Trait
// ============================================================================

/// Millisecond-resolution clock used by admission control.
pub trait Clock: Send + Sync {
    /// Returns the current time as unix epoch milliseconds.
    fn now_millis(&self) -> u64;
}

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Wall-clock backed [`Clock`] for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // A pre-epoch system time would indicate a misconfigured host; fall
        // back to zero rather than aborting the request path.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

// ============================================================================
// SECTION: Manual Clock
// ============================================================================

/// Manually driven [`Clock`] for deterministic tests.
///
/// # Invariants
/// - Time only moves when a test calls [`ManualClock::advance`] or
///   [`ManualClock::set`].
#[derive(Debug, Default)]
pub struct ManualClock {
    /// Current time in unix epoch milliseconds.
    millis: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock starting at the given epoch milliseconds.
    #[must_use]
    pub const fn new(start_millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(start_millis),
        }
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance(&self, delta_millis: u64) {
        self.millis.fetch_add(delta_millis, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute epoch-millisecond value.
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Clock;
    use super::ManualClock;
    use super::SystemClock;

    #[test]
    fn manual_clock_advances_only_on_request() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance(250);
        assert_eq!(clock.now_millis(), 1_250);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn clocks_are_usable_as_trait_objects() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        assert!(clock.now_millis() > 0);
    }
}
