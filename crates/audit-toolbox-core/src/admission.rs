// crates/audit-toolbox-core/src/admission.rs
// ============================================================================
// Module: Admission Control
// Description: Connection-open and per-session invocation rate limiters.
// Purpose: Bound connection churn and invocation volume before validation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Admission control has two independent layers: the
//! [`ConnectionRateLimiter`] gates connection opens per client address with a
//! fixed window, and the [`SessionRateLimiter`] gates tool invocations per
//! session with a short window plus a lifetime cap. Both must allow a
//! request before it proceeds.
//! Invariants:
//! - Check-then-increment is a single step under one lock guard; no two
//!   invocations on one session can race past a cap.
//! - A rejected request is never counted.
//! - Lifetime counts are monotonically non-decreasing.
//! - State is created lazily and removed on session close; [`SessionRateLimiter::sweep`]
//!   evicts state for abandoned sessions and is driven by an external
//!   scheduler, never by a self-starting timer.
//!
//! Security posture: addresses and session identifiers are untrusted input;
//! limits fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Deserialize;
use serde::Serialize;

use crate::clock::Clock;
use crate::error::GatewayError;

// ============================================================================
// SECTION: Limit Configuration
// ============================================================================

/// Configuration for the connection-open limiter.
///
/// # Invariants
/// - `window_millis` > 0; a zero-length window would admit everything.
/// - Fields absent from a deserialized document fill from the reference
///   defaults; unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConnectionLimitConfig {
    /// Fixed window length in milliseconds.
    pub window_millis: u64,
    /// Maximum connection opens per address within the window.
    pub max_connections: u32,
}

impl Default for ConnectionLimitConfig {
    /// Reference defaults: 10 connections per address per 15 minutes.
    fn default() -> Self {
        Self {
            window_millis: 15 * 60 * 1_000,
            max_connections: 10,
        }
    }
}

/// Configuration for the per-session invocation limiter.
///
/// # Invariants
/// - `window_millis` > 0.
/// - `stale_after_millis` bounds memory for abandoned sessions independent
///   of explicit close notifications.
/// - Fields absent from a deserialized document fill from the reference
///   defaults; unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct InvocationLimitConfig {
    /// Short window length in milliseconds.
    pub window_millis: u64,
    /// Maximum invocations within one short window.
    pub max_per_window: u32,
    /// Maximum invocations over the lifetime of a session.
    pub max_per_session: u64,
    /// Idle time past the last window reset before sweep eviction.
    pub stale_after_millis: u64,
}

impl Default for InvocationLimitConfig {
    /// Reference defaults: 30 per minute, 100 per session, 1 hour staleness.
    fn default() -> Self {
        Self {
            window_millis: 60 * 1_000,
            max_per_window: 30,
            max_per_session: 100,
            stale_after_millis: 60 * 60 * 1_000,
        }
    }
}

// ============================================================================
// SECTION: Window State
// ============================================================================

/// Per-address connection window bookkeeping.
#[derive(Debug, Clone, Copy)]
struct AddressWindow {
    /// Connection opens counted in the current window.
    count: u32,
    /// Epoch milliseconds at which the window resets.
    reset_at_millis: u64,
}

/// Per-session invocation bookkeeping.
#[derive(Debug, Clone, Copy)]
struct InvocationState {
    /// Invocations counted in the current short window.
    window_count: u32,
    /// Epoch milliseconds at which the short window resets.
    reset_at_millis: u64,
    /// Invocations counted since session creation. Monotonic.
    lifetime_count: u64,
}

/// Point-in-time view of a session's limiter state, for observability.
///
/// # Invariants
/// - `window_count` reflects the current window only; an elapsed window
///   reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionUsage {
    /// Invocations counted in the current short window.
    pub window_count: u32,
    /// Invocations counted since session creation.
    pub lifetime_count: u64,
    /// Invocations remaining in the current short window.
    pub remaining_in_window: u32,
}

// ============================================================================
// SECTION: Connection Rate Limiter
// ============================================================================

/// Fixed-window limiter for connection opens, keyed by client address.
///
/// # Invariants
/// - Rejection happens before any session exists.
/// - Rejections report retry-after equal to the remaining window time.
pub struct ConnectionRateLimiter {
    /// Limit configuration.
    config: ConnectionLimitConfig,
    /// Injected clock; the limiter never reads wall-clock time directly.
    clock: Arc<dyn Clock>,
    /// Window state keyed by client address string.
    windows: Mutex<BTreeMap<String, AddressWindow>>,
}

impl ConnectionRateLimiter {
    /// Creates a connection limiter with the given configuration and clock.
    #[must_use]
    pub fn new(config: ConnectionLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            windows: Mutex::new(BTreeMap::new()),
        }
    }

    /// Admits or rejects a connection-open attempt from the given address.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TooManyConnections`] with the remaining
    /// window time when the address exceeded its window budget. The
    /// rejected attempt is not counted.
    pub fn check(&self, address: &str) -> Result<(), GatewayError> {
        let now = self.clock.now_millis();
        let mut windows = lock_recovering(&self.windows);
        let window = windows
            .entry(address.to_string())
            .and_modify(|window| {
                if now >= window.reset_at_millis {
                    window.count = 0;
                    window.reset_at_millis = now + self.config.window_millis;
                }
            })
            .or_insert(AddressWindow {
                count: 0,
                reset_at_millis: now + self.config.window_millis,
            });
        if window.count >= self.config.max_connections {
            return Err(GatewayError::TooManyConnections {
                retry_after_secs: remaining_secs(window.reset_at_millis, now),
            });
        }
        window.count += 1;
        Ok(())
    }

    /// Evicts windows that have already elapsed. Returns the eviction count.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let mut windows = lock_recovering(&self.windows);
        let before = windows.len();
        windows.retain(|_, window| now < window.reset_at_millis);
        before - windows.len()
    }
}

// ============================================================================
// SECTION: Session Rate Limiter
// ============================================================================

/// Two-cap invocation limiter keyed by session identifier.
///
/// # Invariants
/// - The short-window cap is checked before the lifetime cap.
/// - Passing both checks increments both counters under the same guard.
/// - Once the lifetime cap is reached, all further invocations are rejected
///   regardless of window state, and the lifetime count stops growing.
pub struct SessionRateLimiter {
    /// Limit configuration.
    config: InvocationLimitConfig,
    /// Injected clock; the limiter never reads wall-clock time directly.
    clock: Arc<dyn Clock>,
    /// Invocation state keyed by session identifier, created lazily.
    sessions: Mutex<BTreeMap<String, InvocationState>>,
}

impl SessionRateLimiter {
    /// Creates a session limiter with the given configuration and clock.
    #[must_use]
    pub fn new(config: InvocationLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            sessions: Mutex::new(BTreeMap::new()),
        }
    }

    /// Admits or rejects one invocation for the given session.
    ///
    /// The short-window check runs first, then the lifetime check; both
    /// counters are incremented only when both pass, all under one guard.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RateLimitExceeded`] carrying the seconds
    /// until the short window resets. The rejected invocation is not
    /// counted.
    pub fn check(&self, session_id: &str) -> Result<(), GatewayError> {
        let now = self.clock.now_millis();
        let mut sessions = lock_recovering(&self.sessions);
        let state = sessions
            .entry(session_id.to_string())
            .and_modify(|state| {
                if now >= state.reset_at_millis {
                    state.window_count = 0;
                    state.reset_at_millis = now + self.config.window_millis;
                }
            })
            .or_insert(InvocationState {
                window_count: 0,
                reset_at_millis: now + self.config.window_millis,
                lifetime_count: 0,
            });
        if state.window_count >= self.config.max_per_window {
            return Err(GatewayError::RateLimitExceeded {
                retry_after_secs: remaining_secs(state.reset_at_millis, now),
            });
        }
        if state.lifetime_count >= self.config.max_per_session {
            return Err(GatewayError::RateLimitExceeded {
                retry_after_secs: remaining_secs(state.reset_at_millis, now),
            });
        }
        state.window_count += 1;
        state.lifetime_count += 1;
        Ok(())
    }

    /// Returns seconds until the session's short window resets, or 0 when no
    /// limiter state exists or the window has already elapsed.
    #[must_use]
    pub fn retry_after_secs(&self, session_id: &str) -> u64 {
        let now = self.clock.now_millis();
        let sessions = lock_recovering(&self.sessions);
        sessions
            .get(session_id)
            .map_or(0, |state| remaining_secs(state.reset_at_millis, now))
    }

    /// Returns a point-in-time usage view for the session, when state exists.
    #[must_use]
    pub fn usage(&self, session_id: &str) -> Option<SessionUsage> {
        let now = self.clock.now_millis();
        let sessions = lock_recovering(&self.sessions);
        sessions.get(session_id).map(|state| {
            let window_count =
                if now >= state.reset_at_millis { 0 } else { state.window_count };
            SessionUsage {
                window_count,
                lifetime_count: state.lifetime_count,
                remaining_in_window: self.config.max_per_window.saturating_sub(window_count),
            }
        })
    }

    /// Returns true when limiter state exists for the session.
    #[must_use]
    pub fn has_state(&self, session_id: &str) -> bool {
        lock_recovering(&self.sessions).contains_key(session_id)
    }

    /// Discards state for a closed session. Unknown identifiers are a no-op.
    pub fn remove_session(&self, session_id: &str) {
        lock_recovering(&self.sessions).remove(session_id);
    }

    /// Evicts state for sessions idle past the staleness threshold since
    /// their last window reset. Driven by an external scheduler. Returns the
    /// eviction count.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let mut sessions = lock_recovering(&self.sessions);
        let before = sessions.len();
        sessions.retain(|_, state| {
            now <= state.reset_at_millis.saturating_add(self.config.stale_after_millis)
        });
        before - sessions.len()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Locks a limiter map, recovering from a poisoned lock. Every mutation of
/// limiter state completes within one guard, so the map stays consistent
/// even after a panicked holder.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Returns whole seconds remaining until `reset_at_millis`, rounded up, or
/// 0 when the reset moment has passed.
const fn remaining_secs(reset_at_millis: u64, now_millis: u64) -> u64 {
    if now_millis >= reset_at_millis {
        return 0;
    }
    (reset_at_millis - now_millis).div_ceil(1_000)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
