// crates/audit-toolbox-core/src/admission/tests.rs
// ============================================================================
// Module: Admission Control Unit Tests
// Description: Unit tests for connection and session rate limiters.
// Purpose: Pin window, lifetime, and sweep behavior with a manual clock.
// Dependencies: audit-toolbox-core, serde_json
// ============================================================================

//! ## Overview
//! Drives both limiters with a [`ManualClock`] so window expiry, lifetime
//! caps, and sweep eviction are exercised deterministically.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::clock::ManualClock;
use crate::error::GatewayError;

use super::ConnectionLimitConfig;
use super::ConnectionRateLimiter;
use super::InvocationLimitConfig;
use super::SessionRateLimiter;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds a session limiter over a manual clock with reference defaults.
fn session_limiter() -> (Arc<ManualClock>, SessionRateLimiter) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let limiter =
        SessionRateLimiter::new(InvocationLimitConfig::default(), Arc::clone(&clock) as _);
    (clock, limiter)
}

// ============================================================================
// SECTION: Short Window Cap
// ============================================================================

#[test]
fn thirty_first_request_in_window_is_rejected_with_retry_after() {
    let (clock, limiter) = session_limiter();
    for i in 0..30 {
        limiter.check("s1").unwrap_or_else(|_| panic!("request {i} should pass"));
        clock.advance(300);
    }
    // 9 seconds into the window; the 31st request must be rejected, not
    // counted, and the retry hint must not exceed the window length.
    let error = limiter.check("s1").expect_err("31st request rejected");
    let GatewayError::RateLimitExceeded {
        retry_after_secs,
    } = error
    else {
        panic!("expected RateLimitExceeded, got {error}");
    };
    assert!(retry_after_secs <= 60);
    assert!(retry_after_secs > 0);

    let usage = limiter.usage("s1").expect("usage");
    assert_eq!(usage.window_count, 30);
    assert_eq!(usage.lifetime_count, 30);
}

#[test]
fn window_reset_admits_a_fresh_batch() {
    let (clock, limiter) = session_limiter();
    for _ in 0..30 {
        limiter.check("s1").expect("within window");
    }
    assert!(limiter.check("s1").is_err());

    clock.advance(60_001);
    limiter.check("s1").expect("fresh window admits again");
    let usage = limiter.usage("s1").expect("usage");
    assert_eq!(usage.window_count, 1);
    assert_eq!(usage.lifetime_count, 31);
}

// ============================================================================
// SECTION: Lifetime Cap
// ============================================================================

#[test]
fn lifetime_count_is_monotonic_and_capped_at_one_hundred() {
    let (clock, limiter) = session_limiter();
    let mut admitted = 0u64;
    // Spread requests over many windows so only the lifetime cap binds.
    for _ in 0..12 {
        for _ in 0..10 {
            if limiter.check("s1").is_ok() {
                admitted += 1;
            }
        }
        clock.advance(61_000);
    }
    assert_eq!(admitted, 100);

    // The 101st invocation is rejected even though the window has reset,
    // and rejected requests never advance the lifetime count.
    let error = limiter.check("s1").expect_err("lifetime cap");
    assert!(matches!(
        error,
        GatewayError::RateLimitExceeded {
            ..
        }
    ));
    let usage = limiter.usage("s1").expect("usage");
    assert_eq!(usage.lifetime_count, 100);
}

#[test]
fn window_cap_is_checked_before_lifetime_cap() {
    let clock = Arc::new(ManualClock::new(0));
    let config = InvocationLimitConfig {
        window_millis: 60_000,
        max_per_window: 5,
        max_per_session: 5,
        stale_after_millis: 3_600_000,
    };
    let limiter = SessionRateLimiter::new(config, Arc::clone(&clock) as _);
    for _ in 0..5 {
        limiter.check("s1").expect("admitted");
    }
    // Both caps are saturated; the rejection must still carry a window
    // retry hint because the window check runs first.
    let error = limiter.check("s1").expect_err("rejected");
    let GatewayError::RateLimitExceeded {
        retry_after_secs,
    } = error
    else {
        panic!("expected RateLimitExceeded");
    };
    assert_eq!(retry_after_secs, 60);
}

// ============================================================================
// SECTION: Retry Hints and State Lifecycle
// ============================================================================

#[test]
fn retry_after_is_zero_without_state_or_after_expiry() {
    let (clock, limiter) = session_limiter();
    assert_eq!(limiter.retry_after_secs("unknown"), 0);

    limiter.check("s1").expect("admitted");
    assert!(limiter.retry_after_secs("s1") > 0);

    clock.advance(60_001);
    assert_eq!(limiter.retry_after_secs("s1"), 0);
}

#[test]
fn remove_session_discards_state() {
    let (_clock, limiter) = session_limiter();
    limiter.check("s2").expect("admitted");
    assert!(limiter.has_state("s2"));
    limiter.remove_session("s2");
    assert!(!limiter.has_state("s2"));
    limiter.remove_session("s2");
}

#[test]
fn sweep_evicts_only_stale_sessions() {
    let (clock, limiter) = session_limiter();
    limiter.check("old").expect("admitted");
    clock.advance(30 * 60 * 1_000);
    limiter.check("fresh").expect("admitted");

    // "old" reset at t0+60s; one hour past that it becomes sweepable while
    // "fresh" is still inside its staleness budget.
    clock.advance(31 * 60 * 1_000 + 1);
    assert_eq!(limiter.sweep(), 1);
    assert!(!limiter.has_state("old"));
    assert!(limiter.has_state("fresh"));
}

// ============================================================================
// SECTION: Connection Limiter
// ============================================================================

#[test]
fn connection_window_admits_ten_then_rejects() {
    let clock = Arc::new(ManualClock::new(500_000));
    let limiter = ConnectionRateLimiter::new(ConnectionLimitConfig::default(), Arc::clone(&clock) as _);
    for _ in 0..10 {
        limiter.check("203.0.113.9").expect("admitted");
    }
    let error = limiter.check("203.0.113.9").expect_err("11th rejected");
    let GatewayError::TooManyConnections {
        retry_after_secs,
    } = error
    else {
        panic!("expected TooManyConnections");
    };
    assert_eq!(retry_after_secs, 15 * 60);

    // A different address has an independent window.
    limiter.check("198.51.100.1").expect("independent window");

    clock.advance(15 * 60 * 1_000);
    limiter.check("203.0.113.9").expect("window reset");
}

#[test]
fn connection_sweep_evicts_elapsed_windows() {
    let clock = Arc::new(ManualClock::new(0));
    let limiter = ConnectionRateLimiter::new(ConnectionLimitConfig::default(), Arc::clone(&clock) as _);
    limiter.check("a").expect("admitted");
    limiter.check("b").expect("admitted");
    assert_eq!(limiter.sweep(), 0);
    clock.advance(15 * 60 * 1_000 + 1);
    assert_eq!(limiter.sweep(), 2);
}

// ============================================================================
// SECTION: Config Deserialization
// ============================================================================

#[test]
fn partial_limit_documents_fill_missing_fields_from_reference_defaults() {
    let connection: ConnectionLimitConfig =
        serde_json::from_value(serde_json::json!({ "max_connections": 3 }))
            .expect("connection config");
    assert_eq!(connection.max_connections, 3);
    assert_eq!(connection.window_millis, 15 * 60 * 1_000);

    let invocation: InvocationLimitConfig =
        serde_json::from_value(serde_json::json!({ "max_per_window": 5 }))
            .expect("invocation config");
    assert_eq!(invocation.max_per_window, 5);
    assert_eq!(invocation.window_millis, 60 * 1_000);
    assert_eq!(invocation.max_per_session, 100);
    assert_eq!(invocation.stale_after_millis, 60 * 60 * 1_000);
}

#[test]
fn unknown_limit_fields_are_rejected() {
    let result: Result<InvocationLimitConfig, _> =
        serde_json::from_value(serde_json::json!({ "max_per_minute": 5 }));
    assert!(result.is_err(), "a typoed limit name must not be ignored");
}
