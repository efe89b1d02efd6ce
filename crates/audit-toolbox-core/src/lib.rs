// crates/audit-toolbox-core/src/lib.rs
// ============================================================================
// Module: Audit Toolbox Core Library
// Description: Session, admission, clock, and error primitives for the gateway.
// Purpose: Provide the stateful building blocks shared by transport and dispatch.
// Dependencies: rand, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Audit Toolbox Core defines the gateway's shared state machinery: the
//! [`SessionRegistry`] tracking live streaming connections, the
//! [`ConnectionRateLimiter`] and [`SessionRateLimiter`] admission layers, the
//! [`Clock`] abstraction that keeps window expiry deterministic, and the
//! closed [`GatewayError`] taxonomy every component uses to signal failure.
//! Invariants:
//! - Shared state is owned by explicit objects injected by the host; there
//!   are no process-level globals.
//! - Rate-limit check-then-increment is a single step under one lock guard.
//! - Errors carry stable codes and are never mutated after construction.
//!
//! Security posture: session identifiers and client addresses are untrusted
//! input; lookups must fail closed and stale identifiers are a normal,
//! expected outcome.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod admission;
pub mod clock;
pub mod error;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use admission::ConnectionLimitConfig;
pub use admission::ConnectionRateLimiter;
pub use admission::InvocationLimitConfig;
pub use admission::SessionRateLimiter;
pub use admission::SessionUsage;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use error::ErrorSeverity;
pub use error::GatewayError;
pub use error::ValidationIssue;
pub use session::Session;
pub use session::SessionId;
pub use session::SessionIdGenerator;
pub use session::SessionRegistry;
pub use session::SessionRegistryError;
