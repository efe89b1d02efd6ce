// crates/audit-toolbox-core/src/session.rs
// ============================================================================
// Module: Session Registry
// Description: Process-wide mapping from session identifier to live connection.
// Purpose: Track streaming sessions from accept to teardown.
// Dependencies: rand, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Session`] records one open streaming connection: its opaque
//! identifier, creation timestamp, and the handle used to push
//! server-to-client messages. The [`SessionRegistry`] exclusively owns the
//! entries; the transport adapter holds only transient [`Session`] clones.
//! Invariants:
//! - Exactly one live session per identifier at any time.
//! - Removal is idempotent; removing an unknown identifier is a no-op.
//! - A missing session on lookup is a normal outcome (stale or forged
//!   identifiers), not an internal error.
//!
//! Security posture: session identifiers arrive from untrusted clients;
//! lookups must treat unknown identifiers as expected input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Session Identifier
// ============================================================================

/// Opaque session identifier generated by the transport.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this
///   type. Uniqueness is a [`SessionIdGenerator`] guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session identifier from an opaque string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Session Identifier Generator
// ============================================================================

/// Boot-scoped session identifier generator.
///
/// # Invariants
/// - Issued identifiers are unique within the process lifetime: a random
///   boot identifier is combined with a monotonic counter.
#[derive(Debug)]
pub struct SessionIdGenerator {
    /// Boot-scoped random identifier for entropy.
    boot_id: u64,
    /// Monotonic counter for identifiers issued in this process.
    counter: AtomicU64,
}

impl SessionIdGenerator {
    /// Creates a new generator seeded from the operating system RNG.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boot_id: OsRng.next_u64(),
            counter: AtomicU64::new(0),
        }
    }

    /// Issues the next session identifier.
    #[must_use]
    pub fn issue(&self) -> SessionId {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        SessionId::new(format!("sess-{:016x}-{sequence:08x}", self.boot_id))
    }
}

impl Default for SessionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Session Record
// ============================================================================

/// One open streaming connection.
///
/// # Invariants
/// - `handle` is shared; the registry entry owns the canonical reference and
///   clones handed to callers are transient.
#[derive(Debug)]
pub struct Session<H> {
    /// Opaque session identifier.
    pub id: SessionId,
    /// Creation timestamp in unix epoch milliseconds.
    pub created_at_millis: u64,
    /// Handle used to push server-to-client messages.
    pub handle: Arc<H>,
}

impl<H> Clone for Session<H> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            created_at_millis: self.created_at_millis,
            handle: Arc::clone(&self.handle),
        }
    }
}

// ============================================================================
// SECTION: Registry Errors
// ============================================================================

/// Errors emitted by the session registry.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionRegistryError {
    /// A session with the same identifier is already registered. This must
    /// not occur under correct transport behavior; callers treat it as an
    /// invariant violation, audit it, and reject the connection.
    #[error("duplicate session: {session_id}")]
    DuplicateSession {
        /// The identifier that collided.
        session_id: SessionId,
    },
}

// ============================================================================
// SECTION: Session Registry
// ============================================================================

/// In-memory registry of live sessions keyed by identifier.
///
/// # Invariants
/// - Process-lifetime scope; entries never survive a restart.
/// - No capacity bound beyond memory; deployments bound growth with the
///   connection-open limiter, not inside the registry.
#[derive(Debug)]
pub struct SessionRegistry<H> {
    /// Live sessions keyed by identifier string.
    sessions: Mutex<BTreeMap<String, Session<H>>>,
}

impl<H> SessionRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sessions: Mutex::new(BTreeMap::new()),
        }
    }

    /// Registers a new session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRegistryError::DuplicateSession`] when the
    /// identifier is already present.
    pub fn create(
        &self,
        id: SessionId,
        created_at_millis: u64,
        handle: Arc<H>,
    ) -> Result<Session<H>, SessionRegistryError> {
        let mut sessions = self.lock_sessions();
        if sessions.contains_key(id.as_str()) {
            return Err(SessionRegistryError::DuplicateSession {
                session_id: id,
            });
        }
        let session = Session {
            id: id.clone(),
            created_at_millis,
            handle,
        };
        sessions.insert(id.as_str().to_string(), session.clone());
        Ok(session)
    }

    /// Looks up a session by identifier. `None` is a normal outcome for
    /// stale or forged identifiers.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session<H>> {
        self.lock_sessions().get(id).cloned()
    }

    /// Removes a session. Removing an unknown identifier is a no-op.
    pub fn remove(&self, id: &str) {
        self.lock_sessions().remove(id);
    }

    /// Returns the current number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_sessions().len()
    }

    /// Returns true when no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locks the session map, recovering from a poisoned lock. Registry
    /// mutations cannot leave the map in a partially updated state, so the
    /// data remains consistent even after a panicked holder.
    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Session<H>>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<H> Default for SessionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
