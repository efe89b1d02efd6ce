// crates/audit-toolbox-mcp/src/server.rs
// ============================================================================
// Module: Gateway Transport Adapter
// Description: SSE stream endpoint, invocation endpoint, and health endpoint.
// Purpose: Bind session lifecycle and the dispatcher to the HTTP surface.
// Dependencies: audit-toolbox-contract, audit-toolbox-core, axum, serde,
// serde_json, thiserror, tokio, tokio-stream
// ============================================================================

//! ## Overview
//! The transport adapter owns the long-lived connection: a client opens the
//! stream endpoint, passes the connection-open limiter, receives a freshly
//! minted session identifier in the handshake event, and the stream then
//! carries periodic heartbeat comments until the client disconnects. Tool
//! invocations arrive on a separate POST endpoint carrying the session
//! identifier; the reply travels back on that request, not on the stream.
//! Invariants:
//! - Stream teardown removes the registry entry and purges limiter state
//!   before the connection is released, on every exit path.
//! - An invocation against an unknown session is answered with a transport
//!   404 and mutates no gateway state.
//!
//! Security posture: the peer address and all posted fields are untrusted;
//! admission rejections happen before any session state exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use audit_toolbox_contract::tool_contracts;
use audit_toolbox_core::Clock;
use audit_toolbox_core::ConnectionRateLimiter;
use audit_toolbox_core::GatewayError;
use audit_toolbox_core::SessionId;
use audit_toolbox_core::SessionIdGenerator;
use audit_toolbox_core::SessionRateLimiter;
use audit_toolbox_core::SessionRegistry;
use audit_toolbox_core::SystemClock;
use axum::Json;
use axum::Router;
use axum::extract::ConnectInfo;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::response::sse::Event;
use axum::response::sse::Sse;
use axum::routing::get;
use axum::routing::post;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::wrappers::ReceiverStream;

use crate::audit::GatewayAuditEvent;
use crate::audit::GatewayAuditSink;
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::dispatch::InvocationRequest;
use crate::dispatch::user_message;
use crate::telemetry::GatewayMetrics;
use crate::tools::ToolRouter;
use crate::validation::EngineBuildError;
use crate::validation::ValidationEngine;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Buffered server-to-client events per session before pushes block.
const SESSION_CHANNEL_CAPACITY: usize = 16;

/// Service label reported by the health endpoint.
const SERVICE_NAME: &str = "audit-toolbox-mcp";

// ============================================================================
// SECTION: Session Handle
// ============================================================================

/// Transient reference used to push server-to-client events on one stream.
///
/// # Invariants
/// - Pushing to a closed stream is a benign no-op, never a failure that
///   propagates into the request path.
#[derive(Debug)]
pub struct SessionHandle {
    /// Sender half of the stream's event channel.
    sender: mpsc::Sender<Event>,
}

impl SessionHandle {
    /// Creates a handle over the stream's event channel.
    #[must_use]
    pub const fn new(sender: mpsc::Sender<Event>) -> Self {
        Self {
            sender,
        }
    }

    /// Pushes one event to the stream. Returns false when the connection is
    /// already gone.
    pub async fn push(&self, event: Event) -> bool {
        self.sender.send(event).await.is_ok()
    }
}

// ============================================================================
// SECTION: Gateway State
// ============================================================================

/// Failure while assembling gateway state at startup.
#[derive(Debug, Error)]
pub enum GatewayStateBuildError {
    /// A tool schema failed to compile.
    #[error(transparent)]
    Validation(#[from] EngineBuildError),
}

/// Shared gateway state threaded through every handler.
///
/// # Invariants
/// - Owns the registry and both limiters for the process lifetime; nothing
///   here survives a restart.
pub struct GatewayState {
    /// Live session registry.
    registry: SessionRegistry<SessionHandle>,
    /// Session identifier mint.
    session_ids: SessionIdGenerator,
    /// Connection-open limiter, keyed by peer address.
    connection_limiter: ConnectionRateLimiter,
    /// Per-session invocation limiter, shared with the dispatcher.
    invocation_limiter: Arc<SessionRateLimiter>,
    /// Invocation pipeline.
    dispatcher: Dispatcher,
    /// Audit destination for lifecycle and failure events.
    audit: Arc<dyn GatewayAuditSink>,
    /// Clock for session creation timestamps.
    clock: Arc<dyn Clock>,
    /// Interval between heartbeat comments on idle streams.
    heartbeat: Duration,
    /// Interval between limiter sweep passes.
    sweep_interval: Duration,
    /// Path advertised to clients in the handshake event.
    message_path: String,
}

impl GatewayState {
    /// Returns the live session registry.
    #[must_use]
    pub const fn registry(&self) -> &SessionRegistry<SessionHandle> {
        &self.registry
    }

    /// Returns the connection-open limiter.
    #[must_use]
    pub const fn connection_limiter(&self) -> &ConnectionRateLimiter {
        &self.connection_limiter
    }

    /// Returns the per-session invocation limiter.
    #[must_use]
    pub fn invocation_limiter(&self) -> &SessionRateLimiter {
        &self.invocation_limiter
    }

    /// Returns the invocation dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the path clients post invocations to.
    #[must_use]
    pub fn message_path(&self) -> &str {
        &self.message_path
    }
}

/// Assembles gateway state from configuration using the system clock.
///
/// # Errors
///
/// Returns [`GatewayStateBuildError`] when a tool schema fails to compile.
pub fn build_gateway_state(
    config: &GatewayConfig,
    audit: Arc<dyn GatewayAuditSink>,
    metrics: Arc<dyn GatewayMetrics>,
) -> Result<Arc<GatewayState>, GatewayStateBuildError> {
    build_gateway_state_with_clock(config, audit, metrics, Arc::new(SystemClock))
}

/// Assembles gateway state with an injected clock, for deterministic window
/// expiry in tests.
///
/// # Errors
///
/// Returns [`GatewayStateBuildError`] when a tool schema fails to compile.
pub fn build_gateway_state_with_clock(
    config: &GatewayConfig,
    audit: Arc<dyn GatewayAuditSink>,
    metrics: Arc<dyn GatewayMetrics>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<GatewayState>, GatewayStateBuildError> {
    let engine = ValidationEngine::from_contracts(
        &tool_contracts(),
        config.validation.max_payload_bytes,
    )?;
    let invocation_limiter = Arc::new(SessionRateLimiter::new(
        config.limits.invocation,
        Arc::clone(&clock),
    ));
    let dispatcher = Dispatcher::new(
        engine,
        ToolRouter::with_builtin_tools(),
        Arc::clone(&invocation_limiter),
        Arc::clone(&audit),
        metrics,
    );
    Ok(Arc::new(GatewayState {
        registry: SessionRegistry::new(),
        session_ids: SessionIdGenerator::new(),
        connection_limiter: ConnectionRateLimiter::new(
            config.limits.connection,
            Arc::clone(&clock),
        ),
        invocation_limiter,
        dispatcher,
        audit,
        clock,
        heartbeat: Duration::from_secs(config.server.heartbeat_secs),
        sweep_interval: Duration::from_secs(config.server.sweep_interval_secs),
        message_path: config.server.message_path.clone(),
    }))
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the gateway router over shared state.
#[must_use]
pub fn build_gateway_router(state: Arc<GatewayState>) -> Router {
    let message_path = state.message_path.clone();
    Router::new()
        .route("/sse", get(handle_stream))
        .route(&message_path, post(handle_message))
        .route("/health", get(handle_health))
        .with_state(state)
}

// ============================================================================
// SECTION: Stream Endpoint
// ============================================================================

/// Reverts session registration when the stream is dropped, on every exit
/// path: client disconnect, write error, or server shutdown.
struct SessionGuard {
    /// Shared gateway state.
    state: Arc<GatewayState>,
    /// Identifier of the session this guard tears down.
    session_id: SessionId,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.registry.remove(self.session_id.as_str());
        self.state.invocation_limiter.remove_session(self.session_id.as_str());
        self.state
            .audit
            .record(&GatewayAuditEvent::lifecycle("session_closed", self.session_id.as_str()));
    }
}

/// GET handler for the stream endpoint: admission, session mint, handshake,
/// then heartbeats until disconnect.
async fn handle_stream(
    State(state): State<Arc<GatewayState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Response {
    if let Err(error) = state.connection_limiter.check(&peer.ip().to_string()) {
        state.audit.record(&GatewayAuditEvent::from_error(&error, None, None));
        return admission_rejection(&error);
    }

    let session_id = state.session_ids.issue();
    let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
    let handle = Arc::new(SessionHandle::new(sender));
    if state
        .registry
        .create(session_id.clone(), state.clock.now_millis(), handle)
        .is_err()
    {
        // Identifier collision violates the generator's uniqueness guarantee.
        state.audit.record(&GatewayAuditEvent::from_error(&GatewayError::Internal, None, None));
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response();
    }
    state
        .audit
        .record(&GatewayAuditEvent::lifecycle("session_created", session_id.as_str()));

    let handshake = Event::default()
        .event("endpoint")
        .data(format!("{}?sessionId={session_id}", state.message_path));
    let pushed = ReceiverStream::new(receiver);
    let first_beat = tokio::time::Instant::now() + state.heartbeat;
    let heartbeats = IntervalStream::new(tokio::time::interval_at(first_beat, state.heartbeat))
        .map(|_| Event::default().comment("heartbeat"));

    let guard = SessionGuard {
        state: Arc::clone(&state),
        session_id,
    };
    let events = tokio_stream::once(handshake).chain(pushed.merge(heartbeats)).map(
        move |event| {
            // The guard lives exactly as long as the stream; dropping the
            // response tears the session down.
            let _live = &guard;
            Ok::<Event, Infallible>(event)
        },
    );
    Sse::new(events).into_response()
}

/// Shapes an admission rejection into a 429 with the taxonomy payload.
fn admission_rejection(error: &GatewayError) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "error": {
                "code": error.code(),
                "message": user_message(error),
                "data": error.data(),
            }
        })),
    )
        .into_response()
}

// ============================================================================
// SECTION: Invocation Endpoint
// ============================================================================

/// Query parameters accepted by the invocation endpoint.
#[derive(Debug, Deserialize)]
struct MessageQuery {
    /// Session the invocation targets.
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Body accepted by the invocation endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageBody {
    /// Requested tool name.
    tool_name: String,
    /// Raw tool arguments.
    #[serde(default)]
    arguments: Value,
}

/// POST handler for the invocation endpoint: session resolution, then the
/// dispatcher pipeline; the reply travels back on this request.
async fn handle_message(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<MessageQuery>,
    Json(body): Json<MessageBody>,
) -> Response {
    let Some(session_id) = query.session_id else {
        return session_not_found();
    };
    if state.registry.get(&session_id).is_none() {
        return session_not_found();
    }
    let request = InvocationRequest {
        session_id,
        tool_name: body.tool_name,
        arguments: body.arguments,
    };
    Json(state.dispatcher.dispatch(&request)).into_response()
}

/// Transport-level rejection for an unknown or missing session identifier.
/// Deliberately outside the tool-error taxonomy.
fn session_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Session not found" }))).into_response()
}

// ============================================================================
// SECTION: Health Endpoint
// ============================================================================

/// GET handler for the health endpoint.
async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

// ============================================================================
// SECTION: Limiter Sweeper
// ============================================================================

/// Periodically evicts stale limiter state. Spawned by the host next to the
/// server task; sweep cadence comes from configuration.
pub async fn run_limiter_sweeper(state: Arc<GatewayState>) {
    let mut ticks = tokio::time::interval(state.sweep_interval);
    // The first tick completes immediately; skip it so sweeps start one full
    // interval after boot.
    ticks.tick().await;
    loop {
        ticks.tick().await;
        state.connection_limiter.sweep();
        state.invocation_limiter.sweep();
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
