//! Axum router for the push transport.
//! Routes: `GET /sse` (push stream), `POST /messages` (submit).

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use futures_util::{stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sqlmemo_mcp::Inbound;
use sqlmemo_protocol::JsonRpcRequest;
use sqlmemo_types::SessionId;

use crate::sessions::{SessionGuard, SessionRegistry};

/// Path clients POST requests to.
pub const MESSAGES_PATH: &str = "/messages";

/// The only sender into the inbound queue.
///
/// Handlers borrow a clone for one send; `close` drops the original so the
/// queue closes even while connections linger.
#[derive(Debug, Clone, Default)]
pub struct InboundGate {
    inner: Arc<Mutex<Option<mpsc::Sender<Inbound>>>>,
}

impl InboundGate {
    /// Opens a gate over `sender`.
    pub fn new(sender: mpsc::Sender<Inbound>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(sender))),
        }
    }

    /// A sender, unless the gate is closed.
    pub fn sender(&self) -> Option<mpsc::Sender<Inbound>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the sender. Idempotent.
    pub fn close(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entry into the dispatcher's inbound queue.
    pub inbound: InboundGate,
    /// Open push streams.
    pub sessions: SessionRegistry,
    /// Ends open push streams.
    pub shutdown: CancellationToken,
    /// Capacity of each session's mailbox.
    pub mailbox_capacity: usize,
}

/// Builds the axum `Router` with the push-transport routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sse", get(handle_sse))
        .route(MESSAGES_PATH, post(handle_message))
        .with_state(state)
}

async fn handle_sse(State(state): State<AppState>) -> impl IntoResponse {
    let (session, mailbox) = state.sessions.open(state.mailbox_capacity);
    info!(%session, "push stream opened");
    let guard = SessionGuard::new(state.sessions.clone(), session);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{MESSAGES_PATH}?session_id={session}"));

    // The guard lives in the stream state, so the session is unregistered
    // when the client disconnects or the stream ends.
    let messages = stream::unfold((mailbox, guard), |(mut mailbox, guard)| async move {
        let output = mailbox.recv().await?;
        let event = match output.to_json() {
            Ok(json) => Event::default().event("message").data(json),
            Err(e) => {
                warn!(session = %guard.session(), error = %e, "failed to serialize reply");
                Event::default().comment("reply dropped")
            }
        };
        Some((Ok::<_, Infallible>(event), (mailbox, guard)))
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) })
        .chain(messages)
        .take_until(state.shutdown.cancelled_owned());

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(raw) = query.session_id else {
        return reject(StatusCode::BAD_REQUEST, "missing session_id");
    };
    let session: SessionId = match raw.parse() {
        Ok(session) => session,
        Err(_) => return reject(StatusCode::BAD_REQUEST, "malformed session_id"),
    };
    if !state.sessions.contains(&session) {
        return reject(StatusCode::NOT_FOUND, "unknown session");
    }

    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(%session, error = %e, "rejected unparseable body");
            return reject(StatusCode::BAD_REQUEST, "invalid JSON-RPC request");
        }
    };

    let Some(inbound) = state.inbound.sender() else {
        return reject(StatusCode::SERVICE_UNAVAILABLE, "shutting down");
    };
    debug!(%session, method = %request.method, id = ?request.id, "queued request");
    if inbound
        .send(Inbound::for_session(session, request))
        .await
        .is_err()
    {
        return reject(StatusCode::SERVICE_UNAVAILABLE, "shutting down");
    }
    StatusCode::ACCEPTED.into_response()
}

fn reject(status: StatusCode, reason: &'static str) -> Response {
    (status, reason).into_response()
}
