//! The single consumer of inbound requests.

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use sqlmemo_protocol::{
    error_codes, JsonRpcErrorResponse, JsonRpcRequest, JsonRpcResponse, RequestId,
};
use sqlmemo_types::{FailurePolicy, MemoError, ToolBackend};

use crate::handler::{JsonRpcOutput, Reply};
use crate::registry::MethodRegistry;
use crate::state::HubState;
use crate::transport::{Inbound, Outbound};

/// Routes requests through a `MethodRegistry` against owned `HubState`.
///
/// Requests are handled one at a time, so replies leave in arrival order.
#[derive(Debug)]
pub struct Dispatcher {
    registry: MethodRegistry,
    state: HubState,
    policy: FailurePolicy,
}

impl Dispatcher {
    /// Creates a dispatcher with the standard routing table.
    pub fn new(backend: Box<dyn ToolBackend>) -> Self {
        Self::with_registry(MethodRegistry::standard(), backend)
    }

    /// Creates a dispatcher over a custom routing table.
    pub fn with_registry(registry: MethodRegistry, backend: Box<dyn ToolBackend>) -> Self {
        Self {
            registry,
            state: HubState::new(backend),
            policy: FailurePolicy::default(),
        }
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read access to the hub state.
    pub fn state(&self) -> &HubState {
        &self.state
    }

    /// Handles one request and returns the reply to send, if any.
    pub fn dispatch(&mut self, request: &JsonRpcRequest) -> Option<JsonRpcOutput> {
        info!(method = %request.method, id = ?request.id, "received message");

        if request.is_notification() {
            debug!(method = %request.method, params = ?request.params, "notification");
            return None;
        }

        let Some(handler) = self.registry.get(&request.method) else {
            info!(method = %request.method, "unknown method called");
            return self.fail_unknown(request);
        };

        match handler.handle(request, &mut self.state) {
            Ok(Reply::Result(result)) => {
                let id = request.id.clone()?;
                debug!(method = %request.method, %result, "sending response");
                Some(JsonRpcOutput::Success(JsonRpcResponse::success(id, result)))
            }
            Ok(Reply::Silent) => None,
            Err(e) => {
                error!(method = %request.method, id = ?request.id, error = %e, "handler failed");
                self.fail(request.id.clone(), &e)
            }
        }
    }

    /// Consumes the inbound queue until it closes, pushing replies to the
    /// outbound queue. Blocks the calling thread.
    ///
    /// Returns the hub state so the caller can close the backend.
    pub fn run(
        mut self,
        mut inbound: mpsc::Receiver<Inbound>,
        outbound: mpsc::Sender<Outbound>,
    ) -> HubState {
        info!(policy = %self.policy, "dispatcher started");
        while let Some(Inbound { session, request }) = inbound.blocking_recv() {
            let Some(output) = self.dispatch(&request) else {
                continue;
            };
            if outbound.blocking_send(Outbound { session, output }).is_err() {
                warn!("outbound queue closed, stopping dispatcher");
                break;
            }
        }
        info!(notes = self.state.notes.len(), "dispatcher stopped");
        self.state
    }

    fn fail_unknown(&self, request: &JsonRpcRequest) -> Option<JsonRpcOutput> {
        match (self.policy, request.id.clone()) {
            (FailurePolicy::Reply, Some(id)) => Some(JsonRpcOutput::Error(
                JsonRpcErrorResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("method not found: {}", request.method),
                ),
            )),
            _ => None,
        }
    }

    fn fail(&self, id: Option<RequestId>, err: &MemoError) -> Option<JsonRpcOutput> {
        match (self.policy, id) {
            (FailurePolicy::Reply, Some(id)) => Some(JsonRpcOutput::Error(error_response(id, err))),
            _ => None,
        }
    }
}

/// Builds the error object for a failed handler.
fn error_response(id: RequestId, err: &MemoError) -> JsonRpcErrorResponse {
    let code = if err.kind.is_caller_fault() {
        error_codes::INVALID_PARAMS
    } else {
        error_codes::INTERNAL_ERROR
    };
    let response = JsonRpcErrorResponse::error(id, code, err.message.clone());
    match &err.hint {
        Some(hint) => response.with_data(json!({ "hint": hint })),
        None => response,
    }
}
