//! Transport contract and the queue envelopes that cross it.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use sqlmemo_protocol::JsonRpcRequest;
use sqlmemo_types::{MemoError, SessionId};

use crate::handler::JsonRpcOutput;

/// A request taken off the wire, tagged with the push-stream session that
/// submitted it (none for the local pipe).
#[derive(Debug, Clone)]
pub struct Inbound {
    /// Originating session.
    pub session: Option<SessionId>,
    /// The parsed request.
    pub request: JsonRpcRequest,
}

impl Inbound {
    /// A request with no session.
    pub fn new(request: JsonRpcRequest) -> Self {
        Self {
            session: None,
            request,
        }
    }

    /// A request submitted on a push-stream session.
    pub fn for_session(session: SessionId, request: JsonRpcRequest) -> Self {
        Self {
            session: Some(session),
            request,
        }
    }
}

/// A reply addressed to the session of the request it answers.
#[derive(Debug, Clone)]
pub struct Outbound {
    /// Destination session.
    pub session: Option<SessionId>,
    /// The reply.
    pub output: JsonRpcOutput,
}

/// Creates a bounded FIFO queue. A zero capacity is raised to one.
pub fn queue<T>(capacity: usize) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(capacity.max(1))
}

/// Turns a connection into an inbound and an outbound queue.
///
/// Each queue end is handed out once; the transport keeps no copy, so
/// closing either side propagates to the other.
#[async_trait]
pub trait Transport: Send {
    /// Starts the background I/O and returns immediately. Cancelling
    /// `shutdown` stops accepting input.
    async fn start(&mut self, shutdown: CancellationToken) -> Result<(), MemoError>;

    /// Takes the receiving end of the inbound queue.
    fn receive_queue(&mut self) -> Option<mpsc::Receiver<Inbound>>;

    /// Takes the sending end of the outbound queue.
    fn send_queue(&mut self) -> Option<mpsc::Sender<Outbound>>;

    /// Waits until all background work has stopped.
    async fn wait_for_shutdown(&mut self) -> Result<(), MemoError>;
}
