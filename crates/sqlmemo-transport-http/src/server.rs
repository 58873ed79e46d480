//! HTTP server that binds the push-transport router to a TCP socket.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sqlmemo_mcp::{queue, Inbound, Outbound, Transport};
use sqlmemo_types::MemoError;

use crate::error::HttpTransportError;
use crate::router::{build_router, AppState, InboundGate};
use crate::sessions::SessionRegistry;

type TaskHandle = JoinHandle<Result<(), HttpTransportError>>;

/// HTTP push transport.
///
/// A serve task runs the axum router; a routing task drains the shared
/// outbound queue into per-session mailboxes.
pub struct HttpTransport {
    addr: String,
    capacity: usize,
    grace: Duration,
    sessions: SessionRegistry,
    local_addr: Option<SocketAddr>,
    inbound_tx: Option<mpsc::Sender<Inbound>>,
    inbound_rx: Option<mpsc::Receiver<Inbound>>,
    outbound_tx: Option<mpsc::Sender<Outbound>>,
    outbound_rx: Option<mpsc::Receiver<Outbound>>,
    tasks: Vec<TaskHandle>,
}

impl HttpTransport {
    /// Creates a transport that will listen on `host:port`.
    ///
    /// `capacity` bounds the inbound and outbound queues and every session
    /// mailbox; `grace` bounds the shutdown drain.
    pub fn new(host: &str, port: u16, capacity: usize, grace: Duration) -> Self {
        let (inbound_tx, inbound_rx) = queue(capacity);
        let (outbound_tx, outbound_rx) = queue(capacity);
        Self {
            addr: format!("{host}:{port}"),
            capacity,
            grace,
            sessions: SessionRegistry::new(),
            local_addr: None,
            inbound_tx: Some(inbound_tx),
            inbound_rx: Some(inbound_rx),
            outbound_tx: Some(outbound_tx),
            outbound_rx: Some(outbound_rx),
            tasks: Vec::new(),
        }
    }

    /// The bound address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Open push-stream sessions.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start(&mut self, shutdown: CancellationToken) -> Result<(), MemoError> {
        let inbound = self
            .inbound_tx
            .take()
            .ok_or(HttpTransportError::AlreadyStarted)?;
        let outbound = self
            .outbound_rx
            .take()
            .ok_or(HttpTransportError::AlreadyStarted)?;

        let listener =
            TcpListener::bind(&self.addr)
                .await
                .map_err(|e| HttpTransportError::Bind {
                    addr: self.addr.clone(),
                    source: e,
                })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| HttpTransportError::Serve(e.to_string()))?;
        self.local_addr = Some(local_addr);
        info!(addr = %local_addr, "push transport ready");

        let gate = InboundGate::new(inbound);
        let state = AppState {
            inbound: gate.clone(),
            sessions: self.sessions.clone(),
            shutdown: shutdown.child_token(),
            mailbox_capacity: self.capacity,
        };
        self.tasks.push(tokio::spawn(serve(
            listener,
            state,
            gate,
            shutdown,
            self.grace,
        )));
        self.tasks
            .push(tokio::spawn(route_outbound(outbound, self.sessions.clone())));
        Ok(())
    }

    fn receive_queue(&mut self) -> Option<mpsc::Receiver<Inbound>> {
        self.inbound_rx.take()
    }

    fn send_queue(&mut self) -> Option<mpsc::Sender<Outbound>> {
        self.outbound_tx.take()
    }

    async fn wait_for_shutdown(&mut self) -> Result<(), MemoError> {
        let mut first_error = None;
        for task in self.tasks.drain(..) {
            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => Err(HttpTransportError::Join(e.to_string())),
            };
            if let Err(e) = outcome {
                warn!(error = %e, "http task failed");
                first_error.get_or_insert(e);
            }
        }
        info!("push transport stopped");
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }
}

/// Serves until shutdown, then drains connections for at most `grace`.
/// Closes the inbound gate on the way out.
async fn serve(
    listener: TcpListener,
    state: AppState,
    gate: InboundGate,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<(), HttpTransportError> {
    let server = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    let result = tokio::select! {
        res = &mut server => res.map_err(|e| HttpTransportError::Serve(e.to_string())),
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_secs = grace.as_secs(), "grace period elapsed, abandoning open connections");
            Ok(())
        }
    };
    gate.close();
    info!("http listener stopped");
    result
}

/// Delivers each reply to the mailbox of the session that asked for it.
///
/// Never waits on a mailbox: a full one loses the reply so that a stalled
/// stream cannot hold up the others.
async fn route_outbound(
    mut outbound: mpsc::Receiver<Outbound>,
    sessions: SessionRegistry,
) -> Result<(), HttpTransportError> {
    while let Some(Outbound { session, output }) = outbound.recv().await {
        let Some(session) = session else {
            warn!(id = ?output.id(), "reply without session dropped");
            continue;
        };
        let Some(mailbox) = sessions.mailbox(&session) else {
            warn!(%session, id = ?output.id(), "session closed, reply dropped");
            continue;
        };
        match mailbox.try_send(output) {
            Ok(()) => {}
            Err(TrySendError::Full(output)) => {
                warn!(%session, id = ?output.id(), "push stream not reading, reply dropped");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(%session, "push stream closed, reply dropped");
            }
        }
    }
    info!("outbound routing stopped");
    Ok(())
}
