//! `Transport` implementation over a reader/writer pair.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, Stdin, Stdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sqlmemo_mcp::{queue, Inbound, Outbound, Transport};
use sqlmemo_protocol::JsonRpcRequest;
use sqlmemo_types::MemoError;

use crate::error::StdioTransportError;
use crate::framing::{LineReader, LineWriter};

type TaskHandle = JoinHandle<Result<(), StdioTransportError>>;

/// Local-pipe transport.
///
/// A reader task parses lines into the inbound queue; a writer task drains
/// the outbound queue into the output. Generic over reader/writer for
/// testability.
pub struct StdioTransport<R, W> {
    io: Option<(R, W)>,
    inbound_tx: Option<mpsc::Sender<Inbound>>,
    inbound_rx: Option<mpsc::Receiver<Inbound>>,
    outbound_tx: Option<mpsc::Sender<Outbound>>,
    outbound_rx: Option<mpsc::Receiver<Outbound>>,
    tasks: Vec<TaskHandle>,
}

impl StdioTransport<Stdin, Stdout> {
    /// Binds to the process's standard input and output.
    pub fn stdio(capacity: usize) -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout(), capacity)
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Creates a transport with queues of the given capacity.
    pub fn new(reader: R, writer: W, capacity: usize) -> Self {
        let (inbound_tx, inbound_rx) = queue(capacity);
        let (outbound_tx, outbound_rx) = queue(capacity);
        Self {
            io: Some((reader, writer)),
            inbound_tx: Some(inbound_tx),
            inbound_rx: Some(inbound_rx),
            outbound_tx: Some(outbound_tx),
            outbound_rx: Some(outbound_rx),
            tasks: Vec::new(),
        }
    }
}

#[async_trait]
impl<R, W> Transport for StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn start(&mut self, shutdown: CancellationToken) -> Result<(), MemoError> {
        let (reader, writer) = self.io.take().ok_or(StdioTransportError::AlreadyStarted)?;
        let inbound = self
            .inbound_tx
            .take()
            .ok_or(StdioTransportError::AlreadyStarted)?;
        let outbound = self
            .outbound_rx
            .take()
            .ok_or(StdioTransportError::AlreadyStarted)?;

        info!("stdio transport starting");
        self.tasks.push(tokio::spawn(read_loop(
            LineReader::new(reader),
            inbound,
            shutdown,
        )));
        self.tasks
            .push(tokio::spawn(write_loop(LineWriter::new(writer), outbound)));
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
                Err(e) => Err(StdioTransportError::Join(e.to_string())),
            };
            if let Err(e) = outcome {
                warn!(error = %e, "stdio task failed");
                first_error.get_or_insert(e);
            }
        }
        info!("stdio transport stopped");
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }
}

/// Parses lines into the inbound queue until EOF, shutdown, or the
/// dispatcher goes away. Dropping `inbound` on exit closes the queue.
async fn read_loop<R: AsyncRead + Unpin>(
    mut reader: LineReader<R>,
    inbound: mpsc::Sender<Inbound>,
    shutdown: CancellationToken,
) -> Result<(), StdioTransportError> {
    let cancelled = shutdown.cancelled_owned();
    tokio::pin!(cancelled);

    loop {
        let line = tokio::select! {
            _ = &mut cancelled => {
                info!("shutdown requested, no longer reading input");
                return Ok(());
            }
            line = reader.read_line() => line?,
        };

        let line = match line {
            Some(line) if line.is_empty() => continue,
            Some(line) => line,
            None => {
                info!("input closed");
                return Ok(());
            }
        };

        let request = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "failed to parse JSON-RPC message");
                continue;
            }
        };

        debug!(method = %request.method, id = ?request.id, "queued request");
        if inbound.send(Inbound::new(request)).await.is_err() {
            info!("inbound queue closed");
            return Ok(());
        }
    }
}

/// Writes every outbound reply until the queue closes.
async fn write_loop<W: AsyncWrite + Unpin>(
    mut writer: LineWriter<W>,
    mut outbound: mpsc::Receiver<Outbound>,
) -> Result<(), StdioTransportError> {
    while let Some(Outbound { output, .. }) = outbound.recv().await {
        let json = output
            .to_json()
            .map_err(|e| StdioTransportError::Encode(e.to_string()))?;
        writer.write_line(&json).await?;
    }
    debug!("outbound queue drained");
    Ok(())
}
