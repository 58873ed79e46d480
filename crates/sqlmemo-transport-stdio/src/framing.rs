//! Line-delimited JSON framing.
//!
//! Each JSON-RPC message is a single line terminated by `\n`.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::error::StdioTransportError;

/// Reads one trimmed line at a time.
pub struct LineReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Wraps a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Reads the next line, trimmed.
    ///
    /// Returns `None` on EOF. Blank lines come back as empty strings.
    pub async fn read_line(&mut self) -> Result<Option<String>, StdioTransportError> {
        let mut line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| StdioTransportError::Read(e.to_string()))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            trace!(len = trimmed.len(), "read message");
        }
        Ok(Some(trimmed.to_string()))
    }
}

/// Writes one line per message and flushes after each.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `message` followed by `\n`, then flushes.
    pub async fn write_line(&mut self, message: &str) -> Result<(), StdioTransportError> {
        trace!(len = message.len(), "writing message");

        self.writer
            .write_all(message.as_bytes())
            .await
            .map_err(|e| StdioTransportError::Write(e.to_string()))?;

        self.writer
            .write_all(b"\n")
            .await
            .map_err(|e| StdioTransportError::Write(e.to_string()))?;

        self.writer
            .flush()
            .await
            .map_err(|e| StdioTransportError::Write(e.to_string()))?;

        Ok(())
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
