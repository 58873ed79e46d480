//! # sqlmemo-transport-stdio
//!
//! Local-pipe transport: one JSON-RPC message per line over any
//! `AsyncRead`/`AsyncWrite` pair, normally the process's stdin and stdout.

pub mod error;
pub mod framing;
pub mod transport;

pub use error::StdioTransportError;
pub use framing::{LineReader, LineWriter};
pub use transport::StdioTransport;
