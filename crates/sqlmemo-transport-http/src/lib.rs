//! HTTP push transport for sqlmemo.
//!
//! `GET /sse` opens a push stream bound to a fresh session; `POST /messages`
//! submits requests on that session. Replies are routed back to the stream
//! whose session submitted the request.

mod error;
pub mod router;
pub mod server;
pub mod sessions;

pub use error::HttpTransportError;
pub use router::{build_router, AppState, InboundGate};
pub use server::HttpTransport;
pub use sessions::{SessionGuard, SessionRegistry};
