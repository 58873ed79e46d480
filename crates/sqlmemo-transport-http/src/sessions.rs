//! Per-session reply mailboxes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use sqlmemo_mcp::JsonRpcOutput;
use sqlmemo_types::SessionId;

type Mailboxes = HashMap<SessionId, mpsc::Sender<JsonRpcOutput>>;

/// Maps each open push stream's session to the sender side of its mailbox.
///
/// Cheap to clone; all clones share one map. The lock is never held across
/// an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Mailboxes>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Mailboxes> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a fresh session and returns its id and mailbox.
    pub fn open(&self, capacity: usize) -> (SessionId, mpsc::Receiver<JsonRpcOutput>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let session = SessionId::new();
        self.lock().insert(session, tx);
        (session, rx)
    }

    /// Removes a session. Returns false if it was not registered.
    pub fn close(&self, session: &SessionId) -> bool {
        self.lock().remove(session).is_some()
    }

    /// Returns true while the session's stream is open.
    pub fn contains(&self, session: &SessionId) -> bool {
        self.lock().contains_key(session)
    }

    /// A sender into the session's mailbox.
    pub fn mailbox(&self, session: &SessionId) -> Option<mpsc::Sender<JsonRpcOutput>> {
        self.lock().get(session).cloned()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when no stream is open.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Unregisters its session when dropped.
#[derive(Debug)]
pub struct SessionGuard {
    registry: SessionRegistry,
    session: SessionId,
}

impl SessionGuard {
    /// Guards `session` in `registry`.
    pub fn new(registry: SessionRegistry, session: SessionId) -> Self {
        Self { registry, session }
    }

    /// The guarded session.
    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.registry.close(&self.session) {
            tracing::info!(session = %self.session, "push stream closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlmemo_protocol::{JsonRpcResponse, RequestId};

    #[tokio::test]
    async fn mailbox_delivers_to_its_session_only() {
        let registry = SessionRegistry::new();
        let (a, mut rx_a) = registry.open(4);
        let (b, mut rx_b) = registry.open(4);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        let reply = JsonRpcOutput::Success(JsonRpcResponse::success(RequestId::Number(1), json!({})));
        registry
            .mailbox(&a)
            .expect("mailbox a")
            .send(reply)
            .await
            .expect("send");

        assert_eq!(rx_a.recv().await.expect("a").id(), &RequestId::Number(1));
        assert!(rx_b.try_recv().is_err());
        assert!(registry.contains(&b));
    }

    #[test]
    fn guard_unregisters_on_drop() {
        let registry = SessionRegistry::new();
        let (session, _rx) = registry.open(1);
        let guard = SessionGuard::new(registry.clone(), session);
        assert_eq!(guard.session(), session);
        assert!(registry.contains(&session));

        drop(guard);
        assert!(!registry.contains(&session));
        assert!(registry.is_empty());
        assert!(registry.mailbox(&session).is_none());
    }

    #[test]
    fn close_unknown_session_is_false() {
        let registry = SessionRegistry::new();
        assert!(!registry.close(&SessionId::new()));
    }
}
