//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::body::Body;
use axum::Router;
use futures_util::StreamExt;
use http::{Request, StatusCode};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use sqlmemo_mcp::{queue, Inbound};
use sqlmemo_transport_http::{build_router, AppState, InboundGate, SessionRegistry};

struct Harness {
    router: Router,
    sessions: SessionRegistry,
    gate: InboundGate,
    inbound: mpsc::Receiver<Inbound>,
    shutdown: CancellationToken,
}

fn harness() -> Harness {
    let (tx, rx) = queue(8);
    let shutdown = CancellationToken::new();
    let sessions = SessionRegistry::new();
    let gate = InboundGate::new(tx);
    let router = build_router(AppState {
        inbound: gate.clone(),
        sessions: sessions.clone(),
        shutdown: shutdown.child_token(),
        mailbox_capacity: 4,
    });
    Harness {
        router,
        sessions,
        gate,
        inbound: rx,
        shutdown,
    }
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("req")
}

const PING: &str = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;

#[tokio::test]
async fn post_without_session_is_bad_request() {
    let h = harness();
    let resp = h.router.oneshot(post("/messages", PING)).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_with_malformed_session_is_bad_request() {
    let h = harness();
    let resp = h
        .router
        .oneshot(post("/messages?session_id=not-a-uuid", PING))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_with_unknown_session_is_not_found() {
    let h = harness();
    let uri = "/messages?session_id=67e55044-10b1-426f-9247-bb680e5fe0c8";
    let resp = h.router.oneshot(post(uri, PING)).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_with_bad_body_is_bad_request() {
    let h = harness();
    let (session, _mailbox) = h.sessions.open(1);
    let uri = format!("/messages?session_id={session}");
    let resp = h.router.oneshot(post(&uri, "not json")).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_is_accepted_and_tagged_with_session() {
    let mut h = harness();
    let (session, _mailbox) = h.sessions.open(1);
    let uri = format!("/messages?session_id={session}");
    let resp = h.router.clone().oneshot(post(&uri, PING)).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body = axum::body::to_bytes(resp.into_body(), 1024)
        .await
        .expect("body");
    assert!(body.is_empty());

    let queued = h.inbound.recv().await.expect("queued");
    assert_eq!(queued.session, Some(session));
    assert_eq!(queued.request.method, "ping");
}

#[tokio::test]
async fn get_on_messages_is_method_not_allowed() {
    let h = harness();
    let req = Request::builder()
        .uri("/messages")
        .body(Body::empty())
        .expect("req");
    let resp = h.router.oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn post_after_gate_closed_is_unavailable() {
    let h = harness();
    let (session, _mailbox) = h.sessions.open(1);
    h.gate.close();
    let uri = format!("/messages?session_id={session}");
    let resp = h.router.oneshot(post(&uri, PING)).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn sse_announces_endpoint_and_unregisters_on_shutdown() {
    let h = harness();
    let req = Request::builder().uri("/sse").body(Body::empty()).expect("req");
    let resp = h.router.oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/event-stream");
    assert_eq!(resp.headers()["cache-control"], "no-cache");
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(h.sessions.len(), 1);

    let mut body = resp.into_body().into_data_stream();
    let first = body.next().await.expect("frame").expect("bytes");
    let text = String::from_utf8(first.to_vec()).expect("utf8");
    assert!(text.starts_with("event: endpoint\ndata: /messages?session_id="));

    h.shutdown.cancel();
    let rest = tokio::time::timeout(Duration::from_secs(2), async {
        while body.next().await.is_some() {}
    })
    .await;
    assert!(rest.is_ok(), "stream did not end on shutdown");
    drop(body);
    assert!(h.sessions.is_empty());
}
