//! Queue-driven dispatcher tests with a fake backend.

use std::thread;
use std::time::Duration;

use serde_json::json;

use sqlmemo_mcp::{queue, Dispatcher, Inbound, JsonRpcOutput, MethodRegistry, Outbound, Reply};
use sqlmemo_protocol::{JsonRpcRequest, RequestId, RequestParams};
use sqlmemo_types::{MemoError, SessionId, ToolBackend, ToolName};

/// Sleeps longer for statements that mention `slow`.
struct SlowBackend;

impl ToolBackend for SlowBackend {
    fn call(&mut self, _tool: ToolName, argument: &str) -> Result<String, MemoError> {
        if argument.contains("slow") {
            thread::sleep(Duration::from_millis(100));
        }
        Ok(argument.to_string())
    }

    fn close(self: Box<Self>) -> Result<(), MemoError> {
        Ok(())
    }
}

fn read(id: i64, query: &str) -> Inbound {
    let params = RequestParams {
        name: "read-query".into(),
        arguments: json!({ "query": query })
            .as_object()
            .cloned()
            .unwrap_or_default(),
        ..RequestParams::default()
    };
    Inbound::new(JsonRpcRequest::new(
        RequestId::Number(id),
        "tools/call",
        params,
    ))
}

#[test]
fn replies_leave_in_arrival_order() {
    let (in_tx, in_rx) = queue(8);
    let (out_tx, mut out_rx) = queue::<Outbound>(8);
    let dispatcher = Dispatcher::new(Box::new(SlowBackend));
    let worker = thread::spawn(move || dispatcher.run(in_rx, out_tx));

    in_tx.blocking_send(read(1, "SELECT 'slow'")).expect("send 1");
    in_tx.blocking_send(read(2, "SELECT 'fast'")).expect("send 2");
    drop(in_tx);

    let first = out_rx.blocking_recv().expect("first");
    let second = out_rx.blocking_recv().expect("second");
    assert_eq!(first.output.id(), &RequestId::Number(1));
    assert_eq!(second.output.id(), &RequestId::Number(2));
    assert!(out_rx.blocking_recv().is_none());
    worker.join().expect("join");
}

#[test]
fn session_travels_with_reply() {
    let (in_tx, in_rx) = queue(4);
    let (out_tx, mut out_rx) = queue::<Outbound>(4);
    let dispatcher = Dispatcher::new(Box::new(SlowBackend));
    let worker = thread::spawn(move || dispatcher.run(in_rx, out_tx));

    let session = SessionId::new();
    let ping = JsonRpcRequest::new(RequestId::Number(1), "ping", RequestParams::default());
    in_tx
        .blocking_send(Inbound::for_session(session, ping))
        .expect("send");
    drop(in_tx);

    let reply = out_rx.blocking_recv().expect("reply");
    assert_eq!(reply.session, Some(session));
    worker.join().expect("join");
}

#[test]
fn run_returns_state_with_notes() {
    let (in_tx, in_rx) = queue(4);
    let (out_tx, mut out_rx) = queue::<Outbound>(4);
    let dispatcher = Dispatcher::new(Box::new(SlowBackend));
    let worker = thread::spawn(move || dispatcher.run(in_rx, out_tx));

    let params = RequestParams {
        name: "append-insight".into(),
        arguments: json!({"insight": "kept"})
            .as_object()
            .cloned()
            .unwrap_or_default(),
        ..RequestParams::default()
    };
    in_tx
        .blocking_send(Inbound::new(JsonRpcRequest::new(
            RequestId::Number(1),
            "tools/call",
            params,
        )))
        .expect("send");
    drop(in_tx);

    assert!(out_rx.blocking_recv().is_some());
    let state = worker.join().expect("join");
    assert_eq!(state.notes.joined(), "kept");
    state.into_backend().close().expect("close");
}

#[test]
fn custom_handler_is_routed() {
    let mut registry = MethodRegistry::new();
    registry.register("echo/name", |req: &JsonRpcRequest, _: &mut sqlmemo_mcp::HubState| {
        Ok(Reply::Result(json!(req.params.name)))
    });
    let mut dispatcher = Dispatcher::with_registry(registry, Box::new(SlowBackend));

    let params = RequestParams {
        name: "hello".into(),
        ..RequestParams::default()
    };
    let out = dispatcher.dispatch(&JsonRpcRequest::new(RequestId::Number(1), "echo/name", params));
    match out {
        Some(JsonRpcOutput::Success(resp)) => assert_eq!(resp.result, json!("hello")),
        other => panic!("expected success, got {other:?}"),
    }
    assert!(dispatcher
        .dispatch(&JsonRpcRequest::new(RequestId::Number(2), "ping", RequestParams::default()))
        .is_none());
}
