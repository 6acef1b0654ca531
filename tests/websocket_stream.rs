//! End-to-end check of the snapshot stream: a dashboard connecting to `/ws`
//! receives the current store, then one snapshot per ingested event.

use eventdeck::api::{serve_on, AppState};
use eventdeck::config::Config;
use eventdeck::events::Snapshot;
use futures_util::StreamExt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};

async fn start_server(retention: usize) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let mut config = Config::default();
    config.events.retention = retention;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        serve_on(listener, AppState::new(&config)).await.unwrap();
    });

    (addr, handle)
}

async fn next_snapshot<S>(stream: &mut S) -> Snapshot
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let message = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for a snapshot")
        .expect("stream ended")
        .expect("websocket error");

    match message {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

fn event_body(rule: &str, notices: i64) -> serde_json::Value {
    serde_json::json!({
        "uuid": "router-1",
        "event": {
            "output": format!("{} fired", rule),
            "priority": "Notice",
            "rule": rule,
            "time": "2021-03-01T10:00:00Z"
        },
        "stats": {"notice": notices},
        "outputs": ["webui"]
    })
}

#[tokio::test]
async fn test_dashboard_receives_initial_and_live_snapshots() {
    let (addr, server) = start_server(2).await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("http://{}/", addr))
        .json(&event_body("first", 1))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let (mut socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    let initial = next_snapshot(&mut socket).await;
    assert_eq!(initial.events.len(), 1);
    assert_eq!(initial.events[0].rule, "first");
    assert_eq!(initial.retention, 2);

    for (i, rule) in ["second", "third"].iter().enumerate() {
        http.post(format!("http://{}/", addr))
            .json(&event_body(rule, 2 + i as i64))
            .send()
            .await
            .unwrap();
    }

    let after_second = next_snapshot(&mut socket).await;
    assert_eq!(after_second.events.len(), 2);

    let after_third = next_snapshot(&mut socket).await;
    let rules: Vec<_> = after_third.events.iter().map(|e| e.rule.as_str()).collect();
    assert_eq!(rules, vec!["second", "third"]);
    assert_eq!(after_third.stats["notice"], 3);
    assert_eq!(after_third.stats["total"], 3);

    server.abort();
}

#[tokio::test]
async fn test_every_dashboard_receives_each_snapshot() {
    let (addr, server) = start_server(10).await;

    let (mut first, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let (mut second, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    // Initial, empty snapshots
    assert!(next_snapshot(&mut first).await.events.is_empty());
    assert!(next_snapshot(&mut second).await.events.is_empty());

    reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .json(&event_body("shared", 1))
        .send()
        .await
        .unwrap();

    assert_eq!(next_snapshot(&mut first).await.events[0].rule, "shared");
    assert_eq!(next_snapshot(&mut second).await.events[0].rule, "shared");

    server.abort();
}
