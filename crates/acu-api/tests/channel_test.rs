#![allow(clippy::unwrap_used)]
// Integration tests for `ChannelConnection` against a local WebSocket server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use acu_api::models::RawFeedMessage;
use acu_api::{ChannelConfig, ChannelConnection, ChannelEvent};

// ── Helpers ─────────────────────────────────────────────────────────

/// Serve every accepted socket one valid frame, one malformed frame, then
/// close it. Returns the URL and a counter of accepted handshakes.
async fn spawn_flaky_server() -> (Url, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                ws.send(Message::text(r#"{"connected": true, "raw": "$sat,ASIASAT,*1a"}"#))
                    .await
                    .unwrap();
                ws.send(Message::text("not json")).await.unwrap();
                let _ = ws.close(None).await;
            });
        }
    });

    let url = Url::parse(&format!("ws://{addr}/ws/sat")).unwrap();
    (url, accepted)
}

async fn next_event(
    events: &mut mpsc::UnboundedReceiver<ChannelEvent<RawFeedMessage>>,
) -> ChannelEvent<RawFeedMessage> {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for channel event")
        .expect("channel event queue closed")
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_arrive_in_order_and_channel_reconnects() {
    let (url, accepted) = spawn_flaky_server().await;
    let config = ChannelConfig::new("satellite", url, Duration::from_millis(50));
    let (channel, mut events) =
        ChannelConnection::start::<RawFeedMessage>(config, CancellationToken::new());

    // First connection.
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    match next_event(&mut events).await {
        ChannelEvent::Message(msg) => assert_eq!(msg.raw.as_deref(), Some("$sat,ASIASAT,*1a")),
        other => panic!("expected message, got {other:?}"),
    }
    assert!(matches!(next_event(&mut events).await, ChannelEvent::Malformed(_)));
    assert!(matches!(next_event(&mut events).await, ChannelEvent::Closed(_)));

    // A fresh socket after the fixed delay.
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    assert!(accepted.load(Ordering::SeqCst) >= 2);

    let state = channel.state();
    assert!(state.connections >= 2);
    assert!(state.connect_attempts >= 2);

    channel.join().await;
}

#[tokio::test]
async fn test_unreachable_backend_keeps_retrying() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}/ws/show")).unwrap();
    let config = ChannelConfig::new("status", url, Duration::from_millis(20));
    let (channel, mut events) =
        ChannelConnection::start::<RawFeedMessage>(config, CancellationToken::new());

    for _ in 0..3 {
        assert!(matches!(next_event(&mut events).await, ChannelEvent::Closed(_)));
    }

    let state = channel.state();
    assert!(!state.is_open);
    assert!(state.connect_attempts >= 3);
    assert_eq!(state.connections, 0);
    assert!(state.last_error.is_some());

    channel.join().await;
}

#[tokio::test]
async fn test_reconnect_waits_fixed_delay_between_attempts() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let delay = Duration::from_millis(150);
    let url = Url::parse(&format!("ws://{addr}/ws/show")).unwrap();
    let config = ChannelConfig::new("status", url, delay);
    let (channel, mut events) =
        ChannelConnection::start::<RawFeedMessage>(config, CancellationToken::new());

    let mut closed_at = Vec::new();
    while closed_at.len() < 5 {
        if let ChannelEvent::Closed(_) = next_event(&mut events).await {
            closed_at.push(Instant::now());
        }
    }

    // A refused connect returns at once, so each gap is the delay plus a
    // little scheduling noise. Backoff would double it by the last gap.
    let gaps: Vec<Duration> = closed_at.windows(2).map(|w| w[1] - w[0]).collect();
    for gap in &gaps {
        assert!(*gap >= delay, "gap {gap:?} shorter than delay, gaps: {gaps:?}");
        assert!(
            *gap < delay * 3,
            "gap {gap:?} grew past the fixed delay, gaps: {gaps:?}"
        );
    }

    channel.join().await;
}

#[tokio::test]
async fn test_cancel_stops_pending_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}/ws/lo")).unwrap();
    let config = ChannelConfig::new("lo", url, Duration::from_secs(3600));
    let cancel = CancellationToken::new();
    let (channel, mut events) = ChannelConnection::start::<RawFeedMessage>(config, cancel.clone());

    assert!(matches!(next_event(&mut events).await, ChannelEvent::Closed(_)));

    // The loop is parked in an hour-long delay; cancelling must end it now.
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), channel.join())
        .await
        .expect("channel task did not stop after cancel");

    assert!(events.recv().await.is_none());
}
