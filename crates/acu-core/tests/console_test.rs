#![allow(clippy::unwrap_used)]
// End-to-end tests for `Console`: command processor plus a live status
// channel served by a local WebSocket server.

use std::time::Duration;

use futures_util::SinkExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use acu_core::{
    ChannelKind, Command, ConnectionStatus, Console, ConsoleConfig, CoreError, MetricKey,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Accept WebSocket connections and forward every queued text frame to
/// the most recent one.
async fn spawn_ws_server() -> (Url, mpsc::UnboundedSender<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                continue;
            };
            while let Some(text) = rx.recv().await {
                if ws.send(Message::text(text)).await.is_err() {
                    break;
                }
            }
            break;
        }
    });

    (Url::parse(&format!("ws://{addr}")).unwrap(), tx)
}

fn status_only_config(api: &MockServer, ws_base: Url) -> ConsoleConfig {
    let mut config = ConsoleConfig::new(Url::parse(&api.uri()).unwrap(), ws_base);
    config.channels.disable_all();
    let status = config.channels.get_mut(ChannelKind::Status);
    status.enabled = true;
    status.reconnect_delay = Duration::from_millis(50);
    config
}

async fn wait_for_status(console: &Console, expected: ConnectionStatus) {
    let mut rx = console.watch_connection_status();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == expected))
        .await
        .expect("timed out waiting for connection status")
        .unwrap();
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stream_disconnect_overrides_explicit_connect() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect_serial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "connected": true, "mode": "serial", "port": "COM7"
        })))
        .mount(&api)
        .await;

    let (ws_base, frames) = spawn_ws_server().await;
    let console = Console::new(status_only_config(&api, ws_base)).unwrap();
    console.start().await.unwrap();

    console
        .execute(Command::ConnectSerial { port: "COM7".into() })
        .await
        .unwrap();
    assert_eq!(
        console.connection_status(),
        ConnectionStatus {
            connected: true,
            mode: "serial".into()
        }
    );

    frames
        .send(json!({ "connected": false, "note": "ACU not connected" }).to_string())
        .unwrap();
    wait_for_status(
        &console,
        ConnectionStatus {
            connected: false,
            mode: "-".into(),
        },
    )
    .await;

    console.shutdown().await;
}

#[tokio::test]
async fn test_stream_snapshot_reaches_metrics_and_log() {
    let api = MockServer::start().await;
    let (ws_base, frames) = spawn_ws_server().await;
    let console = Console::new(status_only_config(&api, ws_base)).unwrap();
    let mut metrics = console.watch_metrics();
    console.start().await.unwrap();

    frames.send("garbage".into()).unwrap();
    frames
        .send(
            json!({
                "connected": true,
                "mode": "serial",
                "parsed": { "current_azimuth": "181.2", "raw": "$show,181.2,*7a" }
            })
            .to_string(),
        )
        .unwrap();

    tokio::time::timeout(
        Duration::from_secs(5),
        metrics.wait_for(|t| t.get(MetricKey::CurrentAzimuth).is_known()),
    )
    .await
    .expect("timed out waiting for metrics")
    .unwrap();

    let lines: Vec<String> = console.log().entries().iter().map(|e| e.line.clone()).collect();
    assert_eq!(lines[0], "WS /ws/show connected.");
    assert!(lines[1].starts_with("WS show parse error: "));
    assert_eq!(lines[2], "[WS][SHOW] $show,181.2,*7a");

    let states = console.channel_states().await;
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].0, ChannelKind::Status);
    assert!(states[0].1.is_open);

    console.shutdown().await;
}

#[tokio::test]
async fn test_execute_requires_running_console() {
    let api = MockServer::start().await;
    let mut config = ConsoleConfig::new(
        Url::parse(&api.uri()).unwrap(),
        Url::parse("ws://127.0.0.1:9").unwrap(),
    );
    config.channels.disable_all();
    let console = Console::new(config).unwrap();

    let err = console.execute(Command::stop()).await.unwrap_err();
    assert!(matches!(err, CoreError::ConsoleStopped));

    console.start().await.unwrap();
    console.shutdown().await;

    let err = console.execute(Command::stop()).await.unwrap_err();
    assert!(matches!(err, CoreError::ConsoleStopped));
}

#[tokio::test]
async fn test_oneshot_runs_single_command() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mode": "tcp" })))
        .expect(1)
        .mount(&api)
        .await;

    let config = ConsoleConfig::new(
        Url::parse(&api.uri()).unwrap(),
        Url::parse("ws://127.0.0.1:9").unwrap(),
    );
    let mode = Console::oneshot(config, |console| async move {
        assert!(console.channel_states().await.is_empty());
        match console.execute(Command::Mode).await? {
            acu_core::CommandResult::Link(link) => Ok(link.mode),
            other => panic!("expected link status, got {other:?}"),
        }
    })
    .await
    .unwrap();

    assert_eq!(mode.as_deref(), Some("tcp"));
}

#[tokio::test]
async fn test_undecodable_reply_is_logged_and_console_keeps_running() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("{}天线状态", "x".repeat(199))),
        )
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mode": "serial" })))
        .mount(&api)
        .await;

    let mut config = ConsoleConfig::new(
        Url::parse(&api.uri()).unwrap(),
        Url::parse("ws://127.0.0.1:9").unwrap(),
    );
    config.channels.disable_all();
    let console = Console::new(config).unwrap();
    console.start().await.unwrap();

    let err = console.execute(Command::send("get show")).await.unwrap_err();
    assert!(matches!(err, CoreError::Internal(_)), "got {err:?}");

    // The processor survived and still serves commands.
    let result = console.execute(Command::Mode).await.unwrap();
    assert!(matches!(result, acu_core::CommandResult::Link(_)));

    let lines: Vec<String> = console.log().entries().iter().map(|e| e.line.clone()).collect();
    assert!(
        lines.iter().any(|l| l.starts_with("ERROR")),
        "expected an ERROR line, got {lines:?}"
    );

    console.shutdown().await;
}
