#![allow(clippy::unwrap_used)]
// Integration tests for `CommandDispatcher` against a wiremock backend.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use acu_api::AcuClient;
use acu_core::{
    AntennaAction, Command, CommandDefaults, CommandDispatcher, CommandResult, ConnectionStatus,
    ConsoleState, CoreError, LocationForm, ManualPositionForm, MetricKey, MetricsTable,
    SatelliteForm, SpeedForm,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CommandDispatcher) {
    let server = MockServer::start().await;
    let client = AcuClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());
    let dispatcher = CommandDispatcher::new(
        client,
        Arc::new(ConsoleState::new()),
        CommandDefaults::default(),
    );
    (server, dispatcher)
}

fn log_lines(dispatcher: &CommandDispatcher) -> Vec<String> {
    dispatcher
        .state()
        .log()
        .entries()
        .iter()
        .map(|e| e.line.clone())
        .collect()
}

fn exchange(frame: &str, response: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "frame": frame, "response": response }))
}

/// Fails the test if any request reaches the backend.
async fn forbid_requests(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

// ── Generic send ────────────────────────────────────────────────────

#[tokio::test]
async fn test_stop_sends_one_request_and_logs_tx_rx() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/send"))
        .and(body_json(json!({
            "frame_type": "cmd",
            "frame_code": "stop",
            "data": [],
            "retries": 3,
            "timeout": 0.5
        })))
        .respond_with(exchange("$cmd,stop,*1c", "OK"))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher.dispatch(Command::stop()).await.unwrap();

    assert!(matches!(result, CommandResult::Exchange(ref ex) if ex.response == "OK"));
    assert_eq!(dispatcher.state().metrics().snapshot(), MetricsTable::new());
    assert_eq!(log_lines(&dispatcher), vec!["[TX] $cmd,stop,*1c", "[RX] OK"]);
}

#[tokio::test]
async fn test_send_merges_parsed_snapshot() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "frame": "$cmd,get show,*3f",
            "response": "$show,12.5,30.0,*41",
            "parsed": {
                "frame_code": "show",
                "preset_azimuth": "12.5",
                "preset_pitch": "30.0",
                "gps_status": "",
                "raw": "$show,12.5,30.0,*41"
            }
        })))
        .mount(&server)
        .await;

    dispatcher.dispatch(Command::send("get show")).await.unwrap();

    let table = dispatcher.state().metrics().snapshot();
    assert_eq!(table.get(MetricKey::PresetAzimuth).as_str(), Some("12.5"));
    assert_eq!(table.get(MetricKey::PresetPitch).as_str(), Some("30.0"));
    assert!(!table.get(MetricKey::GpsStatus).is_known());
}

#[tokio::test]
async fn test_custom_send_forwards_retries_timeout_and_data() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/send"))
        .and(body_json(json!({
            "frame_type": "cmd",
            "frame_code": "set beacon",
            "data": ["10750", "2.0"],
            "retries": 5,
            "timeout": 1.5
        })))
        .respond_with(exchange("$cmd,set beacon,10750,2.0,*5b", "$beacon,ok,*00"))
        .expect(1)
        .mount(&server)
        .await;

    dispatcher
        .dispatch(Command::custom("set beacon", "10750, 2.0,", Some(5), Some(1.5)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_custom_code_never_reaches_backend() {
    let (server, dispatcher) = setup().await;
    forbid_requests(&server).await;

    let err = dispatcher
        .dispatch(Command::custom("   ", "1,2", None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert_eq!(log_lines(&dispatcher), vec!["Custom frame_code empty."]);
}

#[tokio::test]
async fn test_backend_timeout_is_logged_once() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(
            ResponseTemplate::new(504).set_body_json(json!({ "detail": "No response after retries" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = dispatcher.dispatch(Command::send("get show")).await.unwrap_err();

    assert!(matches!(err, CoreError::Timeout { .. }));
    assert_eq!(
        log_lines(&dispatcher),
        vec!["ERROR send: No response after retries"]
    );
}

// ── Link ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_serial_sets_status() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/connect_serial"))
        .and(body_json(json!({ "port": "COM7", "baudrate": 38400, "timeout": 0.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "connected": true, "mode": "serial", "port": "COM7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    dispatcher
        .dispatch(Command::ConnectSerial { port: "COM7".into() })
        .await
        .unwrap();

    assert_eq!(
        dispatcher.state().status().current(),
        ConnectionStatus {
            connected: true,
            mode: "serial".into()
        }
    );
    assert_eq!(log_lines(&dispatcher), vec!["Serial connected: COM7"]);
}

#[tokio::test]
async fn test_connect_tcp_failure_resets_status() {
    let (server, dispatcher) = setup().await;
    dispatcher.state().status().set_connected("serial");

    Mock::given(method("POST"))
        .and(path("/api/connect_tcp"))
        .and(body_json(json!({ "host": "192.168.1.50", "port": 4001, "timeout": 2.0 })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "timed out" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = dispatcher
        .dispatch(Command::ConnectTcp {
            target: "192.168.1.50:4001".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Rejected { status: 400, .. }));
    assert_eq!(dispatcher.state().status().current(), ConnectionStatus::default());
    assert_eq!(log_lines(&dispatcher), vec!["ERROR connect tcp: timed out"]);
}

#[tokio::test]
async fn test_connect_tcp_defaults_mode() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/connect_tcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    dispatcher
        .dispatch(Command::ConnectTcp {
            target: "10.0.0.9:5000".into(),
        })
        .await
        .unwrap();

    assert_eq!(dispatcher.state().status().current().mode, "tcp");
    assert_eq!(log_lines(&dispatcher), vec!["TCP connected: 10.0.0.9:5000"]);
}

#[tokio::test]
async fn test_link_validation_is_local() {
    let (server, dispatcher) = setup().await;
    forbid_requests(&server).await;

    dispatcher
        .dispatch(Command::ConnectSerial { port: String::new() })
        .await
        .unwrap_err();
    dispatcher
        .dispatch(Command::ConnectTcp {
            target: "192.168.1.50".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        log_lines(&dispatcher),
        vec!["Pick a serial port first.", "TCP target must be like ip:port"]
    );
    assert_eq!(dispatcher.state().status().current(), ConnectionStatus::default());
}

#[tokio::test]
async fn test_disconnect() {
    let (server, dispatcher) = setup().await;
    dispatcher.state().status().set_connected("tcp");

    Mock::given(method("POST"))
        .and(path("/api/disconnect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "connected": false, "mode": "tcp"
        })))
        .expect(1)
        .mount(&server)
        .await;

    dispatcher.dispatch(Command::Disconnect).await.unwrap();

    assert_eq!(dispatcher.state().status().current(), ConnectionStatus::default());
    assert_eq!(log_lines(&dispatcher), vec!["Disconnected."]);
}

#[tokio::test]
async fn test_list_ports() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ports": [{ "device": "COM7", "description": "USB Serial Port" }]
        })))
        .mount(&server)
        .await;

    match dispatcher.dispatch(Command::ListPorts).await.unwrap() {
        CommandResult::Ports(ports) => assert_eq!(ports[0].device, "COM7"),
        other => panic!("expected ports, got {other:?}"),
    }
    assert_eq!(log_lines(&dispatcher), vec!["Ports refreshed."]);
}

// ── Antenna configuration ───────────────────────────────────────────

#[tokio::test]
async fn test_location_heading_blank_vs_set() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/location/set"))
        .and(body_json(json!({ "longitude": 106.8, "latitude": -6.2 })))
        .respond_with(exchange("$cmd,place,106.8,-6.2,*10", "$place,ok,*00"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/location/set"))
        .and(body_json(json!({ "longitude": 106.8, "latitude": -6.2, "heading": 45.0 })))
        .respond_with(exchange("$cmd,place,106.8,-6.2,45,*3c", "$place,ok,*00"))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = LocationForm {
        longitude: "106.8".into(),
        latitude: "-6.2".into(),
        heading: String::new(),
    };
    dispatcher
        .dispatch(Command::SetLocation(form.clone()))
        .await
        .unwrap();

    form.heading = "45".into();
    dispatcher.dispatch(Command::SetLocation(form)).await.unwrap();

    assert_eq!(
        log_lines(&dispatcher),
        vec![
            "[TX][PLACE SET] $cmd,place,106.8,-6.2,*10",
            "[RX][PLACE SET] $place,ok,*00",
            "[TX][PLACE SET] $cmd,place,106.8,-6.2,45,*3c",
            "[RX][PLACE SET] $place,ok,*00",
        ]
    );
}

#[tokio::test]
async fn test_manual_position_blank_is_null_zero_is_zero() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/manual/dirx"))
        .and(body_json(json!({
            "sport_type": "a",
            "az_target": 0.0,
            "az_speed": null,
            "pitch_target": null,
            "pitch_speed": null,
            "pol_target": null,
            "pol_speed": null
        })))
        .respond_with(exchange("$cmd,dirx,a,0,,,,,,*12", "$dirx,ok,*00"))
        .expect(1)
        .mount(&server)
        .await;

    dispatcher
        .dispatch(Command::ManualPosition(ManualPositionForm {
            sport_type: "a".into(),
            az_target: "0".into(),
            ..Default::default()
        }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_satellite_pol_mode_is_clamped() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/satellite/set"))
        .respond_with(exchange("$cmd,sat,*00", "$sat,ok,*00"))
        .expect(5)
        .mount(&server)
        .await;

    for pol in ["-5", "0", "0.3", "1", "99"] {
        dispatcher
            .dispatch(Command::SetSatellite(SatelliteForm {
                name: "ASIASAT 7".into(),
                center_freq: "12500".into(),
                pol_mode: pol.into(),
                ..Default::default()
            }))
            .await
            .unwrap();
    }

    let sent: Vec<Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.body_json::<Value>().unwrap())
        .collect();
    let pol_modes: Vec<&Value> = sent.iter().map(|b| &b["pol_mode"]).collect();
    assert_eq!(
        pol_modes,
        vec![&json!(0), &json!(0), &json!(1), &json!(1), &json!(1)]
    );
    assert_eq!(sent[0]["lock_threshold"], json!(5.0));
    assert_eq!(sent[0]["carrier_rate"], json!(0.0));
}

#[tokio::test]
async fn test_blank_speed_is_rejected_locally() {
    let (server, dispatcher) = setup().await;
    forbid_requests(&server).await;

    let err = dispatcher
        .dispatch(Command::ManualSpeed(SpeedForm {
            direction_code: "left".into(),
            speed: "  ".into(),
        }))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Speed value required.");
    assert_eq!(log_lines(&dispatcher), vec!["Speed value required."]);
}

#[tokio::test]
async fn test_antenna_actions_log_their_labels() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/antenna/collection"))
        .respond_with(exchange("$cmd,stow,*1f", "$stow,ok,*00"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/antenna/reset"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Serial not connected" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    dispatcher
        .dispatch(Command::Antenna(AntennaAction::Collection))
        .await
        .unwrap();
    dispatcher
        .dispatch(Command::Antenna(AntennaAction::Reset))
        .await
        .unwrap_err();

    assert_eq!(
        log_lines(&dispatcher),
        vec![
            "[TX][STOW] $cmd,stow,*1f",
            "[RX][STOW] $stow,ok,*00",
            "ERROR reset: Serial not connected",
        ]
    );
}

#[tokio::test]
async fn test_local_oscillator_readback_logs_both() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/lo/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beacon": { "frame": "$cmd,get beacon,*2c", "response": "$beacon,10750,2.00,*11" },
            "dvb": { "frame": "$cmd,get dvb,*0a", "response": "$dvb,9750,1.50,*22" }
        })))
        .mount(&server)
        .await;

    dispatcher.dispatch(Command::GetLocalOscillator).await.unwrap();

    assert_eq!(
        log_lines(&dispatcher),
        vec![
            "[TX][LO GET BEACON] $cmd,get beacon,*2c",
            "[RX][LO GET BEACON] $beacon,10750,2.00,*11",
            "[TX][LO GET DVB] $cmd,get dvb,*0a",
            "[RX][LO GET DVB] $dvb,9750,1.50,*22",
        ]
    );
}
