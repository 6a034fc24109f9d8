// Integration tests for registration lifecycle and setup validation.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use neopixel_lights_rs::{
    Command, DeviceClient, DeviceConfig, DeviceRegistry, SetupError, validate_device,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn info_body() -> serde_json::Value {
    json!({
        "device": {"id": "pico-a1b2c3", "name": "Desk strip", "ip": "127.0.0.1", "mac": "aa:bb:cc:dd:ee:ff"},
        "capabilities": {"num_leds": 60, "effects": ["static", "rainbow", "aurora"]},
    })
}

fn state_body() -> serde_json::Value {
    json!({
        "is_on": false,
        "brightness": 25,
        "color": {"r": 0, "g": 0, "b": 255},
        "effect": "static",
    })
}

async fn mock_device() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_body()))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> DeviceConfig {
    DeviceConfig {
        host: server.address().ip().to_string(),
        port: server.address().port(),
        name: "Desk strip".to_string(),
        device_id: "pico-a1b2c3".to_string(),
    }
}

// ── Registration lifecycle ──────────────────────────────────────────

#[tokio::test]
async fn test_register_get_remove() {
    let server = mock_device().await;
    let mut registry = DeviceRegistry::new();

    let id = registry.register(config_for(&server)).await.unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.ids(), vec![id]);
    assert_eq!(registry.config(&id).unwrap().device_id, "pico-a1b2c3");

    // The inline first refresh already populated the cache.
    let coordinator = registry.get(&id).unwrap();
    {
        let coordinator = coordinator.lock().await;
        assert!(coordinator.available());
        assert_eq!(coordinator.snapshot().unwrap().identity().id, "pico-a1b2c3");
    }

    assert!(registry.remove(&id));
    assert!(registry.is_empty());
    assert!(registry.get(&id).is_none());
    assert!(!registry.remove(&id));
}

#[tokio::test]
async fn test_unreachable_device_fails_registration() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut registry = DeviceRegistry::new();
    assert!(registry.register(config_for(&server)).await.is_err());
    // Setup failure leaves nothing behind; no unavailable ghost entry.
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_commands_flow_through_registered_coordinator() {
    let server = mock_device().await;
    Mock::given(method("POST"))
        .and(path("/control"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "state": {
                "is_on": true,
                "brightness": 25,
                "color": {"r": 0, "g": 0, "b": 255},
                "effect": "static",
            },
        })))
        .mount(&server)
        .await;

    let mut registry = DeviceRegistry::new();
    let id = registry.register(config_for(&server)).await.unwrap();

    let coordinator = registry.get(&id).unwrap();
    let mut coordinator = coordinator.lock().await;
    coordinator.send_command(&Command::on()).await.unwrap();
    assert!(coordinator.snapshot().unwrap().is_on());
}

// ── Setup validation ────────────────────────────────────────────────

#[tokio::test]
async fn test_validate_reports_identity_and_capabilities() {
    let server = mock_device().await;
    let client = DeviceClient::new(
        reqwest::Client::new(),
        server.address().ip().to_string(),
        server.address().port(),
    );

    let validated = validate_device(&client).await.unwrap();
    assert_eq!(validated.device_id, "pico-a1b2c3");
    assert_eq!(validated.name, "Desk strip");
    assert_eq!(validated.capabilities.num_leds, Some(60));
    // The device-reported effect list drives configuration choices.
    assert_eq!(
        validated.capabilities.effect_names(),
        vec!["static", "rainbow", "aurora"],
    );
}

#[tokio::test]
async fn test_validate_classifies_bad_status_as_cannot_connect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = DeviceClient::new(
        reqwest::Client::new(),
        server.address().ip().to_string(),
        server.address().port(),
    );
    let err = validate_device(&client).await.unwrap_err();
    assert!(matches!(err, SetupError::CannotConnect(_)));
}

#[tokio::test]
async fn test_validate_classifies_missing_identity_as_cannot_connect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"device": {"id": ""}})))
        .mount(&server)
        .await;

    let client = DeviceClient::new(
        reqwest::Client::new(),
        server.address().ip().to_string(),
        server.address().port(),
    );
    let err = validate_device(&client).await.unwrap_err();
    assert!(matches!(err, SetupError::CannotConnect(_)));
}

#[tokio::test]
async fn test_validate_classifies_garbage_body_as_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a device</html>"))
        .mount(&server)
        .await;

    let client = DeviceClient::new(
        reqwest::Client::new(),
        server.address().ip().to_string(),
        server.address().port(),
    );
    let err = validate_device(&client).await.unwrap_err();
    assert!(matches!(err, SetupError::Unknown(_)));
}
