// Integration tests for the discovery sweep against mock devices.
//
// The mock server listens on 0.0.0.0, so every host of the 127.0.0.0/30
// subnet (127.0.0.1 and 127.0.0.2) reaches the same listener. That makes a
// synthetic two-host sweep possible without real hardware.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use neopixel_lights_rs::{ScanConfig, Scanner};

// ── Helpers ─────────────────────────────────────────────────────────

async fn wildcard_server() -> MockServer {
    let listener = std::net::TcpListener::bind("0.0.0.0:0").expect("bind listener");
    MockServer::builder().listener(listener).start().await
}

fn scan_config(port: u16) -> ScanConfig {
    ScanConfig {
        port,
        probe_timeout: Duration::from_millis(500),
        max_parallel: 4,
        total_timeout: Duration::from_secs(10),
        subnets: Some(vec!["127.0.0.0/30".parse().unwrap()]),
    }
}

fn scanner_for(server: &MockServer) -> Scanner {
    Scanner::new(reqwest::Client::new()).with_config(scan_config(server.address().port()))
}

fn info_body(id: &str, name: &str) -> serde_json::Value {
    json!({
        "device": {"id": id, "name": name, "ip": "127.0.0.1", "mac": "aa:bb:cc:dd:ee:ff"},
        "capabilities": {"num_leds": 30},
    })
}

/// Reports a different device identity depending on which address was probed.
struct IdentityByHost;

impl Respond for IdentityByHost {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let host = request.url.host_str().unwrap_or("unknown").to_string();
        ResponseTemplate::new(200)
            .set_body_json(info_body(&format!("pico-{host}"), &format!("Strip {host}")))
    }
}

// ── Sweep results ───────────────────────────────────────────────────

#[tokio::test]
async fn test_single_responder_yields_single_keyed_entry() {
    // This server listens on 127.0.0.1 only, so of the two hosts in the /30
    // exactly one answers; the other probe is refused.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body("pico-solo", "Strip")))
        .mount(&server)
        .await;

    let devices = scanner_for(&server).run().await;

    assert_eq!(devices.len(), 1);
    let device = devices.get("pico-solo").unwrap();
    assert_eq!(device.host.to_string(), "127.0.0.1");
    assert_eq!(device.device_id, "pico-solo");
}

#[tokio::test]
async fn test_sweep_finds_one_device_per_identity() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(IdentityByHost)
        .mount(&server)
        .await;

    let devices = scanner_for(&server).run().await;

    // Both hosts of the /30 answered, each with its own identity.
    assert_eq!(devices.len(), 2);
    let one = devices.get("pico-127.0.0.1").unwrap();
    assert_eq!(one.host.to_string(), "127.0.0.1");
    assert_eq!(one.name, "Strip 127.0.0.1");
    assert_eq!(one.port, server.address().port());
    assert!(devices.contains_key("pico-127.0.0.2"));
}

#[tokio::test]
async fn test_same_identity_from_two_addresses_collapses() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body("pico-dup", "Strip")))
        .mount(&server)
        .await;

    let devices = scanner_for(&server).run().await;

    // Two addresses, one identity token: last write wins, one entry.
    assert_eq!(devices.len(), 1);
    assert!(devices.contains_key("pico-dup"));
}

#[tokio::test]
async fn test_spawned_scan_reports_done_and_results() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body("pico-bg", "Strip")))
        .mount(&server)
        .await;

    let scan = scanner_for(&server).spawn();
    let devices = scan.wait().await;
    assert_eq!(devices.len(), 1);
}

// ── Probe rejection ─────────────────────────────────────────────────

#[tokio::test]
async fn test_non_200_is_not_a_device() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(scanner_for(&server).run().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_not_a_device() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    assert!(scanner_for(&server).run().await.is_empty());
}

#[tokio::test]
async fn test_missing_identity_is_not_a_device() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"capabilities": {}})))
        .mount(&server)
        .await;

    assert!(scanner_for(&server).run().await.is_empty());
}

#[tokio::test]
async fn test_empty_identity_is_not_a_device() {
    let server = wildcard_server().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body("", "Nameless")))
        .mount(&server)
        .await;

    assert!(scanner_for(&server).run().await.is_empty());
}

// ── Deadline ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sweep_respects_total_deadline() {
    let server = wildcard_server().await;
    // Every probe would take 3 s; the whole sweep is only allowed 300 ms.
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(info_body("pico-slow", "Strip"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ScanConfig {
        probe_timeout: Duration::from_secs(5),
        total_timeout: Duration::from_millis(300),
        ..scan_config(server.address().port())
    };
    let scanner = Scanner::new(reqwest::Client::new()).with_config(config);

    let started = std::time::Instant::now();
    let devices = scanner.run().await;

    assert!(devices.is_empty());
    // Terminates near the deadline, not after every probe ran its course.
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "sweep took {:?}",
        started.elapsed()
    );
}
