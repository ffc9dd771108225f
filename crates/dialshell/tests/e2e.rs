// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the assembled bridge over real loopback sockets.
//!
//! Each test builds an isolated Bridge on a freshly reserved port with a
//! mock page where needed. Tests are independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use dialshell_automation::{AutomationConfig, PollPolicy};
use dialshell_bridge::{Bridge, BridgeSettings};
use dialshell_core::{DialshellError, Theme};
use dialshell_test_utils::MockPage;

/// Reserve a free loopback port by binding to 0 and dropping the listener.
fn free_port() -> u32 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    u32::from(listener.local_addr().unwrap().port())
}

fn fast_settings() -> BridgeSettings {
    BridgeSettings {
        automation: AutomationConfig {
            base_url: "https://voice.example.com".to_string(),
            ready: PollPolicy::new(Duration::from_millis(1), 3),
            click: PollPolicy::new(Duration::from_millis(1), 2),
        },
        theme: Theme::Default,
        poll_interval: Duration::from_secs(60),
    }
}

async fn get_json(port: u32, path: &str) -> Value {
    reqwest::get(format!("http://127.0.0.1:{port}{path}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_json(port: u32, path: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn health_over_a_real_socket() {
    let port = free_port();
    let mut bridge = Bridge::new(fast_settings());
    bridge.start(port).await.unwrap();

    let body = get_json(port, "/health").await;
    assert_eq!(body, json!({"status": "ok"}));

    bridge.stop().await;
}

#[tokio::test]
async fn theme_then_status_sequence() {
    let port = free_port();
    let mut bridge = Bridge::new(fast_settings());
    bridge.start(port).await.unwrap();

    let (status, body) = post_json(port, "/theme", json!({"theme": "dracula"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "theme_changed");

    let body = get_json(port, "/status").await;
    assert_eq!(body["theme"], "dracula");
    assert_eq!(body["connected"], false);

    bridge.stop().await;
}

#[tokio::test]
async fn invalid_port_never_starts_a_listener() {
    let mut bridge = Bridge::new(fast_settings());

    for port in [0u32, 65536, 70000] {
        let result = bridge.start(port).await;
        assert!(matches!(result, Err(DialshellError::InvalidPort { .. })));
        assert!(bridge.port().is_none());
    }
}

#[tokio::test]
async fn start_stop_start_is_idempotent_on_the_same_port() {
    let port = free_port();
    let mut bridge = Bridge::new(fast_settings());

    bridge.start(port).await.unwrap();
    bridge.stop().await;

    // No listener remains bound: the same port is immediately reusable.
    bridge.start(port).await.unwrap();
    let body = get_json(port, "/health").await;
    assert_eq!(body["status"], "ok");
    bridge.stop().await;

    // And after the final stop, connections are refused.
    let refused = reqwest::get(format!("http://127.0.0.1:{port}/health")).await;
    assert!(refused.is_err());
}

#[tokio::test]
async fn attached_page_serves_call_and_status() {
    let port = free_port();
    let mut bridge = Bridge::new(fast_settings());
    bridge.start(port).await.unwrap();

    let page = Arc::new(MockPage::new());
    page.push_result(json!(["2"])).await; // poller's immediate unread probe
    page.push_result(json!(false)).await; // poller's blank-page probe
    page.push_result(json!(true)).await; // dialer ready
    page.push_result(json!("clicked:text:call")).await;

    let notified = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = notified.clone();
    bridge.attach_page(
        page.clone(),
        Arc::new(move |count| sink.lock().unwrap().push(count)),
    );

    // Give the poller's immediate probe a moment to land.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(notified.lock().unwrap().as_slice(), &[2]);

    let body = get_json(port, "/status").await;
    assert_eq!(body["connected"], true);
    assert_eq!(body["notifications"], 2);

    let (status, body) = post_json(port, "/call", json!({"number": "(555) 123-4567"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "call_button_clicked");
    assert_eq!(body["number"], "+15551234567");
    assert!(
        page.navigations()
            .await
            .contains(&"https://voice.example.com/calls?phoneNo=%2B15551234567".to_string())
    );

    bridge.detach_page();
    let body = get_json(port, "/status").await;
    assert_eq!(body["connected"], false);

    bridge.stop().await;
}

#[tokio::test]
async fn malformed_sms_is_rejected_before_automation() {
    let port = free_port();
    let mut bridge = Bridge::new(fast_settings());
    bridge.start(port).await.unwrap();

    let page = Arc::new(MockPage::new());
    bridge.attach_page(page.clone(), Arc::new(|_| {}));
    // Let the poller's immediate probe land so the baseline is stable; the
    // next tick is a minute away.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let baseline = page.execute_count();

    let (status, body) = post_json(port, "/sms", json!({"number": "5551234567"})).await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
    // Only the poller's own probes may have run; the sms route added none.
    assert_eq!(page.execute_count(), baseline);

    bridge.stop().await;
}
