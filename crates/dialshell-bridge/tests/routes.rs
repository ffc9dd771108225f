// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route-level tests for the control server, exercising the full axum
//! router with a mock page behind the slot.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use dialshell_automation::{AutomationConfig, PollPolicy};
use dialshell_bridge::{BridgeState, router};
use dialshell_core::Theme;
use dialshell_test_utils::MockPage;

/// State with millisecond polling so flows that poll stay fast in tests.
fn fast_state() -> BridgeState {
    BridgeState::new(
        AutomationConfig {
            base_url: "https://voice.example.com".to_string(),
            ready: PollPolicy::new(Duration::from_millis(1), 3),
            click: PollPolicy::new(Duration::from_millis(1), 2),
        },
        Theme::Default,
    )
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router(fast_state());
    let (status, body) = send(app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn status_defaults_when_nothing_attached() {
    let app = router(fast_state());
    let (status, body) = send(app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"notifications": 0, "theme": "default", "connected": false})
    );
}

#[tokio::test]
async fn theme_change_is_reflected_in_status() {
    let state = fast_state();

    let (status, body) = send(
        router(state.clone()),
        "POST",
        "/theme",
        Some(json!({"theme": "dracula"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "theme_changed");

    let (_, body) = send(router(state), "GET", "/status", None).await;
    assert_eq!(body["theme"], "dracula");
}

#[tokio::test]
async fn unknown_theme_is_a_400() {
    let (status, body) = send(
        router(fast_state()),
        "POST",
        "/theme",
        Some(json!({"theme": "neon"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_sms_body_is_400_and_runs_no_automation() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    state.page.attach(page.clone());

    let (status, body) = send(
        router(state),
        "POST",
        "/sms",
        Some(json!({"number": "5551234567"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(page.execute_count(), 0, "no automation on a malformed body");
}

#[tokio::test]
async fn sms_happy_path_reports_sent() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    page.push_result(json!("clicked:text:compose")).await;
    page.push_result(json!(true)).await;
    page.push_result(json!("filled:recipient-and-body")).await;
    page.push_result(json!("clicked:aria:send")).await;
    state.page.attach(page);

    let (status, body) = send(
        router(state),
        "POST",
        "/sms",
        Some(json!({"number": "5551234567", "text": "hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "sent");
}

#[tokio::test]
async fn call_with_no_digits_fails_without_navigation() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    state.page.attach(page.clone());

    let (status, body) = send(
        router(state),
        "POST",
        "/call",
        Some(json!({"number": "abc"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "semantic failure travels in the payload");
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "No digits found in number");
    assert!(page.navigations().await.is_empty());
}

#[tokio::test]
async fn call_normalizes_and_navigates_with_encoded_number() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    page.push_result(json!(true)).await; // dialer ready
    page.push_result(json!("clicked:text:call")).await;
    state.page.attach(page.clone());

    let (status, body) = send(
        router(state),
        "POST",
        "/call",
        Some(json!({"number": "(555) 123-4567"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "call_button_clicked");
    assert_eq!(body["number"], "+15551234567");
    assert_eq!(
        page.navigations().await,
        vec!["https://voice.example.com/calls?phoneNo=%2B15551234567"]
    );
}

#[tokio::test]
async fn call_without_page_reports_failed() {
    let (status, body) = send(
        router(fast_state()),
        "POST",
        "/call",
        Some(json!({"number": "5551234567"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "no embedded page attached");
}

#[tokio::test]
async fn malformed_call_body_is_400() {
    let (status, body) = send(
        router(fast_state()),
        "POST",
        "/call",
        Some(json!({"phone": "5551234567"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unread_reads_live_badges() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    page.push_result(json!(["3", "x", "2"])).await;
    state.page.attach(page);

    let (status, body) = send(router(state), "GET", "/unread", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 5}));
}

#[tokio::test]
async fn messages_respects_the_limit_query() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    page.push_result(json!([
        {"name": "Ada"},
        {"name": "Bea"},
        {"name": "Cal"},
        {"name": "Dee"},
        {"name": "Eli"},
    ]))
    .await;
    state.page.attach(page);

    let (status, body) = send(router(state), "GET", "/messages?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["name"], "Ada");
    assert_eq!(messages[1]["name"], "Bea");
}

#[tokio::test]
async fn reads_degrade_to_empty_when_unattached() {
    let state = fast_state();

    let (status, body) = send(router(state.clone()), "GET", "/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"messages": []}));

    let (status, body) = send(router(state.clone()), "GET", "/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"contacts": []}));

    let (status, body) = send(router(state), "GET", "/dump-dom", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "");
    assert_eq!(body["elements"], json!([]));
}

#[tokio::test]
async fn user_reflects_login_state() {
    // Unattached: anonymous default.
    let (status, body) = send(router(fast_state()), "GET", "/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged_in"], false);

    // Logged in: identity scraped from the account chrome.
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    page.push_result(json!(true)).await; // is_logged_in probe
    page.push_result(json!({"logged_in": true, "name": "Ada Lovelace", "email": "ada@example.com"}))
        .await;
    state.page.attach(page);

    let (status, body) = send(router(state), "GET", "/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"logged_in": true, "name": "Ada Lovelace", "email": "ada@example.com"})
    );
}

#[tokio::test]
async fn search_requires_a_query() {
    let (status, body) = send(router(fast_state()), "GET", "/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn navigate_rejects_unknown_views() {
    let (status, body) = send(router(fast_state()), "POST", "/navigate/settings", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("settings"));
}

#[tokio::test]
async fn navigate_drives_the_page_to_the_view() {
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    state.page.attach(page.clone());

    let (status, body) = send(router(state), "POST", "/navigate/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "navigated", "view": "messages"}));
    assert_eq!(
        page.navigations().await,
        vec!["https://voice.example.com/messages"]
    );
}

#[tokio::test]
async fn command_envelope_answers_with_events() {
    let state = fast_state();

    let (status, body) = send(
        router(state.clone()),
        "POST",
        "/command",
        Some(json!({"type": "set_theme", "theme": "minty"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"type": "theme_changed", "theme": "minty"}));

    let (status, body) = send(
        router(state),
        "POST",
        "/command",
        Some(json!({"type": "get_status"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "status");
    assert_eq!(body["theme"], "minty");
    assert_eq!(body["connected"], false);
}

#[tokio::test]
async fn command_with_unknown_discriminant_is_400() {
    let (status, body) = send(
        router(fast_state()),
        "POST",
        "/command",
        Some(json!({"type": "self_destruct"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("self_destruct")
    );
}

#[tokio::test]
async fn make_call_command_without_page_acks_failure() {
    let (status, body) = send(
        router(fast_state()),
        "POST",
        "/command",
        Some(json!({"type": "make_call", "number": "5551234567"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "ack");
    assert_eq!(body["command"], "make_call");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn reload_always_reports_reloaded() {
    // Unattached: still a success.
    let (status, body) = send(router(fast_state()), "POST", "/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "reloaded"}));

    // Attached: drives the page back to the base url.
    let state = fast_state();
    let page = Arc::new(MockPage::new());
    state.page.attach(page.clone());
    let (_, _) = send(router(state), "POST", "/reload", None).await;
    assert_eq!(page.navigations().await, vec!["https://voice.example.com"]);
}
