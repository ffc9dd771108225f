// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the control server.
//!
//! Two failure planes, deliberately kept apart:
//! - structural/parse failures (malformed JSON, missing fields, unknown
//!   theme or view) return 4xx with `{error}` and never invoke automation;
//! - automation failures inside a well-formed command return 200 with a
//!   semantically failed payload plus the diagnostic string, because the
//!   command was accepted and an attempt did execute. Callers must check the
//!   payload's status field, not just the HTTP status code.

use axum::{
    Json,
    extract::{Path, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dialshell_automation::routines;
use dialshell_automation::{call_unavailable, place_call, send_sms};
use dialshell_core::{
    CallRecord, CallStage, Command, Contact, DomSnapshot, Event, MessageThread, SearchResult,
    Theme, UserInfo, Voicemail, decode_command,
};

use crate::state::BridgeState;

/// Request body for POST /call.
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    /// Raw phone number; normalization happens in the call flow.
    pub number: String,
}

/// Request body for POST /sms.
#[derive(Debug, Deserialize)]
pub struct SmsRequest {
    /// Recipient phone number.
    pub number: String,
    /// Message body.
    pub text: String,
}

/// Request body for POST /theme.
#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    /// Theme name; unknown names fail deserialization (400).
    pub theme: Theme,
}

/// Query parameters for list reads.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for GET /search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response body for GET /status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Last-known notification count from the poller.
    pub notifications: u32,
    /// Active theme name.
    pub theme: Theme,
    /// Whether an embedded page is currently attached.
    pub connected: bool,
}

/// Response body for POST /sms.
#[derive(Debug, Serialize)]
pub struct SmsResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response body for POST /reload.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: String,
}

/// Response body for POST /theme.
#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub status: String,
    pub theme: Theme,
}

/// Response body for POST /navigate/{view}.
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub status: String,
    pub view: String,
}

/// Response body for GET /unread.
#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub count: u32,
}

/// Response body for GET /messages.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageThread>,
}

/// Response body for GET /contacts.
#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

/// Response body for GET /calls.
#[derive(Debug, Serialize)]
pub struct CallsResponse {
    pub calls: Vec<CallRecord>,
}

/// Response body for GET /voicemails.
#[derive(Debug, Serialize)]
pub struct VoicemailsResponse {
    pub voicemails: Vec<Voicemail>,
}

/// Response body for GET /search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Error response body for 4xx failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
}

/// GET /health -- liveness only.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /status -- last-known count + theme + page attachment.
pub async fn get_status(State(state): State<BridgeState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        notifications: state.notification_count(),
        theme: state.theme().await,
        connected: state.page.is_attached(),
    })
}

/// POST /call -- drive the call flow.
///
/// A malformed body is the only transport error; automation outcomes
/// (including "no page attached") travel in the result payload.
pub async fn post_call(
    State(state): State<BridgeState>,
    body: Result<Json<CallRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let request_id = uuid::Uuid::new_v4();
    info!(%request_id, number = %req.number, "call command received");

    let Some(page) = state.page.get() else {
        warn!(%request_id, "call command with no page attached");
        return Json(call_unavailable(&req.number)).into_response();
    };

    let _guard = state.page_lock.lock().await;
    let result = place_call(page.as_ref(), &state.automation, &req.number).await;
    info!(%request_id, status = ?result.status, "call command finished");
    Json(result).into_response()
}

/// POST /sms -- drive the compose/fill/send flow.
pub async fn post_sms(
    State(state): State<BridgeState>,
    body: Result<Json<SmsRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let request_id = uuid::Uuid::new_v4();
    info!(%request_id, number = %req.number, "sms command received");

    let Some(page) = state.page.get() else {
        return Json(SmsResponse {
            status: "failed".to_string(),
            message: Some("no embedded page attached".to_string()),
        })
        .into_response();
    };

    let _guard = state.page_lock.lock().await;
    match send_sms(page.as_ref(), &state.automation, &req.number, &req.text).await {
        Ok(outcome) => Json(SmsResponse {
            status: if outcome.sent { "sent" } else { "failed" }.to_string(),
            message: Some(outcome.detail),
        })
        .into_response(),
        Err(e) => {
            warn!(%request_id, error = %e, "sms flow failed");
            Json(SmsResponse {
                status: "failed".to_string(),
                message: Some(e.to_string()),
            })
            .into_response()
        }
    }
}

/// POST /reload -- force the page back to the base URL. Best-effort: no
/// observable failure modes.
pub async fn post_reload(State(state): State<BridgeState>) -> Json<ReloadResponse> {
    if let Some(page) = state.page.get() {
        let _guard = state.page_lock.lock().await;
        if let Err(e) = page.navigate(&state.automation.base_url).await {
            warn!(error = %e, "reload navigation failed");
        }
    } else {
        warn!("reload command with no page attached");
    }
    Json(ReloadResponse {
        status: "reloaded".to_string(),
    })
}

/// POST /theme -- update the active theme name. Propagation to CSS
/// injection happens in the shell layer.
pub async fn post_theme(
    State(state): State<BridgeState>,
    body: Result<Json<ThemeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    state.set_theme(req.theme).await;
    info!(theme = %req.theme, "theme changed");
    Json(ThemeResponse {
        status: "theme_changed".to_string(),
        theme: req.theme,
    })
    .into_response()
}

/// POST /navigate/{view} -- jump the page to a named view.
pub async fn post_navigate(
    State(state): State<BridgeState>,
    Path(view): Path<String>,
) -> Response {
    let path = match view.as_str() {
        "calls" => "/calls",
        "messages" => "/messages",
        "contacts" => "/contacts",
        "voicemails" => "/voicemails",
        other => return bad_request(format!("unknown view `{other}`")),
    };

    if let Some(page) = state.page.get() {
        let _guard = state.page_lock.lock().await;
        let url = format!("{}{path}", state.automation.base_url.trim_end_matches('/'));
        if let Err(e) = page.navigate(&url).await {
            warn!(error = %e, view = %view, "navigation failed");
        }
    }
    Json(NavigateResponse {
        status: "navigated".to_string(),
        view,
    })
    .into_response()
}

/// GET /unread -- live unread count, falling back to the poller's
/// last-known value when the probe cannot run.
pub async fn get_unread(State(state): State<BridgeState>) -> Json<UnreadResponse> {
    let count = match state.page.get() {
        Some(page) => match routines::fetch_unread(page.as_ref()).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "unread probe failed, using last-known count");
                state.notification_count()
            }
        },
        None => state.notification_count(),
    };
    Json(UnreadResponse { count })
}

/// GET /messages?limit=N
pub async fn get_messages(
    State(state): State<BridgeState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let limit = query.limit.unwrap_or(routines::DEFAULT_THREAD_LIMIT);

    let messages = match state.page.get() {
        Some(page) => routines::fetch_messages(page.as_ref(), limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "message scrape failed");
                Vec::new()
            }),
        None => Vec::new(),
    };
    Json(MessagesResponse { messages }).into_response()
}

/// GET /contacts?limit=N
pub async fn get_contacts(
    State(state): State<BridgeState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let limit = query.limit.unwrap_or(routines::DEFAULT_LIST_LIMIT);

    let contacts = match state.page.get() {
        Some(page) => routines::fetch_contacts(page.as_ref(), limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "contact scrape failed");
                Vec::new()
            }),
        None => Vec::new(),
    };
    Json(ContactsResponse { contacts }).into_response()
}

/// GET /calls?limit=N
pub async fn get_calls(
    State(state): State<BridgeState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let limit = query.limit.unwrap_or(routines::DEFAULT_LIST_LIMIT);

    let calls = match state.page.get() {
        Some(page) => routines::fetch_call_history(page.as_ref(), limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "call history scrape failed");
                Vec::new()
            }),
        None => Vec::new(),
    };
    Json(CallsResponse { calls }).into_response()
}

/// GET /voicemails?limit=N
pub async fn get_voicemails(
    State(state): State<BridgeState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let limit = query.limit.unwrap_or(routines::DEFAULT_THREAD_LIMIT);

    let voicemails = match state.page.get() {
        Some(page) => routines::fetch_voicemails(page.as_ref(), limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "voicemail scrape failed");
                Vec::new()
            }),
        None => Vec::new(),
    };
    Json(VoicemailsResponse { voicemails }).into_response()
}

/// GET /search?q=...
pub async fn get_search(
    State(state): State<BridgeState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let limit = query.limit.unwrap_or(routines::DEFAULT_LIST_LIMIT);

    let results = match state.page.get() {
        Some(page) => routines::fetch_search(page.as_ref(), &query.q, limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "search failed");
                Vec::new()
            }),
        None => Vec::new(),
    };
    Json(SearchResponse { results }).into_response()
}

/// POST /command -- generic tagged-command envelope.
///
/// Accepts the `{type: ...}` command union and answers with the mirroring
/// event union. An unrecognized discriminant is a structural failure (400);
/// automation outcomes travel in the event payload.
pub async fn post_command(
    State(state): State<BridgeState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Json(value) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let command = match decode_command(value) {
        Ok(command) => command,
        Err(e) => return bad_request(e.to_string()),
    };

    Json(dispatch_command(&state, command).await).into_response()
}

/// Map one decoded command onto the bridge and produce its event.
async fn dispatch_command(state: &BridgeState, command: Command) -> Event {
    match command {
        Command::GetStatus => Event::Status {
            notifications: state.notification_count(),
            theme: state.theme().await,
            connected: state.page.is_attached(),
        },
        Command::GetNotifications => Event::NotificationCountChanged {
            count: state.notification_count(),
        },
        Command::SetTheme { theme } => {
            state.set_theme(theme).await;
            info!(theme = %theme, "theme changed");
            Event::ThemeChanged { theme }
        }
        Command::Reload => {
            if let Some(page) = state.page.get() {
                let _guard = state.page_lock.lock().await;
                if let Err(e) = page.navigate(&state.automation.base_url).await {
                    warn!(error = %e, "reload navigation failed");
                }
            }
            Event::Ack {
                command: "reload".to_string(),
                success: true,
                message: None,
            }
        }
        Command::MakeCall { number } => {
            let Some(page) = state.page.get() else {
                return Event::Ack {
                    command: "make_call".to_string(),
                    success: false,
                    message: Some("no embedded page attached".to_string()),
                };
            };
            let _guard = state.page_lock.lock().await;
            let result = place_call(page.as_ref(), &state.automation, &number).await;
            if result.status == CallStage::CallButtonClicked {
                Event::CallInitiated {
                    number: result.number,
                }
            } else {
                Event::Ack {
                    command: "make_call".to_string(),
                    success: false,
                    message: result.message,
                }
            }
        }
        Command::SendSms { number, text } => {
            let Some(page) = state.page.get() else {
                return Event::Ack {
                    command: "send_sms".to_string(),
                    success: false,
                    message: Some("no embedded page attached".to_string()),
                };
            };
            let _guard = state.page_lock.lock().await;
            match send_sms(page.as_ref(), &state.automation, &number, &text).await {
                Ok(outcome) if outcome.sent => Event::SmsSent,
                Ok(outcome) => Event::Ack {
                    command: "send_sms".to_string(),
                    success: false,
                    message: Some(outcome.detail),
                },
                Err(e) => Event::Error {
                    message: e.to_string(),
                },
            }
        }
    }
}

/// GET /user -- login state and identity scraped from the page chrome.
pub async fn get_user(State(state): State<BridgeState>) -> Json<UserInfo> {
    let user = match state.page.get() {
        Some(page) => {
            let logged_in = routines::fetch_logged_in(page.as_ref())
                .await
                .unwrap_or(false);
            if logged_in {
                routines::fetch_user(page.as_ref())
                    .await
                    .unwrap_or_default()
            } else {
                UserInfo::default()
            }
        }
        None => UserInfo::default(),
    };
    Json(user)
}

/// GET /dump-dom -- diagnostic snapshot for selector recalibration.
pub async fn get_dump_dom(State(state): State<BridgeState>) -> Json<DomSnapshot> {
    let snapshot = match state.page.get() {
        Some(page) => routines::fetch_dom_snapshot(page.as_ref())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "dom dump failed");
                DomSnapshot::default()
            }),
        None => DomSnapshot::default(),
    };
    Json(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_request_deserializes() {
        let req: CallRequest = serde_json::from_str(r#"{"number": "(555) 123-4567"}"#).unwrap();
        assert_eq!(req.number, "(555) 123-4567");
    }

    #[test]
    fn sms_request_requires_text() {
        let result = serde_json::from_str::<SmsRequest>(r#"{"number": "5551234567"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn theme_request_rejects_unknown_theme() {
        let result = serde_json::from_str::<ThemeRequest>(r#"{"theme": "neon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_response_serializes() {
        let resp = StatusResponse {
            notifications: 3,
            theme: Theme::Dracula,
            connected: true,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"notifications\":3"));
        assert!(json.contains("\"theme\":\"dracula\""));
        assert!(json.contains("\"connected\":true"));
    }

    #[test]
    fn sms_response_omits_absent_message() {
        let resp = SmsResponse {
            status: "sent".to_string(),
            message: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"status":"sent"}"#);
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "missing field `text`".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("missing field"));
    }
}
