// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the control server, the automation routines, and
//! external clients: the command/event unions, call results, and the
//! read-only projections scraped from the embedded page.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::DialshellError;

/// UI theme applied to the embedded page.
///
/// Closed enum: unknown names are a decode failure at the route boundary,
/// never a silent fallback.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dracula,
    Solar,
    Minty,
    Cerulean,
    Darkplus,
}

/// A command received from an external client.
///
/// Arrives as a JSON object with a `type` discriminant. Decode with
/// [`decode_command`] so an unrecognized discriminant fails with a typed
/// [`DialshellError::UnknownVariant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, VariantNames)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    MakeCall { number: String },
    SendSms { number: String, text: String },
    GetStatus,
    GetNotifications,
    SetTheme { theme: Theme },
    Reload,
}

/// An event or response emitted by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Connected,
    CallInitiated {
        number: String,
    },
    CallEnded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_secs: Option<u64>,
    },
    SmsSent,
    IncomingCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<String>,
    },
    MessageReceived {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preview: Option<String>,
    },
    NotificationCountChanged {
        count: u32,
    },
    Status {
        notifications: u32,
        theme: Theme,
        connected: bool,
    },
    ThemeChanged {
        theme: Theme,
    },
    Error {
        message: String,
    },
    Ack {
        command: String,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// Decode a JSON command object, mapping unrecognized discriminants to
/// [`DialshellError::UnknownVariant`] rather than a generic parse error.
pub fn decode_command(value: serde_json::Value) -> Result<Command, DialshellError> {
    let discriminant = value
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    match serde_json::from_value(value) {
        Ok(command) => Ok(command),
        Err(e) => {
            if Command::VARIANTS.contains(&discriminant.as_str()) {
                Err(DialshellError::Decode {
                    message: e.to_string(),
                })
            } else {
                Err(DialshellError::UnknownVariant {
                    variant: discriminant,
                })
            }
        }
    }
}

/// Terminal state reached by the local call-automation sequence.
///
/// NOT a guarantee the call connected -- only how far the UI automation got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStage {
    /// Navigation was issued but the dialer never reported ready.
    Queued,
    /// The dialer became ready but no call control could be clicked.
    DialerOpen,
    /// A call control was located and clicked.
    CallButtonClicked,
    /// The sequence could not start or the page was unavailable.
    Failed,
}

/// Result of one call command, created fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallCommandResult {
    pub status: CallStage,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

/// A conversation thread scraped from the page's message list.
///
/// Every field degrades to a placeholder when the corresponding DOM node is
/// absent; a thread is never partially constructed and rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageThread {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub unread: bool,
}

/// A contact scraped from the page's contact list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// One entry from the page's call history list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub duration: String,
}

/// One voicemail entry scraped from the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Voicemail {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub transcript: String,
}

/// One hit from the page's search box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub snippet: String,
}

/// Login state and identity scraped from the page chrome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One interactive element captured by the diagnostic DOM dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomElement {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub classes: String,
    #[serde(default)]
    pub aria_label: String,
    #[serde(default)]
    pub text: String,
}

/// Diagnostic snapshot of the page structure.
///
/// Used by operators to recalibrate selectors when the external page's
/// markup changes. Empty arrays when nothing matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomSnapshot {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub has_app_root: bool,
    #[serde(default)]
    pub nav_items: Vec<String>,
    #[serde(default)]
    pub buttons: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub elements: Vec<DomElement>,
}
