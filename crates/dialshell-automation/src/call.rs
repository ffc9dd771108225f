// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The call flow: navigate with the number embedded, poll for dialer
//! readiness, click the call control with bounded retry.
//!
//! Each stage maps to a [`CallStage`] so the caller learns exactly how far
//! the automation got. Nothing here guarantees the call connected -- the
//! terminal stage only says the local UI sequence completed.

use tracing::{info, warn};

use dialshell_core::{CallCommandResult, CallStage, DialshellError, PageHost};

use crate::AutomationConfig;
use crate::phone::{call_url, normalize_number};
use crate::retry::{click_with_retry, wait_for_ready};
use crate::routines;

/// Keywords matched against call-control text and aria-labels.
const CALL_KEYWORDS: &[&str] = &["call", "dial"];

/// Selector fallbacks when no keyword match is found.
const CALL_FALLBACKS: &[&str] = &[
    "gv-call-button button",
    "[aria-label*=\"call\" i]",
    ".call-button",
];

/// Drive one call attempt end to end.
///
/// Stage mapping:
/// - zero digits in the input: `failed` before any navigation
/// - navigation or page failure: `failed` with the error text
/// - dialer never reported ready: `queued` (the page may still complete the
///   navigation-triggered call on its own)
/// - dialer ready but no control clicked: `dialer_open` with the last
///   not-found diagnostic
/// - control clicked: `call_button_clicked`
pub async fn place_call(
    page: &dyn PageHost,
    config: &AutomationConfig,
    raw_number: &str,
) -> CallCommandResult {
    let Some(digits) = normalize_number(raw_number) else {
        return CallCommandResult {
            status: CallStage::Failed,
            number: raw_number.to_string(),
            message: Some("No digits found in number".to_string()),
        };
    };
    let number = format!("+{digits}");

    let url = call_url(&config.base_url, &digits);
    info!(number = %number, "starting call flow");

    if let Err(e) = page.navigate(&url).await {
        warn!(error = %e, "call navigation failed");
        return CallCommandResult {
            status: CallStage::Failed,
            number,
            message: Some(format!("navigation failed: {e}")),
        };
    }

    match wait_for_ready(page, &routines::dialer_ready(), config.ready).await {
        Ok(true) => {}
        Ok(false) => {
            return CallCommandResult {
                status: CallStage::Queued,
                number,
                message: Some(
                    "dialer did not become ready before timeout; navigation queued".to_string(),
                ),
            };
        }
        Err(e) => {
            warn!(error = %e, "readiness polling failed");
            return CallCommandResult {
                status: CallStage::Failed,
                number,
                message: Some(e.to_string()),
            };
        }
    }

    let action = routines::click_control(CALL_KEYWORDS, CALL_FALLBACKS);
    match click_with_retry(page, &action, config.click).await {
        Ok(outcome) if outcome.clicked => {
            info!(detail = %outcome.detail, "call button clicked");
            CallCommandResult {
                status: CallStage::CallButtonClicked,
                number,
                message: Some(outcome.detail),
            }
        }
        Ok(outcome) => {
            warn!(detail = %outcome.detail, "call button not found");
            CallCommandResult {
                status: CallStage::DialerOpen,
                number,
                message: Some(outcome.detail),
            }
        }
        Err(e) => {
            warn!(error = %e, "click retry failed");
            CallCommandResult {
                status: CallStage::Failed,
                number,
                message: Some(e.to_string()),
            }
        }
    }
}

/// Report a call command as failed without touching the page. Used when no
/// page is attached.
pub fn call_unavailable(raw_number: &str) -> CallCommandResult {
    CallCommandResult {
        status: CallStage::Failed,
        number: raw_number.to_string(),
        message: Some("no embedded page attached".to_string()),
    }
}
