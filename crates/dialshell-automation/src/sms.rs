// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The SMS flow: open compose, fill recipient and body, click send.
//!
//! Every step is readiness-gated or retried; the fixed-delay sequencing of
//! the early implementation is gone. Message text reaches the page as a
//! bound JSON argument, never spliced into script source.

use tracing::{info, warn};

use dialshell_core::{DialshellError, PageHost};

use crate::AutomationConfig;
use crate::retry::{click_with_retry, wait_for_ready};
use crate::routines;

/// Keywords matched against compose-control text and aria-labels.
const COMPOSE_KEYWORDS: &[&str] = &["send new message", "new message", "compose"];

const COMPOSE_FALLBACKS: &[&str] = &["gv-compose-button button", "[aria-label*=\"new message\" i]"];

const SEND_KEYWORDS: &[&str] = &["send"];

const SEND_FALLBACKS: &[&str] = &["[aria-label*=\"send\" i]", "button[type=\"submit\"]"];

/// Outcome of one SMS attempt. `detail` carries the diagnostic from the
/// step that decided the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsOutcome {
    pub sent: bool,
    pub detail: String,
}

/// Drive one SMS attempt: compose, fill, send.
///
/// Degrades every non-fatal failure to `sent: false` with the step
/// diagnostic; only surfaces an `Err` when the page itself is gone.
pub async fn send_sms(
    page: &dyn PageHost,
    config: &AutomationConfig,
    number: &str,
    text: &str,
) -> Result<SmsOutcome, DialshellError> {
    info!(number, "starting sms flow");

    let compose = routines::click_control(COMPOSE_KEYWORDS, COMPOSE_FALLBACKS);
    let opened = click_with_retry(page, &compose, config.click).await?;
    if !opened.clicked {
        warn!(detail = %opened.detail, "compose control not found");
        return Ok(SmsOutcome {
            sent: false,
            detail: opened.detail,
        });
    }

    if !wait_for_ready(page, &routines::compose_ready(), config.ready).await? {
        return Ok(SmsOutcome {
            sent: false,
            detail: "compose form did not become ready".to_string(),
        });
    }

    let filled = page
        .execute(&routines::fill_sms(number, text).render())
        .await?;
    let filled = filled.as_str().unwrap_or_default();
    if !filled.starts_with("filled:") {
        warn!(detail = filled, "sms fields could not be filled");
        return Ok(SmsOutcome {
            sent: false,
            detail: filled.to_string(),
        });
    }

    let send = routines::click_control(SEND_KEYWORDS, SEND_FALLBACKS);
    let sent = click_with_retry(page, &send, config.click).await?;
    if sent.clicked {
        info!(detail = %sent.detail, "sms send clicked");
    } else {
        warn!(detail = %sent.detail, "send control not found");
    }
    Ok(SmsOutcome {
        sent: sent.clicked,
        detail: sent.detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::PollPolicy;
    use dialshell_test_utils::MockPage;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn fast_config() -> AutomationConfig {
        AutomationConfig {
            base_url: "https://voice.example.com".to_string(),
            ready: PollPolicy::new(Duration::from_millis(1), 3),
            click: PollPolicy::new(Duration::from_millis(1), 2),
        }
    }

    #[tokio::test]
    async fn full_flow_sends() {
        let page = MockPage::new();
        page.push_result(json!("clicked:text:compose")).await;
        page.push_result(Value::Bool(true)).await; // compose ready
        page.push_result(json!("filled:recipient-and-body")).await;
        page.push_result(json!("clicked:aria:send")).await;

        let outcome = send_sms(&page, &fast_config(), "+15551234567", "hello there")
            .await
            .unwrap();

        assert!(outcome.sent);
        assert_eq!(outcome.detail, "clicked:aria:send");

        // The message body travels as a bound argument in the fill script.
        let scripts = page.executed_scripts().await;
        assert!(scripts[2].contains(r#"["+15551234567","hello there"]"#));
    }

    #[tokio::test]
    async fn missing_compose_control_fails_with_diagnostic() {
        let page = MockPage::new();
        page.push_result(json!("not-found:Archive|Settings")).await;
        page.push_result(json!("not-found:Archive|Settings")).await;

        let outcome = send_sms(&page, &fast_config(), "5551234567", "hi")
            .await
            .unwrap();

        assert!(!outcome.sent);
        assert_eq!(outcome.detail, "not-found:Archive|Settings");
    }

    #[tokio::test]
    async fn missing_recipient_field_fails() {
        let page = MockPage::new();
        page.push_result(json!("clicked:text:compose")).await;
        page.push_result(Value::Bool(true)).await;
        page.push_result(json!("not-found:recipient")).await;

        let outcome = send_sms(&page, &fast_config(), "5551234567", "hi")
            .await
            .unwrap();

        assert!(!outcome.sent);
        assert_eq!(outcome.detail, "not-found:recipient");
    }

    #[tokio::test]
    async fn torn_down_page_propagates() {
        let page = MockPage::new();
        page.set_unavailable(true);

        let result = send_sms(&page, &fast_config(), "5551234567", "hi").await;
        assert!(matches!(result, Err(DialshellError::PageUnavailable)));
    }
}
