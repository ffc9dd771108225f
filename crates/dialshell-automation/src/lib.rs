// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DOM automation for the embedded telephony page.
//!
//! Three layers:
//! - [`templates`] holds every injected JavaScript source in one place;
//!   [`script::ScriptCall`] binds arguments as JSON data, never spliced text.
//! - [`routines`] pairs each template with a typed decoder following the
//!   degrade-over-fail policy.
//! - [`retry`] converts the page's unpredictable readiness timing into
//!   bounded polling with observable give-up; [`call`] and [`sms`] compose
//!   it into the two page-mutating flows.

pub mod call;
pub mod phone;
pub mod retry;
pub mod routines;
pub mod script;
pub mod sms;
pub mod templates;

pub use call::{call_unavailable, place_call};
pub use retry::{ClickOutcome, PollPolicy, click_with_retry, wait_for_ready};
pub use script::ScriptCall;
pub use sms::{SmsOutcome, send_sms};

/// Automation settings resolved from configuration.
///
/// Mirrors the `[page]` section of `DialshellConfig`; constructed by the
/// embedding layer so this crate stays independent of the config system.
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    /// Base URL of the telephony web application.
    pub base_url: String,
    /// Policy for readiness probes.
    pub ready: PollPolicy,
    /// Policy for click retries.
    pub click: PollPolicy,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://voice.google.com".to_string(),
            ready: PollPolicy::ready_default(),
            click: PollPolicy::click_default(),
        }
    }
}
