// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readiness polling and bounded click retry.
//!
//! The target page is not owned by this system and its readiness timing is
//! unpredictable (network-dependent SPA navigation). A fixed delay is
//! brittle; polling with a bounded attempt count converts "unknown wait
//! time" into "bounded wait with observable give-up", so the control server
//! can return a meaningful status instead of hanging.

use std::time::Duration;

use tracing::{debug, warn};

use dialshell_core::{DialshellError, PageHost};

use crate::script::ScriptCall;

/// Poll interval and attempt bound for one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Default readiness policy: 400 ms x 25 attempts (10 s budget).
    pub fn ready_default() -> Self {
        Self::new(Duration::from_millis(400), 25)
    }

    /// Default click policy: 500 ms x 8 attempts (4 s budget).
    pub fn click_default() -> Self {
        Self::new(Duration::from_millis(500), 8)
    }
}

/// Outcome of a bounded click retry. `detail` is always populated: the
/// tagged `clicked:` string on success, the last attempt's diagnostic on
/// exhaustion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub clicked: bool,
    pub detail: String,
}

/// Poll a boolean probe until it reports true or the attempt budget runs
/// out.
///
/// Returns `Ok(false)` on exhaustion: "gave up" is an answer, not an error;
/// the caller decides what a timeout means for the overall command. Null or
/// non-boolean probe results count as not-ready (the page may be mid
/// navigation and resolve probes with stale data). `PageUnavailable` is the
/// only error that aborts the loop -- the view is gone and no amount of
/// polling brings it back.
pub async fn wait_for_ready(
    page: &dyn PageHost,
    probe: &ScriptCall,
    policy: PollPolicy,
) -> Result<bool, DialshellError> {
    let script = probe.render();

    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match page.execute(&script).await {
            Ok(value) => {
                if value.as_bool().unwrap_or(false) {
                    debug!(attempt, "readiness probe satisfied");
                    return Ok(true);
                }
            }
            Err(DialshellError::PageUnavailable) => return Err(DialshellError::PageUnavailable),
            Err(e) => {
                // Transient evaluation failures count as a not-ready attempt.
                warn!(attempt, error = %e, "readiness probe evaluation failed");
            }
        }
    }

    debug!(
        attempts = policy.max_attempts,
        "readiness probe exhausted its attempt budget"
    );
    Ok(false)
}

/// Retry a click-action script until it reports `clicked:` or the attempt
/// budget runs out.
///
/// The action script returns a tagged string (`clicked:<how>:<detail>` or
/// `not-found:<sample>`); the last diagnostic string is preserved so the
/// caller can surface it verbatim for selector recalibration.
pub async fn click_with_retry(
    page: &dyn PageHost,
    action: &ScriptCall,
    policy: PollPolicy,
) -> Result<ClickOutcome, DialshellError> {
    let script = action.render();
    let mut detail = String::from("not-found:");

    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match page.execute(&script).await {
            Ok(value) => {
                let tagged = value.as_str().unwrap_or_default();
                if tagged.starts_with("clicked:") {
                    debug!(attempt, detail = tagged, "click action succeeded");
                    return Ok(ClickOutcome {
                        clicked: true,
                        detail: tagged.to_string(),
                    });
                }
                if !tagged.is_empty() {
                    detail = tagged.to_string();
                }
            }
            Err(DialshellError::PageUnavailable) => return Err(DialshellError::PageUnavailable),
            Err(e) => {
                warn!(attempt, error = %e, "click action evaluation failed");
                detail = format!("error:{e}");
            }
        }
    }

    debug!(
        attempts = policy.max_attempts,
        detail = %detail,
        "click action exhausted its attempt budget"
    );
    Ok(ClickOutcome {
        clicked: false,
        detail,
    })
}
