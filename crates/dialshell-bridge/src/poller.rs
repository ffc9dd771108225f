// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timer-driven notification poller with blank-page self-healing.
//!
//! Two states: Idle (no page bound) and Polling (page bound, timer active).
//! The poller is the only writer of the shared notification count; the
//! status route reads a snapshot. A second probe on the same tick checks
//! the blank-page heuristic and forces a reload of the base URL -- a
//! best-effort self-healing mechanism, not guaranteed to catch every
//! failure mode.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dialshell_automation::routines;
use dialshell_core::PageHost;

/// Callback invoked with the new count whenever it changes.
pub type ChangeCallback = Arc<dyn Fn(u32) + Send + Sync>;

struct PollTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls the unread count at a fixed interval and raises a change callback
/// when it differs from the last observed value.
pub struct NotificationPoller {
    count: Arc<AtomicU32>,
    interval: Duration,
    base_url: String,
    page_lock: Arc<tokio::sync::Mutex<()>>,
    task: Mutex<Option<PollTask>>,
}

impl NotificationPoller {
    /// Create an idle poller sharing the bridge's count cell and its
    /// page-mutation lock.
    pub fn new(
        count: Arc<AtomicU32>,
        interval: Duration,
        base_url: String,
        page_lock: Arc<tokio::sync::Mutex<()>>,
    ) -> Self {
        Self {
            count,
            interval,
            base_url,
            page_lock,
            task: Mutex::new(None),
        }
    }

    /// Last observed count.
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Whether a page is bound and the timer is active.
    pub fn is_polling(&self) -> bool {
        let guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        guard.is_some()
    }

    /// Transition Idle -> Polling: run one immediate probe, then repeat at
    /// the configured interval. Replaces any previous binding.
    pub fn start(&self, page: Arc<dyn PageHost>, on_change: ChangeCallback) {
        self.stop();

        let token = CancellationToken::new();
        let loop_token = token.clone();
        let count = self.count.clone();
        let interval = self.interval;
        let base_url = self.base_url.clone();
        let page_lock = self.page_lock.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        debug!("notification poller cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        poll_once(page.as_ref(), &count, &on_change).await;
                        heal_blank_page(page.as_ref(), &base_url, &page_lock).await;
                    }
                }
            }
        });

        let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(PollTask { token, handle });
        info!(interval_ms = self.interval.as_millis() as u64, "notification poller started");
    }

    /// Transition Polling -> Idle: cancel the timer and release the page
    /// and callback. Idempotent.
    pub fn stop(&self) {
        let task = {
            let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        };
        if let Some(task) = task {
            task.token.cancel();
            // The loop exits at its next select point and drops the page
            // and callback with it.
            drop(task.handle);
            info!("notification poller stopped");
        }
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One probe: read the unread count and fire the callback on change. This
/// is the only path that mutates the shared count.
async fn poll_once(page: &dyn PageHost, count: &AtomicU32, on_change: &ChangeCallback) {
    match routines::fetch_unread(page).await {
        Ok(current) => {
            let previous = count.swap(current, Ordering::Relaxed);
            if previous != current {
                info!(count = current, "notification count changed");
                on_change(current);
            }
        }
        Err(e) => {
            warn!(error = %e, "unread probe failed");
        }
    }
}

/// Blank-page heuristic: a wedged renderer leaves the body empty; force a
/// reload of the base URL when that happens. Takes the page-mutation lock
/// so the reload cannot land in the middle of a call or SMS flow.
async fn heal_blank_page(
    page: &dyn PageHost,
    base_url: &str,
    page_lock: &tokio::sync::Mutex<()>,
) {
    match page.execute(&routines::blank_page().render()).await {
        Ok(value) if value.as_bool() == Some(true) => {
            warn!("blank page detected, reloading base url");
            let _guard = page_lock.lock().await;
            if let Err(e) = page.navigate(base_url).await {
                warn!(error = %e, "self-heal reload failed");
            }
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "blank page probe failed");
        }
    }
}
