// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state for the control server's request handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::sync::{Mutex, RwLock};

use dialshell_automation::AutomationConfig;
use dialshell_core::{PageSlot, Theme};

/// Shared state for axum request handlers.
///
/// Single-writer discipline: only the notification poller stores `notifications`;
/// only the theme route stores `theme`. Every reader takes a snapshot.
#[derive(Clone)]
pub struct BridgeState {
    /// Slot for the embedded page; unset until the shell attaches one.
    pub page: PageSlot,
    /// Last-known unread count, written by the poller.
    pub notifications: Arc<AtomicU32>,
    /// Active theme name, written by the theme route.
    pub theme: Arc<RwLock<Theme>>,
    /// Automation settings resolved from configuration.
    pub automation: Arc<AutomationConfig>,
    /// Single-slot mutex serializing page-mutating commands, so one
    /// command's navigation cannot invalidate another's in-flight DOM
    /// probe.
    pub page_lock: Arc<Mutex<()>>,
}

impl BridgeState {
    /// Create state with an unset page slot and a zero count.
    pub fn new(automation: AutomationConfig, theme: Theme) -> Self {
        Self {
            page: PageSlot::new(),
            notifications: Arc::new(AtomicU32::new(0)),
            theme: Arc::new(RwLock::new(theme)),
            automation: Arc::new(automation),
            page_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot of the last-known notification count.
    pub fn notification_count(&self) -> u32 {
        self.notifications.load(Ordering::Relaxed)
    }

    /// Snapshot of the active theme.
    pub async fn theme(&self) -> Theme {
        *self.theme.read().await
    }

    /// Update the active theme.
    pub async fn set_theme(&self, theme: Theme) {
        *self.theme.write().await = theme;
    }
}
