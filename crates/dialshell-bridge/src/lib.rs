// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loopback control server and notification poller for Dialshell.
//!
//! The [`Bridge`] facade ties the pieces together: shared state, the axum
//! control server, and the poller. The embedding desktop shell constructs a
//! `Bridge`, starts it on the configured port, and attaches the real
//! webview once it exists; external clients drive everything over HTTP.

pub mod handlers;
pub mod poller;
pub mod server;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use dialshell_automation::AutomationConfig;
use dialshell_core::{DialshellError, PageHost, Theme};

pub use poller::{ChangeCallback, NotificationPoller};
pub use server::{ControlServer, router, validate_port};
pub use state::BridgeState;

/// Settings for constructing a [`Bridge`], resolved from configuration by
/// the embedding layer.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub automation: AutomationConfig,
    pub theme: Theme,
    pub poll_interval: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            automation: AutomationConfig::default(),
            theme: Theme::Default,
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// The assembled bridge: state + control server + poller.
pub struct Bridge {
    state: BridgeState,
    server: ControlServer,
    poller: Arc<NotificationPoller>,
}

impl Bridge {
    pub fn new(settings: BridgeSettings) -> Self {
        let base_url = settings.automation.base_url.clone();
        let state = BridgeState::new(settings.automation, settings.theme);
        let poller = Arc::new(NotificationPoller::new(
            state.notifications.clone(),
            settings.poll_interval,
            base_url,
            state.page_lock.clone(),
        ));
        let server = ControlServer::new(state.clone());
        Self {
            state,
            server,
            poller,
        }
    }

    /// Handler-visible state, for tests and the embedding shell.
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    /// Start the control server on the given port. Fail-fast on invalid
    /// ports and bind conflicts.
    pub async fn start(&mut self, port: u32) -> Result<u16, DialshellError> {
        self.server.start(port).await
    }

    /// Stop the control server and the poller.
    pub async fn stop(&mut self) {
        self.poller.stop();
        self.server.stop().await;
    }

    /// Rebind the control server; an invalid port leaves it untouched.
    pub async fn set_port(&mut self, port: u32) -> Result<u16, DialshellError> {
        self.server.set_port(port).await
    }

    /// Currently bound port, if running.
    pub fn port(&self) -> Option<u16> {
        self.server.port()
    }

    /// Attach the embedded page and start polling notifications.
    ///
    /// `on_change` receives every observed count change; the shell turns it
    /// into its `notification_count_changed` event.
    pub fn attach_page(&self, page: Arc<dyn PageHost>, on_change: ChangeCallback) {
        self.state.page.attach(page.clone());
        self.poller.start(page, on_change);
    }

    /// Detach the page and stop polling. Safe when nothing is attached.
    pub fn detach_page(&self) {
        self.poller.stop();
        self.state.page.detach();
    }
}
