// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Control server lifecycle built on axum.
//!
//! Binds loopback only, on a validated port. Policy is fail-fast: an
//! invalid port or a bind conflict is a typed error, never a silent
//! migration to a neighboring port -- external clients must be able to
//! trust the configured address.

use axum::{
    Router,
    routing::{get, post},
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use dialshell_core::DialshellError;

use crate::handlers;
use crate::state::BridgeState;

/// Validate a configured port into a bindable one.
///
/// Out-of-range values are rejected with [`DialshellError::InvalidPort`];
/// the caller's running state is never touched on rejection.
pub fn validate_port(port: u32) -> Result<u16, DialshellError> {
    if (1..=65535).contains(&port) {
        Ok(port as u16)
    } else {
        Err(DialshellError::InvalidPort { port })
    }
}

/// Assemble the full route surface.
pub fn router(state: BridgeState) -> Router {
    Router::new()
        // Action routes.
        .route("/health", get(handlers::get_health))
        .route("/status", get(handlers::get_status))
        .route("/call", post(handlers::post_call))
        .route("/sms", post(handlers::post_sms))
        .route("/reload", post(handlers::post_reload))
        .route("/theme", post(handlers::post_theme))
        .route("/command", post(handlers::post_command))
        .route("/navigate/{view}", post(handlers::post_navigate))
        // Read/query routes.
        .route("/unread", get(handlers::get_unread))
        .route("/messages", get(handlers::get_messages))
        .route("/contacts", get(handlers::get_contacts))
        .route("/calls", get(handlers::get_calls))
        .route("/voicemails", get(handlers::get_voicemails))
        .route("/search", get(handlers::get_search))
        .route("/user", get(handlers::get_user))
        .route("/dump-dom", get(handlers::get_dump_dom))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

struct ActiveListener {
    port: u16,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// The loopback control server with start/stop/rebind lifecycle.
pub struct ControlServer {
    state: BridgeState,
    active: Option<ActiveListener>,
}

impl ControlServer {
    pub fn new(state: BridgeState) -> Self {
        Self {
            state,
            active: None,
        }
    }

    /// Bind and start serving on `127.0.0.1:port`.
    ///
    /// Fails with [`DialshellError::InvalidPort`] before binding when the
    /// port is out of range, and with a server error on bind conflicts.
    /// Returns the bound port.
    pub async fn start(&mut self, port: u32) -> Result<u16, DialshellError> {
        let port = validate_port(port)?;

        if let Some(active) = &self.active {
            return Err(DialshellError::Server {
                message: format!("control server already running on port {}", active.port),
                source: None,
            });
        }

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| DialshellError::Server {
                message: format!("failed to bind control server to 127.0.0.1:{port}: {e}"),
                source: Some(Box::new(e)),
            })?;

        let token = CancellationToken::new();
        let shutdown = token.clone();
        let app = router(self.state.clone());

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "control server exited with error");
            }
        });

        info!(port, "control server listening on 127.0.0.1");
        self.active = Some(ActiveListener {
            port,
            token,
            handle,
        });
        Ok(port)
    }

    /// Stop the listener and wait for in-flight requests to drain.
    /// Idempotent; leaves no listener bound.
    pub async fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            let _ = active.handle.await;
            debug!(port = active.port, "control server stopped");
        }
    }

    /// Rebind to a new port.
    ///
    /// Validates first: an invalid port leaves the running listener
    /// untouched. On a valid port the listener is stopped, rebound, and
    /// restarted.
    pub async fn set_port(&mut self, port: u32) -> Result<u16, DialshellError> {
        let validated = validate_port(port)?;
        self.stop().await;
        self.start(u32::from(validated)).await
    }

    /// Currently bound port, if running.
    pub fn port(&self) -> Option<u16> {
        self.active.as_ref().map(|a| a.port)
    }

    /// Whether the server is currently running.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialshell_automation::AutomationConfig;
    use dialshell_core::Theme;

    fn test_state() -> BridgeState {
        BridgeState::new(AutomationConfig::default(), Theme::Default)
    }

    /// Reserve a free loopback port by binding to 0 and dropping the
    /// listener.
    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn validate_port_accepts_the_full_range() {
        assert_eq!(validate_port(1).unwrap(), 1);
        assert_eq!(validate_port(65535).unwrap(), 65535);
        assert_eq!(validate_port(8090).unwrap(), 8090);
    }

    #[test]
    fn validate_port_rejects_out_of_range() {
        assert!(matches!(
            validate_port(0),
            Err(DialshellError::InvalidPort { port: 0 })
        ));
        assert!(matches!(
            validate_port(65536),
            Err(DialshellError::InvalidPort { port: 65536 })
        ));
        assert!(matches!(
            validate_port(70000),
            Err(DialshellError::InvalidPort { port: 70000 })
        ));
    }

    #[tokio::test]
    async fn start_and_stop_leaves_no_listener_bound() {
        let port = free_port();
        let mut server = ControlServer::new(test_state());

        server.start(u32::from(port)).await.unwrap();
        assert!(server.is_running());
        assert_eq!(server.port(), Some(port));

        server.stop().await;
        assert!(!server.is_running());

        // The port is free again: a fresh bind on it succeeds.
        let rebind = std::net::TcpListener::bind(("127.0.0.1", port));
        assert!(rebind.is_ok(), "stopped server must release its port");
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let mut server = ControlServer::new(test_state());
        server.stop().await;

        let port = free_port();
        server.start(u32::from(port)).await.unwrap();
        server.stop().await;
        server.stop().await;
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn invalid_start_never_mutates_running_state() {
        let mut server = ControlServer::new(test_state());
        let result = server.start(0).await;
        assert!(matches!(result, Err(DialshellError::InvalidPort { .. })));
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn set_port_rejects_invalid_and_keeps_the_old_listener() {
        let port = free_port();
        let mut server = ControlServer::new(test_state());
        server.start(u32::from(port)).await.unwrap();

        let result = server.set_port(70000).await;
        assert!(matches!(result, Err(DialshellError::InvalidPort { .. })));

        // The original listener is still serving.
        assert!(server.is_running());
        assert_eq!(server.port(), Some(port));
        let probe = tokio::net::TcpStream::connect(("127.0.0.1", port)).await;
        assert!(probe.is_ok(), "old listener must still accept connections");

        server.stop().await;
    }

    #[tokio::test]
    async fn set_port_rebinds_to_the_new_port() {
        let first = free_port();
        let second = free_port();
        let mut server = ControlServer::new(test_state());
        server.start(u32::from(first)).await.unwrap();

        let bound = server.set_port(u32::from(second)).await.unwrap();
        assert_eq!(bound, second);
        assert_eq!(server.port(), Some(second));

        // The first port is released.
        let rebind = std::net::TcpListener::bind(("127.0.0.1", first));
        assert!(rebind.is_ok());

        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_fails_fast() {
        let port = free_port();
        let _occupier = std::net::TcpListener::bind(("127.0.0.1", port)).unwrap();

        let mut server = ControlServer::new(test_state());
        let result = server.start(u32::from(port)).await;
        assert!(
            matches!(result, Err(DialshellError::Server { .. })),
            "no auto-increment: a conflict is an error"
        );
        assert!(!server.is_running());
    }
}
