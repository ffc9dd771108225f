// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dialshell serve` command implementation.
//!
//! Starts the loopback control server with an unset page slot. The desktop
//! shell embeds `dialshell-bridge` as a library and attaches the real
//! webview; this headless mode exists for development and for driving the
//! route surface with external clients.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use dialshell_automation::{AutomationConfig, PollPolicy};
use dialshell_bridge::{Bridge, BridgeSettings};
use dialshell_config::DialshellConfig;
use dialshell_core::DialshellError;

/// Resolve bridge settings from the loaded configuration.
fn bridge_settings(config: &DialshellConfig) -> BridgeSettings {
    BridgeSettings {
        automation: AutomationConfig {
            base_url: config.page.base_url.clone(),
            ready: PollPolicy::new(
                Duration::from_millis(config.page.ready_poll_interval_ms),
                config.page.ready_max_attempts,
            ),
            click: PollPolicy::new(
                Duration::from_millis(config.page.click_retry_interval_ms),
                config.page.click_max_attempts,
            ),
        },
        theme: config.theme.name,
        poll_interval: Duration::from_millis(config.poller.interval_ms),
    }
}

/// Runs the `dialshell serve` command.
///
/// Binds the control server on the configured port and runs until SIGINT
/// or SIGTERM.
pub async fn run_serve(config: DialshellConfig) -> Result<(), DialshellError> {
    init_tracing(&config.shell.log_level);

    info!("starting dialshell serve");

    if !config.bridge.enabled {
        info!("bridge disabled by configuration, nothing to do");
        return Ok(());
    }

    let mut bridge = Bridge::new(bridge_settings(&config));
    let port = bridge.start(config.bridge.port).await?;
    info!(
        port,
        base_url = %config.page.base_url,
        "control server ready; commands degrade until a page is attached"
    );

    let token = install_signal_handler();
    token.cancelled().await;

    info!("shutting down");
    bridge.stop().await;
    Ok(())
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dialshell={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
