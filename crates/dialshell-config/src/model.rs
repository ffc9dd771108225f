// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dialshell bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use dialshell_core::Theme;
use serde::{Deserialize, Serialize};

/// Top-level Dialshell configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialshellConfig {
    /// Shell identity and logging settings.
    #[serde(default)]
    pub shell: ShellConfig,

    /// Control server (bridge) settings.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Embedded page and automation timing settings.
    #[serde(default)]
    pub page: PageConfig,

    /// Notification poller settings.
    #[serde(default)]
    pub poller: PollerConfig,

    /// Active theme settings.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Shell identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Display name of the shell.
    #[serde(default = "default_shell_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: default_shell_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_shell_name() -> String {
    "dialshell".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Control server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Loopback port the control server listens on.
    ///
    /// Kept as `u32` so out-of-range values survive deserialization and can
    /// be rejected with a typed error at bridge start.
    #[serde(default = "default_bridge_port")]
    pub port: u32,

    /// Whether the control server starts at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: default_bridge_port(),
            enabled: true,
        }
    }
}

fn default_bridge_port() -> u32 {
    8090
}

fn default_true() -> bool {
    true
}

/// Embedded page URL and automation timing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    /// Base URL of the telephony web application.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Poll interval for the page-readiness probe, in milliseconds.
    #[serde(default = "default_ready_poll_interval_ms")]
    pub ready_poll_interval_ms: u64,

    /// Maximum readiness probe attempts before giving up.
    #[serde(default = "default_ready_max_attempts")]
    pub ready_max_attempts: u32,

    /// Retry interval for click actions, in milliseconds.
    #[serde(default = "default_click_retry_interval_ms")]
    pub click_retry_interval_ms: u64,

    /// Maximum click attempts before reporting not-found.
    #[serde(default = "default_click_max_attempts")]
    pub click_max_attempts: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ready_poll_interval_ms: default_ready_poll_interval_ms(),
            ready_max_attempts: default_ready_max_attempts(),
            click_retry_interval_ms: default_click_retry_interval_ms(),
            click_max_attempts: default_click_max_attempts(),
        }
    }
}

fn default_base_url() -> String {
    "https://voice.google.com".to_string()
}

fn default_ready_poll_interval_ms() -> u64 {
    400
}

fn default_ready_max_attempts() -> u32 {
    25
}

fn default_click_retry_interval_ms() -> u64 {
    500
}

fn default_click_max_attempts() -> u32 {
    8
}

/// Notification poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollerConfig {
    /// Probe interval in milliseconds.
    #[serde(default = "default_poller_interval_ms")]
    pub interval_ms: u64,

    /// Whether the poller starts when a page is attached.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poller_interval_ms(),
            enabled: true,
        }
    }
}

fn default_poller_interval_ms() -> u64 {
    3000
}

/// Active theme configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Theme name. Unknown names are rejected at load time.
    #[serde(default)]
    pub name: Theme,
}
