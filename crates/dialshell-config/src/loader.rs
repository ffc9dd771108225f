// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dialshell.toml` > `~/.config/dialshell/dialshell.toml`
//! > `/etc/dialshell/dialshell.toml` with environment variable overrides via
//! `DIALSHELL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DialshellConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dialshell/dialshell.toml` (system-wide)
/// 3. `~/.config/dialshell/dialshell.toml` (user XDG config)
/// 4. `./dialshell.toml` (local directory)
/// 5. `DIALSHELL_*` environment variables
pub fn load_config() -> Result<DialshellConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialshellConfig::default()))
        .merge(Toml::file("/etc/dialshell/dialshell.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dialshell/dialshell.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dialshell.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DialshellConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialshellConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DialshellConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialshellConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DIALSHELL_PAGE_BASE_URL` must map to
/// `page.base_url`, not `page.base.url`.
fn env_provider() -> Env {
    Env::prefixed("DIALSHELL_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: DIALSHELL_BRIDGE_PORT -> "bridge_port"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("shell_", "shell.", 1)
            .replacen("bridge_", "bridge.", 1)
            .replacen("page_", "page.", 1)
            .replacen("poller_", "poller.", 1)
            .replacen("theme_", "theme.", 1);
        mapped.into()
    })
}
