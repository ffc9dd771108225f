// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as the listen port range and non-zero polling values.

use crate::diagnostic::ConfigError;
use crate::model::DialshellConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DialshellConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.shell.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "shell.name must not be empty".to_string(),
        });
    }

    if !(1..=65535).contains(&config.bridge.port) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bridge.port must be in 1..=65535, got {}",
                config.bridge.port
            ),
        });
    }

    let url = config.page.base_url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("page.base_url `{url}` must start with http:// or https://"),
        });
    }

    if config.page.ready_poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "page.ready_poll_interval_ms must be non-zero".to_string(),
        });
    }

    if config.page.ready_max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "page.ready_max_attempts must be non-zero".to_string(),
        });
    }

    if config.page.click_retry_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "page.click_retry_interval_ms must be non-zero".to_string(),
        });
    }

    if config.page.click_max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "page.click_max_attempts must be non-zero".to_string(),
        });
    }

    if config.poller.interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "poller.interval_ms must be non-zero".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
