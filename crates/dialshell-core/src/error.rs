// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dialshell bridge.

use thiserror::Error;

/// The primary error type used across the bridge, automation routines,
/// and page capability traits.
#[derive(Debug, Error)]
pub enum DialshellError {
    /// Configuration errors surfaced at the point of use.
    #[error("configuration error: {0}")]
    Config(String),

    /// A listen port outside the valid range [1, 65535].
    ///
    /// Raised by bridge start/update. The bridge never clamps; clamping to
    /// a default is only acceptable at the configuration-loading boundary.
    #[error("invalid port {port}: must be in 1..=65535")]
    InvalidPort { port: u32 },

    /// The embedded page has been torn down or was never attached.
    #[error("embedded page unavailable")]
    PageUnavailable,

    /// Script execution failed inside the page context.
    #[error("page script error: {message}")]
    Page {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A script result did not match the expected shape.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A command carried an unrecognized discriminant.
    #[error("unknown command variant `{variant}`")]
    UnknownVariant { variant: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Control server errors (bind failure, serve failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
