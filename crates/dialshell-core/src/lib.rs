// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dialshell automation bridge.
//!
//! This crate provides the error taxonomy, the command/event model, the
//! read-only projections scraped from the embedded telephony page, and the
//! [`PageHost`] capability trait that the embedding desktop shell implements.

pub mod error;
pub mod traits;
pub mod types;

pub use error::DialshellError;
pub use traits::{PageHost, PageSlot};
pub use types::{
    CallCommandResult, CallRecord, CallStage, Command, Contact, DomElement, DomSnapshot, Event,
    MessageThread, SearchResult, Theme, UserInfo, Voicemail, decode_command,
};
