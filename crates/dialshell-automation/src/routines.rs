// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automation routines: script template + result decoder pairs.
//!
//! Decoders follow the degrade-over-fail policy: a null result or a
//! malformed list entry becomes an empty/default value, never a hard error
//! for an individual field. Only a page-level failure propagates.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use dialshell_core::{
    CallRecord, Contact, DialshellError, DomSnapshot, MessageThread, PageHost, SearchResult,
    UserInfo, Voicemail,
};

use crate::script::ScriptCall;
use crate::templates;

/// Default list cap for message/voicemail reads.
pub const DEFAULT_THREAD_LIMIT: usize = 10;
/// Default list cap for contact/call-history reads.
pub const DEFAULT_LIST_LIMIT: usize = 20;
/// Cap on generic interactive elements in a DOM dump.
pub const DUMP_MAX_ELEMENTS: usize = 100;

// --- Script builders ---

pub fn unread_badges() -> ScriptCall {
    ScriptCall::new(templates::UNREAD_BADGES)
}

pub fn list_messages(limit: usize) -> ScriptCall {
    ScriptCall::new(templates::LIST_MESSAGES).arg(json!(limit))
}

pub fn list_contacts(limit: usize) -> ScriptCall {
    ScriptCall::new(templates::LIST_CONTACTS).arg(json!(limit))
}

pub fn list_calls(limit: usize) -> ScriptCall {
    ScriptCall::new(templates::LIST_CALLS).arg(json!(limit))
}

pub fn list_voicemails(limit: usize) -> ScriptCall {
    ScriptCall::new(templates::LIST_VOICEMAILS).arg(json!(limit))
}

pub fn is_logged_in() -> ScriptCall {
    ScriptCall::new(templates::IS_LOGGED_IN)
}

pub fn current_user() -> ScriptCall {
    ScriptCall::new(templates::CURRENT_USER)
}

pub fn search(query: &str, limit: usize) -> ScriptCall {
    ScriptCall::new(templates::SEARCH)
        .arg(json!(query))
        .arg(json!(limit))
}

pub fn dump_dom() -> ScriptCall {
    ScriptCall::new(templates::DUMP_DOM).arg(json!(DUMP_MAX_ELEMENTS))
}

pub fn dialer_ready() -> ScriptCall {
    ScriptCall::new(templates::DIALER_READY)
}

pub fn compose_ready() -> ScriptCall {
    ScriptCall::new(templates::COMPOSE_READY)
}

pub fn blank_page() -> ScriptCall {
    ScriptCall::new(templates::BLANK_PAGE)
}

pub fn click_control(keywords: &[&str], fallbacks: &[&str]) -> ScriptCall {
    ScriptCall::new(templates::CLICK_CONTROL)
        .arg(json!(keywords))
        .arg(json!(fallbacks))
}

pub fn fill_sms(number: &str, text: &str) -> ScriptCall {
    ScriptCall::new(templates::FILL_SMS)
        .arg(json!(number))
        .arg(json!(text))
}

// --- Decoders ---

/// Sum badge texts, skipping non-numeric entries rather than erroring the
/// whole sum.
pub fn decode_unread(value: Value) -> u32 {
    match value {
        Value::Array(texts) => texts
            .iter()
            .filter_map(|t| t.as_str())
            .filter_map(|t| t.trim().parse::<u32>().ok())
            .sum(),
        // An older template shape returned the sum directly; tolerate it.
        Value::Number(n) => n.as_u64().unwrap_or(0).min(u64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Decode a scraped list, capping at `limit` and skipping entries that do
/// not decode (each field already defaults, so this is rare).
pub fn decode_list<T: DeserializeOwned>(value: Value, limit: usize) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .take(limit)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

// --- High-level fetch helpers ---

pub async fn fetch_unread(page: &dyn PageHost) -> Result<u32, DialshellError> {
    let value = page.execute(&unread_badges().render()).await?;
    Ok(decode_unread(value))
}

pub async fn fetch_messages(
    page: &dyn PageHost,
    limit: usize,
) -> Result<Vec<MessageThread>, DialshellError> {
    let value = page.execute(&list_messages(limit).render()).await?;
    Ok(decode_list(value, limit))
}

pub async fn fetch_contacts(
    page: &dyn PageHost,
    limit: usize,
) -> Result<Vec<Contact>, DialshellError> {
    let value = page.execute(&list_contacts(limit).render()).await?;
    Ok(decode_list(value, limit))
}

pub async fn fetch_call_history(
    page: &dyn PageHost,
    limit: usize,
) -> Result<Vec<CallRecord>, DialshellError> {
    let value = page.execute(&list_calls(limit).render()).await?;
    Ok(decode_list(value, limit))
}

pub async fn fetch_voicemails(
    page: &dyn PageHost,
    limit: usize,
) -> Result<Vec<Voicemail>, DialshellError> {
    let value = page.execute(&list_voicemails(limit).render()).await?;
    Ok(decode_list(value, limit))
}

pub async fn fetch_logged_in(page: &dyn PageHost) -> Result<bool, DialshellError> {
    let value = page.execute(&is_logged_in().render()).await?;
    Ok(value.as_bool().unwrap_or(false))
}

pub async fn fetch_user(page: &dyn PageHost) -> Result<UserInfo, DialshellError> {
    let value = page.execute(&current_user().render()).await?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

pub async fn fetch_search(
    page: &dyn PageHost,
    query: &str,
    limit: usize,
) -> Result<Vec<SearchResult>, DialshellError> {
    let value = page.execute(&search(query, limit).render()).await?;
    Ok(decode_list(value, limit))
}

pub async fn fetch_dom_snapshot(page: &dyn PageHost) -> Result<DomSnapshot, DialshellError> {
    let value = page.execute(&dump_dom().render()).await?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
