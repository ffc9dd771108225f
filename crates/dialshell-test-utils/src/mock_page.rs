// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock page host for deterministic testing.
//!
//! `MockPage` implements `PageHost` with injectable script results and
//! captured script/navigation history for assertion in tests. It doubles as
//! a call-count spy: routes that must not touch the page can assert
//! `execute_count() == 0`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use dialshell_core::{DialshellError, PageHost};

/// Closure that answers script evaluations by inspecting the script source.
pub type ScriptResponder = dyn Fn(&str) -> Result<Value, DialshellError> + Send + Sync;

/// A mock embedded page for testing.
///
/// Two answering modes:
/// - **queue**: results injected via `push_result()`/`push_error()` are
///   returned by `execute()` in FIFO order; `Value::Null` once drained.
/// - **responder**: a closure inspects each script and produces the result,
///   for tests where probe ordering is not known in advance.
pub struct MockPage {
    results: Mutex<VecDeque<Result<Value, DialshellError>>>,
    responder: Option<Arc<ScriptResponder>>,
    executed: Mutex<Vec<String>>,
    navigated: Mutex<Vec<String>>,
    execute_calls: AtomicU32,
    reloads: AtomicU32,
    unavailable: AtomicBool,
}

impl MockPage {
    /// Create a queue-mode mock with no scripted results.
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            responder: None,
            executed: Mutex::new(Vec::new()),
            navigated: Mutex::new(Vec::new()),
            execute_calls: AtomicU32::new(0),
            reloads: AtomicU32::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create a responder-mode mock.
    pub fn with_responder(
        responder: impl Fn(&str) -> Result<Value, DialshellError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Some(Arc::new(responder)),
            ..Self::new()
        }
    }

    /// Queue a successful script result.
    pub async fn push_result(&self, value: Value) {
        self.results.lock().await.push_back(Ok(value));
    }

    /// Queue a script execution failure.
    pub async fn push_error(&self, error: DialshellError) {
        self.results.lock().await.push_back(Err(error));
    }

    /// Make every subsequent operation fail with `PageUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All scripts passed to `execute()` so far.
    pub async fn executed_scripts(&self) -> Vec<String> {
        self.executed.lock().await.clone()
    }

    /// How many times `execute()` was called (including failed calls).
    pub fn execute_count(&self) -> u32 {
        self.execute_calls.load(Ordering::SeqCst)
    }

    /// All URLs passed to `navigate()` so far.
    pub async fn navigations(&self) -> Vec<String> {
        self.navigated.lock().await.clone()
    }

    /// How many times `reload()` was called.
    pub fn reload_count(&self) -> u32 {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageHost for MockPage {
    async fn execute(&self, script: &str) -> Result<Value, DialshellError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        self.executed.lock().await.push(script.to_string());

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DialshellError::PageUnavailable);
        }

        if let Some(responder) = &self.responder {
            return responder(script);
        }

        match self.results.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(Value::Null),
        }
    }

    async fn navigate(&self, url: &str) -> Result<(), DialshellError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DialshellError::PageUnavailable);
        }
        self.navigated.lock().await.push(url.to_string());
        Ok(())
    }

    async fn reload(&self) -> Result<(), DialshellError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DialshellError::PageUnavailable);
        }
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_mode_returns_results_in_order() {
        let page = MockPage::new();
        page.push_result(Value::from(1)).await;
        page.push_result(Value::from(2)).await;

        assert_eq!(page.execute("probe()").await.unwrap(), Value::from(1));
        assert_eq!(page.execute("probe()").await.unwrap(), Value::from(2));
        // Drained queue yields null.
        assert_eq!(page.execute("probe()").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn responder_mode_inspects_script_source() {
        let page = MockPage::with_responder(|script| {
            if script.contains("badge") {
                Ok(Value::from(7))
            } else {
                Ok(Value::Bool(false))
            }
        });

        assert_eq!(page.execute("count badge text").await.unwrap(), Value::from(7));
        assert_eq!(page.execute("other").await.unwrap(), Value::Bool(false));
    }

    #[tokio::test]
    async fn spy_counts_and_records() {
        let page = MockPage::new();
        page.execute("a()").await.unwrap();
        page.execute("b()").await.unwrap();
        page.navigate("https://voice.example.com").await.unwrap();

        assert_eq!(page.execute_count(), 2);
        assert_eq!(page.executed_scripts().await, vec!["a()", "b()"]);
        assert_eq!(page.navigations().await, vec!["https://voice.example.com"]);
    }

    #[tokio::test]
    async fn unavailable_fails_every_operation() {
        let page = MockPage::new();
        page.set_unavailable(true);

        assert!(matches!(
            page.execute("x()").await,
            Err(DialshellError::PageUnavailable)
        ));
        assert!(matches!(
            page.navigate("https://example.com").await,
            Err(DialshellError::PageUnavailable)
        ));
        assert!(matches!(page.reload().await, Err(DialshellError::PageUnavailable)));
        // Failed executes still count toward the spy.
        assert_eq!(page.execute_count(), 1);
    }
}
