// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page host capability trait and the slot the bridge holds it in.
//!
//! The embedded browser runtime lives outside this workspace. Everything the
//! bridge knows about it is expressed through [`PageHost`]: run a script and
//! get its JSON result back, or fail. The page may navigate away or reload
//! mid-flight, so in-flight evaluations can resolve with stale or null data;
//! callers treat null/missing fields as "not found", never as a crash.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::DialshellError;

/// Capability interface to the embedded page.
///
/// Every operation is fallible with [`DialshellError::PageUnavailable`] when
/// the embedded view has been torn down. No operation is assumed to complete
/// within a bounded time by itself; callers that need a bound apply their own
/// polling or timeout.
#[async_trait]
pub trait PageHost: Send + Sync {
    /// Execute a script in the page context and return its result.
    async fn execute(&self, script: &str) -> Result<serde_json::Value, DialshellError>;

    /// Navigate the page to the given URL.
    async fn navigate(&self, url: &str) -> Result<(), DialshellError>;

    /// Reload the current page.
    async fn reload(&self) -> Result<(), DialshellError>;
}

/// Explicit dependency-injected holder for an optional [`PageHost`].
///
/// The seam between the control server and the page-owning shell. The slot
/// starts unset; every call path treats the unset state as "unavailable"
/// (degraded response), never as a crash. The embedding shell attaches the
/// real webview once it exists and detaches it on teardown.
#[derive(Clone, Default)]
pub struct PageSlot {
    inner: Arc<RwLock<Option<Arc<dyn PageHost>>>>,
}

impl PageSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a page host, replacing any previous binding.
    pub fn attach(&self, page: Arc<dyn PageHost>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(page);
    }

    /// Clear the binding. Idempotent.
    pub fn detach(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Snapshot the current binding, if any.
    pub fn get(&self) -> Option<Arc<dyn PageHost>> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Whether a page is currently attached.
    pub fn is_attached(&self) -> bool {
        self.get().is_some()
    }
}
