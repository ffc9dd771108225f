// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Script invocation with structured value-passing.
//!
//! A [`ScriptCall`] pairs a JavaScript function-expression template with a
//! list of JSON arguments. Rendering produces
//! `(template).apply(null, <json args>)`, so argument values reach the page
//! as data, never as spliced source text. This replaces ad hoc quote/newline
//! escaping: a message body containing `'); alert(1); ('` stays an ordinary
//! string inside the page.

use serde_json::Value;

/// One invocation of a page-side script template with bound arguments.
#[derive(Debug, Clone)]
pub struct ScriptCall {
    template: &'static str,
    args: Vec<Value>,
}

impl ScriptCall {
    /// Wrap a template with no arguments.
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            args: Vec::new(),
        }
    }

    /// Append one bound argument.
    pub fn arg(mut self, value: Value) -> Self {
        self.args.push(value);
        self
    }

    /// Render the executable source.
    pub fn render(&self) -> String {
        let args = serde_json::to_string(&self.args).unwrap_or_else(|_| "[]".to_string());
        format!("({}).apply(null, {})", self.template, args)
    }
}
