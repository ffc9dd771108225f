// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client side of the CLI: every subcommand is a thin 1:1 mapping to
//! one control-server route, JSON in, JSON out.
//!
//! Client-side failures render a `{error, tool, hint}` object so scripted
//! callers (and humans) always get structured output, with the "make sure
//! the app is running" hint on connection refusal.

use serde::Serialize;
use serde_json::{Value, json};

use dialshell_config::DialshellConfig;

use crate::Commands;

/// Structured client-side failure, rendered as JSON on stderr.
#[derive(Debug, Serialize)]
struct ClientError {
    error: String,
    tool: String,
    hint: String,
}

/// Thin loopback client for a running bridge.
struct BridgeClient {
    base: String,
    http: reqwest::Client,
}

impl BridgeClient {
    fn new(port: u32) -> Self {
        Self {
            base: format!("http://127.0.0.1:{port}"),
            http: reqwest::Client::new(),
        }
    }

    async fn get(
        &self,
        tool: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base))
            .query(query)
            .send()
            .await
            .map_err(|e| client_error(tool, &e))?;
        decode(tool, response).await
    }

    async fn post(&self, tool: &str, path: &str, body: Value) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .map_err(|e| client_error(tool, &e))?;
        decode(tool, response).await
    }
}

fn client_error(tool: &str, error: &reqwest::Error) -> ClientError {
    let hint = if error.is_connect() {
        "make sure the dialshell app is running".to_string()
    } else {
        "check the bridge port configuration".to_string()
    };
    ClientError {
        error: error.to_string(),
        tool: tool.to_string(),
        hint,
    }
}

async fn decode(tool: &str, response: reqwest::Response) -> Result<Value, ClientError> {
    response.json().await.map_err(|e| ClientError {
        error: format!("invalid response body: {e}"),
        tool: tool.to_string(),
        hint: "the bridge may be a different version".to_string(),
    })
}

/// Execute one client subcommand against the configured bridge port.
/// Returns the process exit code.
pub async fn run(command: Commands, config: &DialshellConfig) -> i32 {
    let client = BridgeClient::new(config.bridge.port);

    let result = match command {
        Commands::Status => client.get("status", "/status", &[]).await,
        Commands::Unread => client.get("unread", "/unread", &[]).await,
        Commands::Messages { limit } => {
            client
                .get("messages", "/messages", &[("limit", limit.to_string())])
                .await
        }
        Commands::Contacts { limit } => {
            client
                .get("contacts", "/contacts", &[("limit", limit.to_string())])
                .await
        }
        Commands::Calls { limit } => {
            client
                .get("calls", "/calls", &[("limit", limit.to_string())])
                .await
        }
        Commands::Voicemails { limit } => {
            client
                .get("voicemails", "/voicemails", &[("limit", limit.to_string())])
                .await
        }
        Commands::Search { query } => client.get("search", "/search", &[("q", query)]).await,
        Commands::User => client.get("user", "/user", &[]).await,
        Commands::DumpDom => client.get("dump-dom", "/dump-dom", &[]).await,
        Commands::Call { number } => {
            client.post("call", "/call", json!({"number": number})).await
        }
        Commands::Sms { number, text } => {
            client
                .post("sms", "/sms", json!({"number": number, "text": text}))
                .await
        }
        Commands::Theme { theme } => {
            client
                .post("theme", "/theme", json!({"theme": theme}))
                .await
        }
        Commands::Reload => client.post("reload", "/reload", json!({})).await,
        Commands::Serve => unreachable!("serve is handled before the client"),
    };

    match result {
        Ok(value) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            );
            0
        }
        Err(error) => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error)
                    .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", error.error))
            );
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_serializes_all_fields() {
        let error = ClientError {
            error: "connection refused".to_string(),
            tool: "status".to_string(),
            hint: "make sure the dialshell app is running".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"error\":\"connection refused\""));
        assert!(json.contains("\"tool\":\"status\""));
        assert!(json.contains("\"hint\""));
    }

    #[test]
    fn base_url_targets_loopback() {
        let client = BridgeClient::new(8090);
        assert_eq!(client.base, "http://127.0.0.1:8090");
    }
}
