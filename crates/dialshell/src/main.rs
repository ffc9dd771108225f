// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialshell - automation bridge for an embedded telephony web app.
//!
//! This is the binary entry point: `serve` runs the loopback control
//! server; every other subcommand is a thin HTTP client for a running
//! bridge.

use clap::{Parser, Subcommand};

use dialshell_core::Theme;

mod client;
mod serve;

/// Dialshell - automation bridge for an embedded telephony web app.
#[derive(Parser, Debug)]
#[command(name = "dialshell", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the control server.
    Serve,
    /// Show the bridge status (notifications, theme, connected).
    Status,
    /// Show the live unread count.
    Unread,
    /// List conversation threads.
    Messages {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List contacts.
    Contacts {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List call history.
    Calls {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List voicemails.
    Voicemails {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Search conversations and contacts.
    Search { query: String },
    /// Show the signed-in account.
    User,
    /// Dump the page structure for selector recalibration.
    DumpDom,
    /// Place a call.
    Call { number: String },
    /// Send an SMS.
    Sms { number: String, text: String },
    /// Change the active theme.
    Theme { theme: Theme },
    /// Force the page back to the base URL.
    Reload,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match dialshell_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            dialshell_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Some(Commands::Serve) => match serve::run_serve(config).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        },
        Some(command) => client::run(command, &config).await,
        None => {
            println!("dialshell: use --help for available commands");
            0
        }
    };
    std::process::exit(code);
}
