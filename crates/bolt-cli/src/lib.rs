//! bolt - game client launcher
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Acquires, updates and launches game clients through a local launch
//! endpoint.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.bolt/
//! ├── config.toml     # Endpoints and client toggles (optional)
//! └── installed.toml  # Last launched identifier per provider
//! ```

pub mod cmd;
pub mod paths;
pub mod settings;
pub mod store;

pub use bolt_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bolt")]
#[command(author, version = env!("BOLT_VERSION"), about = "bolt - acquire, update and launch game clients")]
pub struct Cli {
    /// Settings file (defaults to ~/.bolt/config.toml)
    #[arg(long, global = true, env = "BOLT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Update a client if needed, then launch it
    Launch {
        /// Provider tag, e.g. rs3-deb, runelite, hdos, osrs-exe
        provider: String,
        /// Game session id
        #[arg(long, env = "JX_SESSION_ID")]
        session_id: Option<String>,
        /// Character id to log in as
        #[arg(long, env = "JX_CHARACTER_ID")]
        character_id: Option<String>,
        /// Character display name
        #[arg(long, env = "JX_DISPLAY_NAME")]
        display_name: Option<String>,
        /// Open the client's configuration mode (RuneLite only)
        #[arg(long)]
        configure: bool,
    },
    /// Check whether an update is available without launching
    Check {
        /// Provider tag
        provider: String,
    },
    /// Show the recorded identifier for each provider
    Installed,
    /// List provider tags
    Providers,
}
