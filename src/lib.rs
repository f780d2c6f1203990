//! # Lsup - Language Server Updater
//!
//! A command-line utility for installing an external language-server binary
//! and keeping it current on a stable or nightly release channel.
//!
//! ## Features
//!
//! - **Channel Tracking**: Derive the installed channel from release tags
//! - **Update Orchestration**: Decide between no-op, stable reinstall, and
//!   nightly fetch+install on every invocation
//! - **Durable State**: Release tag and date persisted across restarts
//! - **Configuration**: JSON settings with an interactive setup wizard and
//!   restart prompts for reload-required keys
//! - **Hard Restart**: Successful installs end in a full process restart
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lsup::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
