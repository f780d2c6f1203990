//! Core library modules for the lsup application.
//!
//! Serves as the main entry point for all lsup library components.
//!
//! ## Features
//!
//! - **Core Infrastructure**: Configuration, data storage, messaging
//! - **Release Channels**: Tag parsing and stable/nightly derivation
//! - **Update Pipeline**: Release metadata, artifact download, installation
//! - **Process Control**: Hard restart primitive
//! - **User Interface**: Console rendering of installation status

pub mod channel;
pub mod config;
pub mod data_storage;
pub mod messages;
pub mod release;
pub mod restart;
pub mod state;
pub mod update;
pub mod view;
