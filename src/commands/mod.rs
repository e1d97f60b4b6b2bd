//! # Command Handlers
//!
//! This module contains the command handlers for the rolodexctl CLI application.
//!
//! ## Structure
//!
//! - `client` - Client record commands (list, get, create, update, search)
//! - `shared` - Shared argument validation, parsing, and dispatch helpers

pub mod client;
pub mod shared;

pub use client::handle_client_command;
