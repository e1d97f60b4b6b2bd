//! # Rolodex: A Small Service for Client Contact Records
//!
//! Rolodex keeps a collection of client contact records (id, name, email, phone)
//! and exposes create, list, update, find-by-id, and name search over HTTP. Records
//! live in memory; creation events are handed to a pluggable sink that stands in
//! for an external message bus.
//!
//! This crate provides:
//!
//! - **Client Records**: the [`Client`] entity and its JSON/YAML wire format
//! - **Validation**: [`validate_client`] reports every missing or malformed field
//! - **Repository**: the [`ClientRepository`] trait and a thread-safe in-memory backend
//! - **Event Publishing**: fire-and-forget notifications via [`EventPublisher`]
//! - **HTTP API**: an Axum router built by [`create_client_router`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes)            │
//! ├────────────────────┬────────────────────┤
//! │ Validation         │ Event Publisher    │
//! ├────────────────────┴────────────────────┤
//! │ Client Repository (trait)               │
//! ├─────────────────────────────────────────┤
//! │ In-memory store (Mutex, insertion order)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Wiring the API
//!
//! ```rust
//! # use rolodex::{create_client_router, InMemoryClientRepository, NoopEventPublisher};
//! # use std::sync::Arc;
//! let repository = Arc::new(InMemoryClientRepository::new());
//! let app = create_client_router(repository, Arc::new(NoopEventPublisher));
//! # let _ = app;
//! ```
//!
//! ### Validating and Storing Clients
//!
//! ```rust
//! # use rolodex::{Client, ClientRepository, InMemoryClientRepository, validate_client};
//! let repository = InMemoryClientRepository::new();
//! let client = Client::new("A", "Junvic", "Valdez", "contact@junvic.me", "+123456789");
//!
//! validate_client(&client).unwrap();
//! repository.create(&client).unwrap();
//!
//! let mut renamed = client.clone();
//! renamed.first_name = "John".to_string();
//! assert!(repository.update(&renamed).unwrap());
//! assert_eq!(repository.find_by_id("A").unwrap().unwrap().first_name, "John");
//! ```

#![deny(missing_docs)]
mod client;
mod errors;
mod publisher;
mod repository;
mod validate;

/// Command-line interface utilities for program termination and output formatting.
pub mod cli_utils;

/// Command-line interface command handlers for rolodexctl.
pub mod commands;

/// Server configuration and seed-file loading.
pub mod config;

/// HTTP client utilities for talking to a rolodex server.
pub mod http_utils;

/// Tracing subscriber setup shared by the binaries.
pub mod telemetry;

pub use client::{Client, client_path, create_client_router, search_path};
pub use errors::{ApiError, ProblemDetails, RepositoryError, VALIDATION_TITLE};
pub use publisher::{
    ChannelEventPublisher, ClientEvent, ClientEventKind, EventLog, EventPublisher, EventSink,
    NoopEventPublisher,
};
pub use repository::{ClientRepository, InMemoryClientRepository};
pub use validate::{ValidationErrors, is_valid_email, validate_client};
