//! REST client for the field-merchandising backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` holds the explicit session context (server address, bearer
//! token, role) and its on-disk store, `client` issues authenticated
//! requests built from that context, and `types` mirrors the backend's JSON
//! schemas. Nothing in this crate reads ambient global state: every request
//! is built from the `SessionContext` handed to `ApiClient::new`.

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, SessionError};
pub use session::{SessionContext, SessionStore};
