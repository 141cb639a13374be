//! `folio` - Portfolio content store with GitHub-backed sync
//!
//! This library owns a portfolio website's content document: an in-memory
//! store with change notification, a device-local cache, JSON import/export,
//! and an optional remote sync client with request serialization, rate-limit
//! backoff and optimistic concurrency.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod remote;
pub mod store;
pub mod transfer;

pub use bootstrap::resolve_initial_document;
pub use cache::LocalCache;
pub use config::Config;
pub use document::PortfolioDocument;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use remote::SyncClient;
pub use store::DocumentStore;
