//! rolodex-cli - Terminal-based contact manager with a full audit trail
//!
//! This library provides the core functionality for the rolodex-cli
//! application: contact management where every mutation transparently leaves
//! an immutable before/after audit record, committed together with the
//! business change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (contacts and their identifiers)
//! - `audit`: Audit capture and dispatch (interceptor, registries, ledger types)
//! - `storage`: JSON file storage layer and the append-only audit ledger
//! - `services`: Business logic layer
//! - `cli`: Command-line interface handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use rolodex::config::{paths::RolodexPaths, settings::Settings};
//! use rolodex::services::{audit_interceptor, ContactService, CreateContact};
//! use rolodex::storage::Storage;
//!
//! let paths = RolodexPaths::new()?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let interceptor = audit_interceptor(&storage);
//! let contacts = ContactService::new(&storage, &interceptor);
//! contacts.create(CreateContact {
//!     name: "Alice".into(),
//!     phone: "0911111111".into(),
//!     address: None,
//! })?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::RolodexError;
