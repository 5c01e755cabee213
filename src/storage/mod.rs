//! Storage layer for rolodex-cli
//!
//! Provides JSON file storage with atomic writes for contacts and an
//! append-only JSONL ledger for audit records.

pub mod contacts;
pub mod file_io;
pub mod ledger;

pub use contacts::ContactStore;
pub use file_io::{read_json, write_json_atomic};
pub use ledger::AuditLedger;

use std::sync::Arc;

use crate::config::paths::RolodexPaths;
use crate::error::RolodexError;

/// Main storage coordinator that provides access to all stores
///
/// The stores are shared (`Arc`) so the audit interceptor and its handlers
/// can hold the read and persist capabilities they need.
pub struct Storage {
    paths: RolodexPaths,
    pub contacts: Arc<ContactStore>,
    pub audit: Arc<AuditLedger>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: RolodexPaths) -> Result<Self, RolodexError> {
        paths.ensure_directories()?;

        Ok(Self {
            contacts: Arc::new(ContactStore::new(paths.contacts_file())),
            audit: Arc::new(AuditLedger::open(paths.audit_ledger_file())?),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &RolodexPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), RolodexError> {
        self.contacts.load()?;
        Ok(())
    }
}
