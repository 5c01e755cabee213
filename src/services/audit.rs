//! Audit query service
//!
//! Read-side surface over the audit ledger for reporting.

use crate::audit::{AuditRecord, OperationType};
use crate::error::{RolodexError, RolodexResult};
use crate::models::ContactId;
use crate::storage::Storage;

/// Service for querying the audit ledger
pub struct AuditQueryService<'a> {
    storage: &'a Storage,
}

impl<'a> AuditQueryService<'a> {
    /// Create a new audit query service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List all audit records, newest first
    pub fn list(&self) -> RolodexResult<Vec<AuditRecord>> {
        self.storage.audit.list_all()
    }

    /// List audit records for one contact, newest first
    pub fn list_by_contact(&self, id: ContactId) -> RolodexResult<Vec<AuditRecord>> {
        self.storage.audit.list_by_subject(id.value())
    }

    /// List audit records for one operation type, newest first
    pub fn list_by_operation(&self, operation: OperationType) -> RolodexResult<Vec<AuditRecord>> {
        self.storage.audit.list_by_operation(operation)
    }

    /// Get a single audit record by its surrogate id
    pub fn get(&self, id: i64) -> RolodexResult<AuditRecord> {
        self.storage
            .audit
            .get(id)?
            .ok_or_else(|| RolodexError::record_not_found(id.to_string()))
    }
}
