//! The persisted audit-ledger entry
//!
//! An [`AuditRecord`] is the durable, append-only fact describing one
//! operation on a subject. Records are created through [`AuditRecord::new`],
//! which stamps the operation time, and are never mutated afterwards; the
//! surrogate id is assigned by the ledger on append.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::{AuditContext, OperationType, SubjectId};
use crate::error::RolodexResult;

/// A single immutable audit-ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Surrogate key, assigned by the ledger on append
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Identifier of the affected subject
    pub subject_id: SubjectId,

    /// When the record was created (UTC)
    pub operation_time: DateTime<Utc>,

    /// Type of operation performed
    pub operation: OperationType,

    /// Serialized snapshot of the subject before the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_data: Option<String>,

    /// Serialized snapshot of the subject after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_data: Option<String>,
}

impl AuditRecord {
    /// Create a new, not-yet-persisted record, stamping the operation time.
    pub fn new(
        subject_id: SubjectId,
        operation: OperationType,
        before_data: Option<String>,
        after_data: Option<String>,
    ) -> Self {
        Self {
            id: None,
            subject_id,
            operation_time: Utc::now(),
            operation,
            before_data,
            after_data,
        }
    }

    /// Build a record from a finished [`AuditContext`].
    ///
    /// Returns `None` when the context carries no subject identity; no record
    /// is ever created for an unresolved subject.
    pub fn from_context(context: &AuditContext) -> Option<Self> {
        let subject_id = context.subject_id()?;
        Some(Self::new(
            subject_id,
            context.operation(),
            context.before().map(str::to_owned),
            context.after().map(str::to_owned),
        ))
    }
}

/// Capability to persist immutable audit records.
///
/// Implemented by the audit ledger; the dispatch path only depends on this
/// trait, never on a concrete store.
pub trait AuditSink: Send + Sync {
    /// Append a single record, assigning its surrogate id.
    fn append(&self, record: AuditRecord) -> RolodexResult<AuditRecord>;

    /// Append a batch of records in order, assigning surrogate ids.
    fn append_all(&self, records: Vec<AuditRecord>) -> RolodexResult<Vec<AuditRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_operation_time() {
        let before = Utc::now();
        let record = AuditRecord::new(1, OperationType::Create, None, Some("{}".into()));
        let after = Utc::now();

        assert!(record.id.is_none());
        assert!(record.operation_time >= before && record.operation_time <= after);
    }

    #[test]
    fn test_from_context() {
        let ctx = AuditContext::for_update("Contact", 5, Some("{\"a\":1}".into()), Some("{\"a\":2}".into()));
        let record = AuditRecord::from_context(&ctx).unwrap();

        assert_eq!(record.subject_id, 5);
        assert_eq!(record.operation, OperationType::Update);
        assert_eq!(record.before_data.as_deref(), Some("{\"a\":1}"));
        assert_eq!(record.after_data.as_deref(), Some("{\"a\":2}"));
    }

    #[test]
    fn test_from_context_without_identity() {
        let ctx = AuditContext::builder().subject_type("Contact").build();
        assert!(AuditRecord::from_context(&ctx).is_none());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut record = AuditRecord::new(3, OperationType::Delete, Some("{}".into()), None);
        record.id = Some(10);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Delete\""));

        let parsed: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, Some(10));
        assert_eq!(parsed.subject_id, 3);
        assert!(parsed.after_data.is_none());
    }
}
