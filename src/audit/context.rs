//! Audit context data structures
//!
//! Defines the operation taxonomy and the in-flight description of a single
//! audit event before it is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RolodexError;

/// Identifier of the entity instance an audit event refers to.
pub type SubjectId = i64;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// Entity was created
    Create,
    /// Entity was read
    Read,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Create => write!(f, "CREATE"),
            OperationType::Read => write!(f, "READ"),
            OperationType::Update => write!(f, "UPDATE"),
            OperationType::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for OperationType {
    type Err = RolodexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(OperationType::Create),
            "read" => Ok(OperationType::Read),
            "update" => Ok(OperationType::Update),
            "delete" => Ok(OperationType::Delete),
            other => Err(RolodexError::Validation(format!(
                "unknown operation type: {}",
                other
            ))),
        }
    }
}

/// In-flight description of one audit event, prior to persistence.
///
/// A context captures which subject was affected, what happened to it, and
/// detached before/after snapshots of its state. Contexts are built through
/// the operation-specific factories (or [`AuditContext::builder`] for bare
/// contexts) and are immutable once built.
#[derive(Debug, Clone)]
pub struct AuditContext {
    subject_type: String,
    subject_id: Option<SubjectId>,
    operation: OperationType,
    before: Option<String>,
    after: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl AuditContext {
    /// Context for a CREATE operation: only the after-snapshot exists.
    pub fn for_create(
        subject_type: impl Into<String>,
        subject_id: SubjectId,
        after: Option<String>,
    ) -> Self {
        Self {
            subject_type: subject_type.into(),
            subject_id: Some(subject_id),
            operation: OperationType::Create,
            before: None,
            after,
            occurred_at: Utc::now(),
        }
    }

    /// Context for an UPDATE operation: both snapshots, where capture allowed.
    pub fn for_update(
        subject_type: impl Into<String>,
        subject_id: SubjectId,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            subject_type: subject_type.into(),
            subject_id: Some(subject_id),
            operation: OperationType::Update,
            before,
            after,
            occurred_at: Utc::now(),
        }
    }

    /// Context for a DELETE operation: only the before-snapshot exists.
    pub fn for_delete(
        subject_type: impl Into<String>,
        subject_id: SubjectId,
        before: Option<String>,
    ) -> Self {
        Self {
            subject_type: subject_type.into(),
            subject_id: Some(subject_id),
            operation: OperationType::Delete,
            before,
            after: None,
            occurred_at: Utc::now(),
        }
    }

    /// Builder for contexts with custom values, e.g. a bare READ context
    /// carrying only identity and operation type.
    pub fn builder() -> AuditContextBuilder {
        AuditContextBuilder::default()
    }

    pub fn subject_type(&self) -> &str {
        &self.subject_type
    }

    pub fn subject_id(&self) -> Option<SubjectId> {
        self.subject_id
    }

    pub fn operation(&self) -> OperationType {
        self.operation
    }

    pub fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Builder for [`AuditContext`]
#[derive(Debug, Default)]
pub struct AuditContextBuilder {
    subject_type: Option<String>,
    subject_id: Option<SubjectId>,
    operation: Option<OperationType>,
    before: Option<String>,
    after: Option<String>,
}

impl AuditContextBuilder {
    pub fn subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    pub fn subject_id(mut self, subject_id: SubjectId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn operation(mut self, operation: OperationType) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Build the context, defaulting the operation to READ and stamping the
    /// occurrence time.
    pub fn build(self) -> AuditContext {
        AuditContext {
            subject_type: self.subject_type.unwrap_or_default(),
            subject_id: self.subject_id,
            operation: self.operation.unwrap_or(OperationType::Read),
            before: self.before,
            after: self.after,
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(OperationType::Create.to_string(), "CREATE");
        assert_eq!(OperationType::Read.to_string(), "READ");
        assert_eq!(OperationType::Update.to_string(), "UPDATE");
        assert_eq!(OperationType::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!("create".parse::<OperationType>().unwrap(), OperationType::Create);
        assert_eq!("UPDATE".parse::<OperationType>().unwrap(), OperationType::Update);
        assert!("destroy".parse::<OperationType>().is_err());
    }

    #[test]
    fn test_operation_serde_labels() {
        let json = serde_json::to_string(&OperationType::Delete).unwrap();
        assert_eq!(json, "\"Delete\"");
        let parsed: OperationType = serde_json::from_str("\"Create\"").unwrap();
        assert_eq!(parsed, OperationType::Create);
    }

    #[test]
    fn test_create_context() {
        let ctx = AuditContext::for_create("Contact", 1, Some("{\"name\":\"Alice\"}".into()));
        assert_eq!(ctx.operation(), OperationType::Create);
        assert_eq!(ctx.subject_id(), Some(1));
        assert!(ctx.before().is_none());
        assert!(ctx.after().is_some());
    }

    #[test]
    fn test_update_context() {
        let ctx = AuditContext::for_update("Contact", 2, Some("{}".into()), Some("{}".into()));
        assert_eq!(ctx.operation(), OperationType::Update);
        assert!(ctx.before().is_some());
        assert!(ctx.after().is_some());
    }

    #[test]
    fn test_delete_context() {
        let ctx = AuditContext::for_delete("Contact", 3, Some("{}".into()));
        assert_eq!(ctx.operation(), OperationType::Delete);
        assert!(ctx.before().is_some());
        assert!(ctx.after().is_none());
    }

    #[test]
    fn test_bare_read_context() {
        let ctx = AuditContext::builder()
            .subject_type("Contact")
            .subject_id(7)
            .operation(OperationType::Read)
            .build();
        assert_eq!(ctx.operation(), OperationType::Read);
        assert_eq!(ctx.subject_id(), Some(7));
        assert!(ctx.before().is_none());
        assert!(ctx.after().is_none());
    }
}
