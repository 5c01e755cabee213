//! The audit interceptor
//!
//! Wraps a single mutating operation and drives the full
//! capture -> execute -> capture -> dispatch lifecycle without the wrapped
//! operation being aware of auditing. Operations opt in by passing their
//! closure through [`AuditInterceptor::execute`] together with an
//! [`AuditPlan`] describing what to capture.

use std::sync::Arc;

use serde_json::Value;

use super::context::{AuditContext, OperationType, SubjectId};
use super::deferred::UnitOfWork;
use super::extract::{ExtractorRegistry, StateReader, Subject, SubjectRef};
use super::handler::HandlerRegistry;
use crate::error::RolodexResult;

/// Declarative description of how one operation should be audited.
///
/// Mirrors the shape of the audit annotations found in interception-based
/// frameworks: the operation type drives which snapshots are captured, the
/// subject type may be fixed explicitly, and the failure policy decides
/// whether audit errors surface to the caller.
#[derive(Debug, Clone)]
pub struct AuditPlan {
    operation: OperationType,
    subject_type: Option<String>,
    capture_before: bool,
    capture_after: bool,
    continue_on_audit_failure: bool,
}

impl AuditPlan {
    pub fn new(operation: OperationType) -> Self {
        Self {
            operation,
            subject_type: None,
            capture_before: true,
            capture_after: true,
            continue_on_audit_failure: true,
        }
    }

    /// Fix the subject type instead of inferring it from the result.
    pub fn subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    /// Disable before-state capture for update/delete.
    pub fn capture_before(mut self, capture: bool) -> Self {
        self.capture_before = capture;
        self
    }

    /// Disable after-state capture for create/update.
    pub fn capture_after(mut self, capture: bool) -> Self {
        self.capture_after = capture;
        self
    }

    /// Whether the business result survives an audit failure (default true).
    pub fn continue_on_audit_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_audit_failure = continue_on_failure;
        self
    }

    pub fn operation(&self) -> OperationType {
        self.operation
    }
}

/// Orchestrates audit capture and dispatch around mutating operations.
///
/// Holds the two process-wide registries (read-only after startup) and the
/// read capability used for before-state lookups.
pub struct AuditInterceptor {
    extractors: ExtractorRegistry,
    handlers: HandlerRegistry,
    reader: Arc<dyn StateReader>,
}

impl AuditInterceptor {
    pub fn new(
        extractors: ExtractorRegistry,
        handlers: HandlerRegistry,
        reader: Arc<dyn StateReader>,
    ) -> Self {
        Self {
            extractors,
            handlers,
            reader,
        }
    }

    /// Run `op` with audit capture around it.
    ///
    /// The wrapped operation's error propagates unchanged and produces no
    /// record. Audit failures after a successful operation are logged and
    /// swallowed unless the plan demands they surface, in which case the
    /// operation's result is discarded and the failure returned instead.
    pub fn execute<A, R, F>(
        &self,
        plan: &AuditPlan,
        arg: &A,
        txn: Option<&UnitOfWork>,
        op: F,
    ) -> RolodexResult<R>
    where
        A: SubjectRef,
        R: Subject,
        F: FnOnce() -> RolodexResult<R>,
    {
        let mut subject_id = None;
        let mut before = None;

        if plan.capture_before
            && matches!(plan.operation, OperationType::Update | OperationType::Delete)
        {
            subject_id = arg.subject_id();
            match subject_id {
                Some(id) => before = self.capture_before_state(id),
                None => tracing::debug!(
                    operation = %plan.operation,
                    "could not resolve a subject id from the operation argument"
                ),
            }
        }

        // Business failure: propagate unchanged, no record for this call
        let result = op()?;

        if let Err(err) = self.record(plan, &result, subject_id, before, txn) {
            tracing::error!(
                operation = %plan.operation,
                error = %err,
                "audit dispatch failed"
            );
            if !plan.continue_on_audit_failure {
                return Err(err);
            }
        }

        Ok(result)
    }

    /// Dispatch a caller-built context to every matching handler.
    ///
    /// This is the path for bare contexts (e.g. auditing a read by identity
    /// only); the interceptor itself never captures state for reads.
    pub fn dispatch(&self, context: &AuditContext, txn: Option<&UnitOfWork>) -> RolodexResult<()> {
        let mut first_error = None;

        for handler in self.handlers.matching(context.subject_type()) {
            if let Err(err) = handler.handle(context, txn) {
                tracing::error!(
                    subject_type = context.subject_type(),
                    operation = %context.operation(),
                    error = %err,
                    "audit event handler failed"
                );
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Fetch and serialize the subject's current state. Never fatal.
    fn capture_before_state(&self, subject_id: SubjectId) -> Option<String> {
        let current = match self.reader.read(subject_id) {
            Some(entity) => entity,
            None => {
                tracing::debug!(subject_id, "before-state lookup found no entity");
                return None;
            }
        };

        let extraction = self.extractors.resolve(current.as_ref());
        serialize_snapshot(&extraction.snapshot)
    }

    fn record<R: Subject>(
        &self,
        plan: &AuditPlan,
        result: &R,
        mut subject_id: Option<SubjectId>,
        before: Option<String>,
        txn: Option<&UnitOfWork>,
    ) -> RolodexResult<()> {
        let mut after = None;
        let mut subject_type = plan.subject_type.clone();

        if plan.capture_after
            && matches!(plan.operation, OperationType::Create | OperationType::Update)
        {
            let extraction = self.extractors.resolve(result);
            if extraction.subject_id.is_some() {
                subject_id = extraction.subject_id;
            }
            after = serialize_snapshot(&extraction.snapshot);
            if subject_type.is_none() {
                subject_type = extraction.subject_type;
            }
        }

        // Identity is mandatory: without it the audit attempt is abandoned
        let Some(id) = subject_id else {
            tracing::debug!(
                operation = %plan.operation,
                "subject identity unresolved, audit attempt abandoned"
            );
            return Ok(());
        };

        let subject_type =
            subject_type.unwrap_or_else(|| short_type_name(std::any::type_name::<R>()));

        let context = match plan.operation {
            OperationType::Create => AuditContext::for_create(subject_type, id, after),
            OperationType::Update => AuditContext::for_update(subject_type, id, before, after),
            OperationType::Delete => AuditContext::for_delete(subject_type, id, before),
            OperationType::Read => AuditContext::builder()
                .subject_type(subject_type)
                .subject_id(id)
                .operation(OperationType::Read)
                .build(),
        };

        self.dispatch(&context, txn)
    }
}

/// Serialize a snapshot value, degrading to `None` on failure.
fn serialize_snapshot(snapshot: &Value) -> Option<String> {
    match serde_json::to_string(snapshot) {
        Ok(json) => Some(json),
        Err(err) => {
            tracing::debug!(error = %err, "snapshot serialization failed");
            None
        }
    }
}

/// Last path segment of a fully qualified type name.
fn short_type_name(full: &str) -> String {
    full.rsplit("::").next().unwrap_or(full).to_string()
}
