//! Audit event handling
//!
//! Consumers of finished audit contexts. Unlike extraction this is a
//! fan-out: every registered handler whose `supports` accepts the subject
//! type receives the context, in ascending order. Handler failures are
//! isolated per handler by the dispatching interceptor.

use std::sync::Arc;

use super::context::AuditContext;
use super::deferred::UnitOfWork;
use super::record::{AuditRecord, AuditSink};
use crate::error::{RolodexError, RolodexResult};

/// Pluggable consumer of a finished [`AuditContext`].
///
/// Handlers are side-effect-only: persist the context, forward it to an
/// external sink, filter by subject type. They return no value consumed by
/// the interceptor.
pub trait EventHandler: Send + Sync {
    /// Consume one audit context.
    ///
    /// `txn` is the active unit of work, if the caller runs inside one;
    /// handlers that persist state should defer their write through it.
    fn handle(&self, context: &AuditContext, txn: Option<&UnitOfWork>) -> RolodexResult<()>;

    /// Whether this handler wants events for the given subject type.
    fn supports(&self, _subject_type: &str) -> bool {
        true
    }

    /// Ordering among handlers; lower values run first.
    fn order(&self) -> i32 {
        0
    }
}

/// Ordered, immutable set of registered handlers.
///
/// Built once at startup; handlers are stable-sorted ascending by
/// [`EventHandler::order`], ties broken by registration order.
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new(mut handlers: Vec<Box<dyn EventHandler>>) -> Self {
        handlers.sort_by_key(|h| h.order());
        Self { handlers }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handlers that accept the given subject type, in dispatch order.
    pub fn matching<'a>(
        &'a self,
        subject_type: &'a str,
    ) -> impl Iterator<Item = &'a dyn EventHandler> {
        self.handlers
            .iter()
            .map(|h| h.as_ref())
            .filter(move |h| h.supports(subject_type))
    }
}

/// The canonical persistence handler: turns a context into an [`AuditRecord`]
/// and writes it to the ledger.
///
/// Registered at `i32::MAX` so every other handler observes the context
/// before the local persistence attempt, and a persistence failure cannot
/// block other consumers. Inside a unit of work the write is deferred to the
/// pre-commit boundary; without one it happens immediately.
pub struct LedgerHandler {
    sink: Arc<dyn AuditSink>,
}

impl LedgerHandler {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }
}

impl EventHandler for LedgerHandler {
    fn handle(&self, context: &AuditContext, txn: Option<&UnitOfWork>) -> RolodexResult<()> {
        let record = AuditRecord::from_context(context).ok_or_else(|| {
            RolodexError::Audit("refusing to record an event without a subject id".into())
        })?;

        match txn {
            Some(uow) => {
                uow.defer(record);
                Ok(())
            }
            None => {
                let stored = self.sink.append(record)?;
                tracing::debug!(
                    subject_type = context.subject_type(),
                    subject_id = stored.subject_id,
                    operation = %stored.operation,
                    "audit record persisted"
                );
                Ok(())
            }
        }
    }

    fn order(&self) -> i32 {
        // Runs last so other handlers see the context first
        i32::MAX
    }
}
