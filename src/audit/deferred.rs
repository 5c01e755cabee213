//! Commit-deferred audit dispatch
//!
//! Snapshots are always captured synchronously at the moment of the business
//! change; what this module defers is only the persistence of the resulting
//! records. A [`UnitOfWork`] queues records produced during one mutating call
//! and writes them to the ledger immediately before the business state is
//! committed, so an audit record is durable if and only if the business
//! change is durable. On rollback the queue is discarded and no orphaned
//! records exist for aborted operations.
//!
//! Each queued notification moves through a small state machine:
//! `Captured -> Queued -> Committed -> Persisted` on the happy path, or
//! `Captured -> Queued -> RolledBack -> Discarded` when the unit of work is
//! abandoned.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::record::{AuditRecord, AuditSink};
use crate::error::{RolodexError, RolodexResult};

/// Lifecycle of one queued audit notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Record built from a synchronously captured snapshot
    Captured,
    /// Held by the unit of work, not yet visible to any reader
    Queued,
    /// Commit intent confirmed, write about to happen
    Committed,
    /// Durable in the ledger
    Persisted,
    /// Enclosing unit of work was abandoned
    RolledBack,
    /// Dropped without a ledger write
    Discarded,
}

/// One queued notification with its correlation id
#[derive(Debug)]
struct PendingAudit {
    event_id: Uuid,
    record: AuditRecord,
    state: DispatchState,
}

impl PendingAudit {
    fn new(record: AuditRecord) -> Self {
        let pending = Self {
            event_id: Uuid::new_v4(),
            record,
            state: DispatchState::Captured,
        };
        tracing::debug!(event_id = %pending.event_id, "audit notification captured");
        pending
    }

    fn transition(&mut self, state: DispatchState) {
        tracing::debug!(event_id = %self.event_id, ?state, "audit notification transition");
        self.state = state;
    }
}

/// Call-scoped transactional boundary for one mutating operation.
///
/// The unit of work exposes the "run this immediately before commit" hook the
/// deferred dispatch path relies on: records queued via [`UnitOfWork::defer`]
/// are appended to the ledger by [`UnitOfWork::commit`] just before the
/// caller's finalize action runs. Dropping the unit of work without
/// committing discards everything.
pub struct UnitOfWork {
    sink: Arc<dyn AuditSink>,
    pending: Mutex<Vec<PendingAudit>>,
}

impl UnitOfWork {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Queue a record for persistence at commit time.
    pub fn defer(&self, record: AuditRecord) {
        let mut pending = PendingAudit::new(record);
        pending.transition(DispatchState::Queued);

        match self.pending.lock() {
            Ok(mut queue) => queue.push(pending),
            Err(poisoned) => poisoned.into_inner().push(pending),
        }
    }

    /// Number of records currently queued.
    pub fn pending_count(&self) -> usize {
        match self.pending.lock() {
            Ok(queue) => queue.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Commit the unit of work.
    ///
    /// Runs the queued ledger appends first (the pre-commit step), then the
    /// caller's `finalize` action, which makes the business change durable.
    /// A failed ledger append aborts the commit before `finalize` runs, so
    /// the business change is never durable without its audit trail.
    pub fn commit<F>(mut self, finalize: F) -> RolodexResult<Vec<AuditRecord>>
    where
        F: FnOnce() -> RolodexResult<()>,
    {
        let mut pending = self.take_pending();

        let mut records = Vec::with_capacity(pending.len());
        for entry in &mut pending {
            entry.transition(DispatchState::Committed);
            records.push(entry.record.clone());
        }

        let persisted = self.sink.append_all(records).map_err(|e| {
            RolodexError::Audit(format!("pre-commit audit write failed: {}", e))
        })?;

        for entry in &mut pending {
            entry.transition(DispatchState::Persisted);
        }

        finalize()?;
        Ok(persisted)
    }

    /// Abandon the unit of work, discarding queued records.
    pub fn rollback(mut self) -> usize {
        self.discard_pending()
    }

    fn take_pending(&mut self) -> Vec<PendingAudit> {
        match self.pending.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn discard_pending(&mut self) -> usize {
        let mut pending = self.take_pending();
        for entry in &mut pending {
            entry.transition(DispatchState::RolledBack);
            entry.transition(DispatchState::Discarded);
        }
        pending.len()
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        // A unit of work dropped without commit behaves as a rollback
        let discarded = self.discard_pending();
        if discarded > 0 {
            tracing::debug!(discarded, "unit of work dropped, queued audit records discarded");
        }
    }
}
