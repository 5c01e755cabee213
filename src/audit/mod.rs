//! Audit trail subsystem
//!
//! Transparently records before/after snapshots of entity state whenever a
//! mutating operation runs, without coupling the operation's business logic
//! to audit persistence.
//!
//! # Architecture
//!
//! - [`AuditContext`]: in-flight description of one audit event.
//! - [`AuditRecord`]: immutable persisted ledger entry, written through the
//!   [`AuditSink`] capability.
//! - [`ExtractorRegistry`]: chain of responsibility resolving identifier and
//!   snapshot from an arbitrary entity; entity self-description via
//!   [`Auditable`] takes precedence over registered [`DataExtractor`]s.
//! - [`HandlerRegistry`]: fan-out of finished contexts to every matching
//!   [`EventHandler`]; the canonical [`LedgerHandler`] persists the record
//!   and runs last.
//! - [`AuditInterceptor`]: wraps a mutating operation and drives the
//!   capture -> execute -> capture -> dispatch lifecycle per [`AuditPlan`].
//! - [`UnitOfWork`]: defers the ledger write to the pre-commit boundary so
//!   the audit record is durable exactly when the business change is.
//!
//! # Example
//!
//! ```rust,ignore
//! let interceptor = AuditInterceptor::new(extractors, handlers, reader);
//! let uow = UnitOfWork::new(ledger.clone());
//!
//! let contact = interceptor.execute(
//!     &AuditPlan::new(OperationType::Create),
//!     &cmd,
//!     Some(&uow),
//!     || store.insert(Contact::new(&cmd.name, &cmd.phone, None)?),
//! )?;
//!
//! uow.commit(|| store.save())?;
//! ```

mod context;
mod deferred;
mod diff;
mod extract;
mod handler;
mod interceptor;
mod record;

pub use context::{AuditContext, AuditContextBuilder, OperationType, SubjectId};
pub use deferred::{DispatchState, UnitOfWork};
pub use diff::diff_summary;
pub use extract::{
    Auditable, DataExtractor, Extraction, ExtractorRegistry, StateReader, Subject, SubjectRef,
};
pub use handler::{EventHandler, HandlerRegistry, LedgerHandler};
pub use interceptor::{AuditInterceptor, AuditPlan};
pub use record::{AuditRecord, AuditSink};
