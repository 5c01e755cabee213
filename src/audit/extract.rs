//! Audit data extraction
//!
//! Produces `(identifier, snapshot, subject type)` from an arbitrary entity
//! without the interceptor knowing concrete entity types. Two capability
//! contracts replace reflective guessing:
//!
//! - [`Auditable`]: a type describes its own audit data. Preferred over every
//!   registered extractor.
//! - [`DataExtractor`]: pluggable strategy registered for types that cannot
//!   (or should not) describe themselves.
//!
//! Resolution is a chain of responsibility, not a fan-out: exactly one source
//! contributes data for a given call.

use std::any::Any;
use std::fmt;

use serde_json::Value;

use super::context::SubjectId;

/// Self-description capability for auditable entities.
///
/// Implement this on a domain type to provide its identifier, subject type
/// label, and a detached snapshot of its auditable fields. The snapshot must
/// be a serializable copy frozen at capture time, never a live reference.
pub trait Auditable {
    /// Subject type label recorded against audit events, e.g. "Contact".
    fn audit_type(&self) -> &'static str;

    /// The subject's identifier, or `None` if not yet assigned.
    fn audit_id(&self) -> Option<SubjectId>;

    /// Detached JSON snapshot of the auditable fields.
    fn audit_snapshot(&self) -> Value;
}

/// Type-erased seam the interceptor and extractor chain operate on.
///
/// The `Debug` bound supplies the best-effort fallback snapshot for types
/// nothing else supports. A type opts into self-description by overriding
/// [`Subject::as_auditable`] to return `Some(self)`.
pub trait Subject: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Self-description hook, preferred over all registered extractors.
    fn as_auditable(&self) -> Option<&dyn Auditable> {
        None
    }
}

// Unit results carry no auditable state; this lets operations without a
// meaningful result (e.g. delete) flow through the same interceptor seam.
impl Subject for () {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Arguments a mutating operation receives that can name their subject.
///
/// Used for before-state capture on update/delete, where the subject must be
/// resolved from the input rather than the (not yet produced) result.
pub trait SubjectRef {
    /// The subject identifier carried by this argument, if any.
    fn subject_id(&self) -> Option<SubjectId>;
}

impl SubjectRef for SubjectId {
    fn subject_id(&self) -> Option<SubjectId> {
        Some(*self)
    }
}

/// Capability to fetch the current state of a subject by identifier.
///
/// Supplied by the owning store; used only for before-state capture. Lookup
/// failures are non-fatal to the caller.
pub trait StateReader: Send + Sync {
    fn read(&self, subject_id: SubjectId) -> Option<Box<dyn Subject>>;
}

/// Pluggable strategy producing audit data for entity types that do not
/// implement [`Auditable`].
pub trait DataExtractor: Send + Sync {
    /// Whether this extractor can handle the given subject.
    fn supports(&self, subject: &dyn Subject) -> bool;

    /// Extract the subject identifier, or `None` if unavailable.
    fn subject_id(&self, subject: &dyn Subject) -> Option<SubjectId>;

    /// Create a detached snapshot of the subject.
    fn snapshot(&self, subject: &dyn Subject) -> Value;

    /// Subject type label, or `None` to defer to other sources.
    fn subject_type(&self, _subject: &dyn Subject) -> Option<&str> {
        None
    }

    /// Ordering among extractors; lower values run first.
    fn order(&self) -> i32 {
        0
    }
}

/// Result of resolving a subject through the extraction chain.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub subject_id: Option<SubjectId>,
    pub snapshot: Value,
    pub subject_type: Option<String>,
}

/// Ordered, immutable set of registered extractors.
///
/// Built once at startup; extractors are stable-sorted ascending by
/// [`DataExtractor::order`], ties broken by registration order.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn DataExtractor>>,
}

impl ExtractorRegistry {
    pub fn new(mut extractors: Vec<Box<dyn DataExtractor>>) -> Self {
        extractors.sort_by_key(|e| e.order());
        Self { extractors }
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Resolve identifier, snapshot, and type label for a subject.
    ///
    /// Resolution order, first success wins:
    /// 1. The subject's own [`Auditable`] self-description.
    /// 2. The first supporting extractor that yields a present identifier.
    ///    A supporting extractor whose identifier is absent passes the call
    ///    to the next supporting extractor instead of stopping the chain.
    /// 3. If every supporting extractor reports the identifier absent, the
    ///    first supporting one still contributes snapshot and type label.
    /// 4. With no supporting extractor at all, the `Debug` rendering becomes
    ///    the snapshot and the identifier stays unresolved.
    pub fn resolve(&self, subject: &dyn Subject) -> Extraction {
        if let Some(auditable) = subject.as_auditable() {
            return Extraction {
                subject_id: auditable.audit_id(),
                snapshot: auditable.audit_snapshot(),
                subject_type: Some(auditable.audit_type().to_string()),
            };
        }

        let mut fallback: Option<&dyn DataExtractor> = None;
        for extractor in &self.extractors {
            if !extractor.supports(subject) {
                continue;
            }
            if let Some(id) = extractor.subject_id(subject) {
                return Extraction {
                    subject_id: Some(id),
                    snapshot: extractor.snapshot(subject),
                    subject_type: extractor.subject_type(subject).map(str::to_owned),
                };
            }
            fallback.get_or_insert(extractor.as_ref());
        }

        if let Some(extractor) = fallback {
            return Extraction {
                subject_id: None,
                snapshot: extractor.snapshot(subject),
                subject_type: extractor.subject_type(subject).map(str::to_owned),
            };
        }

        tracing::debug!("no extractor supports subject, falling back to debug rendering");
        Extraction {
            subject_id: None,
            snapshot: Value::String(format!("{:?}", subject)),
            subject_type: None,
        }
    }
}
