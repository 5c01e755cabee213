//! Business logic layer

pub mod audit;
pub mod contact;

pub use audit::AuditQueryService;
pub use contact::{ContactService, CreateContact, UpdateContact};

use crate::audit::{AuditInterceptor, ExtractorRegistry, HandlerRegistry, LedgerHandler};
use crate::models::ContactExtractor;
use crate::storage::Storage;

/// Build the audit interceptor with the default registries.
///
/// Both registries are assembled once at startup and are read-only
/// thereafter: the contact extractor, and the ledger persistence handler at
/// the lowest priority so any other handlers observe contexts first.
pub fn audit_interceptor(storage: &Storage) -> AuditInterceptor {
    let extractors = ExtractorRegistry::new(vec![Box::new(ContactExtractor)]);
    let handlers = HandlerRegistry::new(vec![Box::new(LedgerHandler::new(storage.audit.clone()))]);

    AuditInterceptor::new(extractors, handlers, storage.contacts.clone())
}
