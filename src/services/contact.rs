//! Contact service
//!
//! Business logic for contact management. Every mutating operation runs
//! through the audit interceptor inside a per-call unit of work, so each
//! mutation leaves exactly one audit record that commits together with the
//! business change.

use crate::audit::{AuditInterceptor, AuditPlan, OperationType, SubjectId, SubjectRef, UnitOfWork};
use crate::error::{RolodexError, RolodexResult};
use crate::models::{Contact, ContactId};
use crate::storage::Storage;

/// Command describing a contact to create
#[derive(Debug, Clone)]
pub struct CreateContact {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

impl SubjectRef for CreateContact {
    // A contact being created has no identity yet
    fn subject_id(&self) -> Option<SubjectId> {
        None
    }
}

/// Command describing a contact update
#[derive(Debug, Clone)]
pub struct UpdateContact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

impl SubjectRef for UpdateContact {
    fn subject_id(&self) -> Option<SubjectId> {
        Some(self.id.value())
    }
}

impl SubjectRef for ContactId {
    fn subject_id(&self) -> Option<SubjectId> {
        Some(self.value())
    }
}

/// Service for contact management
pub struct ContactService<'a> {
    storage: &'a Storage,
    interceptor: &'a AuditInterceptor,
    strict_audit: bool,
}

impl<'a> ContactService<'a> {
    /// Create a new contact service
    pub fn new(storage: &'a Storage, interceptor: &'a AuditInterceptor) -> Self {
        Self {
            storage,
            interceptor,
            strict_audit: false,
        }
    }

    /// Fail mutating operations when audit dispatch fails
    pub fn with_strict_audit(mut self, strict: bool) -> Self {
        self.strict_audit = strict;
        self
    }

    fn plan(&self, operation: OperationType) -> AuditPlan {
        AuditPlan::new(operation).continue_on_audit_failure(!self.strict_audit)
    }

    /// Create a new contact
    pub fn create(&self, cmd: CreateContact) -> RolodexResult<Contact> {
        let uow = UnitOfWork::new(self.storage.audit.clone());
        let contacts = &self.storage.contacts;

        let created = self.interceptor.execute(
            &self.plan(OperationType::Create),
            &cmd,
            Some(&uow),
            || {
                let contact = Contact::new(&cmd.name, &cmd.phone, cmd.address.as_deref())?;
                contacts.insert(contact)
            },
        )?;

        uow.commit(|| contacts.save())?;
        Ok(created)
    }

    /// Get a contact by ID
    pub fn get(&self, id: ContactId) -> RolodexResult<Contact> {
        self.storage
            .contacts
            .get(id)?
            .ok_or_else(|| RolodexError::contact_not_found(id.to_string()))
    }

    /// List all contacts, ordered by ID
    pub fn list(&self) -> RolodexResult<Vec<Contact>> {
        self.storage.contacts.get_all()
    }

    /// Update an existing contact
    pub fn update(&self, cmd: UpdateContact) -> RolodexResult<Contact> {
        let uow = UnitOfWork::new(self.storage.audit.clone());
        let contacts = &self.storage.contacts;

        let updated = self.interceptor.execute(
            &self.plan(OperationType::Update),
            &cmd,
            Some(&uow),
            || {
                let mut contact = contacts
                    .get(cmd.id)?
                    .ok_or_else(|| RolodexError::contact_not_found(cmd.id.to_string()))?;
                contact.update_info(&cmd.name, &cmd.phone, cmd.address.as_deref())?;
                contacts.update(contact.clone())?;
                Ok(contact)
            },
        )?;

        uow.commit(|| contacts.save())?;
        Ok(updated)
    }

    /// Delete a contact
    pub fn delete(&self, id: ContactId) -> RolodexResult<()> {
        let uow = UnitOfWork::new(self.storage.audit.clone());
        let contacts = &self.storage.contacts;

        // The subject type cannot be inferred from a unit result
        let plan = self
            .plan(OperationType::Delete)
            .subject_type("Contact");

        self.interceptor.execute(&plan, &id, Some(&uow), || {
            if !contacts.delete(id)? {
                return Err(RolodexError::contact_not_found(id.to_string()));
            }
            Ok(())
        })?;

        uow.commit(|| contacts.save())?;
        Ok(())
    }

    /// Count contacts
    pub fn count(&self) -> RolodexResult<usize> {
        self.storage.contacts.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::OperationType;
    use crate::config::paths::RolodexPaths;
    use crate::services::audit_interceptor;
    use tempfile::TempDir;

    fn create_test_env() -> (TempDir, Storage, AuditInterceptor) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolodexPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let interceptor = audit_interceptor(&storage);
        (temp_dir, storage, interceptor)
    }

    fn create_cmd(name: &str, phone: &str) -> CreateContact {
        CreateContact {
            name: name.into(),
            phone: phone.into(),
            address: None,
        }
    }

    #[test]
    fn test_create_contact() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let contact = service.create(create_cmd("Alice", "0911111111")).unwrap();

        assert_eq!(contact.id, Some(ContactId::new(1)));
        assert_eq!(contact.name, "Alice");
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_create_writes_one_create_record() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        service.create(create_cmd("Alice", "0911111111")).unwrap();

        let records = storage.audit.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation, OperationType::Create);
        assert!(records[0].before_data.is_none());
        assert!(records[0].after_data.as_ref().unwrap().contains("Alice"));
    }

    #[test]
    fn test_invalid_create_writes_nothing() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let result = service.create(create_cmd("", "0911111111"));
        assert!(result.is_err());

        assert_eq!(service.count().unwrap(), 0);
        assert_eq!(storage.audit.count().unwrap(), 0);
    }

    #[test]
    fn test_update_writes_before_and_after() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let contact = service.create(create_cmd("Alice", "0911111111")).unwrap();
        service
            .update(UpdateContact {
                id: contact.id.unwrap(),
                name: "Alice".into(),
                phone: "0922222222".into(),
                address: None,
            })
            .unwrap();

        let records = storage.audit.list_by_operation(OperationType::Update).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].before_data.as_ref().unwrap().contains("0911111111"));
        assert!(records[0].after_data.as_ref().unwrap().contains("0922222222"));
    }

    #[test]
    fn test_update_missing_contact() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let result = service.update(UpdateContact {
            id: ContactId::new(42),
            name: "Ghost".into(),
            phone: "0900000000".into(),
            address: None,
        });

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(storage.audit.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_writes_before_only() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let contact = service.create(create_cmd("Alice", "0911111111")).unwrap();
        service.delete(contact.id.unwrap()).unwrap();

        let records = storage.audit.list_by_operation(OperationType::Delete).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].before_data.as_ref().unwrap().contains("Alice"));
        assert!(records[0].after_data.is_none());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_contact() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let result = service.delete(ContactId::new(9));
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(storage.audit.count().unwrap(), 0);
    }

    #[test]
    fn test_get_and_list() {
        let (_temp, storage, interceptor) = create_test_env();
        let service = ContactService::new(&storage, &interceptor);

        let alice = service.create(create_cmd("Alice", "0911111111")).unwrap();
        service.create(create_cmd("Bob", "0922222222")).unwrap();

        let fetched = service.get(alice.id.unwrap()).unwrap();
        assert_eq!(fetched.name, "Alice");

        let all = service.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Alice");

        // Reads leave no audit records
        assert_eq!(storage.audit.count().unwrap(), 2);
    }
}
