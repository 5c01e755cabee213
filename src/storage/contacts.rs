//! Contact store for JSON storage
//!
//! Manages loading and saving contacts to contacts.json, assigning
//! sequential identifiers on insert. Also provides the audit subsystem's
//! read capability for before-state capture.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::audit::{StateReader, Subject, SubjectId};
use crate::error::{RolodexError, RolodexResult};
use crate::models::{Contact, ContactId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable contact data structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ContactData {
    next_id: i64,
    contacts: Vec<Contact>,
}

impl Default for ContactData {
    fn default() -> Self {
        Self {
            next_id: 1,
            contacts: Vec::new(),
        }
    }
}

/// Store for contact persistence
pub struct ContactStore {
    path: PathBuf,
    data: RwLock<HashMap<ContactId, Contact>>,
    next_id: Mutex<i64>,
}

impl ContactStore {
    /// Create a new contact store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Load contacts from disk
    pub fn load(&self) -> RolodexResult<()> {
        let file_data: ContactData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut next_id = self
            .next_id
            .lock()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire id lock: {}", e)))?;

        data.clear();
        for contact in file_data.contacts {
            if let Some(id) = contact.id {
                data.insert(id, contact);
            }
        }
        *next_id = file_data.next_id;

        Ok(())
    }

    /// Save contacts to disk
    pub fn save(&self) -> RolodexResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let next_id = self
            .next_id
            .lock()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire id lock: {}", e)))?;

        let mut contacts: Vec<_> = data.values().cloned().collect();
        contacts.sort_by_key(|c| c.id);

        let file_data = ContactData {
            next_id: *next_id,
            contacts,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Insert a new contact, assigning its identifier
    pub fn insert(&self, mut contact: Contact) -> RolodexResult<Contact> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut next_id = self
            .next_id
            .lock()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire id lock: {}", e)))?;

        let id = ContactId::new(*next_id);
        *next_id += 1;
        contact.id = Some(id);

        data.insert(id, contact.clone());
        Ok(contact)
    }

    /// Update an existing contact
    pub fn update(&self, contact: Contact) -> RolodexResult<()> {
        let id = contact
            .id
            .ok_or_else(|| RolodexError::Storage("cannot update a contact without an id".into()))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if !data.contains_key(&id) {
            return Err(RolodexError::contact_not_found(id.to_string()));
        }

        data.insert(id, contact);
        Ok(())
    }

    /// Get a contact by ID
    pub fn get(&self, id: ContactId) -> RolodexResult<Option<Contact>> {
        let data = self
            .data
            .read()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all contacts, ordered by ID
    pub fn get_all(&self) -> RolodexResult<Vec<Contact>> {
        let data = self
            .data
            .read()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut contacts: Vec<_> = data.values().cloned().collect();
        contacts.sort_by_key(|c| c.id);
        Ok(contacts)
    }

    /// Delete a contact
    pub fn delete(&self, id: ContactId) -> RolodexResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count contacts
    pub fn count(&self) -> RolodexResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

impl StateReader for ContactStore {
    fn read(&self, subject_id: SubjectId) -> Option<Box<dyn Subject>> {
        match self.get(ContactId::new(subject_id)) {
            Ok(contact) => contact.map(|c| Box::new(c) as Box<dyn Subject>),
            Err(err) => {
                tracing::debug!(subject_id, error = %err, "contact lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, ContactStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.json");
        let store = ContactStore::new(path);
        store.load().unwrap();
        (temp_dir, store)
    }

    fn contact(name: &str, phone: &str) -> Contact {
        Contact::new(name, phone, None).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, store) = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let (_temp_dir, store) = create_test_store();

        let alice = store.insert(contact("Alice", "0911111111")).unwrap();
        let bob = store.insert(contact("Bob", "0922222222")).unwrap();

        assert_eq!(alice.id, Some(ContactId::new(1)));
        assert_eq!(bob.id, Some(ContactId::new(2)));
    }

    #[test]
    fn test_get_and_update() {
        let (_temp_dir, store) = create_test_store();

        let mut alice = store.insert(contact("Alice", "0911111111")).unwrap();
        alice.update_info("Alice", "0922222222", None).unwrap();
        store.update(alice.clone()).unwrap();

        let fetched = store.get(alice.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched.phone, "0922222222");
    }

    #[test]
    fn test_update_unknown_contact_errors() {
        let (_temp_dir, store) = create_test_store();

        let mut ghost = contact("Ghost", "0900000000");
        ghost.id = Some(ContactId::new(99));

        let result = store.update(ghost);
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, store) = create_test_store();

        let alice = store.insert(contact("Alice", "0911111111")).unwrap();
        assert!(store.delete(alice.id.unwrap()).unwrap());
        assert!(!store.delete(alice.id.unwrap()).unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload_preserves_next_id() {
        let (temp_dir, store) = create_test_store();

        let alice = store.insert(contact("Alice", "0911111111")).unwrap();
        store.delete(alice.id.unwrap()).unwrap();
        store.save().unwrap();

        let store2 = ContactStore::new(temp_dir.path().join("contacts.json"));
        store2.load().unwrap();

        // Deleted ids are never reused
        let bob = store2.insert(contact("Bob", "0922222222")).unwrap();
        assert_eq!(bob.id, Some(ContactId::new(2)));
    }

    #[test]
    fn test_get_all_ordered_by_id() {
        let (_temp_dir, store) = create_test_store();

        store.insert(contact("Carol", "0933333333")).unwrap();
        store.insert(contact("Alice", "0911111111")).unwrap();
        store.insert(contact("Bob", "0922222222")).unwrap();

        let all = store.get_all().unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_state_reader_capability() {
        let (_temp_dir, store) = create_test_store();

        let alice = store.insert(contact("Alice", "0911111111")).unwrap();
        let subject = store.read(alice.id.unwrap().value()).unwrap();
        assert!(subject.as_auditable().is_some());

        assert!(store.read(42).is_none());
    }
}
