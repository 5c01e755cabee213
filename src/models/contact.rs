//! Contact model
//!
//! The aggregate the application manages: a person with a name, phone
//! number, and optional address. Contacts describe their own audit data, so
//! every mutation can be recorded with full before/after snapshots.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ids::ContactId;
use crate::audit::{Auditable, DataExtractor, Subject, SubjectId};
use crate::error::{RolodexError, RolodexResult};

const NAME_MAX_LENGTH: usize = 50;
const PHONE_MAX_LENGTH: usize = 20;
const ADDRESS_MAX_LENGTH: usize = 200;

/// A contact entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier, assigned by the store on insert
    pub id: Option<ContactId>,

    /// Contact name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// Postal address
    #[serde(default)]
    pub address: Option<String>,

    /// When the contact was created
    pub created_at: DateTime<Utc>,

    /// When the contact was last modified
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Create a new contact; the id is assigned later by the store
    pub fn new(name: &str, phone: &str, address: Option<&str>) -> RolodexResult<Self> {
        validate(name, phone, address)?;
        let now = Utc::now();
        Ok(Self {
            id: None,
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            address: address.map(|a| a.trim().to_string()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Update contact information with validation
    pub fn update_info(
        &mut self,
        name: &str,
        phone: &str,
        address: Option<&str>,
    ) -> RolodexResult<()> {
        validate(name, phone, address)?;
        self.name = name.trim().to_string();
        self.phone = phone.trim().to_string();
        self.address = address.map(|a| a.trim().to_string());
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate(name: &str, phone: &str, address: Option<&str>) -> RolodexResult<()> {
    if name.trim().is_empty() {
        return Err(RolodexError::Validation("name is required".into()));
    }
    if name.trim().chars().count() > NAME_MAX_LENGTH {
        return Err(RolodexError::Validation(format!(
            "name must be at most {} characters",
            NAME_MAX_LENGTH
        )));
    }
    if phone.trim().is_empty() {
        return Err(RolodexError::Validation("phone is required".into()));
    }
    if phone.trim().chars().count() > PHONE_MAX_LENGTH {
        return Err(RolodexError::Validation(format!(
            "phone must be at most {} characters",
            PHONE_MAX_LENGTH
        )));
    }
    if let Some(address) = address {
        if address.trim().chars().count() > ADDRESS_MAX_LENGTH {
            return Err(RolodexError::Validation(format!(
                "address must be at most {} characters",
                ADDRESS_MAX_LENGTH
            )));
        }
    }
    Ok(())
}

impl Auditable for Contact {
    fn audit_type(&self) -> &'static str {
        "Contact"
    }

    fn audit_id(&self) -> Option<SubjectId> {
        self.id.map(|id| id.value())
    }

    fn audit_snapshot(&self) -> Value {
        json!({
            "id": self.id.map(|id| id.value()),
            "name": self.name,
            "phone": self.phone,
            "address": self.address,
        })
    }
}

impl Subject for Contact {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }
}

/// Registered extractor for contacts.
///
/// The self-description above already covers contacts reaching the chain
/// directly; this extractor keeps the registry path working for contacts
/// that arrive type-erased without it, and anchors the "Contact" label.
pub struct ContactExtractor;

impl DataExtractor for ContactExtractor {
    fn supports(&self, subject: &dyn Subject) -> bool {
        subject.as_any().is::<Contact>()
    }

    fn subject_id(&self, subject: &dyn Subject) -> Option<SubjectId> {
        subject
            .as_any()
            .downcast_ref::<Contact>()
            .and_then(|contact| contact.id)
            .map(|id| id.value())
    }

    fn snapshot(&self, subject: &dyn Subject) -> Value {
        match subject.as_any().downcast_ref::<Contact>() {
            Some(contact) => contact.audit_snapshot(),
            None => Value::Null,
        }
    }

    fn subject_type(&self, _subject: &dyn Subject) -> Option<&str> {
        Some("Contact")
    }
}
