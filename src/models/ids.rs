//! Strongly-typed ID wrapper for contacts
//!
//! The newtype prevents mixing contact identifiers with the raw integers
//! used elsewhere (audit subject ids, record surrogate keys) at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RolodexError;

/// Identifier of a contact, assigned sequentially by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Wrap an existing identifier value
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the underlying integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContactId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for ContactId {
    type Err = RolodexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .parse()
            .map_err(|_| RolodexError::Validation(format!("invalid contact id: {}", s)))?;
        if value <= 0 {
            return Err(RolodexError::Validation(format!(
                "contact id must be positive: {}",
                value
            )));
        }
        Ok(Self(value))
    }
}
