//! Core data models

pub mod contact;
pub mod ids;

pub use contact::{Contact, ContactExtractor};
pub use ids::ContactId;
