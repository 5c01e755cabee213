//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod contact;

pub use audit::{handle_audit_command, AuditCommands};
pub use contact::{handle_contact_command, ContactCommands};
