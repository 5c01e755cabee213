//! Contact CLI commands
//!
//! Implements CLI commands for contact management.

use clap::Subcommand;

use crate::audit::AuditInterceptor;
use crate::config::Settings;
use crate::error::RolodexResult;
use crate::models::ContactId;
use crate::services::{ContactService, CreateContact, UpdateContact};
use crate::storage::Storage;

/// Contact subcommands
#[derive(Subcommand)]
pub enum ContactCommands {
    /// Add a new contact
    Add {
        /// Contact name
        name: String,
        /// Phone number
        phone: String,
        /// Postal address
        #[arg(short, long)]
        address: Option<String>,
    },
    /// List all contacts
    List,
    /// Show contact details
    Show {
        /// Contact ID
        id: ContactId,
    },
    /// Update an existing contact
    Update {
        /// Contact ID
        id: ContactId,
        /// New name
        name: String,
        /// New phone number
        phone: String,
        /// New postal address
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Delete a contact
    Delete {
        /// Contact ID
        id: ContactId,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a contact command
pub fn handle_contact_command(
    storage: &Storage,
    interceptor: &AuditInterceptor,
    settings: &Settings,
    cmd: ContactCommands,
) -> RolodexResult<()> {
    let service =
        ContactService::new(storage, interceptor).with_strict_audit(settings.strict_audit);

    match cmd {
        ContactCommands::Add {
            name,
            phone,
            address,
        } => {
            let contact = service.create(CreateContact {
                name,
                phone,
                address,
            })?;
            println!(
                "Added contact {} ({})",
                contact.name,
                contact.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }

        ContactCommands::List => {
            let contacts = service.list()?;

            if contacts.is_empty() {
                println!("No contacts found.");
                return Ok(());
            }

            println!("{:>5} {:25} {:15} {}", "ID", "Name", "Phone", "Address");
            println!("{}", "-".repeat(70));

            for contact in &contacts {
                println!(
                    "{:>5} {:25} {:15} {}",
                    contact.id.map(|id| id.to_string()).unwrap_or_default(),
                    truncate(&contact.name, 25),
                    truncate(&contact.phone, 15),
                    contact.address.as_deref().unwrap_or("-")
                );
            }

            println!("\nTotal: {} contacts", contacts.len());
        }

        ContactCommands::Show { id } => {
            let contact = service.get(id)?;

            println!("Contact: {}", contact.name);
            println!("ID:      {}", id);
            println!("Phone:   {}", contact.phone);
            println!("Address: {}", contact.address.as_deref().unwrap_or("(none)"));
            println!();
            println!("Created: {}", contact.created_at.format(&settings.date_format));
            println!("Updated: {}", contact.updated_at.format(&settings.date_format));
        }

        ContactCommands::Update {
            id,
            name,
            phone,
            address,
        } => {
            let updated = service.update(UpdateContact {
                id,
                name,
                phone,
                address,
            })?;
            println!("Updated contact {} ({})", updated.name, id);
        }

        ContactCommands::Delete { id, force } => {
            let contact = service.get(id)?;

            if !force {
                println!("About to delete contact: {}", contact.name);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            service.delete(id)?;
            println!("Deleted contact: {}", contact.name);
        }
    }

    Ok(())
}

/// Truncate a string to a maximum length
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", prefix)
    }
}
