//! Audit CLI commands
//!
//! Read-side commands over the audit ledger.

use clap::Subcommand;

use crate::audit::{diff_summary, AuditRecord, OperationType};
use crate::config::Settings;
use crate::error::RolodexResult;
use crate::models::ContactId;
use crate::services::AuditQueryService;
use crate::storage::Storage;

use super::contact::truncate;

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// List audit records, newest first
    List {
        /// Only records for this contact ID
        #[arg(short, long)]
        contact: Option<ContactId>,
        /// Only records for this operation (create, read, update, delete)
        #[arg(short, long)]
        operation: Option<OperationType>,
        /// Maximum number of records to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Show one audit record in full
    Show {
        /// Record ID
        id: i64,
    },
}

/// Handle an audit command
pub fn handle_audit_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AuditCommands,
) -> RolodexResult<()> {
    let service = AuditQueryService::new(storage);

    match cmd {
        AuditCommands::List {
            contact,
            operation,
            limit,
        } => {
            let records = match (contact, operation) {
                (Some(id), None) => service.list_by_contact(id)?,
                (None, Some(op)) => service.list_by_operation(op)?,
                (None, None) => service.list()?,
                (Some(id), Some(op)) => {
                    let mut records = service.list_by_contact(id)?;
                    records.retain(|r| r.operation == op);
                    records
                }
            };

            if records.is_empty() {
                println!("No audit records found.");
                return Ok(());
            }

            println!(
                "{:>5} {:20} {:8} {:>8} {}",
                "ID", "Time", "Op", "Contact", "Changes"
            );
            println!("{}", "-".repeat(80));

            for record in records.iter().take(limit) {
                println!(
                    "{:>5} {:20} {:8} {:>8} {}",
                    record.id.unwrap_or_default(),
                    record.operation_time.format(&settings.date_format),
                    record.operation.to_string(),
                    record.subject_id,
                    summarize(record)
                );
            }

            if records.len() > limit {
                println!("\n({} of {} records shown)", limit, records.len());
            }
        }

        AuditCommands::Show { id } => {
            let record = service.get(id)?;

            println!("Audit record {}", id);
            println!("Time:      {}", record.operation_time.format(&settings.date_format));
            println!("Operation: {}", record.operation);
            println!("Contact:   {}", record.subject_id);
            println!("Before:    {}", record.before_data.as_deref().unwrap_or("(none)"));
            println!("After:     {}", record.after_data.as_deref().unwrap_or("(none)"));

            if let Some(diff) = diff_summary(
                record.before_data.as_deref(),
                record.after_data.as_deref(),
            ) {
                println!("Changes:   {}", diff);
            }
        }
    }

    Ok(())
}

/// One-line change summary for the list view
fn summarize(record: &AuditRecord) -> String {
    let diff = diff_summary(record.before_data.as_deref(), record.after_data.as_deref());
    match diff {
        Some(changes) => truncate(&changes, 40),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_update_record() {
        let record = AuditRecord::new(
            1,
            OperationType::Update,
            Some(r#"{"phone":"0911111111"}"#.into()),
            Some(r#"{"phone":"0922222222"}"#.into()),
        );
        assert!(summarize(&record).contains("phone"));
    }

    #[test]
    fn test_summarize_create_record() {
        let record = AuditRecord::new(1, OperationType::Create, None, Some("{}".into()));
        assert_eq!(summarize(&record), "");
    }
}
