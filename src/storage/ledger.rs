//! Append-only audit ledger
//!
//! Persists audit records to a line-delimited JSON file (JSONL): one record
//! per line, flushed on every append. The ledger assigns surrogate ids and
//! exposes the read-side query surface used by reporting.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::audit::{AuditRecord, AuditSink, OperationType, SubjectId};
use crate::error::{RolodexError, RolodexResult};

/// Append-only store of audit records
pub struct AuditLedger {
    /// Path to the ledger file
    path: PathBuf,
    /// Next surrogate id; guards concurrent appends
    next_id: Mutex<i64>,
}

impl AuditLedger {
    /// Open the ledger, scanning any existing file for the next surrogate id
    pub fn open(path: PathBuf) -> RolodexResult<Self> {
        let ledger = Self {
            path,
            next_id: Mutex::new(1),
        };

        let max_id = ledger
            .read_all()?
            .iter()
            .filter_map(|r| r.id)
            .max()
            .unwrap_or(0);
        *ledger
            .next_id
            .lock()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire id lock: {}", e)))? =
            max_id + 1;

        Ok(ledger)
    }

    /// Read all records from the ledger file, oldest first
    pub fn read_all(&self) -> RolodexResult<Vec<AuditRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| RolodexError::Storage(format!("Failed to open audit ledger: {}", e)))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                RolodexError::Storage(format!(
                    "Failed to read ledger line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: AuditRecord = serde_json::from_str(&line).map_err(|e| {
                RolodexError::Storage(format!(
                    "Failed to parse audit record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// List all records, newest first
    ///
    /// Ordered by operation time descending; ties broken by surrogate id so
    /// records appended in the same instant keep their insertion order.
    pub fn list_all(&self) -> RolodexResult<Vec<AuditRecord>> {
        let mut records = self.read_all()?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// List records for one subject, newest first
    pub fn list_by_subject(&self, subject_id: SubjectId) -> RolodexResult<Vec<AuditRecord>> {
        let mut records: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.subject_id == subject_id)
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// List records for one operation type, newest first
    pub fn list_by_operation(&self, operation: OperationType) -> RolodexResult<Vec<AuditRecord>> {
        let mut records: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.operation == operation)
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Find one record by surrogate id
    pub fn get(&self, id: i64) -> RolodexResult<Option<AuditRecord>> {
        Ok(self.read_all()?.into_iter().find(|r| r.id == Some(id)))
    }

    /// Number of records in the ledger
    pub fn count(&self) -> RolodexResult<usize> {
        Ok(self.read_all()?.len())
    }

    fn write_lines(&self, records: &mut [AuditRecord]) -> RolodexResult<()> {
        let mut next_id = self
            .next_id
            .lock()
            .map_err(|e| RolodexError::Storage(format!("Failed to acquire id lock: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RolodexError::Storage(format!("Failed to open audit ledger: {}", e)))?;

        for record in records.iter_mut() {
            record.id = Some(*next_id);
            *next_id += 1;

            let json = serde_json::to_string(record).map_err(|e| {
                RolodexError::Storage(format!("Failed to serialize audit record: {}", e))
            })?;

            writeln!(file, "{}", json).map_err(|e| {
                RolodexError::Storage(format!("Failed to write audit record: {}", e))
            })?;
        }

        file.flush()
            .map_err(|e| RolodexError::Storage(format!("Failed to flush audit ledger: {}", e)))?;

        Ok(())
    }
}

impl AuditSink for AuditLedger {
    fn append(&self, record: AuditRecord) -> RolodexResult<AuditRecord> {
        let mut records = vec![record];
        self.write_lines(&mut records)?;
        Ok(records.remove(0))
    }

    fn append_all(&self, mut records: Vec<AuditRecord>) -> RolodexResult<Vec<AuditRecord>> {
        if records.is_empty() {
            return Ok(records);
        }
        self.write_lines(&mut records)?;
        Ok(records)
    }
}

fn sort_newest_first(records: &mut [AuditRecord]) {
    records.sort_by(|a, b| {
        b.operation_time
            .cmp(&a.operation_time)
            .then_with(|| b.id.cmp(&a.id))
    });
}
