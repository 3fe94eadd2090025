//! Append-only audit log of refund requests.

use anyhow::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Log file name
const OPERATION_LOG_FILE: &str = "operation_log.txt";

/// Get the full path to the operation log file
fn log_path() -> PathBuf {
    crate::user_settings::app_data_dir().join(OPERATION_LOG_FILE)
}

/// Get the full path to the operation log file as a string for display
pub fn log_file_path() -> String {
    log_path().display().to_string()
}

/// Render one log entry: a header line followed by indented details
pub fn format_entry(timestamp: &str, operation: &str, user_id: &str, details: &str) -> String {
    let mut entry = format!("[{}] user_id={} operation={}\n", timestamp, user_id, operation);
    if details.trim().is_empty() {
        entry.push_str("  (no additional details)\n");
    } else {
        for line in details.lines() {
            if line.trim().is_empty() {
                entry.push('\n');
            } else {
                entry.push_str("  ");
                entry.push_str(line);
                entry.push('\n');
            }
        }
    }
    entry.push('\n');
    entry
}

/// Append a structured log entry describing a user-requested operation.
pub fn append_log(operation: &str, user_id: &str, details: impl AsRef<str>) -> Result<()> {
    append_log_to(&log_path(), operation, user_id, details.as_ref())
}

pub fn append_log_to(path: &Path, operation: &str, user_id: &str, details: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let timestamp = Utc::now().to_rfc3339();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "{}", format_entry(&timestamp, operation, user_id, details))?;
    Ok(())
}

/// Read the entire log file content
pub fn read_log() -> Result<String> {
    let path = log_path();
    if path.exists() {
        Ok(fs::read_to_string(&path)?)
    } else {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_indents_details() {
        let entry = format_entry("2024-01-01T00:00:00+00:00", "Refund", "42", "Transaction #1\nAmount: PHP100");
        assert_eq!(
            entry,
            "[2024-01-01T00:00:00+00:00] user_id=42 operation=Refund\n  Transaction #1\n  Amount: PHP100\n\n"
        );
    }

    #[test]
    fn test_format_entry_without_details() {
        let entry = format_entry("t", "Refund", "42", "   ");
        assert!(entry.contains("(no additional details)"));
    }

    #[test]
    fn test_append_log_to_appends_entries() {
        let path = std::env::temp_dir()
            .join(format!("txdesk_oplog_{}", std::process::id()))
            .join("operation_log.txt");

        append_log_to(&path, "Refund", "7", "Transaction #1 refunded").unwrap();
        append_log_to(&path, "Refund FAILED", "7", "Transaction #2: HTTP error (409)").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(content.matches("user_id=7").count(), 2);
        assert!(content.contains("operation=Refund FAILED"));
    }
}
