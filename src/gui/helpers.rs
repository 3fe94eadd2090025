//! Helper functions for the GUI
//!
//! Formatting of transaction rows, shared with the CSV export.

use crate::types::{Transaction, TransactionId, CURRENCY_LABEL};

/// Shown when a transaction timestamp cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Format an amount the way the backend's clients print numbers:
/// integers without a fractional part, everything else in shortest form.
pub fn format_amount(amount: f64) -> String {
    if amount == 0.0 {
        // Avoid "-0"
        "0".to_string()
    } else {
        format!("{}", amount)
    }
}

/// Date of a transaction as M/D/YYYY, or "Invalid Date"
pub fn format_display_date(tx: &Transaction) -> String {
    tx.date()
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// Display-ready text for one list card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: TransactionId,
    /// Stable identity for the list row
    pub key: String,
    pub title: String,
    pub date_line: String,
    pub total_line: String,
    pub status_line: String,
    /// Whether the refund action is shown
    pub refundable: bool,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            key: tx.key(),
            title: format!("Transaction #{}", tx.id),
            date_line: format!("Date: {}", format_display_date(tx)),
            total_line: format!("Total: {}{}", CURRENCY_LABEL, format_amount(tx.total_price)),
            status_line: format!("Status: {}", tx.status),
            refundable: tx.is_refundable(),
        }
    }
}

/// Build rows for a whole list, preserving server order
pub fn build_rows(transactions: &[Transaction]) -> Vec<TransactionRow> {
    transactions.iter().map(TransactionRow::from).collect()
}
