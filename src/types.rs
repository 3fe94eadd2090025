//! Common types shared across modules.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency label shown in front of every amount.
pub const CURRENCY_LABEL: &str = "PHP";

/// Server-assigned transaction identifier.
pub type TransactionId = u64;

/// Identifier of the user whose transactions are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the server.
///
/// The set is open: anything not recognised is kept verbatim in `Other`.
/// Only `Completed` (the exact string `"completed"`) allows a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Refunded,
    Cancelled,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_refundable(&self) -> bool {
        matches!(self, TransactionStatus::Completed)
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "completed" => TransactionStatus::Completed,
            "pending" => TransactionStatus::Pending,
            "refunded" => TransactionStatus::Refunded,
            "cancelled" => TransactionStatus::Cancelled,
            _ => TransactionStatus::Other(value),
        }
    }
}

impl From<&str> for TransactionStatus {
    fn from(value: &str) -> Self {
        TransactionStatus::from(value.to_string())
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase record as returned by the transactions API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    /// Timestamp in the server's serialized form
    pub date_of_transaction: String,
    pub total_price: f64,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Stable identity used to key list rows.
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    pub fn is_refundable(&self) -> bool {
        self.status.is_refundable()
    }

    /// Calendar date of the transaction, if the timestamp can be parsed.
    ///
    /// Timestamps carrying an offset are converted to local time first.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_transaction_date(&self.date_of_transaction)
    }
}

fn parse_transaction_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
