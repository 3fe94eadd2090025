//! CSV export of the displayed transaction list.

use crate::gui::helpers::{format_amount, format_display_date};
use crate::types::{Transaction, CURRENCY_LABEL};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const HEADER: [&str; 6] = ["id", "date", "total", "currency", "status", "refundable"];

/// Write the list as CSV to any writer
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for tx in transactions {
        csv_writer.write_record([
            tx.id.to_string(),
            format_display_date(tx),
            format_amount(tx.total_price),
            CURRENCY_LABEL.to_string(),
            tx.status.to_string(),
            tx.is_refundable().to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export to a timestamped file in `dir`, returning the file path
pub fn export_transactions_csv(transactions: &[Transaction], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create export directory {:?}", dir))?;
    let file_name = format!("transactions_{}.csv", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(file_name);
    let file = fs::File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    write_transactions_csv(file, transactions)?;
    tracing::info!("Exported {} transactions to {:?}", transactions.len(), path);
    Ok(path)
}
