use anyhow::{Context, Result, anyhow};

use super::SubmissionTable;

/// Serializes a table as CSV: the column line, then every row as stored.
pub fn export_csv(table: &SubmissionTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&table.columns)
        .context("failed to encode export header")?;
    for row in &table.rows {
        writer
            .write_record(row)
            .context("failed to encode export row")?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow!("failed to finish {} export: {err}", table.kind.key()))
}
