use anyhow::{Context, Result};
use csv::WriterBuilder;

use crate::models::TvlCsvRow;

/// Sort rows by chain name then date, both ascending. Stable, so
/// same-day rows of a chain keep their upstream order.
pub fn sort_rows(rows: &mut [TvlCsvRow]) {
    rows.sort_by(|a, b| {
        a.chain
            .as_str()
            .cmp(b.chain.as_str())
            .then_with(|| a.date.cmp(&b.date))
    });
}

/// Serialize rows as CSV with a `chain,date,tvl` header. Missing amounts
/// are written as empty fields.
pub fn write_csv(rows: &[TvlCsvRow]) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to serialize CSV row for {}", row.chain))?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
