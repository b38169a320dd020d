//! Output writer trait definition.

use crate::error::Result;
use crate::output::MetricRecord;

/// Trait for writing evaluation results.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single metric record.
    fn write_record(&mut self, record: &MetricRecord) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// Write all `records` through `writer`, header first.
pub fn write_all(writer: &mut dyn OutputWriter, records: &[MetricRecord]) -> Result<()> {
    writer.write_header()?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.finalize()
}
