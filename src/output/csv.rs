//! Result table writer.

use crate::constants::UTF8_BOM;
use crate::error::{Error, Result};
use crate::output::{MetricRecord, OutputWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column headers; the first column is the unnamed row index.
const HEADER: [&str; 7] = ["", "IoU", "precision", "recall", "plot", "species", "height"];

/// CSV writer for metric records.
pub struct MetricsCsvWriter {
    writer: csv::Writer<BufWriter<File>>,
    path: PathBuf,
}

impl MetricsCsvWriter {
    /// Create (or overwrite) the CSV file.
    ///
    /// When `include_bom` is set a UTF-8 byte order mark is written first so
    /// spreadsheet applications detect the encoding.
    pub fn new(path: &Path, include_bom: bool) -> Result<Self> {
        let io_error = |source| Error::OutputFileWrite {
            path: path.to_path_buf(),
            source,
        };
        let mut file = BufWriter::new(File::create(path).map_err(io_error)?);
        if include_bom {
            file.write_all(UTF8_BOM).map_err(io_error)?;
        }
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            path: path.to_path_buf(),
        })
    }

    fn csv_error(&self, source: csv::Error) -> Error {
        Error::CsvWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl OutputWriter for MetricsCsvWriter {
    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record(HEADER)
            .map_err(|e| self.csv_error(e))
    }

    fn write_record(&mut self, record: &MetricRecord) -> Result<()> {
        let row = [
            record.index.to_string(),
            format_metric(record.iou),
            format_metric(record.precision),
            format_metric(record.recall),
            record.plot.clone(),
            record.species.clone(),
            record.height.clone(),
        ];
        self.writer.write_record(&row).map_err(|e| self.csv_error(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| self.csv_error(csv::Error::from(e)))
    }
}

/// Format a metric; NaN becomes an empty cell and whole numbers keep one decimal.
#[allow(clippy::float_cmp)]
fn format_metric(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
