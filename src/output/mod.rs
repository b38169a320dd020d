//! Output writers for evaluation results.

mod csv;
pub mod progress;
mod summary;
mod types;
mod writer;

pub use csv::MetricsCsvWriter;
pub use summary::{EvaluationSummary, SpeciesSummary, SummarySettings, write_summary_json};
pub use types::MetricRecord;
pub use writer::{OutputWriter, write_all};
