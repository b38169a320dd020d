//! JSON summary of an evaluation run.

use crate::error::{Error, Result};
use crate::output::MetricRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level summary document.
#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Settings the run used.
    pub settings: SummarySettings,
    /// Total number of evaluated masks.
    pub total_masks: usize,
    /// Masks skipped because of errors (only with keep-going).
    pub skipped: usize,
    /// Per-species aggregates, in evaluation order.
    pub species: Vec<SpeciesSummary>,
}

/// Evaluation settings recorded in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummarySettings {
    /// Suffix used to select predicted masks.
    pub mask_suffix: String,
    /// Flight height ground truth was read at.
    pub ground_truth_height: String,
}

/// Aggregates for one species.
#[derive(Debug, Serialize)]
pub struct SpeciesSummary {
    /// Species display name.
    pub species: String,
    /// Number of evaluated masks.
    pub masks: usize,
    /// Mean IoU, ignoring NaN values.
    pub mean_iou: Option<f64>,
    /// Mean precision, ignoring NaN values.
    pub mean_precision: Option<f64>,
    /// Mean recall, ignoring NaN values.
    pub mean_recall: Option<f64>,
}

impl EvaluationSummary {
    /// Aggregate `records` per species, listing every name in `species` even
    /// when it has no records.
    pub fn from_records(
        records: &[MetricRecord],
        species: &[String],
        settings: SummarySettings,
        skipped: usize,
    ) -> Self {
        let species = species
            .iter()
            .map(|name| {
                let rows: Vec<&MetricRecord> =
                    records.iter().filter(|r| &r.species == name).collect();
                SpeciesSummary {
                    species: name.clone(),
                    masks: rows.len(),
                    mean_iou: nan_mean(rows.iter().map(|r| r.iou)),
                    mean_precision: nan_mean(rows.iter().map(|r| r.precision)),
                    mean_recall: nan_mean(rows.iter().map(|r| r.recall)),
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            settings,
            total_masks: records.len(),
            skipped,
            species,
        }
    }
}

/// Mean of the non-NaN values, `None` if there are none.
fn nan_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &EvaluationSummary) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::OutputFileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary).map_err(|e| Error::JsonWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(species: &str, iou: f64) -> MetricRecord {
        MetricRecord {
            index: 0,
            iou,
            precision: 1.0,
            recall: 0.5,
            plot: "Vicia_plot_1_flight_X20.png.tiff".to_string(),
            species: species.to_string(),
            height: "10".to_string(),
        }
    }

    fn settings() -> SummarySettings {
        SummarySettings {
            mask_suffix: ".png.tiff".to_string(),
            ground_truth_height: "10".to_string(),
        }
    }

    #[test]
    fn test_nan_mean() {
        assert_eq!(nan_mean([1.0, f64::NAN, 0.0].into_iter()), Some(0.5));
        assert_eq!(nan_mean([f64::NAN].into_iter()), None);
        assert_eq!(nan_mean(std::iter::empty()), None);
    }

    #[test]
    fn test_summary_groups_by_species() {
        let records = vec![record("Vicia", 0.5), record("Vicia", 1.0), record("Papaver dubium", 0.2)];
        let names = vec![
            "Vicia".to_string(),
            "Papaver dubium".to_string(),
            "Cirsium arvense".to_string(),
        ];
        let summary = EvaluationSummary::from_records(&records, &names, settings(), 1);

        assert_eq!(summary.total_masks, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.species.len(), 3);
        assert_eq!(summary.species[0].masks, 2);
        assert_eq!(summary.species[0].mean_iou, Some(0.75));
        assert_eq!(summary.species[1].mean_recall, Some(0.5));
        assert_eq!(summary.species[2].masks, 0);
        assert_eq!(summary.species[2].mean_iou, None);
    }

    #[test]
    fn test_write_summary_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary =
            EvaluationSummary::from_records(&[record("Vicia", 1.0)], &["Vicia".to_string()], settings(), 0);
        write_summary_json(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_masks"], 1);
        assert_eq!(value["species"][0]["species"], "Vicia");
        assert_eq!(value["settings"]["ground_truth_height"], "10");
        assert!(value["generated_at"].is_string());
    }
}
