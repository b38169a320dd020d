//! Accuracy evaluation of predicted masks against ground truth.

use crate::config::Species;
use crate::error::{Error, Result};
use crate::interrupt;
use crate::mask::BinaryMask;
use crate::metrics::{compute_iou, compute_precision, compute_recall};
use crate::output::{MetricRecord, progress};
use crate::pipeline::{collect_mask_files, ground_truth_path, parse_mask_name};
use std::path::Path;
use tracing::{debug, info, warn};

/// Options for evaluating predicted masks.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Suffix selecting predicted masks.
    pub mask_suffix: String,
    /// Flight height ground truth is read at.
    pub ground_truth_height: String,
    /// Extension of ground truth masks.
    pub ground_truth_extension: String,
    /// Skip failing masks instead of aborting.
    pub keep_going: bool,
    /// Show a progress bar.
    pub progress: bool,
}

/// Records of an evaluation and the number of masks skipped on error.
#[derive(Debug, Default, Clone)]
pub struct Evaluation {
    /// Metric records in evaluation order.
    pub records: Vec<MetricRecord>,
    /// Masks skipped because they failed (only with `keep_going`).
    pub skipped: usize,
}

/// Compare one predicted mask against its ground truth.
pub fn evaluate_mask(
    mask_path: &Path,
    species_name: &str,
    ground_truth_dir: &Path,
    options: &EvaluateOptions,
    index: usize,
) -> Result<MetricRecord> {
    let file_name = mask_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = parse_mask_name(&file_name)?;

    let gt_path = ground_truth_path(
        ground_truth_dir,
        &name.plot,
        &options.ground_truth_height,
        &options.ground_truth_extension,
    );
    if !gt_path.is_file() {
        return Err(Error::GroundTruthNotFound {
            mask: file_name,
            path: gt_path,
        });
    }

    let predicted = BinaryMask::load(mask_path)?;
    let ground_truth = BinaryMask::load(&gt_path)?;

    let record = MetricRecord {
        index,
        iou: compute_iou(&predicted, &ground_truth)?,
        precision: compute_precision(&predicted, &ground_truth)?,
        recall: compute_recall(&predicted, &ground_truth)?,
        plot: file_name.clone(),
        species: species_name.to_string(),
        height: name.height,
    };
    debug!(
        "{file_name}: IoU {:.4}, precision {:.4}, recall {:.4}",
        record.iou, record.precision, record.recall
    );
    Ok(record)
}

/// Evaluate every predicted mask of one species.
///
/// Record indices restart at zero for each species.
pub fn evaluate_species(
    species_name: &str,
    predictions_dir: &Path,
    ground_truth_dir: &Path,
    options: &EvaluateOptions,
) -> Result<Evaluation> {
    if !predictions_dir.is_dir() {
        return Err(Error::PredictionsDirNotFound {
            species: species_name.to_string(),
            path: predictions_dir.to_path_buf(),
        });
    }

    let masks = collect_mask_files(predictions_dir, &options.mask_suffix)?;
    if masks.is_empty() {
        warn!(
            "No '*{}' masks for {} in {}",
            options.mask_suffix,
            species_name,
            predictions_dir.display()
        );
    }

    let pb = progress::create_progress(masks.len(), "masks", species_name, options.progress);
    let mut evaluation = Evaluation::default();

    for mask in &masks {
        if let Err(e) = interrupt::check() {
            progress::finish_progress(pb, "Interrupted");
            return Err(e);
        }

        let index = evaluation.records.len();
        match evaluate_mask(mask, species_name, ground_truth_dir, options, index) {
            Ok(record) => evaluation.records.push(record),
            Err(e) if options.keep_going => {
                warn!("Skipping {}: {}", mask.display(), e);
                evaluation.skipped += 1;
            }
            Err(e) => {
                progress::finish_progress(pb, "Failed");
                return Err(e);
            }
        }
        progress::inc_progress(pb.as_ref());
    }

    progress::finish_progress(pb, "Complete");
    info!(
        "{}: {} mask(s) evaluated, {} skipped",
        species_name,
        evaluation.records.len(),
        evaluation.skipped
    );
    Ok(evaluation)
}

/// Evaluate all species and concatenate their records in species order.
pub fn evaluate_all(species: &[Species], options: &EvaluateOptions) -> Result<Evaluation> {
    let mut all = Evaluation::default();
    for s in species {
        let evaluation =
            evaluate_species(&s.name, &s.predictions_dir, &s.ground_truth_dir, options)?;
        all.records.extend(evaluation.records);
        all.skipped += evaluation.skipped;
    }
    Ok(all)
}
