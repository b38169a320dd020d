//! Pixel-wise accuracy metrics between predicted and ground truth masks.
//!
//! Both rasters are binarized before comparison, so ground truth labelled
//! with any non-zero foreground value compares equal to predicted 255.

use crate::error::{Error, Result};
use crate::mask::BinaryMask;

/// Pixel counts of a two-class confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confusion {
    /// Foreground in both.
    pub true_positive: u64,
    /// Foreground in prediction only.
    pub false_positive: u64,
    /// Foreground in ground truth only.
    pub false_negative: u64,
    /// Background in both.
    pub true_negative: u64,
}

impl Confusion {
    /// IoU of the foreground label, `None` when neither raster has foreground.
    fn foreground_iou(&self) -> Option<f64> {
        ratio(
            self.true_positive,
            self.true_positive + self.false_positive + self.false_negative,
        )
    }

    /// IoU of the background label, `None` when neither raster has background.
    fn background_iou(&self) -> Option<f64> {
        ratio(
            self.true_negative,
            self.true_negative + self.false_positive + self.false_negative,
        )
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Count the confusion matrix of `predicted` against `ground_truth`.
pub fn confusion(predicted: &BinaryMask, ground_truth: &BinaryMask) -> Result<Confusion> {
    if predicted.dimensions() != ground_truth.dimensions() {
        return Err(Error::ShapeMismatch {
            predicted: predicted.dimensions(),
            ground_truth: ground_truth.dimensions(),
        });
    }

    let mut counts = Confusion::default();
    for (&p, &g) in predicted.as_slice().iter().zip(ground_truth.as_slice()) {
        match (p, g) {
            (true, true) => counts.true_positive += 1,
            (true, false) => counts.false_positive += 1,
            (false, true) => counts.false_negative += 1,
            (false, false) => counts.true_negative += 1,
        }
    }
    Ok(counts)
}

/// Mean IoU over the background and foreground labels.
///
/// Labels absent from both rasters are left out of the mean. The result is
/// NaN only for zero-pixel rasters.
pub fn compute_iou(predicted: &BinaryMask, ground_truth: &BinaryMask) -> Result<f64> {
    let counts = confusion(predicted, ground_truth)?;
    let present: Vec<f64> = [counts.background_iou(), counts.foreground_iou()]
        .into_iter()
        .flatten()
        .collect();

    if present.is_empty() {
        return Ok(f64::NAN);
    }
    #[allow(clippy::cast_precision_loss)]
    Ok(present.iter().sum::<f64>() / present.len() as f64)
}

/// Foreground precision; 0.0 when nothing was predicted.
pub fn compute_precision(predicted: &BinaryMask, ground_truth: &BinaryMask) -> Result<f64> {
    let counts = confusion(predicted, ground_truth)?;
    Ok(ratio(
        counts.true_positive,
        counts.true_positive + counts.false_positive,
    )
    .unwrap_or(0.0))
}

/// Foreground recall; 0.0 when the ground truth has no foreground.
pub fn compute_recall(predicted: &BinaryMask, ground_truth: &BinaryMask) -> Result<f64> {
    let counts = confusion(predicted, ground_truth)?;
    Ok(ratio(
        counts.true_positive,
        counts.true_positive + counts.false_negative,
    )
    .unwrap_or(0.0))
}
