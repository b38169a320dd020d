//! Configuration type definitions.

use crate::constants::{evaluation, extraction, inference};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations.
    pub paths: PathsConfig,

    /// Segmentation inference settings.
    pub inference: InferenceConfig,

    /// Mask extraction settings.
    pub extraction: ExtractionConfig,

    /// Accuracy evaluation settings.
    pub evaluation: EvaluationConfig,

    /// Output settings.
    pub output: OutputConfig,

    /// Species processed by both stages, in result table order.
    pub species: Vec<SpeciesConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            inference: InferenceConfig::default(),
            extraction: ExtractionConfig::default(),
            evaluation: EvaluationConfig::default(),
            output: OutputConfig::default(),
            species: super::species::default_species(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the data tree; unset paths resolve below it.
    pub data_root: PathBuf,

    /// Directory with input tiles.
    pub tiles_dir: Option<PathBuf>,

    /// Result table written by `evaluate`.
    pub results_csv: Option<PathBuf>,

    /// Optional per-species JSON summary written by `evaluate`.
    pub summary_json: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            tiles_dir: None,
            results_csv: None,
            summary_json: None,
        }
    }
}

/// Segmentation inference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Square network input size in pixels.
    pub imgsz: u32,

    /// Minimum class confidence.
    pub confidence: f32,

    /// NMS IoU threshold.
    pub iou_threshold: f32,

    /// Sigmoid threshold for mask pixels.
    pub mask_threshold: f32,

    /// Maximum detections per tile.
    pub max_detections: usize,

    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,

    /// Name of the model's image input.
    pub input_name: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            imgsz: inference::DEFAULT_IMGSZ,
            confidence: inference::DEFAULT_CONFIDENCE,
            iou_threshold: inference::DEFAULT_IOU_THRESHOLD,
            mask_threshold: inference::DEFAULT_MASK_THRESHOLD,
            max_detections: inference::DEFAULT_MAX_DETECTIONS,
            intra_threads: inference::DEFAULT_INTRA_THREADS,
            input_name: inference::DEFAULT_INPUT_NAME.to_string(),
        }
    }
}

/// Mask extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extension (and thereby format) of written masks.
    pub mask_extension: String,

    /// Do not write all-zero masks for tiles without target-class instances.
    pub skip_empty_masks: bool,

    /// Also write tiles with the species mask blended in.
    pub save_annotated: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mask_extension: extraction::DEFAULT_MASK_EXTENSION.to_string(),
            skip_empty_masks: false,
            save_annotated: false,
        }
    }
}

/// Accuracy evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// File name suffix of predicted masks to evaluate.
    pub mask_suffix: String,

    /// Flight height at which every plot's ground truth is read.
    pub ground_truth_height: String,

    /// Extension of ground truth mask files.
    pub ground_truth_extension: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            mask_suffix: evaluation::DEFAULT_MASK_SUFFIX.to_string(),
            ground_truth_height: evaluation::DEFAULT_GROUND_TRUTH_HEIGHT.to_string(),
            ground_truth_extension: evaluation::DEFAULT_GROUND_TRUTH_EXTENSION.to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix the results CSV with a UTF-8 BOM.
    pub csv_bom: bool,
}

/// One species as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Display name written to the result table (e.g. `Centaurea cyanus`).
    pub name: String,

    /// Short key used for directory names and mask prefixes (e.g. `Centaurea`).
    pub key: String,

    /// Class index of the species in its model's label space.
    #[serde(default)]
    pub class_index: usize,

    /// ONNX model path (default: `<data_root>/model/<Name_with_underscores>/best.onnx`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,

    /// Predicted mask directory (default: `<data_root>/predictions/<key>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions_dir: Option<PathBuf>,

    /// Ground truth directory (default: `<data_root>/test_plots/masks/<key>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_dir: Option<PathBuf>,

    /// RGB colour for annotated tiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_config_default_values() {
        let inference = InferenceConfig::default();
        assert_eq!(inference.imgsz, 864);
        assert_eq!(inference.confidence, 0.269);
        assert_eq!(inference.input_name, "images");
    }

    #[test]
    fn test_evaluation_config_default_values() {
        let evaluation = EvaluationConfig::default();
        assert_eq!(evaluation.mask_suffix, ".png.tiff");
        assert_eq!(evaluation.ground_truth_height, "10");
        assert_eq!(evaluation.ground_truth_extension, "tiff");
    }

    #[test]
    fn test_default_config_has_species() {
        let config = Config::default();
        assert_eq!(config.species.len(), 7);
        assert_eq!(config.species[0].name, "Centaurea cyanus");
    }
}
