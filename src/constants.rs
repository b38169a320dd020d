//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "segflora";

/// Pixel value written for foreground pixels in species masks.
pub const MASK_FOREGROUND: u8 = 255;

/// Pixel value written for background pixels in species masks.
pub const MASK_BACKGROUND: u8 = 0;

/// Supported tile image extensions.
pub const TILE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// Segmentation inference defaults.
pub mod inference {
    /// Square network input size in pixels.
    pub const DEFAULT_IMGSZ: u32 = 864;

    /// Network stride; input size must be a multiple of it.
    pub const STRIDE: u32 = 32;

    /// Minimum class confidence for a detection.
    pub const DEFAULT_CONFIDENCE: f32 = 0.269;

    /// IoU threshold for class-wise non-maximum suppression.
    pub const DEFAULT_IOU_THRESHOLD: f32 = 0.7;

    /// Sigmoid threshold for instance mask pixels.
    pub const DEFAULT_MASK_THRESHOLD: f32 = 0.5;

    /// Maximum detections kept per tile after NMS.
    pub const DEFAULT_MAX_DETECTIONS: usize = 300;

    /// Default ONNX Runtime intra-op thread count.
    pub const DEFAULT_INTRA_THREADS: usize = 4;

    /// Input tensor name of exported YOLO models.
    pub const DEFAULT_INPUT_NAME: &str = "images";

    /// Letterbox padding value (per channel, 0-255).
    pub const LETTERBOX_FILL: u8 = 114;

    /// Number of box coordinates preceding class scores in the detection head.
    pub const BOX_VALUES: usize = 4;
}

/// Confidence and threshold bounds.
pub mod confidence {
    /// Minimum valid threshold value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid threshold value.
    pub const MAX: f32 = 1.0;
}

/// Mask extraction defaults.
pub mod extraction {
    /// Extension (and format) of written species masks.
    pub const DEFAULT_MASK_EXTENSION: &str = "tiff";

    /// Subdirectory of the predictions directory for annotated tiles.
    pub const ANNOTATED_DIR: &str = "annotated";

    /// Blend factor of the species colour in annotated tiles.
    pub const ANNOTATION_ALPHA: f32 = 0.45;
}

/// Accuracy evaluation defaults.
pub mod evaluation {
    /// File name suffix of predicted masks picked up for evaluation.
    pub const DEFAULT_MASK_SUFFIX: &str = ".png.tiff";

    /// Flight height at which ground truth was labelled.
    pub const DEFAULT_GROUND_TRUTH_HEIGHT: &str = "10";

    /// Extension of ground truth masks.
    pub const DEFAULT_GROUND_TRUTH_EXTENSION: &str = "tiff";
}

/// Default directory layout below the data root.
pub mod layout {
    /// Directory with input tiles.
    pub const TILES_DIR: &str = "test_plot/images";
    /// Parent directory of per-species prediction directories.
    pub const PREDICTIONS_DIR: &str = "predictions";
    /// Parent directory of per-species ground truth directories.
    pub const GROUND_TRUTH_DIR: &str = "test_plots/masks";
    /// Parent directory of per-species model directories.
    pub const MODEL_DIR: &str = "model";
    /// Model file name inside a species model directory.
    pub const MODEL_FILE: &str = "best.onnx";
    /// Result table file name.
    pub const RESULTS_CSV: &str = "YOLO_segmentation_accuracy.csv";
}

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
