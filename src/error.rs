//! Error types for segflora.

use std::path::PathBuf;

/// Result type alias for segflora operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for segflora.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Species not present in configuration.
    #[error("species '{key}' not found in configuration")]
    SpeciesNotFound {
        /// Requested species key or name.
        key: String,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: PathBuf,
    },

    /// Failed to load the segmentation model.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Model output did not have the expected layout.
    #[error("unexpected model output: {message}")]
    ModelOutput {
        /// Description of the layout problem.
        message: String,
    },

    /// Tile directory does not exist.
    #[error("tile directory does not exist: {path}")]
    TilesDirNotFound {
        /// Path to the tile directory.
        path: PathBuf,
    },

    /// No tiles found in the tile directory.
    #[error("no image tiles found in '{path}'")]
    NoTilesFound {
        /// Path to the tile directory.
        path: PathBuf,
    },

    /// Failed to decode an image.
    #[error("failed to read image '{path}'")]
    ImageRead {
        /// Path to the image file.
        path: PathBuf,
        /// Underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode an image.
    #[error("failed to write image '{path}'")]
    ImageWrite {
        /// Path to the image file.
        path: PathBuf,
        /// Underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// Two rasters that must be compared have different dimensions.
    #[error("raster size mismatch: predicted {predicted:?}, ground truth {ground_truth:?}")]
    ShapeMismatch {
        /// Predicted mask dimensions (width, height).
        predicted: (u32, u32),
        /// Ground truth mask dimensions (width, height).
        ground_truth: (u32, u32),
    },

    /// A mask does not have the size of the raster it belongs to.
    #[error("mask size {actual:?} does not match expected {expected:?}")]
    MaskSize {
        /// Expected dimensions (width, height).
        expected: (u32, u32),
        /// Actual dimensions (width, height).
        actual: (u32, u32),
    },

    /// Mask file name does not follow the `plot_<N>_flight_X<H>.png` convention.
    #[error("cannot parse mask file name '{name}': missing {missing}")]
    MaskNameParse {
        /// Offending file name.
        name: String,
        /// Marker that could not be found.
        missing: &'static str,
    },

    /// Predictions directory for a species does not exist.
    #[error("predictions directory does not exist for {species}: {path}")]
    PredictionsDirNotFound {
        /// Species display name.
        species: String,
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// Ground truth mask for a prediction does not exist.
    #[error("ground truth mask not found for '{mask}': expected '{path}'")]
    GroundTruthNotFound {
        /// Predicted mask file name.
        mask: String,
        /// Expected ground truth path.
        path: PathBuf,
    },

    /// Failed to write the results CSV.
    #[error("failed to write results CSV '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to write JSON summary file.
    #[error("failed to write JSON summary '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to create or write an output file.
    #[error("failed to write output file '{path}'")]
    OutputFileWrite {
        /// Path to the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Processing was interrupted by the user.
    #[error("interrupted")]
    Interrupted,
}
