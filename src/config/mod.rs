//! Configuration loading and management.

mod file;
mod paths;
mod species;
mod types;
mod validate;

pub use file::{load_config, load_config_file, load_default_config, save_config, save_default_config};
pub use paths::{config_dir, config_file_path, results_csv_path, tiles_dir};
pub use species::{Species, default_species, select_species};
pub use types::{
    Config, EvaluationConfig, ExtractionConfig, InferenceConfig, OutputConfig, PathsConfig,
    SpeciesConfig,
};
pub use validate::validate_config;
