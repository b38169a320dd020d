//! Configuration validation.

use crate::config::Config;
use crate::constants::{confidence, inference::STRIDE};
use crate::error::{Error, Result};
use crate::pipeline::mask_suffix;
use std::collections::HashSet;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_inference(config)?;
    validate_evaluation(config)?;
    validate_species(config)?;
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::ConfigValidation { message }
}

/// Validate inference settings.
fn validate_inference(config: &Config) -> Result<()> {
    let inference = &config.inference;

    for (name, value) in [
        ("confidence", inference.confidence),
        ("iou_threshold", inference.iou_threshold),
        ("mask_threshold", inference.mask_threshold),
    ] {
        if !(confidence::MIN..=confidence::MAX).contains(&value) {
            return Err(invalid(format!(
                "inference.{name} must be between {} and {}, got {value}",
                confidence::MIN,
                confidence::MAX
            )));
        }
    }

    if inference.imgsz == 0 || inference.imgsz % STRIDE != 0 {
        return Err(invalid(format!(
            "inference.imgsz must be a positive multiple of {STRIDE}, got {}",
            inference.imgsz
        )));
    }

    if inference.max_detections == 0 {
        return Err(invalid("inference.max_detections must be at least 1".to_string()));
    }

    if inference.intra_threads == 0 {
        return Err(invalid("inference.intra_threads must be at least 1".to_string()));
    }

    if inference.input_name.trim().is_empty() {
        return Err(invalid("inference.input_name must not be empty".to_string()));
    }

    Ok(())
}

/// Validate evaluation settings.
fn validate_evaluation(config: &Config) -> Result<()> {
    let evaluation = &config.evaluation;

    if evaluation.mask_suffix.is_empty() {
        return Err(invalid("evaluation.mask_suffix must not be empty".to_string()));
    }
    if evaluation.ground_truth_height.is_empty() {
        return Err(invalid(
            "evaluation.ground_truth_height must not be empty".to_string(),
        ));
    }
    let extension = &config.extraction.mask_extension;
    if extension.is_empty() || extension.contains(['.', '/', '\\']) {
        return Err(invalid(format!(
            "extraction.mask_extension must be a bare file extension, got '{extension}'"
        )));
    }

    // Stage 2 must pick up what stage 1 writes.
    let written = mask_suffix(extension);
    if !written.ends_with(&evaluation.mask_suffix) {
        return Err(invalid(format!(
            "evaluation.mask_suffix '{}' does not match written masks ('*{written}')",
            evaluation.mask_suffix
        )));
    }

    Ok(())
}

/// Species names and keys must be present and unique.
fn validate_species(config: &Config) -> Result<()> {
    if config.species.is_empty() {
        return Err(invalid("at least one species must be configured".to_string()));
    }

    let mut names = HashSet::new();
    let mut keys = HashSet::new();
    for species in &config.species {
        if species.name.trim().is_empty() || species.key.trim().is_empty() {
            return Err(invalid("species name and key must not be empty".to_string()));
        }
        if species.key.contains(['/', '\\']) {
            return Err(invalid(format!(
                "species key '{}' must not contain path separators",
                species.key
            )));
        }
        if !names.insert(species.name.to_lowercase()) {
            return Err(invalid(format!("duplicate species name '{}'", species.name)));
        }
        if !keys.insert(species.key.to_lowercase()) {
            return Err(invalid(format!("duplicate species key '{}'", species.key)));
        }
    }

    Ok(())
}
