//! Species definitions and path resolution.

use crate::config::{Config, SpeciesConfig};
use crate::constants::layout;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Species with all directories resolved against the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    /// Display name written to the result table.
    pub name: String,
    /// Short key used for directory names and mask prefixes.
    pub key: String,
    /// Target class index in the model's label space.
    pub class_index: usize,
    /// ONNX model path.
    pub model: PathBuf,
    /// Directory receiving predicted masks.
    pub predictions_dir: PathBuf,
    /// Directory holding ground truth masks.
    pub ground_truth_dir: PathBuf,
    /// Annotation colour.
    pub color: [u8; 3],
}

impl Species {
    /// Resolve a configured species against `data_root`.
    pub fn resolve(entry: &SpeciesConfig, data_root: &Path) -> Self {
        let model = entry.model.clone().unwrap_or_else(|| {
            data_root
                .join(layout::MODEL_DIR)
                .join(entry.name.replace(' ', "_"))
                .join(layout::MODEL_FILE)
        });
        let predictions_dir = entry
            .predictions_dir
            .clone()
            .unwrap_or_else(|| data_root.join(layout::PREDICTIONS_DIR).join(&entry.key));
        let ground_truth_dir = entry
            .ground_truth_dir
            .clone()
            .unwrap_or_else(|| data_root.join(layout::GROUND_TRUTH_DIR).join(&entry.key));

        Self {
            name: entry.name.clone(),
            key: entry.key.clone(),
            class_index: entry.class_index,
            model,
            predictions_dir,
            ground_truth_dir,
            color: entry.color.unwrap_or([255, 0, 255]),
        }
    }

    /// Does `query` name this species (key or display name, case-insensitive)?
    pub fn matches(&self, query: &str) -> bool {
        self.key.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }
}

/// Resolve the species selected by `queries`, keeping configuration order.
///
/// An empty query list selects every configured species.
pub fn select_species(config: &Config, queries: &[String]) -> Result<Vec<Species>> {
    let all: Vec<Species> = config
        .species
        .iter()
        .map(|entry| Species::resolve(entry, &config.paths.data_root))
        .collect();

    if queries.is_empty() {
        return Ok(all);
    }

    for query in queries {
        if !all.iter().any(|s| s.matches(query)) {
            return Err(Error::SpeciesNotFound { key: query.clone() });
        }
    }

    Ok(all
        .into_iter()
        .filter(|s| queries.iter().any(|q| s.matches(q)))
        .collect())
}

/// Species of the field survey, in result table order.
pub fn default_species() -> Vec<SpeciesConfig> {
    [
        ("Centaurea cyanus", "Centaurea", [70, 110, 230]),
        ("Equisetum arvense", "Equisetum", [60, 180, 75]),
        ("Vicia", "Vicia", [145, 30, 180]),
        ("Tripleurospermum inodorum", "Tripleurospermum", [255, 225, 25]),
        ("Papaver dubium", "Papaver", [230, 25, 75]),
        ("Cirsium arvense", "Cirsium", [240, 50, 230]),
        ("Anchusa arvensis", "Anchusa", [0, 130, 200]),
    ]
    .into_iter()
    .map(|(name, key, color)| SpeciesConfig {
        name: name.to_string(),
        key: key.to_string(),
        class_index: 0,
        model: None,
        predictions_dir: None,
        ground_truth_dir: None,
        color: Some(color),
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_below_data_root() {
        let entry = &default_species()[0];
        let species = Species::resolve(entry, Path::new("/data"));
        assert_eq!(species.predictions_dir, PathBuf::from("/data/predictions/Centaurea"));
        assert_eq!(
            species.ground_truth_dir,
            PathBuf::from("/data/test_plots/masks/Centaurea")
        );
        assert_eq!(
            species.model,
            PathBuf::from("/data/model/Centaurea_cyanus/best.onnx")
        );
        assert_eq!(species.class_index, 0);
    }

    #[test]
    fn test_resolve_explicit_paths_win() {
        let mut entry = default_species()[1].clone();
        entry.predictions_dir = Some(PathBuf::from("/elsewhere/pred"));
        let species = Species::resolve(&entry, Path::new("/data"));
        assert_eq!(species.predictions_dir, PathBuf::from("/elsewhere/pred"));
    }

    #[test]
    fn test_select_species_keeps_config_order() {
        let config = Config::default();
        let selected =
            select_species(&config, &["anchusa".to_string(), "Centaurea cyanus".to_string()])
                .unwrap();
        let keys: Vec<_> = selected.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["Centaurea", "Anchusa"]);
    }

    #[test]
    fn test_select_species_empty_selects_all() {
        let config = Config::default();
        assert_eq!(select_species(&config, &[]).unwrap().len(), 7);
    }

    #[test]
    fn test_select_unknown_species() {
        let config = Config::default();
        let result = select_species(&config, &["Quercus".to_string()]);
        assert!(matches!(result, Err(Error::SpeciesNotFound { .. })));
    }
}
