//! File naming conventions shared by both stages.
//!
//! Tiles are named `plot_<N>_flight_X<H>.<image ext>`. Extraction writes
//! `<key>_plot_<N>_flight_X<H>.png.<ext>` whatever the tile format, so a mask
//! keeps both identifiers and evaluation can recover them from the name alone.

use crate::config::Species;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

const PLOT_START: &str = "plot_";
const PLOT_END: &str = "_flight";
const HEIGHT_START: &str = "_X";
const HEIGHT_END: &str = ".png";

/// Identifiers recovered from a predicted mask file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskName {
    /// Plot identifier (text between `plot_` and `_flight`).
    pub plot: String,
    /// Flight height (text between `_X` and `.png`).
    pub height: String,
}

/// Text between the first `start` and the last `end` following it.
fn between<'a>(name: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = name.find(start)? + start.len();
    let rest = &name[from..];
    let to = rest.rfind(end)?;
    Some(&rest[..to])
}

/// Parse the plot and flight height out of a mask file name.
///
/// Both captures are greedy: `plot_12_flight_X30.png.tiff` gives plot `12`
/// and height `30`.
pub fn parse_mask_name(name: &str) -> Result<MaskName> {
    let plot = between(name, PLOT_START, PLOT_END)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MaskNameParse {
            name: name.to_string(),
            missing: "plot identifier ('plot_<N>_flight')",
        })?;
    let height = between(name, HEIGHT_START, HEIGHT_END)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MaskNameParse {
            name: name.to_string(),
            missing: "flight height ('_X<H>.png')",
        })?;

    Ok(MaskName {
        plot: plot.to_string(),
        height: height.to_string(),
    })
}

/// Ground truth mask for `plot`, always read at the canonical `height`.
pub fn ground_truth_path(dir: &Path, plot: &str, height: &str, extension: &str) -> PathBuf {
    dir.join(format!("{PLOT_START}{plot}{PLOT_END}{HEIGHT_START}{height}.{extension}"))
}

/// Suffix every mask written with `extension` ends in.
pub fn mask_suffix(extension: &str) -> String {
    format!("{HEIGHT_END}.{extension}")
}

/// Where extraction writes the species mask of `tile`.
///
/// The tile's own extension is replaced by the `.png` height marker, so a
/// `.jpg` tile gives the same mask name as its `.png` counterpart.
pub fn mask_output_path(tile: &Path, species: &Species, extension: &str) -> PathBuf {
    let stem = tile.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("tile"),
        |s| s.to_string_lossy(),
    );
    species
        .predictions_dir
        .join(format!("{}_{stem}{}", species.key, mask_suffix(extension)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{Species, default_species};

    #[test]
    fn test_parse_plain_name() {
        let name = parse_mask_name("plot_12_flight_X30.png.tiff").unwrap();
        assert_eq!(name.plot, "12");
        assert_eq!(name.height, "30");
    }

    #[test]
    fn test_parse_prefixed_name() {
        let name = parse_mask_name("Centaurea_plot_7_flight_X20.png.tiff").unwrap();
        assert_eq!(name.plot, "7");
        assert_eq!(name.height, "20");
    }

    #[test]
    fn test_parse_greedy_captures() {
        let name = parse_mask_name("plot_3_flight_a_flight_X10_b.png.png.tiff").unwrap();
        assert_eq!(name.plot, "3_flight_a");
        assert_eq!(name.height, "10_b.png");
    }

    #[test]
    fn test_parse_missing_flight_marker() {
        let result = parse_mask_name("plot_12_X30.png.tiff");
        assert!(matches!(result, Err(Error::MaskNameParse { .. })));
    }

    #[test]
    fn test_parse_missing_height_marker() {
        let result = parse_mask_name("plot_12_flight_30.tiff");
        assert!(matches!(result, Err(Error::MaskNameParse { .. })));
    }

    #[test]
    fn test_parse_empty_plot() {
        assert!(parse_mask_name("plot__flight_X30.png.tiff").is_err());
    }

    #[test]
    fn test_ground_truth_path_uses_canonical_height() {
        let path = ground_truth_path(Path::new("/gt/Papaver"), "12", "10", "tiff");
        assert_eq!(path, PathBuf::from("/gt/Papaver/plot_12_flight_X10.tiff"));
    }

    #[test]
    fn test_mask_output_path_keeps_tile_name() {
        let species = Species::resolve(&default_species()[0], Path::new("/data"));
        let path = mask_output_path(
            Path::new("/data/test_plot/images/plot_12_flight_X30.png"),
            &species,
            "tiff",
        );
        assert_eq!(
            path,
            PathBuf::from("/data/predictions/Centaurea/Centaurea_plot_12_flight_X30.png.tiff")
        );
        let parsed =
            parse_mask_name(&path.file_name().unwrap().to_string_lossy()).unwrap();
        assert_eq!(parsed.plot, "12");
        assert_eq!(parsed.height, "30");
    }

    #[test]
    fn test_mask_output_path_normalizes_tile_extension() {
        let species = Species::resolve(&default_species()[0], Path::new("/data"));
        for tile in ["plot_4_flight_X20.jpg", "plot_4_flight_X20.TIF", "plot_4_flight_X20.png"] {
            let path = mask_output_path(Path::new(tile), &species, "tiff");
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert_eq!(name, "Centaurea_plot_4_flight_X20.png.tiff");
            assert!(name.ends_with(&mask_suffix("tiff")));
            assert_eq!(parse_mask_name(&name).unwrap().height, "20");
        }
    }
}
