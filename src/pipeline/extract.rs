//! Species mask extraction from image tiles.

use crate::config::Species;
use crate::constants::extraction::{ANNOTATED_DIR, ANNOTATION_ALPHA};
use crate::error::{Error, Result};
use crate::inference::Segmenter;
use crate::interrupt;
use crate::mask::{BinaryMask, combine_class_masks};
use crate::output::progress;
use crate::pipeline::{ensure_dir, mask_output_path};
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Options for extracting species masks.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Extension (and format) of written masks.
    pub mask_extension: String,
    /// Write nothing for tiles without target instances.
    pub skip_empty_masks: bool,
    /// Also write tiles with the mask blended in.
    pub save_annotated: bool,
    /// Abort on the first failing tile.
    pub fail_fast: bool,
    /// Show a progress bar.
    pub progress: bool,
}

/// What happened to a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOutcome {
    /// The model found nothing; no file was written.
    NoDetections,
    /// Detections exist, none of the target class.
    NoTargetInstances {
        /// Whether an all-background mask was written.
        written: bool,
    },
    /// A species mask was written.
    Written {
        /// Number of foreground pixels.
        foreground: usize,
    },
}

/// Counts for one species run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractionSummary {
    /// Tiles visited.
    pub tiles: usize,
    /// Masks with foreground written.
    pub written: usize,
    /// All-background masks written.
    pub empty: usize,
    /// Tiles without an output file.
    pub skipped: usize,
    /// Tiles that failed.
    pub errors: usize,
    /// Wall clock duration in seconds.
    pub duration_secs: f64,
}

/// Segment one tile and write its species mask.
pub fn process_tile<S: Segmenter + ?Sized>(
    segmenter: &mut S,
    tile: &Path,
    species: &Species,
    options: &ExtractOptions,
) -> Result<TileOutcome> {
    let image = image::open(tile).map_err(|e| Error::ImageRead {
        path: tile.to_path_buf(),
        source: e,
    })?;

    let instances = segmenter.segment(&image)?;
    if instances.is_empty() {
        debug!("No detections in {}", tile.display());
        return Ok(TileOutcome::NoDetections);
    }

    let has_target = instances
        .iter()
        .any(|i| i.class_index == species.class_index);
    if !has_target && options.skip_empty_masks {
        debug!(
            "No {} instances in {} ({} other), skipping",
            species.name,
            tile.display(),
            instances.len()
        );
        return Ok(TileOutcome::NoTargetInstances { written: false });
    }

    let mask = combine_class_masks(
        &instances,
        species.class_index,
        image.width(),
        image.height(),
    )?;

    let output = mask_output_path(tile, species, &options.mask_extension);
    mask.save(&output)?;
    debug!("Wrote {}", output.display());

    if options.save_annotated {
        write_annotated(&image, &mask, tile, species)?;
    }

    if has_target {
        Ok(TileOutcome::Written {
            foreground: mask.foreground_count(),
        })
    } else {
        Ok(TileOutcome::NoTargetInstances { written: true })
    }
}

/// Blend `color` into the foreground pixels of `image`.
pub fn annotate(image: &DynamicImage, mask: &BinaryMask, color: [u8; 3]) -> RgbImage {
    let mut rgb = image.to_rgb8();
    for (x, y, pixel) in rgb.enumerate_pixels_mut() {
        if mask.get(x, y) {
            for (channel, &target) in pixel.0.iter_mut().zip(&color) {
                let blended = f32::from(*channel)
                    .mul_add(1.0 - ANNOTATION_ALPHA, f32::from(target) * ANNOTATION_ALPHA);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    *channel = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
    rgb
}

fn write_annotated(
    image: &DynamicImage,
    mask: &BinaryMask,
    tile: &Path,
    species: &Species,
) -> Result<()> {
    let dir = species.predictions_dir.join(ANNOTATED_DIR);
    ensure_dir(&dir)?;
    let path = dir.join(tile.file_name().unwrap_or_else(|| "tile.png".as_ref()));
    annotate(image, mask, species.color)
        .save(&path)
        .map_err(|e| Error::ImageWrite { path, source: e })
}

/// Extract masks of one species from every tile.
///
/// Tile failures are logged and counted; with `fail_fast` the first one is
/// returned. Ctrl+C stops the run between tiles.
pub fn extract_species<S: Segmenter + ?Sized>(
    segmenter: &mut S,
    tiles: &[PathBuf],
    species: &Species,
    options: &ExtractOptions,
) -> Result<ExtractionSummary> {
    let start = Instant::now();
    ensure_dir(&species.predictions_dir)?;

    info!(
        "Extracting {} masks (class {}) from {} tile(s) into {}",
        species.name,
        species.class_index,
        tiles.len(),
        species.predictions_dir.display()
    );

    let pb = progress::create_progress(tiles.len(), "tiles", &species.name, options.progress);
    let mut summary = ExtractionSummary::default();

    for tile in tiles {
        if let Err(e) = interrupt::check() {
            progress::finish_progress(pb, "Interrupted");
            return Err(e);
        }

        summary.tiles += 1;
        match process_tile(segmenter, tile, species, options) {
            Ok(TileOutcome::Written { .. }) => summary.written += 1,
            Ok(TileOutcome::NoTargetInstances { written: true }) => summary.empty += 1,
            Ok(TileOutcome::NoDetections | TileOutcome::NoTargetInstances { written: false }) => {
                summary.skipped += 1;
            }
            Err(e) => {
                error!("Failed to process {}: {}", tile.display(), e);
                summary.errors += 1;
                if options.fail_fast {
                    progress::finish_progress(pb, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(pb.as_ref());
    }

    progress::finish_progress(pb, "Complete");
    summary.duration_secs = start.elapsed().as_secs_f64();

    info!(
        "{}: {} written, {} empty, {} skipped, {} errors in {:.2}s",
        species.name,
        summary.written,
        summary.empty,
        summary.skipped,
        summary.errors,
        summary.duration_secs
    );
    if summary.errors > 0 {
        warn!("{} tile(s) had errors", summary.errors);
    }

    Ok(summary)
}
