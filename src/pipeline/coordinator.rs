//! File discovery for both pipeline stages.

use crate::constants::TILE_EXTENSIONS;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect image tiles directly inside `dir`, sorted by path.
pub fn collect_tiles(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::TilesDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut tiles = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_tile_file(&path) {
            tiles.push(path);
        }
    }
    tiles.sort();

    if tiles.is_empty() {
        return Err(Error::NoTilesFound {
            path: dir.to_path_buf(),
        });
    }

    debug!("Found {} tile(s) in {}", tiles.len(), dir.display());
    Ok(tiles)
}

/// Collect files in `dir` whose name ends with `suffix`, sorted by file name.
pub fn collect_mask_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut masks = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(suffix));
        if matches && path.is_file() {
            masks.push(path);
        }
    }
    masks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(masks)
}

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Check if a file is a supported tile format.
fn is_tile_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    // Compare as OsStr to handle non-UTF-8 filenames
    path.extension().is_some_and(|ext| {
        TILE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}
