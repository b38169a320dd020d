//! Binary raster masks.
//!
//! A [`BinaryMask`] is the common currency of both stages: the segmenter
//! produces one per instance, extraction ORs them into a species mask and
//! writes it as an 8-bit raster, and evaluation loads predicted and ground
//! truth rasters back into masks before computing metrics.

use crate::constants::{MASK_BACKGROUND, MASK_FOREGROUND};
use crate::error::{Error, Result};
use crate::inference::Instance;
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;

/// Row-major boolean raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl BinaryMask {
    /// Create an all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// Binarize an image: every pixel whose luminance is above zero is foreground.
    ///
    /// Luminance is taken at 16 bits so that low non-zero values of 16-bit
    /// rasters are not rounded away.
    pub fn from_image(image: &DynamicImage) -> Self {
        let luma = image.to_luma16();
        let (width, height) = luma.dimensions();
        let data = luma.pixels().map(|p| p.0[0] > 0).collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Load and binarize a raster from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| Error::ImageRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_image(&image))
    }

    /// Render as 8-bit single channel, 0 for background and 255 for foreground.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) {
                MASK_FOREGROUND
            } else {
                MASK_BACKGROUND
            }])
        })
    }

    /// Write the mask; the encoding follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_gray_image().save(path).map_err(|e| Error::ImageWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel value; out-of-bounds coordinates read as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.data[self.index(x, y)]
    }

    /// Set a pixel; out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.data[idx] = value;
        }
    }

    /// Row-major pixel values.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// True if no pixel is foreground.
    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// OR `other` into this mask.
    pub fn union_with(&mut self, other: &Self) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::MaskSize {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        for (dst, &src) in self.data.iter_mut().zip(&other.data) {
            *dst |= src;
        }
        Ok(())
    }
}

/// Combine the masks of all instances of `class_index` into one species mask.
///
/// With no matching instance the result is an all-background mask of the
/// requested size. An instance mask of a different size is an error.
pub fn combine_class_masks(
    instances: &[Instance],
    class_index: usize,
    width: u32,
    height: u32,
) -> Result<BinaryMask> {
    let mut combined = BinaryMask::new(width, height);
    for instance in instances.iter().filter(|i| i.class_index == class_index) {
        combined.union_with(&instance.mask)?;
    }
    Ok(combined)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inference::BoundingBox;
    use tempfile::TempDir;

    fn instance(class_index: usize, mask: BinaryMask) -> Instance {
        Instance {
            class_index,
            confidence: 0.9,
            bbox: BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
            mask,
        }
    }

    fn square(width: u32, height: u32, x0: u32, y0: u32, side: u32) -> BinaryMask {
        let mut mask = BinaryMask::new(width, height);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn test_combine_ors_target_class_only() {
        let instances = vec![
            instance(0, square(8, 8, 0, 0, 2)),
            instance(1, square(8, 8, 4, 4, 4)),
            instance(0, square(8, 8, 6, 6, 2)),
        ];
        let combined = combine_class_masks(&instances, 0, 8, 8).unwrap();
        assert_eq!(combined.foreground_count(), 8);
        assert!(combined.get(0, 0));
        assert!(combined.get(7, 7));
        assert!(!combined.get(4, 4));
    }

    #[test]
    fn test_combine_without_target_instances_is_all_background() {
        let instances = vec![instance(3, square(4, 4, 0, 0, 4))];
        let combined = combine_class_masks(&instances, 0, 4, 4).unwrap();
        assert_eq!(combined.dimensions(), (4, 4));
        assert!(combined.is_empty());
        assert!(combined.to_gray_image().pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_combine_all_zero_target_masks_is_all_background() {
        let instances = vec![
            instance(0, BinaryMask::new(5, 3)),
            instance(0, BinaryMask::new(5, 3)),
        ];
        let combined = combine_class_masks(&instances, 0, 5, 3).unwrap();
        assert!(combined.is_empty());
    }

    #[test]
    fn test_combine_rejects_mismatched_instance_mask() {
        let instances = vec![instance(0, BinaryMask::new(2, 2))];
        let result = combine_class_masks(&instances, 0, 4, 4);
        assert!(matches!(result, Err(Error::MaskSize { .. })));
    }

    #[test]
    fn test_gray_image_uses_0_and_255() {
        let mask = square(2, 2, 0, 0, 1);
        let gray = mask.to_gray_image();
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 1).0[0], 0);
    }

    #[test]
    fn test_from_image_treats_any_nonzero_as_foreground() {
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, Luma([0]));
        gray.put_pixel(1, 0, Luma([1]));
        gray.put_pixel(2, 0, Luma([250]));
        let mask = BinaryMask::from_image(&DynamicImage::ImageLuma8(gray));
        assert_eq!(mask.as_slice(), &[false, true, true]);
    }

    #[test]
    fn test_save_and_load_tiff() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mask.png.tiff");
        let mask = square(6, 4, 1, 1, 2);

        mask.save(&path).unwrap();
        let loaded = BinaryMask::load(&path).unwrap();

        assert_eq!(loaded, mask);
    }

    #[test]
    fn test_load_missing_file() {
        let result = BinaryMask::load(Path::new("/nonexistent/mask.tiff"));
        assert!(matches!(result, Err(Error::ImageRead { .. })));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut mask = BinaryMask::new(2, 2);
        mask.set(5, 5, true);
        assert!(!mask.get(5, 5));
        assert!(mask.is_empty());
    }
}
