//! Instance segmentation inference.
//!
//! The pipeline talks to models only through the [`Segmenter`] trait, so the
//! YOLO/ONNX backend can be swapped for an in-memory fake in tests.

mod postprocess;
mod yolo;

pub use postprocess::{
    Letterbox, PostprocessOptions, ScoredBox, decode_instances, letterbox, nms,
};
pub use yolo::YoloSegmenter;

use crate::error::Result;
use crate::mask::BinaryMask;
use image::DynamicImage;

/// Axis-aligned box in tile pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BoundingBox {
    /// Box area (zero for degenerate boxes).
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &Self) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let intersection = w * h;
        let union = self.area() + other.area() - intersection;
        if union > 0.0 { intersection / union } else { 0.0 }
    }
}

/// One detected object.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Class index in the model's label space.
    pub class_index: usize,
    /// Class confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Bounding box in tile coordinates.
    pub bbox: BoundingBox,
    /// Instance mask with the tile's dimensions.
    pub mask: BinaryMask,
}

/// An instance segmentation model.
pub trait Segmenter {
    /// Segment one tile; an empty list means nothing was detected.
    fn segment(&mut self, image: &DynamicImage) -> Result<Vec<Instance>>;
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_iou_identical() {
        let b = BoundingBox {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 10.0,
        };
        assert_eq!(b.iou(&b), 1.0);
    }

    #[test]
    fn test_bbox_iou_half_overlap() {
        let a = BoundingBox {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 10.0,
        };
        let b = BoundingBox {
            x1: 5.0,
            y1: 0.0,
            x2: 15.0,
            y2: 10.0,
        };
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_bbox_iou_disjoint() {
        let a = BoundingBox {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        let b = BoundingBox {
            x1: 2.0,
            y1: 2.0,
            x2: 3.0,
            y2: 3.0,
        };
        assert_eq!(a.iou(&b), 0.0);
    }
}
