//! Pre- and post-processing for YOLO segmentation heads.
//!
//! Pure functions over flat tensors so they can be tested without a model.
//! Layouts follow the Ultralytics segmentation export:
//!
//! - detections: `[1, 4 + classes + coeffs, anchors]`, box as `cx, cy, w, h`
//!   in network input pixels followed by per-class scores and mask coefficients
//! - prototypes: `[1, coeffs, mask_h, mask_w]`

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use crate::constants::inference::{BOX_VALUES, LETTERBOX_FILL};
use crate::error::{Error, Result};
use crate::inference::{BoundingBox, Instance};
use crate::mask::BinaryMask;
use image::DynamicImage;
use image::imageops::{self, FilterType};

/// Geometry of a letterboxed network input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Square network input size.
    pub size: u32,
    /// Resize factor from tile to input pixels.
    pub scale: f32,
    /// Horizontal padding (left) in input pixels.
    pub pad_x: f32,
    /// Vertical padding (top) in input pixels.
    pub pad_y: f32,
    /// Tile width.
    pub width: u32,
    /// Tile height.
    pub height: u32,
}

impl Letterbox {
    /// Geometry for fitting a `width` x `height` tile into a `size` square.
    pub fn new(width: u32, height: u32, size: u32) -> Self {
        let scale = (size as f32 / width.max(1) as f32).min(size as f32 / height.max(1) as f32);
        let (new_w, new_h) = scaled_dims(width, height, scale, size);
        Self {
            size,
            scale,
            pad_x: ((size - new_w) / 2) as f32,
            pad_y: ((size - new_h) / 2) as f32,
            width,
            height,
        }
    }

    /// Map a tile coordinate to network input coordinates.
    pub fn to_input(&self, x: f32, y: f32) -> (f32, f32) {
        (x.mul_add(self.scale, self.pad_x), y.mul_add(self.scale, self.pad_y))
    }

    /// Map a network input coordinate back to tile coordinates.
    pub fn to_tile(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

fn scaled_dims(width: u32, height: u32, scale: f32, size: u32) -> (u32, u32) {
    let w = ((width as f32 * scale).round() as u32).clamp(1, size);
    let h = ((height as f32 * scale).round() as u32).clamp(1, size);
    (w, h)
}

/// Letterbox a tile into an NCHW `f32` tensor scaled to `[0, 1]`.
pub fn letterbox(image: &DynamicImage, size: u32) -> (Vec<f32>, Letterbox) {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let geometry = Letterbox::new(width, height, size);
    let (new_w, new_h) = scaled_dims(width, height, geometry.scale, size);
    let resized = imageops::resize(&rgb, new_w, new_h, FilterType::Triangle);

    let plane = size as usize * size as usize;
    let mut tensor = vec![f32::from(LETTERBOX_FILL) / 255.0; 3 * plane];
    let left = geometry.pad_x as usize;
    let top = geometry.pad_y as usize;

    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = (y as usize + top) * size as usize + x as usize + left;
        for (channel, &value) in pixel.0.iter().enumerate() {
            tensor[channel * plane + offset] = f32::from(value) / 255.0;
        }
    }

    (tensor, geometry)
}

/// Thresholds applied while decoding.
#[derive(Debug, Clone, Copy)]
pub struct PostprocessOptions {
    /// Minimum class confidence.
    pub confidence: f32,
    /// NMS IoU threshold.
    pub iou_threshold: f32,
    /// Sigmoid threshold for mask pixels.
    pub mask_threshold: f32,
    /// Maximum detections kept.
    pub max_detections: usize,
}

/// A box with its class and score, the unit NMS works on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredBox {
    /// Class index.
    pub class_index: usize,
    /// Class confidence.
    pub confidence: f32,
    /// Box coordinates.
    pub bbox: BoundingBox,
}

/// Class-wise greedy non-maximum suppression.
///
/// Returns indices into `boxes` of the kept boxes, highest confidence first.
pub fn nms(boxes: &[ScoredBox], iou_threshold: f32, max_detections: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        boxes[b]
            .confidence
            .partial_cmp(&boxes[a].confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<usize> = Vec::new();
    for idx in order {
        if keep.len() >= max_detections {
            break;
        }
        let candidate = &boxes[idx];
        let suppressed = keep.iter().any(|&k| {
            boxes[k].class_index == candidate.class_index
                && boxes[k].bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            keep.push(idx);
        }
    }
    keep
}

struct Candidate {
    scored: ScoredBox,
    coeffs: Vec<f32>,
}

/// Decode raw detection and prototype tensors into tile-sized instances.
pub fn decode_instances(
    output: &[f32],
    output_shape: &[usize],
    protos: &[f32],
    proto_shape: &[usize],
    geometry: &Letterbox,
    options: &PostprocessOptions,
) -> Result<Vec<Instance>> {
    let (channels, anchors) = match output_shape {
        [1, channels, anchors] => (*channels, *anchors),
        _ => {
            return Err(Error::ModelOutput {
                message: format!("expected detections of shape [1, C, N], got {output_shape:?}"),
            });
        }
    };
    let (coeff_count, mask_h, mask_w) = match proto_shape {
        [1, c, h, w] => (*c, *h, *w),
        _ => {
            return Err(Error::ModelOutput {
                message: format!("expected prototypes of shape [1, M, H, W], got {proto_shape:?}"),
            });
        }
    };
    if channels <= BOX_VALUES + coeff_count {
        return Err(Error::ModelOutput {
            message: format!(
                "{channels} detection channels cannot hold 4 box values, classes and {coeff_count} mask coefficients"
            ),
        });
    }
    if output.len() != channels * anchors || protos.len() != coeff_count * mask_h * mask_w {
        return Err(Error::ModelOutput {
            message: "tensor length does not match its shape".to_string(),
        });
    }

    let class_count = channels - BOX_VALUES - coeff_count;
    let value = |channel: usize, anchor: usize| output[channel * anchors + anchor];

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let (class_index, confidence) = (0..class_count)
            .map(|c| (c, value(BOX_VALUES + c, anchor)))
            .fold((0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
        if confidence < options.confidence {
            continue;
        }

        let (cx, cy, w, h) = (
            value(0, anchor),
            value(1, anchor),
            value(2, anchor),
            value(3, anchor),
        );
        let (x1, y1) = geometry.to_tile(w.mul_add(-0.5, cx), h.mul_add(-0.5, cy));
        let (x2, y2) = geometry.to_tile(w.mul_add(0.5, cx), h.mul_add(0.5, cy));
        let bbox = BoundingBox {
            x1: x1.clamp(0.0, geometry.width as f32),
            y1: y1.clamp(0.0, geometry.height as f32),
            x2: x2.clamp(0.0, geometry.width as f32),
            y2: y2.clamp(0.0, geometry.height as f32),
        };
        if bbox.area() <= 0.0 {
            continue;
        }

        let coeffs = (0..coeff_count)
            .map(|k| value(BOX_VALUES + class_count + k, anchor))
            .collect();
        candidates.push(Candidate {
            scored: ScoredBox {
                class_index,
                confidence,
                bbox,
            },
            coeffs,
        });
    }

    let scored: Vec<ScoredBox> = candidates.iter().map(|c| c.scored).collect();
    let kept = nms(&scored, options.iou_threshold, options.max_detections);

    let prototypes = Prototypes {
        data: protos,
        count: coeff_count,
        height: mask_h,
        width: mask_w,
    };

    Ok(kept
        .into_iter()
        .map(|idx| {
            let candidate = &candidates[idx];
            Instance {
                class_index: candidate.scored.class_index,
                confidence: candidate.scored.confidence,
                bbox: candidate.scored.bbox,
                mask: prototypes.render(
                    &candidate.coeffs,
                    &candidate.scored.bbox,
                    geometry,
                    options.mask_threshold,
                ),
            }
        })
        .collect())
}

struct Prototypes<'a> {
    data: &'a [f32],
    count: usize,
    height: usize,
    width: usize,
}

impl Prototypes<'_> {
    /// Linear combination of prototypes, one logit per prototype pixel.
    fn logits(&self, coeffs: &[f32]) -> Vec<f32> {
        let plane = self.height * self.width;
        let mut logits = vec![0.0_f32; plane];
        for (k, &coeff) in coeffs.iter().enumerate().take(self.count) {
            let proto = &self.data[k * plane..(k + 1) * plane];
            for (dst, &p) in logits.iter_mut().zip(proto) {
                *dst = coeff.mul_add(p, *dst);
            }
        }
        logits
    }

    fn sample(&self, logits: &[f32], px: f32, py: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let px = px.clamp(0.0, max_x);
        let py = py.clamp(0.0, max_y);
        let x0 = px.floor() as usize;
        let y0 = py.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = px - x0 as f32;
        let fy = py - y0 as f32;

        let at = |x: usize, y: usize| logits[y * self.width + x];
        let top = (at(x1, y0) - at(x0, y0)).mul_add(fx, at(x0, y0));
        let bottom = (at(x1, y1) - at(x0, y1)).mul_add(fx, at(x0, y1));
        (bottom - top).mul_add(fy, top)
    }

    /// Tile-sized mask of one instance, cropped to its box.
    fn render(
        &self,
        coeffs: &[f32],
        bbox: &BoundingBox,
        geometry: &Letterbox,
        threshold: f32,
    ) -> BinaryMask {
        let mut mask = BinaryMask::new(geometry.width, geometry.height);
        if self.width == 0 || self.height == 0 {
            return mask;
        }

        let logits = self.logits(coeffs);
        let sx = self.width as f32 / geometry.size as f32;
        let sy = self.height as f32 / geometry.size as f32;

        let x_start = bbox.x1.floor() as u32;
        let y_start = bbox.y1.floor() as u32;
        let x_end = (bbox.x2.ceil() as u32).min(geometry.width);
        let y_end = (bbox.y2.ceil() as u32).min(geometry.height);

        for y in y_start..y_end {
            let cy = y as f32 + 0.5;
            if cy < bbox.y1 || cy > bbox.y2 {
                continue;
            }
            for x in x_start..x_end {
                let cx = x as f32 + 0.5;
                if cx < bbox.x1 || cx > bbox.x2 {
                    continue;
                }
                let (ix, iy) = geometry.to_input(cx, cy);
                let logit = self.sample(&logits, ix.mul_add(sx, -0.5), iy.mul_add(sy, -0.5));
                if sigmoid(logit) > threshold {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
