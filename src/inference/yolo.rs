//! ONNX Runtime backend for YOLO segmentation exports.

use crate::config::InferenceConfig;
use crate::error::{Error, Result};
use crate::inference::postprocess::{PostprocessOptions, decode_instances, letterbox};
use crate::inference::{Instance, Segmenter};
use image::DynamicImage;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// YOLO segmentation model running on ONNX Runtime.
pub struct YoloSegmenter {
    session: Session,
    input_name: String,
    imgsz: u32,
    options: PostprocessOptions,
}

impl YoloSegmenter {
    /// Load a model from an ONNX file.
    pub fn load(path: &Path, config: &InferenceConfig) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let load_error = |e: &dyn std::fmt::Display| Error::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let session = Session::builder()
            .map_err(|e| load_error(&e))?
            .with_intra_threads(config.intra_threads)
            .map_err(|e| load_error(&e))?
            .commit_from_file(path)
            .map_err(|e| load_error(&e))?;

        info!(
            "Loaded model: {} (imgsz: {}, conf: {}, iou: {})",
            path.display(),
            config.imgsz,
            config.confidence,
            config.iou_threshold
        );

        Ok(Self {
            session,
            input_name: config.input_name.clone(),
            imgsz: config.imgsz,
            options: PostprocessOptions {
                confidence: config.confidence,
                iou_threshold: config.iou_threshold,
                mask_threshold: config.mask_threshold,
                max_detections: config.max_detections,
            },
        })
    }

    /// Run the session and copy both outputs out as `(data, shape)` pairs.
    fn run(&mut self, input: Vec<f32>) -> Result<[(Vec<f32>, Vec<usize>); 2]> {
        let size = self.imgsz as usize;
        let tensor = Tensor::from_array(([1_usize, 3, size, size], input)).map_err(|e| {
            Error::Inference {
                reason: format!("failed to create input tensor: {e}"),
            }
        })?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        if outputs.len() < 2 {
            return Err(Error::ModelOutput {
                message: format!(
                    "segmentation model must have detection and prototype outputs, got {}",
                    outputs.len()
                ),
            });
        }

        let extract = |index: usize| -> Result<(Vec<f32>, Vec<usize>)> {
            let (shape, data) = outputs[index]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Inference {
                    reason: format!("failed to extract output {index}: {e}"),
                })?;
            let shape = shape.iter().map(|&d| usize::try_from(d).unwrap_or(0)).collect();
            Ok((data.to_vec(), shape))
        };

        Ok([extract(0)?, extract(1)?])
    }
}

impl Segmenter for YoloSegmenter {
    fn segment(&mut self, image: &DynamicImage) -> Result<Vec<Instance>> {
        let start = Instant::now();
        let (input, geometry) = letterbox(image, self.imgsz);
        let [(detections, detection_shape), (protos, proto_shape)] = self.run(input)?;
        let inference_ms = start.elapsed().as_secs_f64() * 1000.0;

        let instances = decode_instances(
            &detections,
            &detection_shape,
            &protos,
            &proto_shape,
            &geometry,
            &self.options,
        )?;

        debug!(
            "Segmented {}x{} tile: {} instance(s), inference {:.1} ms, total {:.1} ms",
            geometry.width,
            geometry.height,
            instances.len(),
            inference_ms,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let result = YoloSegmenter::load(
            Path::new("/nonexistent/best.onnx"),
            &InferenceConfig::default(),
        );
        assert!(matches!(result, Err(Error::ModelFileNotFound { .. })));
    }
}
