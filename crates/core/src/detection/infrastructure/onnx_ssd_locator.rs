//! SSD face locator (ResNet-10, 300x300) using ONNX Runtime via `ort`.
//!
//! Handles resize + mean-subtraction preprocessing, inference, and decoding
//! of the `[1, 1, N, 7]` detection tensor into frame-space face boxes.

use std::path::Path;

use image::imageops::{self, FilterType};

use crate::detection::domain::face_locator::{Detection, FaceLocator};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::onnx_session::load_session;

/// Square input resolution the detector was trained at.
const INPUT_SIZE: u32 = 300;

/// Per-channel mean subtracted from the input, in RGB plane order.
const MEAN_RGB: [f32; 3] = [104.0, 117.0, 123.0];

/// Each detection row: `[image_id, label, confidence, x1, y1, x2, y2]`,
/// corners normalised to `[0, 1]`.
const VALUES_PER_DETECTION: usize = 7;

pub struct OnnxSsdLocator {
    session: ort::session::Session,
}

impl OnnxSsdLocator {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: load_session(model_path)?,
        })
    }
}

impl FaceLocator for OnnxSsdLocator {
    fn locate(
        &mut self,
        frame: &Frame,
        threshold: f32,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(preprocess(frame))?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face detector produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape();
        if shape.last() != Some(&VALUES_PER_DETECTION) {
            return Err(format!("Unexpected face detector output shape: {shape:?}").into());
        }

        let raw: Vec<f32> = tensor.iter().copied().collect();
        Ok(parse_detections(&raw, threshold, frame.width(), frame.height()))
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Bilinear resize to 300x300 and mean subtraction → NCHW float32, unscaled.
fn preprocess(frame: &Frame) -> ndarray::Array4<f32> {
    let resized = imageops::resize(&frame.as_image(), INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let size = INPUT_SIZE as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 - MEAN_RGB[c];
        }
    }
    tensor
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

/// Decodes flattened detection rows, keeping those strictly above `threshold`.
///
/// Corner coordinates are scaled to the frame and truncated toward zero;
/// they are not clamped here.
fn parse_detections(raw: &[f32], threshold: f32, frame_width: u32, frame_height: u32) -> Vec<Detection> {
    let fw = frame_width as f32;
    let fh = frame_height as f32;
    raw.chunks_exact(VALUES_PER_DETECTION)
        .filter(|row| row[2] > threshold)
        .map(|row| Detection {
            face: FaceBox::new(
                (row[3] * fw) as i32,
                (row[4] * fh) as i32,
                (row[5] * fw) as i32,
                (row[6] * fh) as i32,
            ),
            confidence: row[2],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
