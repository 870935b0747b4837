use std::path::Path;

use ndarray::Array4;

use crate::classification::domain::attribute_classifier::AttributeClassifier;
use crate::shared::onnx_session::load_session;

/// Age or gender classifier backed by an ONNX Runtime session.
///
/// Both models share the same call shape: one `1x3x227x227` input, one
/// `[1, labels]` softmax output.
pub struct OnnxAttributeClassifier {
    session: ort::session::Session,
    name: &'static str,
}

impl OnnxAttributeClassifier {
    pub fn new(model_path: &Path, name: &'static str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: load_session(model_path)?,
            name,
        })
    }
}

impl AttributeClassifier for OnnxAttributeClassifier {
    fn classify(&mut self, blob: &Array4<f32>) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(blob.clone())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err(format!("{} model produced no outputs", self.name).into());
        }
        let scores = outputs[0].try_extract_array::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}
