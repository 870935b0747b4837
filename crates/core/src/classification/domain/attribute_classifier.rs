use ndarray::Array4;

/// Domain interface for a single-attribute face classifier.
///
/// Takes the shared face tensor built by [`super::face_blob::face_blob`] and
/// returns one probability per label, in the model's label order.
pub trait AttributeClassifier: Send {
    fn classify(&mut self, blob: &Array4<f32>) -> Result<Vec<f32>, Box<dyn std::error::Error>>;
}
