use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// One located face and the detector's confidence in it, in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub face: FaceBox,
    pub confidence: f32,
}

/// Domain interface for face localisation.
///
/// Implementations return only detections whose confidence is strictly
/// greater than `threshold`. `&mut self` because inference sessions are
/// mutable during a run.
pub trait FaceLocator: Send {
    fn locate(
        &mut self,
        frame: &Frame,
        threshold: f32,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
