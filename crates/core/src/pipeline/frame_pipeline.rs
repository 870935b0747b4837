use crate::annotation::overlay::Overlay;
use crate::classification::domain::attribute_classifier::AttributeClassifier;
use crate::classification::domain::attributes::{AgeBracket, Attributes, Gender};
use crate::classification::domain::face_blob::face_blob;
use crate::detection::domain::face_locator::FaceLocator;
use crate::pipeline::status::Status;
use crate::shared::constants::{FACE_CONFIDENCE_THRESHOLD, FACE_CROP_MARGIN};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// One accepted face in a processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnnotation {
    pub face: FaceBox,
    pub confidence: f32,
    /// `None` when the padded crop fell entirely outside the frame.
    pub attributes: Option<Attributes>,
}

/// Output of one pipeline pass.
#[derive(Debug)]
pub struct TickResult {
    /// Copy of the input with boxes and labels drawn on it.
    pub frame: Frame,
    pub faces: Vec<FaceAnnotation>,
    /// `Detected` for the last classified face, `NoFace` when none was.
    pub status: Status,
}

/// Locate → crop → classify → annotate for a single frame.
pub struct FramePipeline {
    locator: Box<dyn FaceLocator>,
    gender: Box<dyn AttributeClassifier>,
    age: Box<dyn AttributeClassifier>,
    overlay: Overlay,
    confidence: f32,
    margin: u32,
}

impl FramePipeline {
    pub fn new(
        locator: Box<dyn FaceLocator>,
        gender: Box<dyn AttributeClassifier>,
        age: Box<dyn AttributeClassifier>,
        overlay: Overlay,
    ) -> Self {
        Self {
            locator,
            gender,
            age,
            overlay,
            confidence: FACE_CONFIDENCE_THRESHOLD,
            margin: FACE_CROP_MARGIN,
        }
    }

    pub fn process(&mut self, frame: Frame) -> Result<TickResult, Box<dyn std::error::Error>> {
        let threshold = self.confidence;
        let detections: Vec<_> = self
            .locator
            .locate(&frame, threshold)?
            .into_iter()
            .filter(|d| d.confidence > threshold)
            .collect();

        if detections.is_empty() {
            return Ok(TickResult {
                frame,
                faces: Vec::new(),
                status: Status::NoFace,
            });
        }

        let mut canvas = frame.to_rgb_image();
        for detection in &detections {
            self.overlay.draw_box(&mut canvas, &detection.face);
        }

        let mut status = Status::NoFace;
        let mut faces = Vec::with_capacity(detections.len());
        for detection in detections {
            let Some(crop) = detection
                .face
                .padded_crop(self.margin, frame.width(), frame.height())
            else {
                log::debug!(
                    "Frame {}: skipping face {:?}, crop is empty",
                    frame.index(),
                    detection.face
                );
                faces.push(FaceAnnotation {
                    face: detection.face,
                    confidence: detection.confidence,
                    attributes: None,
                });
                continue;
            };

            let blob = face_blob(&frame, &crop);
            let gender = Gender::from_scores(&self.gender.classify(&blob)?)?;
            let age = AgeBracket::from_scores(&self.age.classify(&blob)?)?;
            let attributes = Attributes { gender, age };

            self.overlay
                .draw_label(&mut canvas, &detection.face, &attributes.to_string());
            status = Status::Detected(attributes);
            faces.push(FaceAnnotation {
                face: detection.face,
                confidence: detection.confidence,
                attributes: Some(attributes),
            });
        }

        Ok(TickResult {
            frame: Frame::from_rgb_image(canvas, frame.index()),
            faces,
            status,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::classification::domain::attributes::LabelError;
    use crate::detection::domain::face_locator::Detection;
    use ndarray::Array4;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    pub(crate) struct StubLocator {
        pub detections: Vec<Detection>,
        pub thresholds: Arc<Mutex<Vec<f32>>>,
    }

    impl StubLocator {
        pub(crate) fn new(detections: Vec<Detection>) -> Self {
            Self {
                detections,
                thresholds: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FaceLocator for StubLocator {
        fn locate(
            &mut self,
            _frame: &Frame,
            threshold: f32,
        ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            self.thresholds.lock().unwrap().push(threshold);
            Ok(self.detections.clone())
        }
    }

    /// Always answers with the same score vector.
    pub(crate) struct FixedClassifier {
        pub scores: Vec<f32>,
        pub calls: Arc<Mutex<usize>>,
    }

    impl FixedClassifier {
        pub(crate) fn new(scores: Vec<f32>) -> Self {
            Self {
                scores,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl AttributeClassifier for FixedClassifier {
        fn classify(
            &mut self,
            blob: &Array4<f32>,
        ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
            assert_eq!(blob.shape(), &[1, 3, 227, 227]);
            *self.calls.lock().unwrap() += 1;
            Ok(self.scores.clone())
        }
    }

    pub(crate) struct FailingClassifier;

    impl AttributeClassifier for FailingClassifier {
        fn classify(
            &mut self,
            _blob: &Array4<f32>,
        ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
            Err("inference backend unavailable".into())
        }
    }

    // --- Helpers ---

    pub(crate) fn make_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![128; (w * h * 3) as usize], w, h, 0)
    }

    pub(crate) fn detection(x1: i32, y1: i32, x2: i32, y2: i32, confidence: f32) -> Detection {
        Detection {
            face: FaceBox::new(x1, y1, x2, y2),
            confidence,
        }
    }

    /// Female, (25-32)
    pub(crate) fn female_adult_pipeline(detections: Vec<Detection>) -> FramePipeline {
        FramePipeline::new(
            Box::new(StubLocator::new(detections)),
            Box::new(FixedClassifier::new(vec![0.1, 0.9])),
            Box::new(FixedClassifier::new(vec![
                0.0, 0.0, 0.05, 0.05, 0.8, 0.05, 0.05, 0.0,
            ])),
            Overlay::boxes_only(),
        )
    }

    // --- Tests ---

    #[test]
    fn test_no_faces_reports_no_face_and_keeps_frame() {
        let frame = make_frame(64, 48);
        let original = frame.clone();
        let mut pipeline = female_adult_pipeline(vec![]);

        let result = pipeline.process(frame).unwrap();

        assert_eq!(result.status, Status::NoFace);
        assert!(result.faces.is_empty());
        assert_eq!(result.frame, original);
    }

    #[test]
    fn test_single_face_is_labelled() {
        let mut pipeline = female_adult_pipeline(vec![detection(100, 80, 180, 180, 0.95)]);

        let result = pipeline.process(make_frame(320, 240)).unwrap();

        let expected = Attributes {
            gender: Gender::Female,
            age: AgeBracket::YoungAdult,
        };
        assert_eq!(result.status, Status::Detected(expected));
        assert_eq!(result.faces.len(), 1);
        assert_eq!(result.faces[0].attributes, Some(expected));
        assert_eq!(expected.to_string(), "Female, (25-32)");
    }

    #[test]
    fn test_box_drawn_on_copy_only() {
        let frame = make_frame(320, 240);
        let mut pipeline = female_adult_pipeline(vec![detection(100, 80, 180, 180, 0.95)]);

        let result = pipeline.process(frame).unwrap();

        let img = result.frame.to_rgb_image();
        assert_eq!(img.get_pixel(100, 80).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(140, 130).0, [128, 128, 128]);
        assert_eq!(result.frame.index(), 0);
        assert_eq!(result.frame.width(), 320);
    }

    #[test]
    fn test_low_confidence_detections_are_dropped() {
        let mut pipeline = female_adult_pipeline(vec![
            detection(10, 10, 50, 50, 0.7),
            detection(60, 10, 100, 50, 0.3),
        ]);

        let result = pipeline.process(make_frame(200, 100)).unwrap();

        assert_eq!(result.status, Status::NoFace);
        assert!(result.faces.is_empty());
    }

    #[test]
    fn test_locator_receives_fixed_threshold() {
        let locator = StubLocator::new(vec![]);
        let thresholds = locator.thresholds.clone();
        let mut pipeline = FramePipeline::new(
            Box::new(locator),
            Box::new(FixedClassifier::new(vec![1.0, 0.0])),
            Box::new(FixedClassifier::new(vec![1.0; 8])),
            Overlay::boxes_only(),
        );

        pipeline.process(make_frame(32, 32)).unwrap();

        assert_eq!(*thresholds.lock().unwrap(), vec![0.7]);
    }

    #[test]
    fn test_each_face_runs_both_classifiers() {
        let gender = FixedClassifier::new(vec![0.9, 0.1]);
        let age = FixedClassifier::new(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let (gender_calls, age_calls) = (gender.calls.clone(), age.calls.clone());
        let mut pipeline = FramePipeline::new(
            Box::new(StubLocator::new(vec![
                detection(10, 10, 60, 60, 0.9),
                detection(100, 10, 150, 60, 0.8),
                detection(200, 10, 250, 60, 0.99),
            ])),
            Box::new(gender),
            Box::new(age),
            Overlay::boxes_only(),
        );

        let result = pipeline.process(make_frame(320, 120)).unwrap();

        assert_eq!(result.faces.len(), 3);
        assert_eq!(*gender_calls.lock().unwrap(), 3);
        assert_eq!(*age_calls.lock().unwrap(), 3);
    }

    #[test]
    fn test_status_reflects_last_face() {
        /// Answers with a different label on every call.
        struct Alternating {
            next: usize,
        }
        impl AttributeClassifier for Alternating {
            fn classify(
                &mut self,
                _blob: &Array4<f32>,
            ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
                let mut scores = vec![0.0; 2];
                scores[self.next % 2] = 1.0;
                self.next += 1;
                Ok(scores)
            }
        }

        let mut pipeline = FramePipeline::new(
            Box::new(StubLocator::new(vec![
                detection(10, 10, 60, 60, 0.9),
                detection(100, 10, 150, 60, 0.9),
            ])),
            Box::new(Alternating { next: 0 }),
            Box::new(FixedClassifier::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0])),
            Overlay::boxes_only(),
        );

        let result = pipeline.process(make_frame(200, 100)).unwrap();

        assert_eq!(result.faces[0].attributes.unwrap().gender, Gender::Male);
        assert_eq!(
            result.status,
            Status::Detected(Attributes {
                gender: Gender::Female,
                age: AgeBracket::Senior,
            })
        );
    }

    #[test]
    fn test_face_outside_frame_is_skipped_and_reports_no_face() {
        let mut pipeline = female_adult_pipeline(vec![detection(500, 500, 600, 600, 0.9)]);

        let result = pipeline.process(make_frame(100, 100)).unwrap();

        assert_eq!(result.status, Status::NoFace);
        assert_eq!(result.faces.len(), 1);
        assert_eq!(result.faces[0].attributes, None);
    }

    #[test]
    fn test_face_touching_edge_is_classified() {
        let mut pipeline = female_adult_pipeline(vec![detection(-15, -15, 25, 30, 0.9)]);

        let result = pipeline.process(make_frame(100, 100)).unwrap();

        assert!(matches!(result.status, Status::Detected(_)));
    }

    #[test]
    fn test_classifier_error_propagates() {
        let mut pipeline = FramePipeline::new(
            Box::new(StubLocator::new(vec![detection(10, 10, 60, 60, 0.9)])),
            Box::new(FailingClassifier),
            Box::new(FixedClassifier::new(vec![1.0; 8])),
            Overlay::boxes_only(),
        );

        let err = pipeline.process(make_frame(100, 100)).unwrap_err();
        assert_eq!(err.to_string(), "inference backend unavailable");
    }

    #[test]
    fn test_wrong_score_count_is_an_error() {
        let mut pipeline = FramePipeline::new(
            Box::new(StubLocator::new(vec![detection(10, 10, 60, 60, 0.9)])),
            Box::new(FixedClassifier::new(vec![0.2, 0.3, 0.5])),
            Box::new(FixedClassifier::new(vec![1.0; 8])),
            Overlay::boxes_only(),
        );

        let err = pipeline.process(make_frame(100, 100)).unwrap_err();
        let label_err = err.downcast_ref::<LabelError>().unwrap();
        assert_eq!(
            *label_err,
            LabelError::ScoreCount {
                model: "gender",
                expected: 2,
                actual: 3,
            }
        );
    }
}
