use std::time::Duration;

pub const FACE_DETECTOR_MODEL_NAME: &str = "face_detector.onnx";
pub const AGE_MODEL_NAME: &str = "age_net.onnx";
pub const GENDER_MODEL_NAME: &str = "gender_net.onnx";

/// Detections at or below this confidence are discarded.
pub const FACE_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Pixels added on every side of a face box before cropping for classification.
pub const FACE_CROP_MARGIN: u32 = 20;

/// Delay between the end of one tick and the start of the next.
pub const TICK_DELAY: Duration = Duration::from_millis(10);

/// Largest image the desktop display surface will render (width, height).
pub const DISPLAY_MAX_SIZE: (u32, u32) = (700, 500);

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

pub const MODELS_DIR_ENV: &str = "AGESIGHT_MODELS_DIR";
pub const FONT_PATH_ENV: &str = "AGESIGHT_FONT";
