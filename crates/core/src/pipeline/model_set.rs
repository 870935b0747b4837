use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::overlay::Overlay;
use crate::classification::infrastructure::onnx_attribute_classifier::OnnxAttributeClassifier;
use crate::detection::infrastructure::onnx_ssd_locator::OnnxSsdLocator;
use crate::pipeline::frame_pipeline::FramePipeline;
use crate::shared::constants::{AGE_MODEL_NAME, FACE_DETECTOR_MODEL_NAME, GENDER_MODEL_NAME};

/// Locations of the three model files the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub face_detector: PathBuf,
    pub age_classifier: PathBuf,
    pub gender_classifier: PathBuf,
}

impl ModelPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            face_detector: dir.join(FACE_DETECTOR_MODEL_NAME),
            age_classifier: dir.join(AGE_MODEL_NAME),
            gender_classifier: dir.join(GENDER_MODEL_NAME),
        }
    }

    /// Paths that do not point at an existing file.
    pub fn missing(&self) -> Vec<PathBuf> {
        [&self.face_detector, &self.age_classifier, &self.gender_classifier]
            .into_iter()
            .filter(|p| !p.is_file())
            .cloned()
            .collect()
    }
}

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("missing model files: {}", join_paths(.0))]
    Missing(Vec<PathBuf>),
    #[error("failed to load model {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loads all three models up front. Any failure is fatal for startup.
pub fn load_pipeline(paths: &ModelPaths, overlay: Overlay) -> Result<FramePipeline, ModelLoadError> {
    let missing = paths.missing();
    if !missing.is_empty() {
        return Err(ModelLoadError::Missing(missing));
    }

    let load_error = |path: &Path, e: Box<dyn std::error::Error>| ModelLoadError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    log::info!("Loading face detector from {}", paths.face_detector.display());
    let locator = OnnxSsdLocator::new(&paths.face_detector)
        .map_err(|e| load_error(&paths.face_detector, e))?;
    log::info!("Loading gender classifier from {}", paths.gender_classifier.display());
    let gender = OnnxAttributeClassifier::new(&paths.gender_classifier, "gender")
        .map_err(|e| load_error(&paths.gender_classifier, e))?;
    log::info!("Loading age classifier from {}", paths.age_classifier.display());
    let age = OnnxAttributeClassifier::new(&paths.age_classifier, "age")
        .map_err(|e| load_error(&paths.age_classifier, e))?;

    Ok(FramePipeline::new(
        Box::new(locator),
        Box::new(gender),
        Box::new(age),
        overlay,
    ))
}
