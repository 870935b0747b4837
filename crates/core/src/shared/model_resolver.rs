use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{
    AGE_MODEL_NAME, FACE_DETECTOR_MODEL_NAME, GENDER_MODEL_NAME, MODELS_DIR_ENV,
};

pub const REQUIRED_MODELS: &[&str] = &[FACE_DETECTOR_MODEL_NAME, AGE_MODEL_NAME, GENDER_MODEL_NAME];

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("no directory contains all of {required:?}; searched: {}", display_paths(.searched))]
    NotFound {
        required: Vec<String>,
        searched: Vec<PathBuf>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Locate the directory holding every required model file.
///
/// Resolution order:
/// 1. Explicit directory (CLI flag or saved setting)
/// 2. `AGESIGHT_MODELS_DIR` environment variable
/// 3. User data directory (platform-specific)
/// 4. `models/` next to the running executable
pub fn resolve_models_dir(explicit: Option<&Path>) -> Result<PathBuf, ModelResolveError> {
    let candidates = candidate_dirs(explicit);
    find_complete_dir(&candidates, REQUIRED_MODELS).ok_or_else(|| ModelResolveError::NotFound {
        required: REQUIRED_MODELS.iter().map(|s| s.to_string()).collect(),
        searched: candidates,
    })
}

/// Platform-specific user model directory.
///
/// - macOS: `~/Library/Application Support/AgeSight/models/`
/// - Linux: `$XDG_DATA_HOME/AgeSight/models/` or `~/.local/share/AgeSight/models/`
/// - Windows: `%APPDATA%/AgeSight/models/`
pub fn user_models_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("AgeSight").join("models"))
}

fn candidate_dirs(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = explicit {
        dirs.push(dir.to_path_buf());
    }
    if let Some(dir) = env::var_os(MODELS_DIR_ENV) {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(dir) = user_models_dir() {
        dirs.push(dir);
    }
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("models")))
    {
        dirs.push(dir);
    }
    dirs
}

fn find_complete_dir(candidates: &[PathBuf], required: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| required.iter().all(|name| dir.join(name).is_file()))
        .cloned()
}
