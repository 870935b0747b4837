use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use thiserror::Error;

use crate::shared::constants::FONT_PATH_ENV;

/// Well-known system font locations, tried in order.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a usable TrueType/OpenType font")]
    Invalid(PathBuf),
}

pub fn load_font(path: &Path) -> Result<FontArc, FontError> {
    let bytes = fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| FontError::Invalid(path.to_path_buf()))
}

/// Finds a font for overlay labels.
///
/// Resolution order: explicit path, `AGESIGHT_FONT`, then common system
/// fonts. Returns `None` (labels disabled) when nothing loads.
pub fn resolve_label_font(explicit: Option<&Path>) -> Option<FontArc> {
    for path in candidate_paths(explicit) {
        if !path.is_file() {
            continue;
        }
        match load_font(&path) {
            Ok(font) => {
                log::info!("Using label font {}", path.display());
                return Some(font);
            }
            Err(e) => log::warn!("{e}"),
        }
    }
    log::warn!("No label font found; face labels will not be drawn");
    None
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Some(path) = env::var_os(FONT_PATH_ENV) {
        paths.push(PathBuf::from(path));
    }
    paths.extend(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));
    paths
}
