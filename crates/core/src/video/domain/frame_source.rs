use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

/// What the user asked to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRequest {
    Camera(u32),
    File(PathBuf),
}

impl fmt::Display for SourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRequest::Camera(index) => write!(f, "camera {index}"),
            SourceRequest::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum OpenError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),
    #[error("could not open {target}: {reason}")]
    Unavailable { target: String, reason: String },
}

impl OpenError {
    pub fn unavailable(request: &SourceRequest, reason: impl fmt::Display) -> Self {
        OpenError::Unavailable {
            target: request.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// An open capture handle producing frames on demand.
///
/// Implementations release their device or file in `close`, which must be
/// idempotent, and again on drop.
pub trait FrameSource {
    /// Returns the next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying handle.
    fn close(&mut self);
}

/// Turns a [`SourceRequest`] into an open [`FrameSource`].
pub trait SourceOpener {
    fn open(&mut self, request: &SourceRequest) -> Result<Box<dyn FrameSource>, OpenError>;
}
