use crate::video::domain::frame_source::{FrameSource, OpenError, SourceOpener, SourceRequest};

use super::camera_source::CameraSource;
use super::ffmpeg_file_source::FfmpegFileSource;

/// Opens cameras through nokhwa and files through ffmpeg.
#[derive(Debug, Default)]
pub struct MediaSourceOpener;

impl MediaSourceOpener {
    pub fn new() -> Self {
        Self
    }
}

impl SourceOpener for MediaSourceOpener {
    fn open(&mut self, request: &SourceRequest) -> Result<Box<dyn FrameSource>, OpenError> {
        match request {
            SourceRequest::Camera(index) => Ok(Box::new(CameraSource::open(*index)?)),
            SourceRequest::File(path) => Ok(Box::new(FfmpegFileSource::open(path)?)),
        }
    }
}
