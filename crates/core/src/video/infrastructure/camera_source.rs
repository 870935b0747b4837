//! Live capture from a local camera via nokhwa.
//!
//! Frames are pulled synchronously on the caller's thread: each
//! `next_frame` blocks only as long as the device takes to deliver one
//! buffer.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{FrameSource, OpenError, SourceRequest};

pub struct CameraSource {
    camera: Option<Camera>,
    index: u32,
    frame_index: usize,
}

impl CameraSource {
    /// Opens the camera at `index` (0 = system default) and starts its stream.
    ///
    /// Tries the highest frame rate first, then lets the backend pick any
    /// format it can decode to RGB.
    pub fn open(index: u32) -> Result<Self, OpenError> {
        let request = SourceRequest::Camera(index);
        let attempts = [
            RequestedFormatType::AbsoluteHighestFrameRate,
            RequestedFormatType::None,
        ];

        let opened = first_success(attempts, |format| {
            let requested = RequestedFormat::new::<RgbFormat>(format);
            let mut camera = Camera::new(CameraIndex::Index(index), requested)
                .map_err(|e| format!("camera {index} rejected requested format: {e}"))?;
            camera
                .open_stream()
                .map_err(|e| format!("camera {index} failed to start streaming: {e}"))?;
            Ok(camera)
        });

        match opened {
            Ok(camera) => {
                let resolution = camera.resolution();
                log::info!(
                    "Opened camera {index} ({}x{})",
                    resolution.width(),
                    resolution.height()
                );
                Ok(Self {
                    camera: Some(camera),
                    index,
                    frame_index: 0,
                })
            }
            Err(reason) => Err(OpenError::unavailable(&request, reason)),
        }
    }
}

/// Runs `open` for each attempt in order and returns the first success.
///
/// Every failure is logged; the last one is returned if none succeed.
fn first_success<A, T>(
    attempts: impl IntoIterator<Item = A>,
    mut open: impl FnMut(A) -> Result<T, String>,
) -> Result<T, String> {
    let mut last_error = "no usable format".to_string();
    for attempt in attempts {
        match open(attempt) {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("{e}");
                last_error = e;
            }
        }
    }
    Err(last_error)
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };
        let buffer = camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (width, height) = decoded.dimensions();

        let frame = Frame::new(decoded.into_raw(), width, height, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera {}: {e}", self.index);
            }
            log::debug!("Closed camera {}", self.index);
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_failure_falls_through_to_next_format() {
        let mut tried = Vec::new();
        let result = first_success(["fastest", "any"], |format| {
            tried.push(format);
            match format {
                "fastest" => Err("failed to start streaming: busy".to_string()),
                other => Ok(other),
            }
        });

        assert_eq!(result, Ok("any"));
        assert_eq!(tried, vec!["fastest", "any"]);
    }

    #[test]
    fn test_first_working_format_wins() {
        let mut calls = 0;
        let result = first_success([1, 2, 3], |n| {
            calls += 1;
            Ok::<_, String>(n)
        });

        assert_eq!(result, Ok(1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_all_formats_failing_reports_last_error() {
        let result: Result<(), String> =
            first_success([1, 2], |n| Err(format!("attempt {n} failed")));
        assert_eq!(result, Err("attempt 2 failed".to_string()));
    }

    #[test]
    fn test_no_attempts_is_an_error() {
        let result: Result<(), String> = first_success(Vec::<u8>::new(), |_| Ok(()));
        assert_eq!(result, Err("no usable format".to_string()));
    }
}
