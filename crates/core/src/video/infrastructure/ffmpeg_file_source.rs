use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{FrameSource, OpenError, SourceRequest};

/// Decodes a video file one frame per call via ffmpeg-next
/// (libavformat + libavcodec), converting each frame to RGB24.
pub struct FfmpegFileSource {
    decoding: Option<Decoding>,
}

/// Everything tied to the open file; dropping it closes the input.
struct Decoding {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
    width: u32,
    height: u32,
    frame_index: usize,
    flushing: bool,
}

impl FfmpegFileSource {
    pub fn open(path: &Path) -> Result<Self, OpenError> {
        if !path.is_file() {
            return Err(OpenError::NotFound(path.to_path_buf()));
        }
        let request = SourceRequest::File(path.to_path_buf());
        let unavailable = |e: ffmpeg_next::Error| OpenError::unavailable(&request, e);

        ffmpeg_next::init().map_err(unavailable)?;
        let input = ffmpeg_next::format::input(path).map_err(unavailable)?;

        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| OpenError::NoVideoStream(path.to_path_buf()))?;
        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(unavailable)?;
        let decoder = codec_ctx.decoder().video().map_err(unavailable)?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(unavailable)?;

        log::info!("Opened {} ({width}x{height})", path.display());

        Ok(Self {
            decoding: Some(Decoding {
                input,
                decoder,
                scaler,
                video_stream_index,
                width,
                height,
                frame_index: 0,
                flushing: false,
            }),
        })
    }

    pub fn is_open(&self) -> bool {
        self.decoding.is_some()
    }
}

impl FrameSource for FfmpegFileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(decoding) = self.decoding.as_mut() else {
            return Ok(None);
        };
        let frame = decoding.next_frame()?;
        if frame.is_none() {
            self.close();
        }
        Ok(frame)
    }

    fn close(&mut self) {
        if self.decoding.take().is_some() {
            log::debug!("Closed video file");
        }
    }
}

impl Drop for FfmpegFileSource {
    fn drop(&mut self) {
        self.close();
    }
}

impl Decoding {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if let Some(frame) = self.try_receive()? {
            return Ok(Some(frame));
        }
        if self.flushing {
            return Ok(None);
        }

        loop {
            let next = self.input.packets().next();
            let Some((stream, packet)) = next else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                return self.try_receive();
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            if self.decoder.send_packet(&packet).is_err() {
                continue;
            }

            if let Some(frame) = self.try_receive()? {
                return Ok(Some(frame));
            }
        }
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg rows may carry padding (stride > width*3); it is stripped here.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
