use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::shared::constants::DISPLAY_MAX_SIZE;
use crate::shared::frame::Frame;

/// Largest size that fits inside `max_width` x `max_height` while keeping
/// the aspect ratio. Never upscales and never returns a zero dimension.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (w, h)
}

/// Converts an annotated frame into an RGBA image sized for the viewer.
pub fn display_image(frame: &Frame) -> RgbaImage {
    let (max_w, max_h) = DISPLAY_MAX_SIZE;
    let (w, h) = fit_within(frame.width(), frame.height(), max_w, max_h);
    let rgba = DynamicImage::ImageRgb8(frame.to_rgb_image()).into_rgba8();
    if (w, h) == (frame.width(), frame.height()) {
        return rgba;
    }
    imageops::resize(&rgba, w, h, FilterType::Lanczos3)
}
