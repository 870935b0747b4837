use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::shared::face_box::FaceBox;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Label glyph height in pixels.
const LABEL_SCALE: f32 = 24.0;

/// Gap between the label's baseline and the top of its face box.
const LABEL_OFFSET: i32 = 10;

/// Box outline thickness for a frame of the given height: one pixel per
/// 150 rows, halves rounded to even, never thinner than one pixel.
pub fn line_thickness(frame_height: u32) -> u32 {
    ((frame_height as f32 / 150.0).round_ties_even() as u32).max(1)
}

/// Draws face boxes and their labels onto annotated frames.
pub struct Overlay {
    font: Option<FontArc>,
}

impl Overlay {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    /// Overlay that outlines faces but never renders text.
    pub fn boxes_only() -> Self {
        Self { font: None }
    }

    /// Outlines `face` with concentric rectangles, clipped to the image.
    pub fn draw_box(&self, image: &mut RgbImage, face: &FaceBox) {
        if face.width() < 0 || face.height() < 0 {
            return;
        }
        let thickness = line_thickness(image.height()) as i32;
        let inset = (thickness - 1) / 2;
        for k in 0..thickness {
            let grow = k - inset;
            let left = face.x1 - grow;
            let top = face.y1 - grow;
            let width = face.x2 + grow - left + 1;
            let height = face.y2 + grow - top + 1;
            if width <= 0 || height <= 0 {
                continue;
            }
            let rect = Rect::at(left, top).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(image, rect, BOX_COLOR);
        }
    }

    /// Writes `text` with its baseline `LABEL_OFFSET` rows above `face`,
    /// anti-aliased. No-op without a font.
    pub fn draw_label(&self, image: &mut RgbImage, face: &FaceBox, text: &str) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(LABEL_SCALE);
        // draw_text_mut anchors at the top of the line box.
        let ascent = font.as_scaled(scale).ascent().round() as i32;
        let x = face.x1.max(0);
        let y = (face.y1 - LABEL_OFFSET - ascent).max(0);
        draw_text_mut(image, LABEL_COLOR, x, y, scale, font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::label_font::resolve_label_font;
    use rstest::rstest;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[rstest]
    #[case::tiny(50, 1)]
    #[case::below_one(100, 1)]
    #[case::half_rounds_to_even_up(225, 2)]
    #[case::half_rounds_to_even_down(375, 2)]
    #[case::half_rounds_to_even_down_again(675, 4)]
    #[case::vga(480, 3)]
    #[case::hd(720, 5)]
    #[case::full_hd(1080, 7)]
    fn test_line_thickness(#[case] height: u32, #[case] expected: u32) {
        assert_eq!(line_thickness(height), expected);
    }

    #[test]
    fn test_single_pixel_box_outline() {
        let mut img = RgbImage::new(200, 100);
        Overlay::boxes_only().draw_box(&mut img, &FaceBox::new(10, 10, 50, 40));

        assert_eq!(*img.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*img.get_pixel(50, 40), BOX_COLOR);
        assert_eq!(*img.get_pixel(30, 10), BOX_COLOR);
        assert_eq!(*img.get_pixel(30, 25), BLACK);
        assert_eq!(*img.get_pixel(9, 9), BLACK);
    }

    #[test]
    fn test_thick_box_grows_outwards_and_inwards() {
        // 450 rows → thickness 3: one ring inside, one on, one outside.
        let mut img = RgbImage::new(300, 450);
        Overlay::boxes_only().draw_box(&mut img, &FaceBox::new(100, 100, 200, 200));

        for p in [99, 100, 101] {
            assert_eq!(*img.get_pixel(p, 150), BOX_COLOR, "x={p}");
        }
        assert_eq!(*img.get_pixel(98, 150), BLACK);
        assert_eq!(*img.get_pixel(102, 150), BLACK);
    }

    #[test]
    fn test_box_partially_outside_is_clipped() {
        let mut img = RgbImage::new(64, 48);
        Overlay::boxes_only().draw_box(&mut img, &FaceBox::new(-20, -20, 30, 100));
        assert_eq!(*img.get_pixel(30, 10), BOX_COLOR);
        assert_eq!(*img.get_pixel(10, 10), BLACK);
    }

    #[test]
    fn test_inverted_box_draws_nothing() {
        let mut img = RgbImage::new(64, 48);
        Overlay::boxes_only().draw_box(&mut img, &FaceBox::new(40, 40, 10, 10));
        assert!(img.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_label_without_font_leaves_image_untouched() {
        let mut img = RgbImage::new(64, 48);
        let overlay = Overlay::boxes_only();
        overlay.draw_label(&mut img, &FaceBox::new(10, 30, 40, 45), "Male, (4-6)");
        assert!(img.pixels().all(|p| *p == BLACK));
    }

    /// Rows containing strongly covered label pixels (red channel set; the
    /// green box has none).
    fn label_rows(img: &RgbImage) -> Vec<u32> {
        let mut rows: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 127 && p.0[2] == 0)
            .map(|(_, y, _)| y)
            .collect();
        rows.dedup();
        rows
    }

    #[test]
    fn test_label_baseline_sits_above_box() {
        let Some(font) = resolve_label_font(None) else {
            eprintln!("no system font available, skipping");
            return;
        };
        let overlay = Overlay::new(Some(font));
        let face = FaceBox::new(100, 150, 200, 250);
        let mut img = RgbImage::new(320, 300);

        overlay.draw_box(&mut img, &face);
        overlay.draw_label(&mut img, &face, "EEE");

        let rows = label_rows(&img);
        assert!(!rows.is_empty(), "label not drawn");
        let top = *rows.first().unwrap() as i32;
        let bottom = *rows.last().unwrap() as i32;
        assert!(top < face.y1 - LABEL_OFFSET);
        // Glyphs without descenders end on the row just above the baseline.
        let baseline = face.y1 - LABEL_OFFSET;
        assert!(
            (baseline - 2..=baseline).contains(&bottom),
            "lowest label row {bottom}, baseline {baseline}"
        );
    }

    #[test]
    fn test_label_near_top_edge_is_clamped_into_frame() {
        let Some(font) = resolve_label_font(None) else {
            eprintln!("no system font available, skipping");
            return;
        };
        let overlay = Overlay::new(Some(font));
        let mut img = RgbImage::new(200, 100);

        overlay.draw_label(&mut img, &FaceBox::new(10, 5, 60, 60), "Male, (4-6)");

        let rows = label_rows(&img);
        assert!(!rows.is_empty());
        assert!(rows[0] < 12, "label starts at row {}", rows[0]);
    }
}
