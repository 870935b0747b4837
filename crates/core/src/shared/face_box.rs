/// Axis-aligned face rectangle in frame-pixel coordinates, corner to corner.
///
/// Coordinates come straight from the detector and may fall outside the
/// frame or be inverted; consumers clamp through [`FaceBox::padded_crop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// A non-empty region lying entirely inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Expands the box by `margin` on every side and clamps the result to
    /// `[0, frame_width) x [0, frame_height)`.
    ///
    /// Returns `None` when nothing of the padded box is left inside the frame.
    pub fn padded_crop(&self, margin: u32, frame_width: u32, frame_height: u32) -> Option<CropRect> {
        let m = i64::from(margin);
        let fw = i64::from(frame_width);
        let fh = i64::from(frame_height);

        let left = (i64::from(self.x1) - m).clamp(0, fw);
        let top = (i64::from(self.y1) - m).clamp(0, fh);
        let right = (i64::from(self.x2) + m).clamp(0, fw);
        let bottom = (i64::from(self.y2) + m).clamp(0, fh);

        if right <= left || bottom <= top {
            return None;
        }

        Some(CropRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

impl CropRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}
