use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::shared::face_box::CropRect;
use crate::shared::frame::Frame;

/// Square input resolution of both attribute models.
pub const BLOB_SIZE: u32 = 227;

/// Training-set channel means, in the models' native BGR plane order.
pub const MODEL_MEAN_BGR: [f32; 3] = [78.426_34, 87.768_91, 114.895_85];

/// Crops `crop` out of `frame` and builds the `1x3x227x227` tensor shared by
/// the age and gender models.
///
/// Bilinear resize, mean subtraction, no scaling. Planes are emitted as
/// B, G, R since that is the layout the models were trained on.
pub fn face_blob(frame: &Frame, crop: &CropRect) -> Array4<f32> {
    let source = frame.as_image();
    let face = imageops::crop_imm(&source, crop.x, crop.y, crop.width, crop.height);
    let resized = imageops::resize(&face, BLOB_SIZE, BLOB_SIZE, FilterType::Triangle);

    let size = BLOB_SIZE as usize;
    let mut blob = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        let [r, g, b] = pixel.0;
        blob[[0, 0, y, x]] = b as f32 - MODEL_MEAN_BGR[0];
        blob[[0, 1, y, x]] = g as f32 - MODEL_MEAN_BGR[1];
        blob[[0, 2, y, x]] = r as f32 - MODEL_MEAN_BGR[2];
    }
    blob
}
