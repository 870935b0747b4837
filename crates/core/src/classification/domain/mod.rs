pub mod attribute_classifier;
pub mod attributes;
pub mod face_blob;
