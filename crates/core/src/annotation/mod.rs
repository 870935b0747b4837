pub mod label_font;
pub mod overlay;
