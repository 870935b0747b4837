pub mod constants;
pub mod face_box;
pub mod frame;
pub mod model_resolver;
pub mod onnx_session;
