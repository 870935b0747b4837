pub mod display;
pub mod frame_pipeline;
pub mod model_set;
pub mod presenter;
pub mod session;
pub mod status;
pub mod tick_timer;
