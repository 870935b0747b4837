use iced::widget::image;

use agesight_core::pipeline::display::display_image;
use agesight_core::pipeline::presenter::Presenter;
use agesight_core::pipeline::status::Status;
use agesight_core::shared::frame::Frame;

/// Holds what the window currently shows: the last annotated frame, already
/// fitted for display, and the status line.
pub struct ScreenPresenter {
    frame: Option<image::Handle>,
    status: String,
}

impl ScreenPresenter {
    pub fn new() -> Self {
        Self {
            frame: None,
            status: Status::Ready.to_string(),
        }
    }

    pub fn frame(&self) -> Option<&image::Handle> {
        self.frame.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

impl Presenter for ScreenPresenter {
    fn show(&mut self, frame: &Frame) {
        let fitted = display_image(frame);
        let (width, height) = fitted.dimensions();
        self.frame = Some(image::Handle::from_rgba(width, height, fitted.into_raw()));
    }

    fn set_status(&mut self, status: &Status) {
        self.status = status.to_string();
    }

    fn clear(&mut self) {
        self.frame = None;
    }
}
