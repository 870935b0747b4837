use crate::pipeline::status::Status;
use crate::shared::frame::Frame;

/// Where annotated frames and status updates end up.
///
/// The desktop window and the headless CLI each provide one; the session
/// only ever talks to this trait.
pub trait Presenter {
    /// Replaces the displayed image with `frame`.
    fn show(&mut self, frame: &Frame);

    fn set_status(&mut self, status: &Status);

    /// Blanks the display area.
    fn clear(&mut self);
}
