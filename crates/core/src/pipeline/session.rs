use crate::pipeline::frame_pipeline::FramePipeline;
use crate::pipeline::presenter::Presenter;
use crate::pipeline::status::Status;
use crate::pipeline::tick_timer::{TickTimer, TickToken};
use crate::shared::constants::TICK_DELAY;
use crate::video::domain::frame_source::{FrameSource, SourceOpener, SourceRequest};

/// Owns the active source and drives the pipeline one tick at a time.
///
/// The session never sleeps or spawns. Callers wait out each returned
/// [`TickToken`]'s delay and hand it back to [`PipelineSession::tick`].
pub struct PipelineSession {
    pipeline: FramePipeline,
    opener: Box<dyn SourceOpener>,
    source: Option<Box<dyn FrameSource>>,
    status: Status,
    timer: TickTimer,
}

impl PipelineSession {
    pub fn new(pipeline: FramePipeline, opener: Box<dyn SourceOpener>) -> Self {
        Self {
            pipeline,
            opener,
            source: None,
            status: Status::Ready,
            timer: TickTimer::new(TICK_DELAY),
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Tears down any active source, then opens `request`.
    ///
    /// Returns the first tick token, or `None` if the source failed to open.
    pub fn start(
        &mut self,
        request: &SourceRequest,
        presenter: &mut dyn Presenter,
    ) -> Option<TickToken> {
        self.stop(presenter);

        match self.opener.open(request) {
            Ok(source) => {
                log::info!("Started {request}");
                self.source = Some(source);
                self.set_status(Status::Ready, presenter);
                Some(self.timer.arm())
            }
            Err(e) => {
                log::warn!("Failed to open {request}: {e}");
                self.set_status(Status::OpenFailed(e.to_string()), presenter);
                None
            }
        }
    }

    /// Cancels pending ticks and releases the source. Safe to call repeatedly.
    pub fn stop(&mut self, presenter: &mut dyn Presenter) {
        self.timer.cancel();
        if let Some(mut source) = self.source.take() {
            source.close();
            presenter.clear();
            self.set_status(Status::Stopped, presenter);
            log::info!("Stopped");
        }
    }

    /// Runs one pipeline iteration if `token` is still current.
    ///
    /// Returns the next token, or `None` once the session has halted.
    pub fn tick(&mut self, token: TickToken, presenter: &mut dyn Presenter) -> Option<TickToken> {
        if !self.timer.accept(token) {
            log::trace!("Ignoring stale tick");
            return None;
        }
        let source = self.source.as_mut()?;

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("Source exhausted");
                self.stop(presenter);
                return None;
            }
            Err(e) => {
                log::warn!("Frame read failed: {e}");
                self.stop(presenter);
                return None;
            }
        };

        match self.pipeline.process(frame) {
            Ok(result) => {
                self.set_status(result.status, presenter);
                presenter.show(&result.frame);
                Some(self.timer.arm())
            }
            Err(e) => {
                log::error!("Inference failed: {e}");
                self.stop(presenter);
                self.set_status(Status::Faulted(e.to_string()), presenter);
                None
            }
        }
    }

    fn set_status(&mut self, status: Status, presenter: &mut dyn Presenter) {
        presenter.set_status(&status);
        self.status = status;
    }
}

impl Drop for PipelineSession {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}
