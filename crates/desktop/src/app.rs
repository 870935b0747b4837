use std::path::PathBuf;

use iced::widget::{button, column, container, image, row, text};
use iced::{Element, Length, Task};

use agesight_core::pipeline::session::PipelineSession;
use agesight_core::pipeline::tick_timer::TickToken;
use agesight_core::shared::constants::{DISPLAY_MAX_SIZE, VIDEO_EXTENSIONS};
use agesight_core::video::domain::frame_source::SourceRequest;

use crate::screen::ScreenPresenter;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    StartWebcam,
    LoadVideo,
    VideoSelected(Option<PathBuf>),
    Stop,
    Tick(TickToken),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    session: PipelineSession,
    screen: ScreenPresenter,
    settings: Settings,
}

impl App {
    pub fn new(session: PipelineSession, settings: Settings) -> (Self, Task<Message>) {
        (
            Self {
                session,
                screen: ScreenPresenter::new(),
                settings,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartWebcam => {
                let request = SourceRequest::Camera(self.settings.camera_index);
                let token = self.session.start(&request, &mut self.screen);
                return schedule(token);
            }
            Message::LoadVideo => {
                let start_dir = self.settings.last_video_dir.clone();
                return Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new()
                            .set_title("Select a video")
                            .add_filter("Video files", VIDEO_EXTENSIONS);
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        dialog.pick_file().await.map(|h| h.path().to_path_buf())
                    },
                    Message::VideoSelected,
                );
            }
            Message::VideoSelected(Some(path)) => {
                if let Some(dir) = path.parent() {
                    self.settings.last_video_dir = Some(dir.to_path_buf());
                    self.settings.save();
                }
                let token = self
                    .session
                    .start(&SourceRequest::File(path), &mut self.screen);
                return schedule(token);
            }
            Message::VideoSelected(None) => {}
            Message::Stop => {
                self.session.stop(&mut self.screen);
            }
            Message::Tick(token) => {
                let next = self.session.tick(token, &mut self.screen);
                return schedule(next);
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let controls = row![
            button(text("Start Webcam")).on_press(Message::StartWebcam),
            button(text("Load Video")).on_press(Message::LoadVideo),
            button(text("Stop")).on_press(Message::Stop),
        ]
        .spacing(10);

        let (max_w, max_h) = DISPLAY_MAX_SIZE;
        let surface: Element<'_, Message> = match self.screen.frame() {
            Some(handle) => image(handle.clone()).into(),
            None => text("").into(),
        };
        let display = container(surface)
            .center_x(Length::Fixed(max_w as f32))
            .center_y(Length::Fixed(max_h as f32));

        let status = text(self.screen.status()).size(14);

        column![controls, display, status]
            .spacing(10)
            .padding(10)
            .width(Length::Fill)
            .align_x(iced::Alignment::Center)
            .into()
    }
}

/// Re-delivers `token` as a tick message once its delay has passed.
fn schedule(token: Option<TickToken>) -> Task<Message> {
    match token {
        Some(token) => Task::perform(tokio::time::sleep(token.delay()), move |_| {
            Message::Tick(token)
        }),
        None => Task::none(),
    }
}
