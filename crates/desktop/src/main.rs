mod app;
mod screen;
mod settings;

use std::process;
use std::sync::Mutex;

use agesight_core::annotation::label_font::resolve_label_font;
use agesight_core::annotation::overlay::Overlay;
use agesight_core::pipeline::model_set::{load_pipeline, ModelPaths};
use agesight_core::pipeline::session::PipelineSession;
use agesight_core::shared::model_resolver::resolve_models_dir;
use agesight_core::video::infrastructure::media_source_opener::MediaSourceOpener;

use app::App;
use settings::Settings;

fn main() -> iced::Result {
    env_logger::init();

    let settings = Settings::load();
    let session = match build_session(&settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let handoff = Handoff::new((session, settings));
    let boot = move || match handoff.take() {
        Some((session, settings)) => App::new(session, settings),
        None => {
            log::error!("Application state was already handed to the window");
            process::exit(1);
        }
    };

    iced::application(boot, App::update, App::view)
        .title("Gender and Age Detection")
        .window(iced::window::Settings {
            size: iced::Size::new(800.0, 600.0),
            ..Default::default()
        })
        .run()
}

/// Loads every model before the window opens; any failure is fatal.
fn build_session(settings: &Settings) -> Result<PipelineSession, Box<dyn std::error::Error>> {
    let models_dir = resolve_models_dir(settings.models_dir.as_deref())?;
    log::info!("Using models from {}", models_dir.display());
    let overlay = Overlay::new(resolve_label_font(settings.font_path.as_deref()));
    let pipeline = load_pipeline(&ModelPaths::in_dir(&models_dir), overlay)?;
    Ok(PipelineSession::new(
        pipeline,
        Box::new(MediaSourceOpener::new()),
    ))
}

/// One-shot slot moving state built in `main` into iced's boot closure.
struct Handoff<T>(Mutex<Option<T>>);

impl<T> Handoff<T> {
    fn new(value: T) -> Self {
        Self(Mutex::new(Some(value)))
    }

    fn take(&self) -> Option<T> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}
