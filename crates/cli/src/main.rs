use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::Parser;

use agesight_core::annotation::label_font::resolve_label_font;
use agesight_core::annotation::overlay::Overlay;
use agesight_core::pipeline::model_set::{load_pipeline, ModelPaths};
use agesight_core::pipeline::presenter::Presenter;
use agesight_core::pipeline::session::PipelineSession;
use agesight_core::pipeline::status::Status;
use agesight_core::shared::constants::VIDEO_EXTENSIONS;
use agesight_core::shared::frame::Frame;
use agesight_core::shared::model_resolver::resolve_models_dir;
use agesight_core::video::domain::frame_source::SourceRequest;
use agesight_core::video::infrastructure::media_source_opener::MediaSourceOpener;

/// Live face detection with age and gender estimates, without a window.
#[derive(Parser)]
#[command(name = "agesight")]
struct Cli {
    /// Video file to analyse. Omit to read from a camera.
    #[arg(conflicts_with = "camera")]
    input: Option<PathBuf>,

    /// Camera index to read from (0 = system default).
    #[arg(long)]
    camera: Option<u32>,

    /// Directory holding face_detector.onnx, age_net.onnx and gender_net.onnx.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// TrueType font for overlay labels.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write every annotated frame as a PNG into this directory.
    #[arg(long)]
    frames_out: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
}

/// Logs status transitions and optionally dumps annotated frames.
struct LogPresenter {
    frames_out: Option<PathBuf>,
    last_status: Option<String>,
    frames_shown: usize,
}

impl LogPresenter {
    fn new(frames_out: Option<PathBuf>) -> Self {
        Self {
            frames_out,
            last_status: None,
            frames_shown: 0,
        }
    }
}

impl Presenter for LogPresenter {
    fn show(&mut self, frame: &Frame) {
        self.frames_shown += 1;
        let Some(dir) = &self.frames_out else {
            return;
        };
        let path = dir.join(frame_file_name(frame.index()));
        if let Err(e) = frame.to_rgb_image().save(&path) {
            log::warn!("Failed to write {}: {e}", path.display());
        }
    }

    fn set_status(&mut self, status: &Status) {
        let text = status.to_string();
        if self.last_status.as_deref() != Some(text.as_str()) {
            log::info!("{text}");
            self.last_status = Some(text);
        }
    }

    fn clear(&mut self) {}
}

fn frame_file_name(index: usize) -> String {
    format!("frame_{index:06}.png")
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let models_dir = resolve_models_dir(cli.models_dir.as_deref())?;
    log::info!("Using models from {}", models_dir.display());
    let overlay = Overlay::new(resolve_label_font(cli.font.as_deref()));
    let pipeline = load_pipeline(&ModelPaths::in_dir(&models_dir), overlay)?;

    if let Some(dir) = &cli.frames_out {
        std::fs::create_dir_all(dir)?;
    }

    let request = match cli.input {
        Some(path) => SourceRequest::File(path),
        None => SourceRequest::Camera(cli.camera.unwrap_or(0)),
    };

    let mut session = PipelineSession::new(pipeline, Box::new(MediaSourceOpener::new()));
    let mut presenter = LogPresenter::new(cli.frames_out);

    let mut token = session.start(&request, &mut presenter);
    if let Status::OpenFailed(reason) = session.status() {
        return Err(reason.clone().into());
    }

    while let Some(t) = token {
        if cli.max_frames.is_some_and(|max| presenter.frames_shown >= max) {
            session.stop(&mut presenter);
            break;
        }
        thread::sleep(t.delay());
        token = session.tick(t, &mut presenter);
    }

    if let Status::Faulted(reason) = session.status() {
        return Err(reason.clone().into());
    }
    log::info!("Processed {} frames", presenter.frames_shown);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if !is_video(input) {
            log::warn!(
                "{} does not have a known video extension ({})",
                input.display(),
                VIDEO_EXTENSIONS.join(", ")
            );
        }
    }
    if cli.max_frames == Some(0) {
        return Err("--max-frames must be at least 1".into());
    }
    Ok(())
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
