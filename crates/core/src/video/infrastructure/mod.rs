pub mod camera_source;
pub mod ffmpeg_file_source;
pub mod media_source_opener;
