use std::path::PathBuf;

/// Stream properties captured when a video is opened.
///
/// `total_frames` is whatever the container reports and may be 0 for streams
/// that do not carry a frame count; nothing in this crate relies on it being
/// exact.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: PathBuf,
}
