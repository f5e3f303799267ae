use std::path::PathBuf;

use thiserror::Error;

/// Failures of a frame source.
///
/// End-of-stream is not represented here: it is a normal `Ok(None)` result of
/// `next_frame`/`skip`, never an error.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: ffmpeg_next::Error,
    },
    #[error("no video stream in {path}")]
    NoVideoStream { path: PathBuf },
    /// The source was already closed. Calling `next_frame`, `skip` or `close`
    /// on a closed source is a caller bug; it is reported instead of being
    /// left undefined.
    #[error("source is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error(transparent)]
    Source(#[from] SourceError),
}
