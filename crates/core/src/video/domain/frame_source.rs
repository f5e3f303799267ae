use crate::error::SourceError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// A sequential source of decoded video frames.
///
/// Implementations handle I/O details (codec, container format, etc.) while
/// callers work with [`Frame`] and [`VideoMetadata`].
///
/// End-of-stream is the value `Ok(None)` and is terminal and idempotent:
/// once a call returns `Ok(None)`, every later call returns `Ok(None)` again.
/// `Err` is reserved for contract violations (use after [`close`]); decode
/// failures inside a stream are folded into end-of-stream by implementations.
///
/// [`close`]: FrameSource::close
pub trait FrameSource: Send {
    /// Properties of the opened stream.
    fn metadata(&self) -> &VideoMetadata;

    /// Advances the stream by one frame.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Advances past `n` frames, discarding the intermediate decodes, and
    /// returns the frame at the stride boundary. If the stream ends before
    /// the stride completes, returns `Ok(None)` immediately without further
    /// decode calls.
    ///
    /// `skip(0)` degenerates to a single [`next_frame`] so that a zero
    /// stride still advances the cursor.
    ///
    /// [`next_frame`]: FrameSource::next_frame
    fn skip(&mut self, n: usize) -> Result<Option<Frame>, SourceError> {
        if n == 0 {
            return self.next_frame();
        }
        let mut last = None;
        for _ in 0..n {
            match self.next_frame()? {
                Some(frame) => last = Some(frame),
                None => return Ok(None),
            }
        }
        Ok(last)
    }

    /// Releases the underlying resource. Valid exactly once; a second close
    /// reports [`SourceError::Closed`].
    fn close(&mut self) -> Result<(), SourceError>;
}
