use std::time::Duration;

/// Timing of one sampled fetch: how long the decode took and the
/// instantaneous rate it implies.
///
/// `frame_index` is `None` when the stream ended between the skip stride and
/// the sampling fetch; the observation is still emitted for that cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingObservation {
    /// Ordinal of this observation within the run, starting at 0.
    pub sample_index: usize,
    /// Stream position of the sampled frame, if one was decoded.
    pub frame_index: Option<usize>,
    pub elapsed_ms: f64,
    /// Instantaneous rate, `1000 / elapsed_ms`. Infinite when the fetch was
    /// too fast for the clock to register.
    pub fps: f64,
}

impl TimingObservation {
    pub fn from_elapsed(sample_index: usize, frame_index: Option<usize>, elapsed: Duration) -> Self {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let fps = if elapsed_ms > 0.0 {
            1000.0 / elapsed_ms
        } else {
            f64::INFINITY
        };
        Self {
            sample_index,
            frame_index,
            elapsed_ms,
            fps,
        }
    }
}
