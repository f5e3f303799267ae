use std::time::Instant;

use crate::error::PlaybackError;
use crate::playback::observer::PlaybackObserver;
use crate::playback::timing::TimingObservation;
use crate::shared::constants::DEFAULT_SKIP_COUNT;
use crate::video::domain::frame_source::FrameSource;

#[derive(Clone, Copy, Debug)]
pub struct PlaybackConfig {
    /// Frames advanced past (and discarded) before each sampled fetch.
    pub skip_count: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            skip_count: DEFAULT_SKIP_COUNT,
        }
    }
}

/// Outcome of one playback run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackSummary {
    /// Timing observations emitted, including a trailing one with no frame.
    pub observations: usize,
    /// Sampled fetches that actually produced a frame.
    pub frames_sampled: usize,
    /// Frames consumed and discarded by skip strides.
    pub frames_skipped: usize,
    pub total_elapsed_ms: f64,
    /// True when the observer requested the stop, rather than end-of-stream.
    pub cancelled: bool,
}

/// Drives a [`FrameSource`] in skip-then-sample strides: advance past N
/// frames, fetch one, time the fetch, repeat until the stream runs out.
///
/// The driver is the sole owner of its source for the whole run, and the
/// source is closed exactly once on every exit path.
pub struct PlaybackDriver {
    source: Box<dyn FrameSource>,
    config: PlaybackConfig,
}

impl PlaybackDriver {
    pub fn new(source: Box<dyn FrameSource>, config: PlaybackConfig) -> Self {
        Self { source, config }
    }

    /// Runs the skip-then-sample loop to completion, consuming the driver.
    ///
    /// Loop shape: each iteration skips `skip_count` frames, and only the
    /// skip result gates continuation. The sampling fetch that follows is
    /// timed and reported even when it comes back empty, so a stream whose
    /// length lands on a stride boundary produces one final observation with
    /// no frame before the next skip terminates the loop. That trailing
    /// cycle is part of the contract, not an accident to paper over.
    pub fn run(
        mut self,
        observer: &mut dyn PlaybackObserver,
    ) -> Result<PlaybackSummary, PlaybackError> {
        let run_started = Instant::now();
        let mut summary = PlaybackSummary::default();

        let outcome = self.drive(observer, &mut summary);
        let closed = self.source.close();

        outcome?;
        closed?;

        summary.total_elapsed_ms = run_started.elapsed().as_secs_f64() * 1000.0;
        Ok(summary)
    }

    fn drive(
        &mut self,
        observer: &mut dyn PlaybackObserver,
        summary: &mut PlaybackSummary,
    ) -> Result<(), PlaybackError> {
        loop {
            if self.source.skip(self.config.skip_count)?.is_none() {
                return Ok(());
            }
            summary.frames_skipped += self.config.skip_count.max(1);

            let fetch_started = Instant::now();
            let frame = self.source.next_frame()?;
            let elapsed = fetch_started.elapsed();

            let observation = TimingObservation::from_elapsed(
                summary.observations,
                frame.as_ref().map(|f| f.index()),
                elapsed,
            );
            log::debug!(
                "sample {}: frame {:?}, {:.3} ms, {:.1} fps",
                observation.sample_index,
                observation.frame_index,
                observation.elapsed_ms,
                observation.fps
            );

            summary.observations += 1;
            if frame.is_some() {
                summary.frames_sampled += 1;
            }

            if !observer.observe(&observation, frame.as_ref()) {
                summary.cancelled = true;
                return Ok(());
            }
        }
    }
}
