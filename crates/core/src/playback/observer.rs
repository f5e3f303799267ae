use crate::playback::timing::TimingObservation;
use crate::shared::frame::Frame;

/// Receives one timing observation per sampled cycle of the playback driver.
///
/// Decouples the driver loop from specific sinks (stdout, log crate, GUI
/// signals) so callers can watch the run without changing the loop itself.
/// Returning `false` asks the driver to stop cooperatively; the request is
/// honored once per iteration, after the current observation.
pub trait PlaybackObserver {
    fn observe(&mut self, observation: &TimingObservation, frame: Option<&Frame>) -> bool;
}

/// Silent observer that never cancels. Used where the summary alone matters.
pub struct NullObserver;

impl PlaybackObserver for NullObserver {
    fn observe(&mut self, _observation: &TimingObservation, _frame: Option<&Frame>) -> bool {
        true
    }
}

/// Forwards each observation to the log facade at info level.
pub struct LogObserver;

impl PlaybackObserver for LogObserver {
    fn observe(&mut self, observation: &TimingObservation, _frame: Option<&Frame>) -> bool {
        match observation.frame_index {
            Some(index) => log::info!(
                "sample {}: frame {} in {:.3} ms ({:.1} fps)",
                observation.sample_index,
                index,
                observation.elapsed_ms,
                observation.fps
            ),
            None => log::info!(
                "sample {}: no frame, stream ended during fetch",
                observation.sample_index
            ),
        }
        true
    }
}

impl<F> PlaybackObserver for F
where
    F: FnMut(&TimingObservation, Option<&Frame>) -> bool,
{
    fn observe(&mut self, observation: &TimingObservation, frame: Option<&Frame>) -> bool {
        self(observation, frame)
    }
}
