use std::path::PathBuf;
use std::process;

use clap::Parser;

use frameskim_core::playback::driver::{PlaybackConfig, PlaybackDriver, PlaybackSummary};
use frameskim_core::playback::observer::PlaybackObserver;
use frameskim_core::playback::timing::TimingObservation;
use frameskim_core::shared::frame::Frame;
use frameskim_core::video::domain::frame_source::FrameSource;
use frameskim_core::video::infrastructure::ffmpeg_source::FfmpegSource;

/// Fast video scrubbing: skip N frames, sample one, report decode timing.
#[derive(Parser)]
#[command(name = "frameskim")]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Frames to skip before each sampled frame.
    #[arg(long, default_value = "4")]
    skip_frames: usize,

    /// Stop after this many timing observations.
    #[arg(long)]
    max_samples: Option<usize>,
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

    let source = FfmpegSource::open(&cli.input)?;
    let meta = source.metadata();
    log::info!(
        "{}: {}x{}, {:.2} fps, codec {}",
        meta.source_path.display(),
        meta.width,
        meta.height,
        meta.fps,
        meta.codec
    );

    let driver = PlaybackDriver::new(
        Box::new(source),
        PlaybackConfig {
            skip_count: cli.skip_frames,
        },
    );
    let mut observer = ConsoleObserver {
        max_samples: cli.max_samples,
    };
    let summary = driver.run(&mut observer)?;
    print_summary(&summary);

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.max_samples == Some(0) {
        return Err("--max-samples must be at least 1".into());
    }
    Ok(())
}

/// Prints each observation and cancels the run once `max_samples` is reached.
struct ConsoleObserver {
    max_samples: Option<usize>,
}

impl PlaybackObserver for ConsoleObserver {
    fn observe(&mut self, observation: &TimingObservation, _frame: Option<&Frame>) -> bool {
        match observation.frame_index {
            Some(index) => println!(
                "sample {:>4}  frame {:>6}  {:>8.3} ms  {:>8.1} fps",
                observation.sample_index, index, observation.elapsed_ms, observation.fps
            ),
            None => println!(
                "sample {:>4}  (stream ended during fetch)",
                observation.sample_index
            ),
        }
        self.max_samples
            .map(|max| observation.sample_index + 1 < max)
            .unwrap_or(true)
    }
}

fn print_summary(summary: &PlaybackSummary) {
    let ending = if summary.cancelled {
        "cancelled"
    } else {
        "end of stream"
    };
    println!(
        "{} observations, {} frames sampled, {} skipped in {:.1} ms ({})",
        summary.observations,
        summary.frames_sampled,
        summary.frames_skipped,
        summary.total_elapsed_ms,
        ending
    );
}
