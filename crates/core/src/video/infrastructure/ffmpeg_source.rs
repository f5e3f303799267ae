use std::path::Path;

use crate::error::SourceError;
use crate::shared::constants::RGB_CHANNELS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec),
/// converting each one to tightly-packed RGB24.
///
/// A source only exists once [`FfmpegSource::open`] has succeeded, so a
/// failed open can never be queried for frames or released twice. The
/// decoder state is dropped on [`close`] or, failing that, when the value
/// itself is dropped.
///
/// [`close`]: FrameSource::close
pub struct FfmpegSource {
    state: Option<DecodeState>,
    metadata: VideoMetadata,
}

struct DecodeState {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    next_index: usize,
    flushing: bool,
    finished: bool,
}

// Safety: a source is owned and driven by one thread at a time; the raw
// pointers inside the ffmpeg types are never shared across threads.
unsafe impl Send for FfmpegSource {}

impl FfmpegSource {
    /// Opens the video at `path` and positions the cursor before the first
    /// frame.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let open_err = |source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        };

        ffmpeg_next::init().map_err(open_err)?;

        let ictx = ffmpeg_next::format::input(path).map_err(open_err)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| SourceError::NoVideoStream {
                path: path.to_path_buf(),
            })?;
        let stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(open_err)?;
        let decoder = codec_ctx.decoder().video().map_err(open_err)?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            total_frames: stream.frames().max(0) as usize,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: path.to_path_buf(),
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(open_err)?;

        log::info!(
            "opened {} ({}x{}, {:.2} fps, {})",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            metadata.codec
        );

        Ok(Self {
            state: Some(DecodeState {
                ictx,
                decoder,
                scaler,
                stream_index,
                width,
                height,
                next_index: 0,
                flushing: false,
                finished: false,
            }),
            metadata,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let state = self.state.as_mut().ok_or(SourceError::Closed)?;
        Ok(state.advance())
    }

    fn close(&mut self) -> Result<(), SourceError> {
        match self.state.take() {
            Some(_) => {
                log::info!("closed {}", self.metadata.source_path.display());
                Ok(())
            }
            None => Err(SourceError::Closed),
        }
    }
}

impl DecodeState {
    /// Decodes the next frame, or `None` once the stream is exhausted.
    /// The terminal state is sticky: after the first `None`, every later
    /// call is `None` without touching the decoder.
    fn advance(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }

        if let Some(frame) = self.receive_frame() {
            return Some(frame);
        }

        if self.flushing {
            self.finished = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                let out = self.receive_frame();
                if out.is_none() {
                    self.finished = true;
                }
                return out;
            };

            if stream.index() != self.stream_index {
                continue;
            }

            if self.decoder.send_packet(&packet).is_err() {
                // Mid-stream decode failures are not distinguishable from
                // truncation at this layer; drop the packet and move on.
                log::warn!("undecodable packet near frame {}, skipped", self.next_index);
                continue;
            }

            if let Some(frame) = self.receive_frame() {
                return Some(frame);
            }
        }
    }

    fn receive_frame(&mut self) -> Option<Frame> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.scaler.run(&decoded, &mut rgb) {
            log::warn!(
                "scaling failed at frame {}, treating as end of stream: {e}",
                self.next_index
            );
            self.finished = true;
            return None;
        }

        let frame = Frame::new(
            packed_rgb(&rgb, self.width, self.height),
            self.width,
            self.height,
            self.next_index,
        );
        self.next_index += 1;
        Some(frame)
    }
}

/// Copies pixel rows out of an ffmpeg frame, stripping the per-row stride
/// padding so the result is a tightly-packed RGB24 buffer.
fn packed_rgb(rgb: &ffmpeg_next::util::frame::video::Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb.stride(0);
    let data = rgb.data(0);
    let row_bytes = width as usize * RGB_CHANNELS;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}
