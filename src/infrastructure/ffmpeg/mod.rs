// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapter implementing the [`VideoProbe`] port trait.
//!
//! Reads container metadata and decodes a single preview frame. Playback
//! itself is owned by the platform media engine, not by this adapter.
//!
//! [`VideoProbe`]: crate::application::port::VideoProbe

use crate::application::port::{ProbedVideo, VideoProbe};
use crate::domain::media::Thumbnail;
use crate::error::VideoError;
use std::path::Path;
use std::sync::{Once, OnceLock};

static FFMPEG_INIT: Once = Once::new();
static FFMPEG_INIT_ERROR: OnceLock<String> = OnceLock::new();

/// Initializes `FFmpeg` once per process and silences its warning output.
///
/// # Errors
///
/// Returns [`VideoError::Other`] if the library failed to initialize; the
/// failure is remembered for later calls.
pub fn init_ffmpeg() -> Result<(), VideoError> {
    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            let _ = FFMPEG_INIT_ERROR.set(format!("FFmpeg initialization failed: {e}"));
            return;
        }
        // SAFETY: av_log_set_level only writes a global integer.
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    match FFMPEG_INIT_ERROR.get() {
        Some(message) => Err(VideoError::Other(message.clone())),
        None => Ok(()),
    }
}

/// Computes output dimensions whose longest edge is at most `max_edge`.
///
/// Never upscales and never returns a zero dimension.
#[must_use]
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest == 0 || max_edge == 0 || longest <= max_edge {
        return (width.max(1), height.max(1));
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let scaled = |edge: u32| ((f64::from(edge) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

fn open_error(e: &ffmpeg_next::Error) -> VideoError {
    match e {
        ffmpeg_next::Error::InvalidData => VideoError::CorruptedFile,
        ffmpeg_next::Error::DecoderNotFound => VideoError::UnsupportedCodec(e.to_string()),
        other => VideoError::from_message(&other.to_string()),
    }
}

/// Stateless `FFmpeg`-backed probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegProbe;

impl FfmpegProbe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl VideoProbe for FfmpegProbe {
    fn probe(&self, path: &Path) -> Result<ProbedVideo, VideoError> {
        init_ffmpeg()?;

        let ictx = ffmpeg_next::format::input(path).map_err(|e| open_error(&e))?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(VideoError::NoVideoStream)?;

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|e| VideoError::UnsupportedCodec(e.to_string()))?;

        let duration_secs = if stream.duration() > 0 {
            let time_base = stream.time_base();
            stream.duration() as f64 * f64::from(time_base.numerator())
                / f64::from(time_base.denominator())
        } else if ictx.duration() > 0 {
            ictx.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
        } else {
            0.0
        };

        Ok(ProbedVideo {
            width: decoder.width(),
            height: decoder.height(),
            duration_ms: (duration_secs * 1000.0).max(0.0) as u64,
        })
    }

    fn thumbnail(&self, path: &Path, max_edge: u32) -> Result<Thumbnail, VideoError> {
        init_ffmpeg()?;

        let mut ictx = ffmpeg_next::format::input(path).map_err(|e| open_error(&e))?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(VideoError::NoVideoStream)?;
        let stream_index = stream.index();

        let mut decoder =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
                .map_err(|e| VideoError::UnsupportedCodec(e.to_string()))?;

        let (src_width, src_height) = (decoder.width(), decoder.height());
        if src_width == 0 || src_height == 0 {
            return Err(VideoError::UnsupportedFormat);
        }
        let (width, height) = fit_within(src_width, src_height, max_edge);

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            src_width,
            src_height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| VideoError::DecodingFailed(e.to_string()))?;

        let mut decoded = ffmpeg_next::frame::Video::empty();
        let mut got_frame = false;
        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder
                .send_packet(&packet)
                .map_err(|e| VideoError::DecodingFailed(e.to_string()))?;
            if decoder.receive_frame(&mut decoded).is_ok() {
                got_frame = true;
                break;
            }
        }
        if !got_frame {
            // Short files may only yield their frame once the decoder is drained.
            let _ = decoder.send_eof();
            got_frame = decoder.receive_frame(&mut decoded).is_ok();
        }
        if !got_frame {
            return Err(VideoError::DecodingFailed(
                "no frame could be decoded".to_string(),
            ));
        }

        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        scaler
            .run(&decoded, &mut rgba_frame)
            .map_err(|e| VideoError::DecodingFailed(e.to_string()))?;

        let stride = rgba_frame.stride(0);
        let row_len = width as usize * 4;
        let data = rgba_frame.data(0);
        let mut rgba = Vec::with_capacity(row_len * height as usize);
        for row in data.chunks(stride).take(height as usize) {
            rgba.extend_from_slice(&row[..row_len.min(row.len())]);
        }

        log::debug!(
            "thumbnail for {}: {}x{} -> {}x{}",
            path.display(),
            src_width,
            src_height,
            width,
            height
        );
        Ok(Thumbnail::from_rgba(width, height, rgba))
    }
}
