use std::path::{Path, PathBuf};

use crate::foundation::core::Canvas;
#[cfg(feature = "media-ffmpeg")]
use crate::foundation::error::ApproxError;
use crate::foundation::error::ApproxResult;
use crate::raster::surface::Raster;
use crate::source::FrameSource;

/// Seek schedule for [`VideoSource`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoSourceOpts {
    /// Timestamp of the first frame in seconds.
    pub start_secs: f64,
    /// Seconds advanced between frames.
    pub frame_time_secs: f64,
    /// Output frame size; defaults to the stream's own size.
    pub canvas: Option<Canvas>,
}

impl Default for VideoSourceOpts {
    fn default() -> Self {
        Self {
            start_secs: 5.0,
            frame_time_secs: 10.0 / 24.0,
            canvas: None,
        }
    }
}

/// Basic metadata about a source video file.
#[derive(Clone, Debug)]
pub struct VideoInfo {
    /// Source path.
    pub path: PathBuf,
    /// Stream width in pixels.
    pub width: u32,
    /// Stream height in pixels.
    pub height: u32,
    /// Container duration in seconds.
    pub duration_secs: f64,
}

/// Video file decoded one monochrome frame at a time through the system `ffmpeg`.
#[derive(Clone, Debug)]
pub struct VideoSource {
    info: VideoInfo,
    opts: VideoSourceOpts,
    canvas: Canvas,
    time_secs: f64,
}

impl VideoSource {
    /// Probe `path` with `ffprobe` and prepare to decode from `opts.start_secs`.
    pub fn open(path: &Path, opts: VideoSourceOpts) -> ApproxResult<Self> {
        let info = probe_video(path)?;
        let canvas = match opts.canvas {
            Some(c) => c,
            None => Canvas::new(info.width, info.height)?,
        };
        Ok(Self {
            info,
            opts,
            canvas,
            time_secs: opts.start_secs,
        })
    }

    /// Probed stream metadata.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }
}

impl FrameSource for VideoSource {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn next_frame(&mut self) -> ApproxResult<Option<Raster>> {
        if self.time_secs >= self.info.duration_secs {
            return Ok(None);
        }
        let rgba = decode_gray_frame(&self.info, self.time_secs, self.canvas)?;
        self.time_secs += self.opts.frame_time_secs;
        Raster::from_rgba8(self.canvas, rgba).map(Some)
    }
}

#[cfg(feature = "media-ffmpeg")]
fn probe_video(path: &Path) -> ApproxResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| ApproxError::source(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ApproxError::source(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ApproxError::source(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ApproxError::source("no video stream found"))?;
    let width = video
        .width
        .ok_or_else(|| ApproxError::source("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| ApproxError::source("missing video height from ffprobe"))?;
    let duration_secs = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| ApproxError::source("missing container duration from ffprobe"))?;

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        duration_secs,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_video(_path: &Path) -> ApproxResult<VideoInfo> {
    Err(crate::foundation::error::ApproxError::validation(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn decode_gray_frame(info: &VideoInfo, time_secs: f64, canvas: Canvas) -> ApproxResult<Vec<u8>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{time_secs:.9}")])
        .arg("-i")
        .arg(&info.path)
        .args([
            "-frames:v",
            "1",
            "-vf",
            &format!("scale={}:{}", canvas.width, canvas.height),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "gray",
            "pipe:1",
        ])
        .output()
        .map_err(|e| ApproxError::source(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(ApproxError::source(format!(
            "ffmpeg video decode failed for '{}': {}",
            info.path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if out.stdout.len() != canvas.pixel_count() {
        return Err(ApproxError::source(format!(
            "decoded video frame has {} bytes, expected {}",
            out.stdout.len(),
            canvas.pixel_count()
        )));
    }
    Ok(crate::assets::decode::luma_to_rgba8(&out.stdout))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn decode_gray_frame(_info: &VideoInfo, _time_secs: f64, _canvas: Canvas) -> ApproxResult<Vec<u8>> {
    Err(crate::foundation::error::ApproxError::validation(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

// Decoding shells out to `ffprobe`/`ffmpeg`; the feature-off path is covered by
// `tests/video_source.rs`.
