use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;

/// Stream parameters announced to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame size.
    pub canvas: Canvas,
    /// Presentation rate.
    pub fps: Fps,
}

impl SinkConfig {
    /// Validate values that may have been assembled by hand.
    pub fn validate(&self) -> ApproxResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        self.fps.validate()
    }
}

/// Consumer of rendered playback frames.
///
/// Calls arrive as `begin`, any number of `push_frame`, then `end`.
pub trait FrameSink {
    /// Prepare for a stream of frames.
    fn begin(&mut self, cfg: SinkConfig) -> ApproxResult<()>;
    /// Accept one frame. `idx` is the frame's position in the output stream.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> ApproxResult<()>;
    /// Flush and close the stream.
    fn end(&mut self) -> ApproxResult<()>;
}

fn check_frame(cfg: Option<&SinkConfig>, frame: &Raster) -> ApproxResult<()> {
    let cfg = cfg.ok_or_else(|| ApproxError::validation("sink received a frame before begin"))?;
    if frame.canvas() != cfg.canvas {
        return Err(ApproxError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.canvas().width,
            frame.canvas().height,
            cfg.canvas.width,
            cfg.canvas.height
        )));
    }
    Ok(())
}

/// Sink that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Raster)>,
    finished: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration passed to `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames received so far.
    pub fn frames(&self) -> &[(FrameIndex, Raster)] {
        &self.frames
    }

    /// Return `true` once `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ApproxResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> ApproxResult<()> {
        check_frame(self.cfg.as_ref(), frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ApproxResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Sink that writes each frame as `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: usize,
}

impl PngSequenceSink {
    /// Target `dir`; it is created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files written.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ApproxResult<()> {
        cfg.validate()?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> ApproxResult<()> {
        check_frame(self.cfg.as_ref(), frame)?;
        let path = self.dir.join(format!("frame_{:05}.png", idx.0));
        write_png(&path, frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ApproxResult<()> {
        tracing::debug!(frames = self.written, dir = %self.dir.display(), "png sequence written");
        Ok(())
    }
}

/// Write one raster as an RGBA8 PNG, creating parent directories.
pub fn write_png(path: &Path, frame: &Raster) -> ApproxResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        frame.data(),
        frame.canvas().width,
        frame.canvas().height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
