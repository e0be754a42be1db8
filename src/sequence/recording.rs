use std::path::Path;

use anyhow::Context as _;

use crate::engine::driver::RecordedFrame;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ApproxError, ApproxResult};

/// Ordered output of a generation run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recording {
    /// Source frame size the candidates were placed in.
    pub canvas: Canvas,
    /// Playback rate.
    pub fps: Fps,
    /// Gray level frames are composited over.
    pub background: u8,
    frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Create an empty recording.
    pub fn new(canvas: Canvas, fps: Fps, background: u8) -> Self {
        Self {
            canvas,
            fps,
            background,
            frames: Vec::new(),
        }
    }

    /// Append a finalized frame. Frames must arrive in source order.
    pub fn push(&mut self, frame: RecordedFrame) -> ApproxResult<()> {
        let expected = FrameIndex(self.frames.len() as u64);
        if frame.index != expected {
            return Err(ApproxError::validation(format!(
                "recorded frame {} arrived out of order, expected {}",
                frame.index.0, expected.0
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Frames in order.
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Look up one frame.
    pub fn get(&self, idx: FrameIndex) -> Option<&RecordedFrame> {
        usize::try_from(idx.0).ok().and_then(|i| self.frames.get(i))
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when no frame has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check invariants of a deserialized recording.
    pub fn validate(&self) -> ApproxResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        self.fps.validate()?;
        for (i, f) in self.frames.iter().enumerate() {
            if f.index.0 != i as u64 {
                return Err(ApproxError::validation(format!(
                    "recorded frame at position {i} carries index {}",
                    f.index.0
                )));
            }
        }
        Ok(())
    }

    /// Write the recording as JSON.
    pub fn save_json(&self, path: &Path) -> ApproxResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec(self)
            .map_err(|e| ApproxError::serde(format!("encode recording: {e}")))?;
        std::fs::write(path, json)
            .with_context(|| format!("write recording '{}'", path.display()))?;
        Ok(())
    }

    /// Read and validate a JSON recording.
    pub fn load_json(path: &Path) -> ApproxResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read recording '{}'", path.display()))?;
        let rec: Self = serde_json::from_slice(&bytes).map_err(|e| {
            ApproxError::serde(format!("parse recording '{}': {e}", path.display()))
        })?;
        rec.validate()?;
        Ok(rec)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/recording.rs"]
mod tests;
