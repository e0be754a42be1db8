use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::decode::decode_frame_luma;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;
use crate::source::FrameSource;

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Directory of still frames, read in file-name order.
#[derive(Clone, Debug)]
pub struct ImageSequenceSource {
    canvas: Canvas,
    paths: Vec<PathBuf>,
    cursor: usize,
    step: usize,
}

impl ImageSequenceSource {
    /// List the frames in `dir`.
    ///
    /// `canvas` defaults to the size of the first frame; other frames are resized to it.
    /// Every advance skips `step` files.
    pub fn open(dir: &Path, canvas: Option<Canvas>, step: usize) -> ApproxResult<Self> {
        if step == 0 {
            return Err(ApproxError::validation("image sequence step must be > 0"));
        }
        let mut paths = Vec::new();
        let entries =
            std::fs::read_dir(dir).with_context(|| format!("list frames in '{}'", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("list frames in '{}'", dir.display()))?
                .path();
            let is_frame = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if is_frame && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let canvas = match canvas {
            Some(c) => c,
            None => {
                let first = paths.first().ok_or_else(|| {
                    ApproxError::source(format!("no frames found in '{}'", dir.display()))
                })?;
                let (w, h) = image::image_dimensions(first).map_err(|e| {
                    ApproxError::source(format!("probe frame '{}': {e}", first.display()))
                })?;
                Canvas::new(w, h)?
            }
        };

        tracing::debug!(frames = paths.len(), dir = %dir.display(), "opened image sequence");
        Ok(Self {
            canvas,
            paths,
            cursor: 0,
            step,
        })
    }

    /// Number of frame files found.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Return `true` when the directory held no frames.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn next_frame(&mut self) -> ApproxResult<Option<Raster>> {
        let Some(path) = self.paths.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += self.step;

        let bytes = std::fs::read(path)
            .map_err(|e| ApproxError::source(format!("read frame '{}': {e}", path.display())))?;
        let rgba = decode_frame_luma(&bytes, self.canvas.width, self.canvas.height)
            .map_err(|e| ApproxError::source(format!("decode frame '{}': {e}", path.display())))?;
        Raster::from_rgba8(self.canvas, rgba).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/images.rs"]
mod tests;
