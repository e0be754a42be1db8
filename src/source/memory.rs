use std::collections::VecDeque;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;
use crate::source::FrameSource;

/// Frames held in memory, handed out in insertion order.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    canvas: Canvas,
    frames: VecDeque<Raster>,
}

impl InMemorySource {
    /// Build a source; every frame must match `canvas`.
    pub fn new(canvas: Canvas, frames: impl IntoIterator<Item = Raster>) -> ApproxResult<Self> {
        let frames: VecDeque<Raster> = frames.into_iter().collect();
        if let Some(bad) = frames.iter().position(|f| f.canvas() != canvas) {
            return Err(ApproxError::source(format!(
                "in-memory frame {bad} does not match {}x{}",
                canvas.width, canvas.height
            )));
        }
        Ok(Self { canvas, frames })
    }

    /// Frames not yet handed out.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn next_frame(&mut self) -> ApproxResult<Option<Raster>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/memory.rs"]
mod tests;
