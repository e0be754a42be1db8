use std::sync::Arc;

use crate::assets::sprites::SpriteSet;
use crate::engine::candidate::Candidate;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;

/// Point-in-time copy of a [`WorkingSet`]: pixel buffer plus candidate sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    raster: Raster,
    candidates: Vec<Candidate>,
}

impl Snapshot {
    /// Captured pixels.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Captured candidate sequence.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

/// The canonical working surface and the ordered candidates composited onto it.
///
/// The buffer is always the in-order composition of `candidates` over a flat `background`; every
/// mutation goes through [`WorkingSet::commit`], [`WorkingSet::restore`] or
/// [`WorkingSet::clear`], which keep the two in lock-step.
#[derive(Clone, Debug)]
pub struct WorkingSet {
    raster: Raster,
    candidates: Vec<Candidate>,
    sprites: Arc<SpriteSet>,
    background: u8,
}

impl WorkingSet {
    /// Create an empty working set cleared to `background`.
    pub fn new(canvas: Canvas, sprites: Arc<SpriteSet>, background: u8) -> Self {
        Self {
            raster: Raster::new(canvas, background),
            candidates: Vec::new(),
            sprites,
            background,
        }
    }

    /// Current pixels.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Committed candidates in composition order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of committed candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Return `true` when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Sprite set used for compositing.
    pub fn sprites(&self) -> &Arc<SpriteSet> {
        &self.sprites
    }

    /// Composite `candidate` onto the working surface and append it to the sequence.
    pub fn commit(&mut self, candidate: Candidate) -> ApproxResult<()> {
        candidate.composite_onto(&mut self.raster, &self.sprites, 1.0)?;
        self.candidates.push(candidate);
        Ok(())
    }

    /// Capture the current state.
    pub fn save(&self) -> Snapshot {
        Snapshot {
            raster: self.raster.clone(),
            candidates: self.candidates.clone(),
        }
    }

    /// Replace pixels and candidates with a previously saved state.
    pub fn restore(&mut self, snapshot: &Snapshot) -> ApproxResult<()> {
        if snapshot.raster.canvas() != self.raster.canvas() {
            return Err(ApproxError::validation(
                "snapshot surface size does not match the working surface",
            ));
        }
        self.raster.copy_from(&snapshot.raster)?;
        self.candidates.clear();
        self.candidates.extend_from_slice(&snapshot.candidates);
        Ok(())
    }

    /// Drop every candidate and clear the surface to the background.
    pub fn clear(&mut self) {
        self.raster.fill(self.background);
        self.candidates.clear();
    }

    /// Re-render the candidate sequence onto a fresh background surface.
    pub fn recompose(&self) -> ApproxResult<Raster> {
        let mut out = Raster::new(self.raster.canvas(), self.background);
        for c in &self.candidates {
            c.composite_onto(&mut out, &self.sprites, 1.0)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/working.rs"]
mod tests;
