use rand::Rng;

use crate::assets::sprites::{Detail, SpriteSet, Variant};
use crate::engine::config::{CandidateConfig, ChildTraits};
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::ApproxResult;
use crate::foundation::math::lerp;
use crate::raster::blit::composite_sprite;
use crate::raster::surface::{Raster, Region};

/// One sprite placement.
///
/// Candidates are plain values: every change (mutation, re-draw) produces a new one.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candidate {
    x: f64,
    y: f64,
    dir: f64,
    scale: f64,
    variant: Variant,
    #[serde(default)]
    detail: Detail,
}

/// Partially specified candidate; `None` fields are drawn by [`CandidateSampler::materialize`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CandidateSpec {
    /// Horizontal center in source pixels.
    pub x: Option<f64>,
    /// Vertical center in source pixels.
    pub y: Option<f64>,
    /// Orientation in degrees.
    pub dir: Option<f64>,
    /// Uniform scale applied to the sprite's intrinsic size.
    pub scale: Option<f64>,
    /// Color variant.
    pub variant: Option<Variant>,
    /// Detail flag.
    pub detail: Option<Detail>,
}

impl Candidate {
    /// Horizontal center in source pixels.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical center in source pixels.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Orientation in degrees, `[0, 360)`.
    pub fn dir(&self) -> f64 {
        self.dir
    }

    /// Uniform scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Color variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Detail flag.
    pub fn detail(&self) -> Detail {
        self.detail
    }

    /// Placement transform for a surface `ratio` times the size of the source frame.
    pub fn transform(&self, ratio: f64) -> Affine {
        Affine::translate((self.x * ratio, self.y * ratio))
            * Affine::rotate(self.dir.to_radians())
            * Affine::scale(self.scale * ratio)
    }

    /// Draw this candidate onto an arbitrary surface without recording it anywhere.
    ///
    /// Use [`crate::WorkingSet::commit`] to add it to the tracked working composition.
    pub fn composite_onto(
        &self,
        raster: &mut Raster,
        sprites: &SpriteSet,
        ratio: f64,
    ) -> ApproxResult<Option<Region>> {
        composite_sprite(
            raster,
            sprites.get(self.variant, self.detail),
            self.transform(ratio),
        )
    }

    /// Produce a mutated offspring.
    ///
    /// Position moves up to `child_max_step` pixels in a random direction and is clamped into the
    /// frame; orientation turns by
    /// `[child_turn_min, child_turn_max)` degrees and scale is multiplied by a factor in
    /// `[child_scale_min, child_scale_max]`. Variant and detail follow
    /// [`CandidateConfig::child_traits`].
    pub fn create_child<R: Rng + ?Sized>(
        &self,
        sampler: &CandidateSampler<'_>,
        rng: &mut R,
    ) -> Candidate {
        let cfg = sampler.cfg;
        let heading = rng.random::<f64>() * 360.0;
        let step = rng.random::<f64>() * cfg.child_max_step;
        let (x, y) = step_towards(self.x, self.y, heading, step);
        let x = clamp_into_span(x, sampler.canvas.width);
        let y = clamp_into_span(y, sampler.canvas.height);
        let turn =
            cfg.child_turn_min + rng.random::<f64>() * (cfg.child_turn_max - cfg.child_turn_min);
        let mut dir = (self.dir + turn).rem_euclid(360.0);
        if dir >= 360.0 {
            // rem_euclid can round a tiny negative up to exactly 360.
            dir = 0.0;
        }
        let factor = cfg.child_scale_min
            + rng.random::<f64>() * (cfg.child_scale_max - cfg.child_scale_min);

        let (variant, detail) = match cfg.child_traits {
            ChildTraits::Inherit => (Some(self.variant), Some(self.detail)),
            ChildTraits::Reroll => (None, None),
        };

        sampler.materialize(
            CandidateSpec {
                x: Some(x),
                y: Some(y),
                dir: Some(dir),
                scale: Some(self.scale * factor),
                variant,
                detail,
            },
            rng,
        )
    }
}

/// Move `amount` pixels from `(x, y)` along `heading` degrees, y pointing down the screen.
fn step_towards(x: f64, y: f64, heading: f64, amount: f64) -> (f64, f64) {
    let (sin, cos) = heading.to_radians().sin_cos();
    (x + cos * amount, y - sin * amount)
}

/// Clamp `v` into `[0, len)`.
fn clamp_into_span(v: f64, len: u32) -> f64 {
    let len = f64::from(len);
    if v >= len { len.next_down() } else { v.max(0.0) }
}

/// Draws fresh candidates for one frame at a given point of its progress.
#[derive(Clone, Copy, Debug)]
pub struct CandidateSampler<'a> {
    canvas: Canvas,
    cfg: &'a CandidateConfig,
    progress: f64,
}

impl<'a> CandidateSampler<'a> {
    /// `progress` in `[0, 1]` is how much of the frame's spawn budget has been used.
    pub fn new(canvas: Canvas, cfg: &'a CandidateConfig, progress: f64) -> Self {
        Self {
            canvas,
            cfg,
            progress: progress.clamp(0.0, 1.0),
        }
    }

    /// Scale exponent range `[lo, hi]` at the current progress.
    pub fn scale_exp_range(&self) -> (f64, f64) {
        let hi = lerp(
            self.cfg.scale_exp_max,
            self.cfg.late_scale_exp_max,
            self.progress,
        );
        (self.cfg.scale_exp_min, hi.max(self.cfg.scale_exp_min))
    }

    /// Resolve every unset field of `spec` with an independent random draw.
    pub fn materialize<R: Rng + ?Sized>(&self, spec: CandidateSpec, rng: &mut R) -> Candidate {
        let x = spec
            .x
            .unwrap_or_else(|| rng.random::<f64>() * f64::from(self.canvas.width));
        let y = spec
            .y
            .unwrap_or_else(|| rng.random::<f64>() * f64::from(self.canvas.height));
        let dir = spec.dir.unwrap_or_else(|| rng.random::<f64>() * 360.0);
        let scale = spec.scale.unwrap_or_else(|| {
            let (lo, hi) = self.scale_exp_range();
            (lo + rng.random::<f64>() * (hi - lo)).exp()
        });
        let variant = spec.variant.unwrap_or_else(|| {
            if rng.random_bool(0.5) {
                Variant::Light
            } else {
                Variant::Dark
            }
        });
        let detail = spec.detail.unwrap_or_else(|| {
            if rng.random_bool(self.cfg.detail_probability) {
                Detail::Marked
            } else {
                Detail::Plain
            }
        });

        Candidate {
            x,
            y,
            dir,
            scale,
            variant,
            detail,
        }
    }

    /// A fully random candidate.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        self.materialize(CandidateSpec::default(), rng)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/candidate.rs"]
mod tests;
