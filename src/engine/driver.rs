use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::assets::sprites::SpriteSet;
use crate::engine::candidate::{Candidate, CandidateSampler};
use crate::engine::config::ApproxConfig;
use crate::engine::fitness::{distance, sample_count};
use crate::engine::spawn::{SpawnCtx, spawn};
use crate::engine::working::WorkingSet;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;
use crate::source::FrameSource;

/// Why a frame stopped accepting sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeReason {
    /// Distance dropped under the progress-scaled acceptance bar.
    Converged,
    /// The spawn budget ran out.
    Capped,
}

/// Counters collected while converging one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameStats {
    /// Spawn calls made.
    pub spawn_calls: usize,
    /// Spawn calls that found no improving candidate.
    pub stagnant_spawns: usize,
    /// Trial evaluations across all spawns.
    pub evaluations: usize,
    /// Distance to the target at finalization.
    pub distance: f64,
    /// Termination cause.
    pub reason: FinalizeReason,
}

/// Finalized sprite sequence for one source frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecordedFrame {
    /// Position in the output sequence.
    pub index: FrameIndex,
    /// Committed candidates in composition order.
    pub candidates: Vec<Candidate>,
    /// How the frame converged.
    pub stats: FrameStats,
}

/// What a [`FrameDriver::tick`] accomplished.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverStep {
    /// Still converging the current frame.
    Working {
        /// Sprites committed so far in this frame.
        sprites: usize,
        /// Current distance to the target.
        distance: f64,
    },
    /// A frame was finalized; the next tick pulls a new target.
    Finalized(RecordedFrame),
    /// The source has no more frames.
    Exhausted,
}

struct FrameProgress {
    target: Raster,
    distance: f64,
    spawn_calls: usize,
    stagnant_spawns: usize,
    evaluations: usize,
}

/// Converges source frames one at a time, a bounded number of spawns per tick.
pub struct FrameDriver {
    cfg: ApproxConfig,
    working: WorkingSet,
    rng: Pcg32,
    current: Option<FrameProgress>,
    next_index: u64,
    exhausted: bool,
}

impl FrameDriver {
    /// Validate `cfg` against `canvas` and build an idle driver.
    pub fn new(cfg: ApproxConfig, canvas: Canvas, sprites: Arc<SpriteSet>) -> ApproxResult<Self> {
        cfg.validate()?;
        if sample_count(canvas, cfg.fitness.sample_stride) == 0 {
            return Err(ApproxError::validation(format!(
                "sample stride {} leaves no samples on a {}x{} canvas",
                cfg.fitness.sample_stride, canvas.width, canvas.height
            )));
        }
        let rng = match cfg.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        let working = WorkingSet::new(canvas, sprites, cfg.background);
        Ok(Self {
            cfg,
            working,
            rng,
            current: None,
            next_index: 0,
            exhausted: false,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ApproxConfig {
        &self.cfg
    }

    /// Working composition of the frame in progress.
    pub fn working(&self) -> &WorkingSet {
        &self.working
    }

    /// Frames finalized so far.
    pub fn frames_finalized(&self) -> u64 {
        self.next_index
    }

    /// Acceptance bar for the current frame: `diff_target * (spawn_calls / max_sprites)^0.25`.
    pub fn threshold(&self) -> f64 {
        let calls = self.current.as_ref().map_or(0, |p| p.spawn_calls);
        self.threshold_for(calls)
    }

    fn threshold_for(&self, spawn_calls: usize) -> f64 {
        let progress = spawn_calls as f64 / self.cfg.converge.max_sprites as f64;
        self.cfg.converge.diff_target * progress.min(1.0).powf(0.25)
    }

    /// Replace the target and start a fresh frame on a cleared surface.
    pub fn begin_frame(&mut self, target: Raster) -> ApproxResult<()> {
        if target.canvas() != self.working.raster().canvas() {
            return Err(ApproxError::source(format!(
                "source frame is {}x{}, expected {}x{}",
                target.canvas().width,
                target.canvas().height,
                self.working.raster().canvas().width,
                self.working.raster().canvas().height
            )));
        }
        self.working.clear();
        let d = distance(
            self.working.raster(),
            &target,
            self.cfg.fitness.sample_stride,
        )?;
        self.current = Some(FrameProgress {
            target,
            distance: d,
            spawn_calls: 0,
            stagnant_spawns: 0,
            evaluations: 0,
        });
        Ok(())
    }

    /// Run up to `spawns_per_tick` spawns, pulling a new target from `source` when idle.
    ///
    /// A spawn is never interrupted; the tick yields only between spawns. Source errors are
    /// fatal: the frame in progress is dropped and the working surface cleared.
    pub fn tick(&mut self, source: &mut dyn FrameSource) -> ApproxResult<DriverStep> {
        if self.exhausted {
            return Ok(DriverStep::Exhausted);
        }
        if self.current.is_none() {
            let next = match source.next_frame() {
                Ok(next) => next,
                Err(e) => {
                    self.working.clear();
                    return Err(e);
                }
            };
            match next {
                Some(target) => self.begin_frame(target)?,
                None => {
                    self.exhausted = true;
                    tracing::info!(frames = self.next_index, "source exhausted");
                    return Ok(DriverStep::Exhausted);
                }
            }
        }

        for _ in 0..self.cfg.converge.spawns_per_tick {
            if let Some(reason) = self.finalize_reason() {
                return Ok(DriverStep::Finalized(self.finalize(reason)));
            }
            self.spawn_once()?;
        }
        if let Some(reason) = self.finalize_reason() {
            return Ok(DriverStep::Finalized(self.finalize(reason)));
        }

        Ok(DriverStep::Working {
            sprites: self.working.len(),
            distance: self.current.as_ref().map_or(0.0, |p| p.distance),
        })
    }

    fn finalize_reason(&self) -> Option<FinalizeReason> {
        let p = self.current.as_ref()?;
        if p.distance <= self.threshold_for(p.spawn_calls) {
            Some(FinalizeReason::Converged)
        } else if p.spawn_calls >= self.cfg.converge.max_sprites {
            Some(FinalizeReason::Capped)
        } else {
            None
        }
    }

    fn spawn_once(&mut self) -> ApproxResult<()> {
        let Some(progress) = self.current.as_mut() else {
            return Ok(());
        };
        let canvas = self.working.raster().canvas();
        let frac = progress.spawn_calls as f64 / self.cfg.converge.max_sprites as f64;
        let ctx = SpawnCtx {
            target: &progress.target,
            search: &self.cfg.search,
            sample_stride: self.cfg.fitness.sample_stride,
            sampler: CandidateSampler::new(canvas, &self.cfg.candidate, frac),
        };
        let outcome = spawn(&mut self.working, &ctx, &mut self.rng)?;

        progress.spawn_calls += 1;
        progress.evaluations += outcome.evaluations;
        progress.distance = outcome.distance;
        if outcome.committed.is_none() {
            progress.stagnant_spawns += 1;
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn finalize(&mut self, reason: FinalizeReason) -> RecordedFrame {
        let progress = self.current.take();
        let stats = match progress {
            Some(p) => FrameStats {
                spawn_calls: p.spawn_calls,
                stagnant_spawns: p.stagnant_spawns,
                evaluations: p.evaluations,
                distance: p.distance,
                reason,
            },
            None => FrameStats {
                spawn_calls: 0,
                stagnant_spawns: 0,
                evaluations: 0,
                distance: 0.0,
                reason,
            },
        };
        let frame = RecordedFrame {
            index: FrameIndex(self.next_index),
            candidates: self.working.candidates().to_vec(),
            stats,
        };
        self.next_index += 1;
        self.working.clear();

        if reason == FinalizeReason::Capped && stats.stagnant_spawns == stats.spawn_calls {
            tracing::warn!(frame = frame.index.0, "frame capped without a single improving sprite");
        }
        tracing::info!(
            frame = frame.index.0,
            sprites = frame.candidates.len(),
            distance = stats.distance,
            spawn_calls = stats.spawn_calls,
            reason = ?stats.reason,
            "frame finalized"
        );
        frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/driver.rs"]
mod tests;
