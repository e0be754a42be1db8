use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::{ApproxError, ApproxResult};

/// Pool sizes of one generational search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Random candidates tried before any mutation.
    pub initial_pool: usize,
    /// Survivors kept after each cull.
    pub parent_pool: usize,
    /// Children per parent per generation.
    pub children: usize,
    /// Mutation rounds.
    pub generations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            initial_pool: 80,
            parent_pool: 5,
            children: 3,
            generations: 5,
        }
    }
}

impl SearchConfig {
    /// Upper bound on trial evaluations performed by one spawn.
    pub fn max_trials(&self) -> usize {
        self.initial_pool + self.parent_pool * self.children * self.generations
    }

    fn validate(&self) -> ApproxResult<()> {
        if self.initial_pool == 0 {
            return Err(ApproxError::validation("search.initial_pool must be > 0"));
        }
        if self.parent_pool == 0 {
            return Err(ApproxError::validation("search.parent_pool must be > 0"));
        }
        Ok(())
    }
}

/// How mutated children pick their color variant and detail flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildTraits {
    /// Draw variant and detail afresh, exactly like a random candidate.
    #[default]
    Reroll,
    /// Copy variant and detail from the parent.
    Inherit,
}

/// Candidate sampling and mutation parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Lower bound of the natural-log scale exponent.
    pub scale_exp_min: f64,
    /// Upper bound of the scale exponent at the start of a frame.
    pub scale_exp_max: f64,
    /// Upper bound of the scale exponent once the frame's spawn budget is spent.
    pub late_scale_exp_max: f64,
    /// Probability that a fresh candidate is drawn with a marked core.
    pub detail_probability: f64,
    /// Trait policy for mutated children.
    pub child_traits: ChildTraits,
    /// Largest child displacement in pixels.
    pub child_max_step: f64,
    /// Child orientation offset window in degrees, `[min, max)`.
    pub child_turn_min: f64,
    /// See [`CandidateConfig::child_turn_min`].
    pub child_turn_max: f64,
    /// Child scale factor window, `[min, max]`.
    pub child_scale_min: f64,
    /// See [`CandidateConfig::child_scale_min`].
    pub child_scale_max: f64,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            scale_exp_min: -6.5,
            scale_exp_max: -3.5,
            late_scale_exp_max: -4.5,
            detail_probability: 0.0,
            child_traits: ChildTraits::Reroll,
            child_max_step: 10.0,
            child_turn_min: -12.5,
            child_turn_max: 32.5,
            child_scale_min: 0.75,
            child_scale_max: 1.25,
        }
    }
}

impl CandidateConfig {
    fn validate(&self) -> ApproxResult<()> {
        let finite = [
            self.scale_exp_min,
            self.scale_exp_max,
            self.late_scale_exp_max,
            self.child_max_step,
            self.child_turn_min,
            self.child_turn_max,
            self.child_scale_min,
            self.child_scale_max,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ApproxError::validation("candidate parameters must be finite"));
        }
        if self.scale_exp_min > self.scale_exp_max || self.scale_exp_min > self.late_scale_exp_max
        {
            return Err(ApproxError::validation(
                "candidate.scale_exp_min must not exceed either upper exponent",
            ));
        }
        if !(0.0..=1.0).contains(&self.detail_probability) {
            return Err(ApproxError::validation(
                "candidate.detail_probability must be within [0, 1]",
            ));
        }
        if self.child_max_step < 0.0 {
            return Err(ApproxError::validation("candidate.child_max_step must be >= 0"));
        }
        if self.child_turn_min >= self.child_turn_max {
            return Err(ApproxError::validation(
                "candidate.child_turn_min must be < child_turn_max",
            ));
        }
        if self.child_scale_min <= 0.0 || self.child_scale_min > self.child_scale_max {
            return Err(ApproxError::validation(
                "candidate child scale window must be positive and ordered",
            ));
        }
        Ok(())
    }
}

/// Per-frame termination parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConvergeConfig {
    /// Hard cap on spawn calls (and therefore sprites) per frame.
    pub max_sprites: usize,
    /// Distance accepted once the whole budget is spent; the bar scales with progress^0.25.
    pub diff_target: f64,
    /// Spawn calls performed per scheduler tick.
    pub spawns_per_tick: usize,
}

impl Default for ConvergeConfig {
    fn default() -> Self {
        Self {
            max_sprites: 256,
            diff_target: 0.02,
            spawns_per_tick: 3,
        }
    }
}

/// Fitness sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Distance in pixels between sampled coordinates on both axes.
    pub sample_stride: u32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self { sample_stride: 1 }
    }
}

/// Complete engine configuration, loadable from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApproxConfig {
    /// Generational search pool sizes.
    pub search: SearchConfig,
    /// Candidate sampling and mutation.
    pub candidate: CandidateConfig,
    /// Frame termination.
    pub converge: ConvergeConfig,
    /// Fitness sampling.
    pub fitness: FitnessConfig,
    /// Gray level the working and playback surfaces are cleared to.
    pub background: u8,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Playback rate.
    pub playback_fps: Fps,
}

impl Default for ApproxConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            candidate: CandidateConfig::default(),
            converge: ConvergeConfig::default(),
            fitness: FitnessConfig::default(),
            background: 255,
            seed: None,
            playback_fps: Fps::default(),
        }
    }
}

impl ApproxConfig {
    /// Check every field for values the engine cannot run with.
    pub fn validate(&self) -> ApproxResult<()> {
        self.search.validate()?;
        self.candidate.validate()?;
        if self.converge.max_sprites == 0 {
            return Err(ApproxError::validation("converge.max_sprites must be > 0"));
        }
        if self.converge.spawns_per_tick == 0 {
            return Err(ApproxError::validation("converge.spawns_per_tick must be > 0"));
        }
        if !self.converge.diff_target.is_finite() || self.converge.diff_target < 0.0 {
            return Err(ApproxError::validation(
                "converge.diff_target must be a finite value >= 0",
            ));
        }
        if self.fitness.sample_stride == 0 {
            return Err(ApproxError::validation("fitness.sample_stride must be > 0"));
        }
        self.playback_fps.validate()?;
        Ok(())
    }

    /// Read and validate a JSON config file.
    pub fn load_json(path: &Path) -> ApproxResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ApproxError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
