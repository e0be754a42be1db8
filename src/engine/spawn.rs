use rand::Rng;

use crate::engine::candidate::{Candidate, CandidateSampler};
use crate::engine::config::SearchConfig;
use crate::engine::fitness::distance;
use crate::engine::working::{Snapshot, WorkingSet};
use crate::foundation::error::ApproxResult;
use crate::raster::surface::Raster;

/// Inputs of one generational search that stay fixed for its whole run.
#[derive(Clone, Copy, Debug)]
pub struct SpawnCtx<'a> {
    /// Frame being approximated.
    pub target: &'a Raster,
    /// Pool sizes.
    pub search: &'a SearchConfig,
    /// Fitness sample stride.
    pub sample_stride: u32,
    /// Candidate generator for the current frame progress.
    pub sampler: CandidateSampler<'a>,
}

/// Result of [`spawn`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOutcome {
    /// Distance before the search.
    pub baseline: f64,
    /// Distance after the search; equals `baseline` when nothing was committed.
    pub distance: f64,
    /// The candidate added to the working set, if any improved on the baseline.
    pub committed: Option<Candidate>,
    /// Trial evaluations performed.
    pub evaluations: usize,
}

#[derive(Clone, Copy, Debug)]
struct Scored {
    candidate: Candidate,
    distance: f64,
}

/// Add at most one sprite to `working`, the one that most reduces the distance to the target.
///
/// Every trial is composited onto the working surface, measured and rolled back to a snapshot
/// taken up front; only the final winner is committed. Candidates that do not beat the baseline
/// are discarded. Ties keep the earliest-found candidate.
pub fn spawn<R: Rng + ?Sized>(
    working: &mut WorkingSet,
    ctx: &SpawnCtx<'_>,
    rng: &mut R,
) -> ApproxResult<SpawnOutcome> {
    let snapshot = working.save();
    let baseline = distance(working.raster(), ctx.target, ctx.sample_stride)?;
    let mut evaluations = 0usize;

    let mut pool = Vec::new();
    for _ in 0..ctx.search.initial_pool {
        let candidate = ctx.sampler.random(rng);
        let d = trial(working, &snapshot, ctx, candidate)?;
        evaluations += 1;
        if d < baseline {
            pool.push(Scored {
                candidate,
                distance: d,
            });
        }
    }
    let mut parents = cull(pool, ctx.search.parent_pool);

    for _ in 0..ctx.search.generations {
        if parents.is_empty() {
            break;
        }
        let mut pool = parents.clone();
        for parent in &parents {
            for _ in 0..ctx.search.children {
                let child = parent.candidate.create_child(&ctx.sampler, rng);
                let d = trial(working, &snapshot, ctx, child)?;
                evaluations += 1;
                if d < baseline {
                    pool.push(Scored {
                        candidate: child,
                        distance: d,
                    });
                }
            }
        }
        parents = cull(pool, ctx.search.parent_pool);
    }

    let outcome = match parents.first() {
        Some(best) => {
            working.commit(best.candidate)?;
            SpawnOutcome {
                baseline,
                distance: best.distance,
                committed: Some(best.candidate),
                evaluations,
            }
        }
        None => SpawnOutcome {
            baseline,
            distance: baseline,
            committed: None,
            evaluations,
        },
    };

    tracing::debug!(
        baseline = outcome.baseline,
        distance = outcome.distance,
        evaluations = outcome.evaluations,
        committed = outcome.committed.is_some(),
        "spawn finished"
    );
    Ok(outcome)
}

fn trial(
    working: &mut WorkingSet,
    snapshot: &Snapshot,
    ctx: &SpawnCtx<'_>,
    candidate: Candidate,
) -> ApproxResult<f64> {
    working.commit(candidate)?;
    let d = distance(working.raster(), ctx.target, ctx.sample_stride);
    working.restore(snapshot)?;
    d
}

/// Rank by distance (stable, so earlier finds win ties) and keep the best `keep`.
fn cull(mut pool: Vec<Scored>, keep: usize) -> Vec<Scored> {
    pool.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    pool.truncate(keep);
    pool
}

#[cfg(test)]
#[path = "../../tests/unit/engine/spawn.rs"]
mod tests;
