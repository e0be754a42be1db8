//! The approximation engine.
//!
//! A [`driver::FrameDriver`] converges one target frame at a time by calling [`spawn::spawn`],
//! which runs a small generational search over [`candidate::Candidate`]s and commits at most one
//! of them to the [`working::WorkingSet`]. Trials are speculative: each is composited, measured
//! with [`fitness::distance`] and rolled back through a snapshot.

/// Sprite placements and their sampling/mutation rules.
pub mod candidate;
/// Engine configuration.
pub mod config;
/// Per-frame convergence loop.
pub mod driver;
/// Raster distance metric.
pub mod fitness;
/// Generational search adding at most one sprite per call.
pub mod spawn;
/// Working surface with snapshot/restore.
pub mod working;
