//! Finalized frame sequences and their looping playback.

/// Fixed-rate looping playback and export.
pub mod player;
/// Ordered recorded frames with JSON persistence.
pub mod recording;
