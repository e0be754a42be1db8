//! Encoding sinks.
//!
//! Sinks consume playback frames in output order and are driven by `Player::export`.

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
