//! Source frame providers.
//!
//! A source hands out target frames at a fixed canvas size, one per advance, and reports
//! exhaustion with `Ok(None)`. Malformed frame data is an error and aborts generation.

use crate::foundation::core::Canvas;
use crate::foundation::error::ApproxResult;
use crate::raster::surface::Raster;

/// Directory of still frames.
pub mod images;
/// Frames held in memory.
pub mod memory;
/// Video files decoded through `ffmpeg`.
pub mod video;

/// Provider of monochrome target frames.
pub trait FrameSource {
    /// Fixed frame size.
    fn canvas(&self) -> Canvas;

    /// Advance by the source's fixed increment and return the new current frame, or `None`
    /// once the source is exhausted.
    fn next_frame(&mut self) -> ApproxResult<Option<Raster>>;
}
