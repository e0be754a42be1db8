//! Opaque monochrome rasters and sprite compositing onto them.

/// Sprite compositing through `vello_cpu`.
pub mod blit;
/// Pixel buffers and rectangular regions.
pub mod surface;
