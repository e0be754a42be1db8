//! Image decoding and the four-entry sprite set.

/// PNG/JPEG decoding into premultiplied RGBA8 and monochrome frames.
pub mod decode;
/// Sprite set addressed by variant and detail.
pub mod sprites;
