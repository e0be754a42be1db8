//! Shared primitives: geometry and timing types, the error type, blend math and cancellation.

/// Cooperative cancellation flag.
pub mod cancel;
/// Canvas, frame rate and frame index types.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
