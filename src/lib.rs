//! Appletrace approximates video frames with stamped sprites.
//!
//! Each source frame is rebuilt from scratch out of up to a few hundred rotated, scaled copies of
//! four small sprites (light or dark, plain or marked). Sprites are added one at a time by a
//! generational search that keeps only placements which bring the working surface closer to the
//! target. Finalized frames form a [`Recording`] that a [`Player`] loops at a fixed rate or
//! exports to a [`FrameSink`].
//!
//! - Open a [`FrameSource`] and a [`SpriteSet`]
//! - Run a [`Session`] to produce a [`Recording`]
//! - Play or export it with a [`Player`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image decoding and sprite sets.
pub mod assets;
/// Encoding sinks.
pub mod encode;
/// Candidate search and frame convergence.
pub mod engine;
/// Shared primitives.
pub mod foundation;
/// Rasters and compositing.
pub mod raster;
/// Recording and playback.
pub mod sequence;
/// Generation host loop.
pub mod session;
/// Source frame providers.
pub mod source;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Rect, Vec2};
pub use crate::foundation::error::{ApproxError, ApproxResult};

pub use crate::assets::sprites::{Detail, Sprite, SpriteSet, Variant};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::engine::candidate::{Candidate, CandidateSampler, CandidateSpec};
pub use crate::engine::config::{
    ApproxConfig, CandidateConfig, ChildTraits, ConvergeConfig, FitnessConfig, SearchConfig,
};
pub use crate::engine::driver::{
    DriverStep, FinalizeReason, FrameDriver, FrameStats, RecordedFrame,
};
pub use crate::engine::working::{Snapshot, WorkingSet};
pub use crate::raster::surface::{Raster, Region, RegionPixels};
pub use crate::sequence::player::{ExportOutcome, Player};
pub use crate::sequence::recording::Recording;
pub use crate::session::{Session, SessionOutcome};
pub use crate::source::FrameSource;
pub use crate::source::images::ImageSequenceSource;
pub use crate::source::memory::InMemorySource;
pub use crate::source::video::{VideoInfo, VideoSource, VideoSourceOpts};
