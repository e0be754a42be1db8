use std::sync::Arc;

use crate::assets::sprites::SpriteSet;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ApproxError, ApproxResult};
use crate::raster::surface::Raster;
use crate::sequence::recording::Recording;

/// Result of [`Player::export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Export stopped early because the token was cancelled.
    pub cancelled: bool,
}

/// Looping playback of a [`Recording`] onto a surface the player owns.
///
/// The player keeps its own clock, independent of how fast frames were generated. Frame `i` is
/// shown during `[i / fps, (i + 1) / fps)` modulo the recording length.
pub struct Player {
    recording: Arc<Recording>,
    sprites: Arc<SpriteSet>,
    canvas: Canvas,
    ratio: f64,
    clock_secs: f64,
    surface: Raster,
    shown: Option<FrameIndex>,
}

impl Player {
    /// Prepare playback onto `output` (the recording's own canvas when `None`).
    ///
    /// Output sizes other than the source size scale positions and sprites by
    /// `output.width / source.width`.
    pub fn new(
        recording: Arc<Recording>,
        sprites: Arc<SpriteSet>,
        output: Option<Canvas>,
    ) -> ApproxResult<Self> {
        recording.validate()?;
        if recording.is_empty() {
            return Err(ApproxError::validation("cannot play an empty recording"));
        }
        let canvas = output.unwrap_or(recording.canvas);
        Canvas::new(canvas.width, canvas.height)?;
        let ratio = f64::from(canvas.width) / f64::from(recording.canvas.width);
        Ok(Self {
            surface: Raster::new(canvas, recording.background),
            recording,
            sprites,
            canvas,
            ratio,
            clock_secs: 0.0,
            shown: None,
        })
    }

    /// Recording being played.
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Output surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Seconds of playback elapsed.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock_secs
    }

    /// Output surface as of the last [`Player::advance`].
    pub fn surface(&self) -> &Raster {
        &self.surface
    }

    /// Index of the frame on the output surface, if one has been drawn.
    pub fn shown(&self) -> Option<FrameIndex> {
        self.shown
    }

    /// Frame visible at `secs` of playback.
    pub fn frame_index_at(&self, secs: f64) -> FrameIndex {
        let n = self.recording.len() as u64;
        let f = self.recording.fps.secs_to_frames_floor(secs.max(0.0));
        FrameIndex(f % n)
    }

    /// Move the clock forward by `dt` seconds and redraw the surface if the visible frame changed.
    ///
    /// Returns the newly drawn frame index, or `None` when the surface still shows the right
    /// frame.
    pub fn advance(&mut self, dt_secs: f64) -> ApproxResult<Option<FrameIndex>> {
        if !dt_secs.is_finite() || dt_secs < 0.0 {
            return Err(ApproxError::validation(format!(
                "playback step must be a finite value >= 0, got {dt_secs}"
            )));
        }
        self.clock_secs += dt_secs;
        let idx = self.frame_index_at(self.clock_secs);
        if self.shown == Some(idx) {
            return Ok(None);
        }
        draw_frame(&self.recording, &self.sprites, self.ratio, idx, &mut self.surface)?;
        self.shown = Some(idx);
        Ok(Some(idx))
    }

    /// Render recorded frame `idx` onto a fresh surface.
    pub fn render(&self, idx: FrameIndex) -> ApproxResult<Raster> {
        let mut out = Raster::new(self.canvas, self.recording.background);
        draw_frame(&self.recording, &self.sprites, self.ratio, idx, &mut out)?;
        Ok(out)
    }

    /// Render the whole recording `loops` times into `sink` at the recording's frame rate.
    ///
    /// `cancel` is checked before every frame; the sink is still closed on cancellation.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(frames = self.recording.len(), loops = loops)
    )]
    pub fn export(
        &self,
        sink: &mut dyn FrameSink,
        loops: u32,
        cancel: &CancelToken,
    ) -> ApproxResult<ExportOutcome> {
        if loops == 0 {
            return Err(ApproxError::validation("export needs at least one loop"));
        }
        sink.begin(SinkConfig {
            canvas: self.canvas,
            fps: self.recording.fps,
        })?;

        let mut written = 0u64;
        let mut cancelled = false;
        let pushed = self.push_loops(sink, loops, cancel, &mut written, &mut cancelled);
        // Close the sink even when a frame failed; the frame error wins.
        let ended = sink.end();
        pushed?;
        ended?;

        if cancelled {
            tracing::warn!(frames = written, "export cancelled");
        } else {
            tracing::info!(frames = written, "export finished");
        }
        Ok(ExportOutcome {
            frames_written: written,
            cancelled,
        })
    }

    fn push_loops(
        &self,
        sink: &mut dyn FrameSink,
        loops: u32,
        cancel: &CancelToken,
        written: &mut u64,
        cancelled: &mut bool,
    ) -> ApproxResult<()> {
        let mut frame = Raster::new(self.canvas, self.recording.background);
        for _ in 0..loops {
            for i in 0..self.recording.len() as u64 {
                if cancel.is_cancelled() {
                    *cancelled = true;
                    return Ok(());
                }
                draw_frame(
                    &self.recording,
                    &self.sprites,
                    self.ratio,
                    FrameIndex(i),
                    &mut frame,
                )?;
                sink.push_frame(FrameIndex(*written), &frame)?;
                *written += 1;
            }
        }
        Ok(())
    }
}

fn draw_frame(
    recording: &Recording,
    sprites: &SpriteSet,
    ratio: f64,
    idx: FrameIndex,
    out: &mut Raster,
) -> ApproxResult<()> {
    let frame = recording.get(idx).ok_or_else(|| {
        ApproxError::validation(format!(
            "frame {} is out of range for a recording of {} frames",
            idx.0,
            recording.len()
        ))
    })?;
    out.fill(recording.background);
    for c in &frame.candidates {
        c.composite_onto(out, sprites, ratio)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/player.rs"]
mod tests;
