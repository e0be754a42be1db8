use std::sync::Arc;

use crate::assets::sprites::SpriteSet;
use crate::engine::config::ApproxConfig;
use crate::engine::driver::{DriverStep, FrameDriver, RecordedFrame};
use crate::foundation::cancel::CancelToken;
use crate::foundation::error::ApproxResult;
use crate::sequence::recording::Recording;
use crate::source::FrameSource;

/// Why [`Session::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every source frame (or the frame limit) was converged.
    Exhausted,
    /// The cancel token was set between ticks.
    Cancelled,
}

/// Generation context: owns the source, the frame driver and the growing recording.
pub struct Session {
    source: Box<dyn FrameSource>,
    driver: FrameDriver,
    recording: Recording,
    max_frames: Option<usize>,
}

impl Session {
    /// Build a session over `source`; the working canvas is the source's canvas.
    pub fn new(
        cfg: ApproxConfig,
        source: Box<dyn FrameSource>,
        sprites: Arc<SpriteSet>,
    ) -> ApproxResult<Self> {
        let canvas = source.canvas();
        let recording = Recording::new(canvas, cfg.playback_fps, cfg.background);
        let driver = FrameDriver::new(cfg, canvas, sprites)?;
        Ok(Self {
            source,
            driver,
            recording,
            max_frames: None,
        })
    }

    /// Stop after `n` finalized frames even if the source has more.
    pub fn with_max_frames(mut self, n: usize) -> Self {
        self.max_frames = Some(n);
        self
    }

    /// Frame driver, for progress inspection.
    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    /// Frames finalized so far.
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Hand the recording over, typically to a [`crate::Player`].
    pub fn into_recording(self) -> Recording {
        self.recording
    }

    /// One scheduling step: a bounded number of spawns on the current frame.
    ///
    /// Finalized frames are appended to the recording before being returned.
    pub fn tick(&mut self) -> ApproxResult<DriverStep> {
        if self
            .max_frames
            .is_some_and(|max| self.recording.len() >= max)
        {
            return Ok(DriverStep::Exhausted);
        }
        let step = self.driver.tick(self.source.as_mut())?;
        if let DriverStep::Finalized(frame) = &step {
            self.recording.push(frame.clone())?;
        }
        Ok(step)
    }

    /// Tick until the source is exhausted or `cancel` is set, reporting each finalized frame.
    #[tracing::instrument(level = "info", skip_all)]
    pub fn run(
        &mut self,
        cancel: &CancelToken,
        mut on_frame: impl FnMut(&RecordedFrame),
    ) -> ApproxResult<SessionOutcome> {
        loop {
            if cancel.is_cancelled() {
                tracing::warn!(frames = self.recording.len(), "generation cancelled");
                return Ok(SessionOutcome::Cancelled);
            }
            match self.tick()? {
                DriverStep::Working { .. } => {}
                DriverStep::Finalized(frame) => on_frame(&frame),
                DriverStep::Exhausted => {
                    tracing::info!(frames = self.recording.len(), "generation finished");
                    return Ok(SessionOutcome::Exhausted);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
