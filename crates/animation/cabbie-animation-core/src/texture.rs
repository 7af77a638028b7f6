//! Frame-cycling textures and the join used while their frames load.

use crate::error::AnimationError;
use crate::ids::FrameHandle;

/// A texture that flips through a fixed list of frames at a fixed interval.
///
/// It never ends. Each tick advances at most one frame; an accumulator that
/// falls behind by a whole interval or more is reset instead of catching up.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedTexture {
    name: String,
    interval_ms: f64,
    frames: Vec<FrameHandle>,
    current_index: usize,
    accumulated_ms: f64,
    bound_revision: u64,
}

impl AnimatedTexture {
    pub fn new(name: impl Into<String>, interval_ms: f64) -> Result<Self, AnimationError> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 {
            return Err(AnimationError::invalid(format!(
                "texture interval must be positive, got {interval_ms}"
            )));
        }
        Ok(Self {
            name: name.into(),
            interval_ms,
            frames: Vec::new(),
            current_index: 0,
            accumulated_ms: 0.0,
            bound_revision: 0,
        })
    }

    /// Install the loaded frames and bind the first one.
    pub fn set_frames(&mut self, frames: Vec<FrameHandle>) -> Result<(), AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::invalid(format!(
                "texture '{}' needs at least one frame",
                self.name
            )));
        }
        self.frames = frames;
        self.current_index = 0;
        self.accumulated_ms = 0.0;
        self.bound_revision += 1;
        log::debug!(
            "texture '{}' ready with {} frames",
            self.name,
            self.frames.len()
        );
        Ok(())
    }

    /// Advance the accumulator; returns true when a new frame was bound.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        self.accumulated_ms += dt_ms;
        if self.accumulated_ms < self.interval_ms {
            return false;
        }
        self.current_index = (self.current_index + 1) % self.frames.len();
        self.bound_revision += 1;
        self.accumulated_ms -= self.interval_ms;
        if self.accumulated_ms >= self.interval_ms || self.accumulated_ms < 0.0 {
            self.accumulated_ms = 0.0;
        }
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn frames(&self) -> &[FrameHandle] {
        &self.frames
    }

    pub fn is_ready(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Frame currently bound, `None` until frames are installed.
    pub fn current_frame(&self) -> Option<FrameHandle> {
        self.frames.get(self.current_index).copied()
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    /// Bumped every time a frame is (re)bound, so renderers can skip
    /// re-uploading an unchanged texture.
    pub fn bound_revision(&self) -> u64 {
        self.bound_revision
    }
}

/// Collects asynchronously loaded frames and releases them, in order, once
/// the last slot is filled.
#[derive(Clone, Debug)]
pub struct FrameLoadBarrier {
    slots: Vec<Option<FrameHandle>>,
    pending: usize,
    released: bool,
}

impl FrameLoadBarrier {
    pub fn new(count: usize) -> Result<Self, AnimationError> {
        if count == 0 {
            return Err(AnimationError::invalid(
                "frame barrier needs at least one frame",
            ));
        }
        Ok(Self {
            slots: vec![None; count],
            pending: count,
            released: false,
        })
    }

    /// Record a finished load. Returns the ordered frames on the completion
    /// that fills the last pending slot, `None` otherwise.
    pub fn complete(
        &mut self,
        index: usize,
        frame: FrameHandle,
    ) -> Result<Option<Vec<FrameHandle>>, AnimationError> {
        let count = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| AnimationError::FrameLoad {
            reason: format!("frame index {index} out of range for {count} frames"),
        })?;
        if slot.is_some() {
            return Err(AnimationError::FrameLoad {
                reason: format!("frame {index} completed twice"),
            });
        }
        *slot = Some(frame);
        self.pending -= 1;
        if self.pending > 0 || self.released {
            return Ok(None);
        }
        self.released = true;
        Ok(self.slots.iter().copied().collect())
    }

    /// Record a failed load. The slot stays pending.
    pub fn fail(&mut self, index: usize, reason: &str) -> AnimationError {
        log::warn!("frame {index} failed to load: {reason}");
        AnimationError::FrameLoad {
            reason: format!("frame {index}: {reason}"),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
