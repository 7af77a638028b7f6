//! Per-frame results returned by the scheduler.
//!
//! The scene itself is mutated in place; the report only lists what changed
//! in the registration tables so hosts can react (drop handles, re-upload a
//! texture, chain follow-up animations).

use serde::{Deserialize, Serialize};

use crate::ids::{AnimationId, TextureId};

/// Scheduler mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Stopped,
    /// Driven by the host's frame callback with measured deltas.
    Running,
    /// Driven by a fixed-period interval with a fixed simulated delta.
    DebugRunning,
}

impl SchedulerState {
    #[inline]
    pub fn is_animating(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

/// Outcome of one `Animator::advance` pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Delta delivered to every animation and texture.
    pub dt_ms: f64,
    /// Animations that ended during this pass and were unregistered.
    #[serde(default)]
    pub ended: Vec<AnimationId>,
    /// Textures that bound a new frame during this pass.
    #[serde(default)]
    pub textures_advanced: Vec<TextureId>,
    /// Animations still registered after the pass.
    pub active_animations: usize,
}

impl FrameReport {
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.ended.is_empty() && self.textures_advanced.is_empty()
    }
}
