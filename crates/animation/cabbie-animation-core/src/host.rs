//! Seams between the scheduler and the environment that drives it.
//!
//! [`RenderHost`] is whatever owns the scene and paints it. [`FrameClock`]
//! schedules the scheduler's next callback. The browser adapter implements
//! both on top of `requestAnimationFrame`/`setInterval`; [`HeadlessHost`] and
//! [`ManualClock`] serve native callers that step frames themselves.

use serde::{Deserialize, Serialize};

use crate::binding::TargetStore;
use crate::scene::Scene;

/// Handle of a pending frame request or a running interval.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClockHandle(pub i32);

/// Owner of the animated state and the renderer.
pub trait RenderHost {
    fn targets(&mut self) -> &mut dyn TargetStore;

    /// Repaint after a pass over all animations and textures.
    fn render_scene(&mut self);

    /// Diagnostic frame-rate readout.
    fn show_status(&mut self, _status: &str) {}
}

pub trait FrameClock {
    /// Ask for a single callback on the next display frame.
    fn request_frame(&mut self) -> ClockHandle;

    /// Start a repeating callback every `period_ms`.
    fn start_interval(&mut self, period_ms: f64) -> ClockHandle;

    fn cancel_frame(&mut self, handle: ClockHandle);

    fn cancel_interval(&mut self, handle: ClockHandle);
}

/// Scene owner without a renderer. Counts repaints and keeps the last status.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub scene: Scene,
    renders: u64,
    status: String,
}

impl HeadlessHost {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

impl RenderHost for HeadlessHost {
    fn targets(&mut self) -> &mut dyn TargetStore {
        &mut self.scene
    }

    fn render_scene(&mut self) {
        self.renders += 1;
    }

    fn show_status(&mut self, status: &str) {
        self.status.clear();
        self.status.push_str(status);
    }
}

/// Clock that only records what the scheduler asked for.
#[derive(Debug, Default)]
pub struct ManualClock {
    next: i32,
    pending_frame: Option<ClockHandle>,
    interval: Option<(ClockHandle, f64)>,
    cancelled: Vec<ClockHandle>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> ClockHandle {
        self.next += 1;
        ClockHandle(self.next)
    }

    /// Frame request waiting to be served, if any.
    pub fn pending_frame(&self) -> Option<ClockHandle> {
        self.pending_frame
    }

    /// Running interval and its period.
    pub fn interval(&self) -> Option<(ClockHandle, f64)> {
        self.interval
    }

    pub fn cancelled(&self) -> &[ClockHandle] {
        &self.cancelled
    }

    /// Consume the pending frame request, as the display would when firing it.
    pub fn take_frame(&mut self) -> Option<ClockHandle> {
        self.pending_frame.take()
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> ClockHandle {
        let handle = self.alloc();
        self.pending_frame = Some(handle);
        handle
    }

    fn start_interval(&mut self, period_ms: f64) -> ClockHandle {
        let handle = self.alloc();
        self.interval = Some((handle, period_ms));
        handle
    }

    fn cancel_frame(&mut self, handle: ClockHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
        self.cancelled.push(handle);
    }

    fn cancel_interval(&mut self, handle: ClockHandle) {
        if self.interval.map(|(h, _)| h) == Some(handle) {
            self.interval = None;
        }
        self.cancelled.push(handle);
    }
}
