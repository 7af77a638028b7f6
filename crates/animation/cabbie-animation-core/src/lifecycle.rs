//! Shared animation lifecycle: state machine, time bookkeeping and the
//! [`Animatable`] capability implemented by every primitive and combinator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binding::TargetStore;
use crate::error::AnimationError;

/// Completion callback, fired once per run when an animation ends.
pub type OnEnd = Box<dyn FnMut()>;

/// Lifecycle state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// Constructed, `prepare` not called yet
    NotPrepared,
    /// Prepared and receiving ticks
    Running,
    /// Reached its end values (or was detached from a vanished target)
    Ended,
}

impl AnimationState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotPrepared => "not_prepared",
            Self::Running => "running",
            Self::Ended => "ended",
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// Time and state bookkeeping embedded in every animation.
pub struct Lifecycle {
    duration_ms: f64,
    elapsed_ms: f64,
    overshoot_ms: f64,
    state: AnimationState,
    on_end: Option<OnEnd>,
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("duration_ms", &self.duration_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("overshoot_ms", &self.overshoot_ms)
            .field("state", &self.state)
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

/// Reject durations that cannot produce a finite rate.
pub(crate) fn validate_duration(duration_ms: f64) -> Result<f64, AnimationError> {
    if !duration_ms.is_finite() || duration_ms <= 0.0 {
        return Err(AnimationError::invalid(format!(
            "duration must be a positive number of milliseconds, got {duration_ms}"
        )));
    }
    Ok(duration_ms)
}

impl Lifecycle {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0.0,
            overshoot_ms: 0.0,
            state: AnimationState::NotPrepared,
            on_end: None,
        }
    }

    /// Start a fresh run: zero the clocks and enter `Running`.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.overshoot_ms = 0.0;
        self.state = AnimationState::Running;
    }

    #[inline]
    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
    }

    /// End the run with `overshoot = elapsed - duration`.
    pub fn finish(&mut self) {
        let overshoot = self.elapsed_ms - self.duration_ms;
        self.finish_with_overshoot(overshoot);
    }

    /// End the run with an externally computed overshoot (combinators).
    /// NaN is normalized to 0.
    pub fn finish_with_overshoot(&mut self, overshoot_ms: f64) {
        self.overshoot_ms = if overshoot_ms.is_nan() {
            0.0
        } else {
            overshoot_ms
        };
        self.state = AnimationState::Ended;
        if let Some(callback) = self.on_end.as_mut() {
            callback();
        }
    }

    /// End without completing: the target went away. `on_end` is not fired.
    pub fn detach(&mut self) {
        self.overshoot_ms = 0.0;
        self.state = AnimationState::Ended;
    }

    pub fn set_on_end(&mut self, callback: OnEnd) {
        self.on_end = Some(callback);
    }

    pub fn clear_on_end(&mut self) -> Option<OnEnd> {
        self.on_end.take()
    }

    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    #[inline]
    pub fn overshoot_ms(&self) -> f64 {
        self.overshoot_ms
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }
}

/// A time-parameterized mutation of scene state.
///
/// `prepare` (re)derives rates and end values from the live target values and
/// may be called again after the animation ended to run it once more.
/// `tick` requires a non-negative `dt_ms` and is a no-op unless the animation
/// is `Running`.
pub trait Animatable {
    fn prepare(&mut self, targets: &mut dyn TargetStore) -> Result<(), AnimationError>;

    fn tick(&mut self, dt_ms: f64, targets: &mut dyn TargetStore);

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Short variant name used in log records.
    fn kind(&self) -> &'static str;

    #[inline]
    fn state(&self) -> AnimationState {
        self.lifecycle().state()
    }

    #[inline]
    fn is_ended(&self) -> bool {
        self.state().is_ended()
    }

    #[inline]
    fn elapsed_ms(&self) -> f64 {
        self.lifecycle().elapsed_ms()
    }

    #[inline]
    fn overshoot_ms(&self) -> f64 {
        self.lifecycle().overshoot_ms()
    }

    fn set_on_end(&mut self, callback: OnEnd) {
        self.lifecycle_mut().set_on_end(callback);
    }

    fn boxed(self) -> Box<dyn Animatable>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl fmt::Debug for dyn Animatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind())
            .field("lifecycle", self.lifecycle())
            .finish()
    }
}

impl<T: Animatable + ?Sized> Animatable for Box<T> {
    fn prepare(&mut self, targets: &mut dyn TargetStore) -> Result<(), AnimationError> {
        (**self).prepare(targets)
    }

    fn tick(&mut self, dt_ms: f64, targets: &mut dyn TargetStore) {
        (**self).tick(dt_ms, targets)
    }

    fn lifecycle(&self) -> &Lifecycle {
        (**self).lifecycle()
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        (**self).lifecycle_mut()
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}
