//! Linear interpolation primitives.
//!
//! Every primitive is a [`LinearTween`] bound to one channel of one target.
//! `prepare` turns the goal into a per-millisecond rate, `tick` adds
//! `rate * dt` until every axis has reached or passed its end value, then
//! snaps to the exact end value.

use serde::{Deserialize, Serialize};

use crate::binding::{Channel, TargetRef, TargetStore};
use crate::error::AnimationError;
use crate::ids::{LightId, ObjectId};
use crate::lifecycle::{validate_duration, Animatable, Lifecycle};
use crate::value::{self, Vec3};

/// Where a tween ends relative to the value it starts from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Goal {
    /// End at `start + delta`.
    Offset(Vec3),
    /// End at exactly this value.
    Absolute(Vec3),
}

/// True once every axis reached or passed `end` in the direction of `rate`.
/// Axes with zero rate count as reached at or below `end`.
pub fn reached(current: Vec3, end: Vec3, rate: Vec3) -> bool {
    (0..3).all(|axis| {
        if rate[axis] > 0.0 {
            current[axis] >= end[axis]
        } else {
            current[axis] <= end[axis]
        }
    })
}

#[derive(Debug)]
pub struct LinearTween {
    target: TargetRef,
    channel: Channel,
    goal: Goal,
    rate: Vec3,
    end_values: Vec3,
    life: Lifecycle,
}

impl LinearTween {
    pub fn new(
        target: TargetRef,
        channel: Channel,
        goal: Goal,
        duration_ms: f64,
    ) -> Result<Self, AnimationError> {
        let duration_ms = validate_duration(duration_ms)?;
        let components = match goal {
            Goal::Offset(v) | Goal::Absolute(v) => v,
        };
        if components.iter().any(|c| !c.is_finite()) {
            return Err(AnimationError::invalid(format!(
                "{channel} goal for {target} must be finite"
            )));
        }
        Ok(Self {
            target,
            channel,
            goal,
            rate: [0.0; 3],
            end_values: [0.0; 3],
            life: Lifecycle::new(duration_ms),
        })
    }

    pub fn target(&self) -> TargetRef {
        self.target
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Per-millisecond rate derived by the last `prepare`.
    pub fn rate(&self) -> Vec3 {
        self.rate
    }

    /// Values written on the final tick of the current run.
    pub fn end_values(&self) -> Vec3 {
        self.end_values
    }

    fn lose_target(&mut self, err: &AnimationError) {
        log::warn!(
            "{} tween on {} detached: {err}",
            self.channel,
            self.target
        );
        self.life.detach();
    }
}

impl Animatable for LinearTween {
    fn prepare(&mut self, targets: &mut dyn TargetStore) -> Result<(), AnimationError> {
        let start = targets.read(self.target, self.channel)?;
        let duration = self.life.duration_ms();
        match self.goal {
            Goal::Offset(delta) => {
                self.rate = value::div(delta, duration);
                self.end_values = value::add(start, delta);
            }
            Goal::Absolute(end) => {
                self.rate = value::div(value::sub(end, start), duration);
                self.end_values = end;
            }
        }
        self.life.reset();
        Ok(())
    }

    fn tick(&mut self, dt_ms: f64, targets: &mut dyn TargetStore) {
        if !self.life.state().is_running() {
            return;
        }
        self.life.advance(dt_ms);

        let current = match targets.read(self.target, self.channel) {
            Ok(v) => v,
            Err(err) => return self.lose_target(&err),
        };
        let next = value::add(current, value::scale(self.rate, dt_ms));
        let done = reached(next, self.end_values, self.rate);
        let written = if done { self.end_values } else { next };
        if let Err(err) = targets.write(self.target, self.channel, written) {
            return self.lose_target(&err);
        }
        if done {
            self.life.finish();
        }
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.life
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.life
    }

    fn kind(&self) -> &'static str {
        "tween"
    }
}

macro_rules! tween_variant {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name(LinearTween);

        impl $name {
            pub fn tween(&self) -> &LinearTween {
                &self.0
            }
        }

        impl Animatable for $name {
            fn prepare(&mut self, targets: &mut dyn TargetStore) -> Result<(), AnimationError> {
                self.0.prepare(targets)
            }

            fn tick(&mut self, dt_ms: f64, targets: &mut dyn TargetStore) {
                self.0.tick(dt_ms, targets)
            }

            fn lifecycle(&self) -> &Lifecycle {
                self.0.lifecycle()
            }

            fn lifecycle_mut(&mut self) -> &mut Lifecycle {
                self.0.lifecycle_mut()
            }

            fn kind(&self) -> &'static str {
                $kind
            }
        }
    };
}

tween_variant!(
    /// Moves an object (and its children) by a fixed amount.
    TranslationAnimation,
    "translation"
);
tween_variant!(
    /// Rotates an object by fixed angles (radians), either around the main
    /// axes or around its own axes.
    RotationAnimation,
    "rotation"
);
tween_variant!(
    /// Grows or shrinks an object's scale by a fixed amount.
    ScaleAnimation,
    "scale"
);
tween_variant!(
    /// Turns a light's direction vector by a fixed amount.
    DirectionAnimation,
    "direction"
);
tween_variant!(
    /// Fades an object or light toward an absolute RGB color.
    ColorAnimation,
    "color"
);

impl TranslationAnimation {
    pub fn new(object: ObjectId, amount: Vec3, duration_ms: f64) -> Result<Self, AnimationError> {
        LinearTween::new(
            object.into(),
            Channel::Translate,
            Goal::Offset(amount),
            duration_ms,
        )
        .map(Self)
    }
}

impl RotationAnimation {
    pub fn new(
        object: ObjectId,
        angles: Vec3,
        duration_ms: f64,
        around_self: bool,
    ) -> Result<Self, AnimationError> {
        let channel = if around_self {
            Channel::AxisRotation
        } else {
            Channel::Rotation
        };
        LinearTween::new(object.into(), channel, Goal::Offset(angles), duration_ms).map(Self)
    }

    pub fn around_self(&self) -> bool {
        self.0.channel() == Channel::AxisRotation
    }
}

impl ScaleAnimation {
    /// `total` scales the children along with the object.
    pub fn new(
        object: ObjectId,
        amount: Vec3,
        duration_ms: f64,
        total: bool,
    ) -> Result<Self, AnimationError> {
        let channel = if total {
            Channel::TotalScale
        } else {
            Channel::Scale
        };
        LinearTween::new(object.into(), channel, Goal::Offset(amount), duration_ms).map(Self)
    }

    pub fn total(&self) -> bool {
        self.0.channel() == Channel::TotalScale
    }
}

impl DirectionAnimation {
    pub fn new(light: LightId, amount: Vec3, duration_ms: f64) -> Result<Self, AnimationError> {
        LinearTween::new(
            light.into(),
            Channel::Direction,
            Goal::Offset(amount),
            duration_ms,
        )
        .map(Self)
    }
}

impl ColorAnimation {
    pub fn new(
        target: impl Into<TargetRef>,
        end_color: Vec3,
        duration_ms: f64,
    ) -> Result<Self, AnimationError> {
        LinearTween::new(
            target.into(),
            Channel::Color,
            Goal::Absolute(end_color),
            duration_ms,
        )
        .map(Self)
    }
}
