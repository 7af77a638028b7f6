//! Ready-made compositions for the driving scene.

use crate::combinators::{GroupAnimation, StackAnimation};
use crate::error::AnimationError;
use crate::ids::ObjectId;
use crate::lifecycle::Animatable;
use crate::tween::{RotationAnimation, TranslationAnimation};
use crate::value::{neg, Vec3};

/// Duration of the jump back at the end of a shuttle pass.
pub const SHUTTLE_RESET_MS: f64 = 1.0;

/// Default length of a lane change.
pub const LANE_CHANGE_MS: f64 = 600.0;

/// Endless conveyor: glide by `offset` over `travel_ms`, then jump back.
/// Used for scenery that streams past a stationary camera.
pub fn shuttle_loop(
    object: ObjectId,
    offset: Vec3,
    travel_ms: f64,
) -> Result<StackAnimation, AnimationError> {
    StackAnimation::new(
        vec![
            TranslationAnimation::new(object, offset, travel_ms)?.boxed(),
            TranslationAnimation::new(object, neg(offset), SHUTTLE_RESET_MS)?.boxed(),
        ],
        true,
    )
}

/// Sideways move by `dx` along the x axis.
pub fn lane_change(
    object: ObjectId,
    dx: f64,
    duration_ms: f64,
) -> Result<TranslationAnimation, AnimationError> {
    TranslationAnimation::new(object, [dx, 0.0, 0.0], duration_ms)
}

/// Jump: rise by `height` while pitching by `tilt`, then come back down and
/// level out. Each half lasts `half_ms`.
pub fn hop(
    object: ObjectId,
    height: f64,
    tilt: Vec3,
    half_ms: f64,
) -> Result<StackAnimation, AnimationError> {
    let up = GroupAnimation::new(
        vec![
            TranslationAnimation::new(object, [0.0, height, 0.0], half_ms)?.boxed(),
            RotationAnimation::new(object, tilt, half_ms, true)?.boxed(),
        ],
        false,
    )?;
    let down = GroupAnimation::new(
        vec![
            TranslationAnimation::new(object, [0.0, -height, 0.0], half_ms)?.boxed(),
            RotationAnimation::new(object, neg(tilt), half_ms, true)?.boxed(),
        ],
        false,
    )?;
    StackAnimation::new(vec![up.boxed(), down.boxed()], false)
}
