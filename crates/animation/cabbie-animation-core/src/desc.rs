//! Serializable animation trees.
//!
//! Hosts that cannot hand over closures or trait objects (the wasm adapter,
//! JSON fixtures) describe an animation as an [`AnimationDesc`] and call
//! [`AnimationDesc::build`].

use serde::{Deserialize, Serialize};

use crate::binding::TargetRef;
use crate::combinators::{GroupAnimation, StackAnimation};
use crate::error::AnimationError;
use crate::ids::{LightId, ObjectId};
use crate::lifecycle::Animatable;
use crate::tween::{
    ColorAnimation, DirectionAnimation, RotationAnimation, ScaleAnimation, TranslationAnimation,
};
use crate::value::Vec3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationDesc {
    Translation {
        object: ObjectId,
        amount: Vec3,
        duration_ms: f64,
    },
    Rotation {
        object: ObjectId,
        angles: Vec3,
        duration_ms: f64,
        #[serde(default)]
        around_self: bool,
    },
    Scale {
        object: ObjectId,
        amount: Vec3,
        duration_ms: f64,
        #[serde(default)]
        total: bool,
    },
    Direction {
        light: LightId,
        amount: Vec3,
        duration_ms: f64,
    },
    Color {
        target: TargetRef,
        end_color: Vec3,
        duration_ms: f64,
    },
    Stack {
        children: Vec<AnimationDesc>,
        #[serde(default)]
        repeat: bool,
    },
    Group {
        children: Vec<AnimationDesc>,
        #[serde(default)]
        repeat: bool,
    },
}

impl AnimationDesc {
    pub fn from_json(json: &str) -> Result<Self, AnimationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Construct the described animation, validating every node.
    pub fn build(&self) -> Result<Box<dyn Animatable>, AnimationError> {
        Ok(match self {
            Self::Translation {
                object,
                amount,
                duration_ms,
            } => TranslationAnimation::new(*object, *amount, *duration_ms)?.boxed(),
            Self::Rotation {
                object,
                angles,
                duration_ms,
                around_self,
            } => RotationAnimation::new(*object, *angles, *duration_ms, *around_self)?.boxed(),
            Self::Scale {
                object,
                amount,
                duration_ms,
                total,
            } => ScaleAnimation::new(*object, *amount, *duration_ms, *total)?.boxed(),
            Self::Direction {
                light,
                amount,
                duration_ms,
            } => DirectionAnimation::new(*light, *amount, *duration_ms)?.boxed(),
            Self::Color {
                target,
                end_color,
                duration_ms,
            } => ColorAnimation::new(*target, *end_color, *duration_ms)?.boxed(),
            Self::Stack { children, repeat } => {
                StackAnimation::new(build_all(children)?, *repeat)?.boxed()
            }
            Self::Group { children, repeat } => {
                GroupAnimation::new(build_all(children)?, *repeat)?.boxed()
            }
        })
    }
}

fn build_all(children: &[AnimationDesc]) -> Result<Vec<Box<dyn Animatable>>, AnimationError> {
    children.iter().map(AnimationDesc::build).collect()
}
