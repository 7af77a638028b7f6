//! Target binding contract between animations and the scene.
//!
//! An animation never owns what it animates. It holds a [`TargetRef`] plus the
//! [`Channel`] it writes, and reaches the live values through a
//! [`TargetStore`] handed to every `prepare`/`tick` call. [`crate::scene::Scene`]
//! is the stock implementation; hosts with their own scene graph implement the
//! trait directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::ids::{LightId, ObjectId};
use crate::value::Vec3;

/// Non-owning reference to something an animation can write into.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum TargetRef {
    Object(ObjectId),
    Light(LightId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Object(id) => id.fmt(f),
            TargetRef::Light(id) => id.fmt(f),
        }
    }
}

impl From<ObjectId> for TargetRef {
    fn from(id: ObjectId) -> Self {
        TargetRef::Object(id)
    }
}

impl From<LightId> for TargetRef {
    fn from(id: LightId) -> Self {
        TargetRef::Light(id)
    }
}

/// Animatable vector attribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Object translation (moves children too).
    Translate,
    /// Object-only scale.
    Scale,
    /// Scale applied to the object and its children.
    TotalScale,
    /// Rotation around the main axes.
    Rotation,
    /// Rotation around the object's own axes.
    AxisRotation,
    /// RGB part of an object or light color.
    Color,
    /// Light direction.
    Direction,
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Translate => "translate",
            Channel::Scale => "scale",
            Channel::TotalScale => "total_scale",
            Channel::Rotation => "rotation",
            Channel::AxisRotation => "axis_rotation",
            Channel::Color => "color",
            Channel::Direction => "direction",
        }
    }

    /// Parse the snake_case attribute name used by hosts.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "translate" => Channel::Translate,
            "scale" => Channel::Scale,
            "total_scale" | "totalScale" => Channel::TotalScale,
            "rotation" => Channel::Rotation,
            "axis_rotation" | "axisRotation" => Channel::AxisRotation,
            "color" => Channel::Color,
            "direction" => Channel::Direction,
            _ => return None,
        })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read/write access to animatable attributes.
///
/// Implementations return [`AnimationError::TargetNotFound`] for stale ids and
/// [`AnimationError::UnsupportedChannel`] when the target lacks the attribute.
pub trait TargetStore {
    fn read(&self, target: TargetRef, channel: Channel) -> Result<Vec3, AnimationError>;

    fn write(
        &mut self,
        target: TargetRef,
        channel: Channel,
        value: Vec3,
    ) -> Result<(), AnimationError>;
}
