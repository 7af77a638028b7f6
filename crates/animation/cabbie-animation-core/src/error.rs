//! Error types for the animation core

use serde::{Deserialize, Serialize};

/// Errors raised by scene, animation and scheduler operations.
///
/// Every variant describes a usage defect or an exhausted resource. The per-frame
/// tick never produces one of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Bad construction parameter (non-positive duration, empty child list, ...)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Animation is not registered with the animator
    #[error("Animation not found: {id}")]
    AnimationNotFound { id: u32 },

    /// Animated texture is not registered with the animator
    #[error("Animated texture not found: {id}")]
    TextureNotFound { id: u32 },

    /// Animation target is missing from the scene
    #[error("Animation target not found: {target}")]
    TargetNotFound { target: String },

    /// Target does not expose the requested attribute
    #[error("Channel {channel} is not supported by {target}")]
    UnsupportedChannel { channel: String, target: String },

    /// Per-kind light budget exhausted
    #[error("{kind} light limit reached. Cannot create more than {limit} {kind} lights")]
    LightLimitReached { kind: String, limit: usize },

    /// Light is not part of the scene
    #[error("Light not found: {id}")]
    LightNotFound { id: u32 },

    /// Object is not part of the scene
    #[error("Object not found: {id}")]
    ObjectNotFound { id: u32 },

    /// Child removal from a parent it does not belong to
    #[error("Object {child} is not a child of {parent}")]
    NotAChild { parent: u32, child: u32 },

    /// Texture names must be unique within a scene
    #[error("Texture with the same name ({name}) already registered")]
    DuplicateTexture { name: String },

    /// Animated texture frame loading failure
    #[error("Frame load error: {reason}")]
    FrameLoad { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl AnimationError {
    /// Shorthand for [`AnimationError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. }
            | Self::AnimationNotFound { .. }
            | Self::TextureNotFound { .. }
            | Self::NotAChild { .. }
            | Self::DuplicateTexture { .. } => "usage",
            Self::LightLimitReached { .. } => "resource",
            Self::TargetNotFound { .. }
            | Self::UnsupportedChannel { .. }
            | Self::LightNotFound { .. }
            | Self::ObjectNotFound { .. } => "target",
            Self::FrameLoad { .. } => "loading",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = AnimationError::invalid("duration must be positive");
        assert!(matches!(error, AnimationError::InvalidArgument { .. }));
        assert_eq!(
            error.to_string(),
            "Invalid argument: duration must be positive"
        );
    }

    #[test]
    fn test_error_categories() {
        let usage = AnimationError::AnimationNotFound { id: 3 };
        assert_eq!(usage.category(), "usage");

        let resource = AnimationError::LightLimitReached {
            kind: "spot".to_string(),
            limit: 10,
        };
        assert_eq!(resource.category(), "resource");
        assert_eq!(
            resource.to_string(),
            "spot light limit reached. Cannot create more than 10 spot lights"
        );
    }

    #[test]
    fn test_serialization() {
        let error = AnimationError::TargetNotFound {
            target: "object#4".to_string(),
        };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: AnimationError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let converted: AnimationError = err.into();
        assert_eq!(converted.category(), "serialization");
    }
}
