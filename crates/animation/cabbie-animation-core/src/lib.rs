//! Cabbie Animation Core (engine-agnostic)
//!
//! Frame-driven animation for a small 3D scene: linear tweens over object and
//! light attributes, sequential and parallel composition, frame-cycling
//! textures, and a scheduler that advances all of them once per display frame.
//! Browser bindings live in `cabbie-animation-wasm`.

pub mod animator;
pub mod binding;
pub mod choreography;
pub mod combinators;
pub mod config;
pub mod desc;
pub mod error;
pub mod host;
pub mod ids;
pub mod lifecycle;
pub mod outputs;
pub mod scene;
pub mod texture;
pub mod tween;
pub mod value;

// Re-exports for consumers (adapters)
pub use animator::Animator;
pub use binding::{Channel, TargetRef, TargetStore};
pub use combinators::{GroupAnimation, StackAnimation};
pub use config::{Config, LightLimits};
pub use desc::AnimationDesc;
pub use error::AnimationError;
pub use host::{ClockHandle, FrameClock, HeadlessHost, ManualClock, RenderHost};
pub use ids::{AnimationId, FrameHandle, LightId, ObjectId, TextureId};
pub use lifecycle::{Animatable, AnimationState, Lifecycle, OnEnd};
pub use outputs::{FrameReport, SchedulerState};
pub use scene::{Light, LightKind, Scene, SceneObject, SceneSnapshot};
pub use texture::{AnimatedTexture, FrameLoadBarrier};
pub use tween::{
    ColorAnimation, DirectionAnimation, Goal, LinearTween, RotationAnimation, ScaleAnimation,
    TranslationAnimation,
};
pub use value::{Rgba, Vec3};

pub type Result<T> = core::result::Result<T, AnimationError>;
