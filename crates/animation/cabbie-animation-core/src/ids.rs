//! Identifiers and simple allocators for scene and scheduler entities.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Host-side handle of one loaded texture image.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light#{}", self.0)
    }
}

/// Monotonic allocator for scene ids (objects and lights).
/// Ids are never reused, so a stale id can always be detected.
#[derive(Default, Debug)]
pub struct SceneIds {
    next_object: u32,
    next_light: u32,
}

impl SceneIds {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_light(&mut self) -> LightId {
        let id = LightId(self.next_light);
        self.next_light = self.next_light.wrapping_add(1);
        id
    }
}

/// Monotonic allocator for scheduler registrations.
#[derive(Default, Debug)]
pub struct RegistrationIds {
    next_animation: u32,
    next_texture: u32,
}

impl RegistrationIds {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_animation(&mut self) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation = self.next_animation.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_texture(&mut self) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture = self.next_texture.wrapping_add(1);
        id
    }
}
