//! Scene graph records that animations write into.
//!
//! The scene is a flat store of [`SceneObject`]s and [`Light`]s keyed by
//! monotonically allocated ids, with parent/child links kept as id lists.
//! Rendering is external: a host walks [`Scene::roots`] and reads the plain
//! attribute fields after each frame's animation pass.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::binding::{Channel, TargetRef, TargetStore};
use crate::config::LightLimits;
use crate::error::AnimationError;
use crate::ids::{LightId, ObjectId, SceneIds};
use crate::value::{Rgba, Vec3};

/// A drawable object with animatable transform and color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Name of the shape to draw (resolved by the renderer).
    pub shape: String,
    /// Translates the object and its children.
    pub translate: Vec3,
    /// Scales only this object, not its children.
    pub scale: Vec3,
    /// Scales this object and its children.
    pub total_scale: Vec3,
    /// Rotation around the main axes.
    pub rotation: Vec3,
    /// Rotation around the object's own axes.
    pub axis_rotation: Vec3,
    pub color: Rgba,
    pub texture_name: Option<String>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) lights: Vec<LightId>,
}

impl SceneObject {
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            translate: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            total_scale: [1.0, 1.0, 1.0],
            rotation: [0.0, 0.0, 0.0],
            axis_rotation: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0, 1.0],
            texture_name: None,
            parent: None,
            children: Vec::new(),
            lights: Vec::new(),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    #[inline]
    pub fn lights(&self) -> &[LightId] {
        &self.lights
    }

    fn channel(&self, channel: Channel) -> Option<Vec3> {
        Some(match channel {
            Channel::Translate => self.translate,
            Channel::Scale => self.scale,
            Channel::TotalScale => self.total_scale,
            Channel::Rotation => self.rotation,
            Channel::AxisRotation => self.axis_rotation,
            Channel::Color => [self.color[0], self.color[1], self.color[2]],
            Channel::Direction => return None,
        })
    }

    fn set_channel(&mut self, channel: Channel, value: Vec3) -> bool {
        match channel {
            Channel::Translate => self.translate = value,
            Channel::Scale => self.scale = value,
            Channel::TotalScale => self.total_scale = value,
            Channel::Rotation => self.rotation = value,
            Channel::AxisRotation => self.axis_rotation = value,
            Channel::Color => self.color[..3].copy_from_slice(&value),
            Channel::Direction => return false,
        }
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Spot,
    Positional,
    Directional,
}

impl LightKind {
    pub fn name(&self) -> &'static str {
        match self {
            LightKind::Spot => "spot",
            LightKind::Positional => "positional",
            LightKind::Directional => "directional",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "spot" => LightKind::Spot,
            "positional" | "point" => LightKind::Positional,
            "directional" => LightKind::Directional,
            _ => return None,
        })
    }

    fn limit(&self, limits: &LightLimits) -> usize {
        match self {
            LightKind::Spot => limits.spot,
            LightKind::Positional => limits.positional,
            LightKind::Directional => limits.directional,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub direction: Vec3,
    pub position: Vec3,
    pub color: Rgba,
    pub enabled: bool,
}

impl Light {
    fn new(kind: LightKind) -> Self {
        Self {
            kind,
            direction: [0.0, 0.0, 0.0],
            position: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0, 1.0],
            enabled: true,
        }
    }
}

/// Borrowed, serializable view of the whole scene handed to renderers.
#[derive(Debug, Serialize)]
pub struct SceneSnapshot<'a> {
    pub roots: &'a [ObjectId],
    pub objects: Vec<(ObjectId, &'a SceneObject)>,
    pub lights: Vec<(LightId, &'a Light)>,
}

/// Owner of every object and light an animation can target.
#[derive(Debug, Default)]
pub struct Scene {
    ids: SceneIds,
    limits: LightLimits,
    objects: HashMap<ObjectId, SceneObject>,
    lights: HashMap<LightId, Light>,
    roots: Vec<ObjectId>,
    texture_names: HashSet<String>,
}

impl Scene {
    pub fn new(limits: LightLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Create a detached object drawing `shape`.
    pub fn create_object(&mut self, shape: impl Into<String>) -> ObjectId {
        let id = self.ids.alloc_object();
        self.objects.insert(id, SceneObject::new(shape));
        id
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    #[inline]
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Add a root object. Only roots are walked by the renderer; their
    /// descendants are reached through the child lists.
    pub fn add_root(&mut self, id: ObjectId) -> Result<(), AnimationError> {
        if !self.objects.contains_key(&id) {
            return Err(AnimationError::ObjectNotFound { id: id.0 });
        }
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        Ok(())
    }

    #[inline]
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), AnimationError> {
        if !self.objects.contains_key(&parent) {
            return Err(AnimationError::ObjectNotFound { id: parent.0 });
        }
        let previous = self
            .objects
            .get(&child)
            .ok_or(AnimationError::ObjectNotFound { id: child.0 })?
            .parent;
        if let Some(old) = previous {
            if let Some(o) = self.objects.get_mut(&old) {
                o.children.retain(|c| *c != child);
            }
        }
        if let Some(p) = self.objects.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.objects.get_mut(&child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    pub fn remove_child(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
    ) -> Result<(), AnimationError> {
        let p = self
            .objects
            .get_mut(&parent)
            .ok_or(AnimationError::ObjectNotFound { id: parent.0 })?;
        let index = p
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(AnimationError::NotAChild {
                parent: parent.0,
                child: child.0,
            })?;
        p.children.remove(index);
        if let Some(c) = self.objects.get_mut(&child) {
            c.parent = None;
        }
        Ok(())
    }

    pub fn remove_from_parent(&mut self, child: ObjectId) -> Result<(), AnimationError> {
        let parent = self
            .objects
            .get(&child)
            .ok_or(AnimationError::ObjectNotFound { id: child.0 })?
            .parent;
        match parent {
            Some(parent) => self.remove_child(parent, child),
            None => Ok(()),
        }
    }

    /// Remove an object and its whole subtree. Lights attached to removed
    /// objects are deleted as well. Animations still targeting the removed
    /// ids detach on their next tick.
    pub fn despawn(&mut self, id: ObjectId) -> Result<(), AnimationError> {
        self.remove_from_parent(id)?;
        self.roots.retain(|r| *r != id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(obj) = self.objects.remove(&next) {
                stack.extend(obj.children);
                for light in obj.lights {
                    self.lights.remove(&light);
                }
            }
        }
        Ok(())
    }

    /// Create a light, failing once the per-kind budget is exhausted.
    pub fn create_light(&mut self, kind: LightKind) -> Result<LightId, AnimationError> {
        let limit = kind.limit(&self.limits);
        if self.light_count(kind) >= limit {
            return Err(AnimationError::LightLimitReached {
                kind: kind.name().to_string(),
                limit,
            });
        }
        let id = self.ids.alloc_light();
        self.lights.insert(id, Light::new(kind));
        log::debug!("scene: created {} light {}", kind.name(), id);
        Ok(id)
    }

    pub fn delete_light(&mut self, id: LightId) -> Result<Light, AnimationError> {
        let light = self
            .lights
            .remove(&id)
            .ok_or(AnimationError::LightNotFound { id: id.0 })?;
        for obj in self.objects.values_mut() {
            obj.lights.retain(|l| *l != id);
        }
        Ok(light)
    }

    #[inline]
    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(&id)
    }

    #[inline]
    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(&id)
    }

    pub fn light_count(&self, kind: LightKind) -> usize {
        self.lights.values().filter(|l| l.kind == kind).count()
    }

    /// Place a light in `object`'s frame so it follows the object's transform.
    pub fn attach_light(&mut self, object: ObjectId, light: LightId) -> Result<(), AnimationError> {
        if !self.lights.contains_key(&light) {
            return Err(AnimationError::LightNotFound { id: light.0 });
        }
        let obj = self
            .objects
            .get_mut(&object)
            .ok_or(AnimationError::ObjectNotFound { id: object.0 })?;
        if !obj.lights.contains(&light) {
            obj.lights.push(light);
        }
        Ok(())
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, obj)| (*id, obj))
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter().map(|(id, light)| (*id, light))
    }

    /// Id-ordered view of all objects and lights.
    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        let mut objects: Vec<_> = self.objects().collect();
        objects.sort_by_key(|(id, _)| *id);
        let mut lights: Vec<_> = self.lights().collect();
        lights.sort_by_key(|(id, _)| *id);
        SceneSnapshot {
            roots: &self.roots,
            objects,
            lights,
        }
    }

    /// Reserve a unique texture name.
    pub fn register_texture_name(&mut self, name: &str) -> Result<(), AnimationError> {
        if !self.texture_names.insert(name.to_string()) {
            return Err(AnimationError::DuplicateTexture {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Free a texture name; returns false if it was not registered.
    pub fn release_texture_name(&mut self, name: &str) -> bool {
        self.texture_names.remove(name)
    }

    pub fn has_texture_name(&self, name: &str) -> bool {
        self.texture_names.contains(name)
    }
}

fn unsupported(target: TargetRef, channel: Channel) -> AnimationError {
    AnimationError::UnsupportedChannel {
        channel: channel.name().to_string(),
        target: target.to_string(),
    }
}

fn missing(target: TargetRef) -> AnimationError {
    AnimationError::TargetNotFound {
        target: target.to_string(),
    }
}

impl TargetStore for Scene {
    fn read(&self, target: TargetRef, channel: Channel) -> Result<Vec3, AnimationError> {
        match target {
            TargetRef::Object(id) => self
                .objects
                .get(&id)
                .ok_or_else(|| missing(target))?
                .channel(channel)
                .ok_or_else(|| unsupported(target, channel)),
            TargetRef::Light(id) => {
                let light = self.lights.get(&id).ok_or_else(|| missing(target))?;
                match channel {
                    Channel::Direction => Ok(light.direction),
                    Channel::Color => Ok([light.color[0], light.color[1], light.color[2]]),
                    _ => Err(unsupported(target, channel)),
                }
            }
        }
    }

    fn write(
        &mut self,
        target: TargetRef,
        channel: Channel,
        value: Vec3,
    ) -> Result<(), AnimationError> {
        match target {
            TargetRef::Object(id) => {
                let obj = self.objects.get_mut(&id).ok_or_else(|| missing(target))?;
                if obj.set_channel(channel, value) {
                    Ok(())
                } else {
                    Err(unsupported(target, channel))
                }
            }
            TargetRef::Light(id) => {
                let light = self.lights.get_mut(&id).ok_or_else(|| missing(target))?;
                match channel {
                    Channel::Direction => light.direction = value,
                    Channel::Color => light.color[..3].copy_from_slice(&value),
                    _ => return Err(unsupported(target, channel)),
                }
                Ok(())
            }
        }
    }
}
