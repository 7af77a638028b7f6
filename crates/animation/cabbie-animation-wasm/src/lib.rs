use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use hashbrown::HashMap;
use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use cabbie_animation_core::{
    AnimatedTexture, AnimationDesc, AnimationError, AnimationId, Animator, Channel, Config,
    FrameHandle, FrameLoadBarrier, LightId, LightKind, ObjectId, Scene, TargetRef, TargetStore,
    TextureId,
};

mod browser;

use browser::{BrowserAnimator, BrowserClock, JsHost};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed (second instance).
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct CabbieAnimator {
    inner: Rc<RefCell<BrowserAnimator>>,
    loads: HashMap<u32, FrameLoadBarrier>,
}

impl CabbieAnimator {
    fn animator(&self) -> Result<RefMut<'_, BrowserAnimator>, JsError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| JsError::new("animator is busy (called from the render callback?)"))
    }
}

#[wasm_bindgen]
impl CabbieAnimator {
    /// Create an animator bound to the page's display clock.
    ///
    /// `config` is a JSON config object or undefined/null for defaults, e.g.
    ///   new CabbieAnimator({ max_frame_delta_ms: 1000 }, scene => draw(scene), "fps")
    /// `render` is called after every frame with `{ roots, objects, lights }`.
    /// `status_element_id` names an element that receives the fps readout.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        render: Function,
        status_element_id: Option<String>,
    ) -> Result<CabbieAnimator, JsError> {
        init_logging();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let window = web_sys::window().ok_or_else(|| JsError::new("no window available"))?;
        let status = match status_element_id {
            Some(id) => Some(
                window
                    .document()
                    .and_then(|doc| doc.get_element_by_id(&id))
                    .ok_or_else(|| JsError::new(&format!("status element '{id}' not found")))?,
            ),
            None => None,
        };

        let host = JsHost::new(Scene::new(cfg.light_limits), render, status);
        let inner = Rc::new_cyclic(|weak| {
            RefCell::new(Animator::new(
                cfg,
                host,
                BrowserClock::new(window, weak.clone()),
            ))
        });
        Ok(CabbieAnimator {
            inner,
            loads: HashMap::new(),
        })
    }

    // ---- scene ----

    /// Create an object drawing `shape`. Returns its id.
    pub fn create_object(&mut self, shape: String) -> Result<u32, JsError> {
        Ok(self.animator()?.host_mut().scene.create_object(shape).0)
    }

    pub fn add_root(&mut self, object: u32) -> Result<(), JsError> {
        self.animator()?.host_mut().scene.add_root(ObjectId(object))?;
        Ok(())
    }

    pub fn add_child(&mut self, parent: u32, child: u32) -> Result<(), JsError> {
        self.animator()?
            .host_mut()
            .scene
            .add_child(ObjectId(parent), ObjectId(child))?;
        Ok(())
    }

    pub fn remove_child(&mut self, parent: u32, child: u32) -> Result<(), JsError> {
        self.animator()?
            .host_mut()
            .scene
            .remove_child(ObjectId(parent), ObjectId(child))?;
        Ok(())
    }

    /// Remove an object and its subtree.
    pub fn despawn(&mut self, object: u32) -> Result<(), JsError> {
        self.animator()?.host_mut().scene.despawn(ObjectId(object))?;
        Ok(())
    }

    /// `kind` is "spot", "positional" or "directional".
    pub fn create_light(&mut self, kind: &str) -> Result<u32, JsError> {
        let kind = LightKind::from_name(kind)
            .ok_or_else(|| JsError::new(&format!("unknown light kind '{kind}'")))?;
        Ok(self.animator()?.host_mut().scene.create_light(kind)?.0)
    }

    pub fn delete_light(&mut self, light: u32) -> Result<(), JsError> {
        self.animator()?.host_mut().scene.delete_light(LightId(light))?;
        Ok(())
    }

    pub fn attach_light(&mut self, object: u32, light: u32) -> Result<(), JsError> {
        self.animator()?
            .host_mut()
            .scene
            .attach_light(ObjectId(object), LightId(light))?;
        Ok(())
    }

    /// Write a vector attribute. `target` is `{ type: "Object" | "Light", id }`.
    pub fn set_vec3(
        &mut self,
        target: JsValue,
        attribute: &str,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), JsError> {
        let (target, channel) = parse_binding(target, attribute)?;
        self.animator()?
            .host_mut()
            .scene
            .write(target, channel, [x, y, z])?;
        Ok(())
    }

    pub fn get_vec3(&self, target: JsValue, attribute: &str) -> Result<Vec<f64>, JsError> {
        let (target, channel) = parse_binding(target, attribute)?;
        Ok(self.animator()?.host().scene.read(target, channel)?.to_vec())
    }

    /// Full record of one object as a JS object.
    pub fn object(&self, object: u32) -> Result<JsValue, JsError> {
        let animator = self.animator()?;
        let obj = animator
            .host()
            .scene
            .object(ObjectId(object))
            .ok_or(AnimationError::ObjectNotFound { id: object })?;
        swb::to_value(obj).map_err(|e| JsError::new(&format!("object error: {e}")))
    }

    // ---- animations ----

    /// Register an animation tree such as
    ///   { kind: "translation", object: 0, amount: [0, 0, 40], duration_ms: 3000 }
    /// It is prepared against the current scene immediately. Returns its id.
    pub fn add_animation(&mut self, desc: JsValue) -> Result<u32, JsError> {
        let desc: AnimationDesc = swb::from_value(desc)
            .map_err(|e| JsError::new(&format!("animation parse error: {e}")))?;
        let animation = desc.build()?;
        Ok(self.animator()?.add_animation(animation)?.0)
    }

    /// Cancel an animation. Its completion is never reported.
    pub fn remove_animation(&mut self, id: u32) -> Result<(), JsError> {
        self.animator()?.remove_animation(AnimationId(id))?;
        Ok(())
    }

    pub fn animation_count(&self) -> Result<usize, JsError> {
        Ok(self.animator()?.animation_count())
    }

    // ---- animated textures ----

    /// Reserve a frame-cycling texture. It starts cycling once all
    /// `frame_count` frames were reported through `frame_loaded`.
    pub fn add_animated_texture(
        &mut self,
        name: String,
        interval_ms: f64,
        frame_count: u32,
    ) -> Result<u32, JsError> {
        let texture = AnimatedTexture::new(name.clone(), interval_ms)?;
        let barrier = FrameLoadBarrier::new(frame_count as usize)?;
        let id = {
            let mut animator = self.animator()?;
            animator.host_mut().scene.register_texture_name(&name)?;
            animator.add_animated_texture(texture)
        };
        self.loads.insert(id.0, barrier);
        Ok(id.0)
    }

    /// Report one loaded frame. Returns true when this completed the set and
    /// the texture became ready.
    pub fn frame_loaded(&mut self, texture: u32, index: u32, frame: u32) -> Result<bool, JsError> {
        let barrier = self
            .loads
            .get_mut(&texture)
            .ok_or(AnimationError::TextureNotFound { id: texture })?;
        let Some(frames) = barrier.complete(index as usize, FrameHandle(frame))? else {
            return Ok(false);
        };
        self.animator()?
            .texture_mut(TextureId(texture))
            .ok_or(AnimationError::TextureNotFound { id: texture })?
            .set_frames(frames)?;
        Ok(true)
    }

    /// Report a failed frame load. The texture stays pending.
    pub fn frame_failed(&mut self, texture: u32, index: u32, reason: &str) -> Result<(), JsError> {
        let barrier = self
            .loads
            .get_mut(&texture)
            .ok_or(AnimationError::TextureNotFound { id: texture })?;
        Err(barrier.fail(index as usize, reason).into())
    }

    /// Frame currently shown by a texture, undefined until it is ready.
    pub fn texture_frame(&self, texture: u32) -> Result<Option<u32>, JsError> {
        let animator = self.animator()?;
        let tex = animator
            .texture(TextureId(texture))
            .ok_or(AnimationError::TextureNotFound { id: texture })?;
        Ok(tex.current_frame().map(|f| f.0))
    }

    pub fn remove_animated_texture(&mut self, texture: u32) -> Result<(), JsError> {
        let removed = {
            let mut animator = self.animator()?;
            let removed = animator.remove_animated_texture(TextureId(texture))?;
            animator.host_mut().scene.release_texture_name(removed.name());
            removed
        };
        self.loads.remove(&texture);
        log::debug!("texture '{}' removed", removed.name());
        Ok(())
    }

    // ---- scheduling ----

    pub fn start(&mut self) -> Result<(), JsError> {
        self.animator()?.start();
        Ok(())
    }

    /// Advance by `manual_dt_ms` every `real_period_ms`, regardless of the
    /// real frame rate.
    pub fn start_debug(&mut self, manual_dt_ms: f64, real_period_ms: f64) -> Result<(), JsError> {
        self.animator()?.start_debug(manual_dt_ms, real_period_ms)?;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), JsError> {
        self.animator()?.stop();
        Ok(())
    }

    /// Run one pass by hand. Returns the frame report.
    pub fn step(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        let report = self.animator()?.advance(dt_ms);
        swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
    }

    pub fn is_animating(&self) -> Result<bool, JsError> {
        Ok(self.animator()?.is_animating())
    }

    pub fn fps(&self) -> Result<f64, JsError> {
        Ok(self.animator()?.fps())
    }
}

impl Drop for CabbieAnimator {
    fn drop(&mut self) {
        if let Ok(mut animator) = self.inner.try_borrow_mut() {
            animator.stop();
        }
    }
}

fn parse_binding(target: JsValue, attribute: &str) -> Result<(TargetRef, Channel), JsError> {
    let target: TargetRef =
        swb::from_value(target).map_err(|e| JsError::new(&format!("target error: {e}")))?;
    let channel = Channel::from_name(attribute)
        .ok_or_else(|| JsError::new(&format!("unknown attribute '{attribute}'")))?;
    Ok((target, channel))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
