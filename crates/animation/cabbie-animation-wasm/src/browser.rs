//! Browser implementations of the scheduler seams.

use std::cell::RefCell;
use std::rc::Weak;

use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use cabbie_animation_core::{Animator, ClockHandle, FrameClock, RenderHost, Scene, TargetStore};

pub(crate) type BrowserAnimator = Animator<JsHost, BrowserClock>;

/// Scene owner that repaints through a JS callback.
///
/// The callback receives an id-ordered snapshot `{ roots, objects, lights }`
/// and must not call back into the animator while it runs.
pub(crate) struct JsHost {
    pub(crate) scene: Scene,
    render: Function,
    status: Option<Element>,
}

impl JsHost {
    pub(crate) fn new(scene: Scene, render: Function, status: Option<Element>) -> Self {
        Self {
            scene,
            render,
            status,
        }
    }
}

impl RenderHost for JsHost {
    fn targets(&mut self) -> &mut dyn TargetStore {
        &mut self.scene
    }

    fn render_scene(&mut self) {
        let snapshot = match swb::to_value(&self.scene.snapshot()) {
            Ok(v) => v,
            Err(e) => {
                log::error!("scene snapshot failed: {e}");
                return;
            }
        };
        if let Err(e) = self.render.call1(&JsValue::UNDEFINED, &snapshot) {
            log::error!("render callback threw: {e:?}");
        }
    }

    fn show_status(&mut self, status: &str) {
        if let Some(el) = &self.status {
            el.set_inner_html(status);
        }
    }
}

/// `requestAnimationFrame` / `setInterval` clock feeding the shared animator.
pub(crate) struct BrowserClock {
    window: Window,
    on_frame: Closure<dyn FnMut(f64)>,
    on_interval: Closure<dyn FnMut()>,
}

fn with_animator(target: &Weak<RefCell<BrowserAnimator>>, f: impl FnOnce(&mut BrowserAnimator)) {
    let Some(shared) = target.upgrade() else {
        return;
    };
    match shared.try_borrow_mut() {
        Ok(mut animator) => f(&mut animator),
        Err(_) => log::warn!("animator busy, browser callback skipped"),
    };
}

impl BrowserClock {
    pub(crate) fn new(window: Window, animator: Weak<RefCell<BrowserAnimator>>) -> Self {
        let frame_target = animator.clone();
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            with_animator(&frame_target, |a| {
                a.on_frame(timestamp);
            });
        });
        let on_interval = Closure::<dyn FnMut()>::new(move || {
            with_animator(&animator, |a| {
                a.on_interval();
            });
        });
        Self {
            window,
            on_frame,
            on_interval,
        }
    }
}

impl FrameClock for BrowserClock {
    fn request_frame(&mut self) -> ClockHandle {
        let id = self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
            .unwrap_or_else(|e| {
                log::error!("requestAnimationFrame failed: {e:?}");
                0
            });
        ClockHandle(id)
    }

    fn start_interval(&mut self, period_ms: f64) -> ClockHandle {
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.on_interval.as_ref().unchecked_ref(),
                period_ms.round() as i32,
            )
            .unwrap_or_else(|e| {
                log::error!("setInterval failed: {e:?}");
                0
            });
        ClockHandle(id)
    }

    fn cancel_frame(&mut self, handle: ClockHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }

    fn cancel_interval(&mut self, handle: ClockHandle) {
        self.window.clear_interval_with_handle(handle.0);
    }
}
