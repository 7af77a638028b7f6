//! Frame scheduler driving registered animations and animated textures.
//!
//! The animator owns no timer of its own. It asks its [`FrameClock`] for the
//! next callback and is fed back through [`Animator::on_frame`] (measured
//! display frames) or [`Animator::on_interval`] (fixed-step debug mode).
//! Each pass ticks every animation, drops the ones that ended, ticks every
//! texture and finally asks the [`RenderHost`] to repaint.

use hashbrown::HashMap;

use crate::config::Config;
use crate::error::AnimationError;
use crate::host::{ClockHandle, FrameClock, RenderHost};
use crate::ids::{AnimationId, RegistrationIds, TextureId};
use crate::lifecycle::Animatable;
use crate::outputs::{FrameReport, SchedulerState};
use crate::texture::AnimatedTexture;

pub struct Animator<H: RenderHost, C: FrameClock> {
    cfg: Config,
    host: H,
    clock: C,
    ids: RegistrationIds,
    animations: HashMap<AnimationId, Box<dyn Animatable>>,
    textures: HashMap<TextureId, AnimatedTexture>,

    state: SchedulerState,
    request: Option<ClockHandle>,
    last_timestamp_ms: Option<f64>,
    frame_time_ms: f64,
    debug_dt_ms: f64,
}

impl<H: RenderHost, C: FrameClock> Animator<H, C> {
    /// Invalid frame settings in `cfg` fall back to their defaults.
    pub fn new(cfg: Config, host: H, clock: C) -> Self {
        let cfg = match cfg.validate() {
            Ok(()) => cfg,
            Err(err) => {
                log::warn!("animator: {err}, using defaults for invalid fields");
                cfg.sanitized()
            }
        };
        Self {
            cfg,
            host,
            clock,
            ids: RegistrationIds::new(),
            animations: HashMap::new(),
            textures: HashMap::new(),
            state: SchedulerState::Stopped,
            request: None,
            last_timestamp_ms: None,
            frame_time_ms: 0.0,
            debug_dt_ms: 0.0,
        }
    }

    /// Prepare `animation` against the current scene and register it.
    /// A failed prepare leaves nothing registered.
    pub fn add_animation<A: Animatable + 'static>(
        &mut self,
        mut animation: A,
    ) -> Result<AnimationId, AnimationError> {
        animation.prepare(self.host.targets())?;
        let id = self.ids.alloc_animation();
        log::debug!("animator: registered {} animation {}", animation.kind(), id.0);
        self.animations.insert(id, Box::new(animation));
        Ok(id)
    }

    /// Unregister an animation without finishing it. Its `on_end` never fires.
    pub fn remove_animation(
        &mut self,
        id: AnimationId,
    ) -> Result<Box<dyn Animatable>, AnimationError> {
        self.animations
            .remove(&id)
            .ok_or(AnimationError::AnimationNotFound { id: id.0 })
    }

    pub fn add_animated_texture(&mut self, texture: AnimatedTexture) -> TextureId {
        let id = self.ids.alloc_texture();
        log::debug!("animator: registered texture '{}' as {}", texture.name(), id.0);
        self.textures.insert(id, texture);
        id
    }

    pub fn remove_animated_texture(
        &mut self,
        id: TextureId,
    ) -> Result<AnimatedTexture, AnimationError> {
        self.textures
            .remove(&id)
            .ok_or(AnimationError::TextureNotFound { id: id.0 })
    }

    /// Begin real-time animation on display frames.
    pub fn start(&mut self) {
        if self.state.is_animating() {
            log::debug!("animator: start ignored, already {:?}", self.state);
            return;
        }
        self.state = SchedulerState::Running;
        self.request = Some(self.clock.request_frame());
        log::info!("animator: started");
    }

    /// Simulate a fixed frame delta every `real_period_ms` of wall time.
    pub fn start_debug(
        &mut self,
        manual_dt_ms: f64,
        real_period_ms: f64,
    ) -> Result<(), AnimationError> {
        for (what, v) in [("frame delta", manual_dt_ms), ("period", real_period_ms)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(AnimationError::invalid(format!(
                    "debug {what} must be positive, got {v}"
                )));
            }
        }
        self.stop();
        self.debug_dt_ms = manual_dt_ms;
        self.state = SchedulerState::DebugRunning;
        self.request = Some(self.clock.start_interval(real_period_ms));
        let status = format!(
            "Simulating: {:.*} fps",
            self.cfg.status_precision,
            1000.0 / manual_dt_ms
        );
        self.host.show_status(&status);
        log::info!("animator: debug mode, {manual_dt_ms}ms every {real_period_ms}ms");
        Ok(())
    }

    pub fn stop(&mut self) {
        match (self.state, self.request.take()) {
            (SchedulerState::Running, Some(handle)) => self.clock.cancel_frame(handle),
            (SchedulerState::DebugRunning, Some(handle)) => self.clock.cancel_interval(handle),
            (SchedulerState::Stopped, _) => return,
            _ => {}
        }
        self.state = SchedulerState::Stopped;
        self.last_timestamp_ms = None;
        self.frame_time_ms = 0.0;
        log::info!("animator: stopped");
    }

    /// Display-frame callback. The first frame after `start` only records the
    /// baseline timestamp; later frames advance by the clamped delta.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> Option<FrameReport> {
        if self.state != SchedulerState::Running {
            log::warn!("animator: frame at {timestamp_ms}ms ignored while {:?}", self.state);
            return None;
        }
        let report = match self.last_timestamp_ms.replace(timestamp_ms) {
            None => None,
            Some(last) => {
                let dt = (timestamp_ms - last).clamp(0.0, self.cfg.max_frame_delta_ms);
                let report = self.advance(dt);
                self.frame_time_ms += (dt - self.frame_time_ms) / self.cfg.frame_time_smoothing;
                let status = format!("{:.*} fps", self.cfg.status_precision, self.fps());
                self.host.show_status(&status);
                Some(report)
            }
        };
        self.request = Some(self.clock.request_frame());
        report
    }

    /// Interval callback of debug mode.
    pub fn on_interval(&mut self) -> Option<FrameReport> {
        if self.state != SchedulerState::DebugRunning {
            log::warn!("animator: interval tick ignored while {:?}", self.state);
            return None;
        }
        Some(self.advance(self.debug_dt_ms))
    }

    /// Run one pass with an explicit delta: animations, textures, repaint.
    pub fn advance(&mut self, dt_ms: f64) -> FrameReport {
        let dt_ms = dt_ms.max(0.0);
        let mut ended = Vec::new();

        let targets = self.host.targets();
        self.animations.retain(|id, animation| {
            animation.tick(dt_ms, targets);
            if animation.is_ended() {
                ended.push(*id);
                false
            } else {
                true
            }
        });
        for id in &ended {
            log::debug!("animator: animation {} ended", id.0);
        }

        let textures_advanced = self
            .textures
            .iter_mut()
            .filter_map(|(id, texture)| texture.tick(dt_ms).then_some(*id))
            .collect();

        self.host.render_scene();

        FrameReport {
            dt_ms,
            ended,
            textures_advanced,
            active_animations: self.animations.len(),
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Exponentially smoothed frame time of real-time mode.
    #[inline]
    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn fps(&self) -> f64 {
        if self.frame_time_ms > 0.0 {
            1000.0 / self.frame_time_ms
        } else {
            0.0
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn animation(&self, id: AnimationId) -> Option<&dyn Animatable> {
        self.animations.get(&id).map(|a| &**a)
    }

    pub fn texture(&self, id: TextureId) -> Option<&AnimatedTexture> {
        self.textures.get(&id)
    }

    pub fn texture_mut(&mut self, id: TextureId) -> Option<&mut AnimatedTexture> {
        self.textures.get_mut(&id)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
