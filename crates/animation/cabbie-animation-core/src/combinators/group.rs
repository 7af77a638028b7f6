use crate::binding::TargetStore;
use crate::error::AnimationError;
use crate::lifecycle::{Animatable, Lifecycle};

/// Parallel composition.
///
/// Every child that has not ended receives the same delta. The group ends in
/// the tick its last running child ends, with the largest child overshoot as
/// its own. With `repeat` all children are prepared again instead.
#[derive(Debug)]
pub struct GroupAnimation {
    children: Vec<Box<dyn Animatable>>,
    repeat: bool,
    cycles: u64,
    life: Lifecycle,
}

impl GroupAnimation {
    pub fn new(children: Vec<Box<dyn Animatable>>, repeat: bool) -> Result<Self, AnimationError> {
        super::require_children("group", &children)?;
        let nominal = children
            .iter()
            .map(|c| c.lifecycle().duration_ms())
            .fold(0.0_f64, f64::max);
        Ok(Self {
            children,
            repeat,
            cycles: 0,
            life: Lifecycle::new(nominal),
        })
    }

    pub fn children(&self) -> &[Box<dyn Animatable>] {
        &self.children
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Children that have not ended in the current run.
    pub fn running_children(&self) -> usize {
        self.children.iter().filter(|c| !c.is_ended()).count()
    }
}

impl Animatable for GroupAnimation {
    fn prepare(&mut self, targets: &mut dyn TargetStore) -> Result<(), AnimationError> {
        self.life.reset();
        for child in self.children.iter_mut() {
            child.prepare(targets)?;
        }
        Ok(())
    }

    fn tick(&mut self, dt_ms: f64, targets: &mut dyn TargetStore) {
        if !self.life.state().is_running() {
            return;
        }
        self.life.advance(dt_ms);

        let mut ended = 0;
        let mut max_overshoot = f64::NEG_INFINITY;
        for child in self.children.iter_mut() {
            if !child.is_ended() {
                child.tick(dt_ms, targets);
            }
            if child.is_ended() {
                ended += 1;
                max_overshoot = max_overshoot.max(child.overshoot_ms());
            }
        }
        if ended < self.children.len() {
            return;
        }

        if self.repeat {
            self.cycles += 1;
            if let Err(err) = self.prepare(targets) {
                log::warn!("group restart failed: {err}");
                self.life.detach();
            }
        } else {
            self.life.finish_with_overshoot(max_overshoot);
        }
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.life
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.life
    }

    fn kind(&self) -> &'static str {
        "group"
    }
}
