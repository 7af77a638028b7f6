use crate::binding::TargetStore;
use crate::error::AnimationError;
use crate::lifecycle::{Animatable, Lifecycle};

/// Sequential composition.
///
/// Exactly one child is active at a time. When the active child ends, its
/// overshoot is remembered and handed to the next child on top of the
/// following frame's delta, so no time is lost between steps. With `repeat`
/// the stack restarts from the first child after the last one ends and never
/// ends itself.
#[derive(Debug)]
pub struct StackAnimation {
    children: Vec<Box<dyn Animatable>>,
    current: usize,
    repeat: bool,
    leftover_ms: f64,
    cycles: u64,
    life: Lifecycle,
}

impl StackAnimation {
    pub fn new(children: Vec<Box<dyn Animatable>>, repeat: bool) -> Result<Self, AnimationError> {
        super::require_children("stack", &children)?;
        let nominal: f64 = children.iter().map(|c| c.lifecycle().duration_ms()).sum();
        Ok(Self {
            children,
            current: 0,
            repeat,
            leftover_ms: 0.0,
            cycles: 0,
            life: Lifecycle::new(nominal),
        })
    }

    pub fn children(&self) -> &[Box<dyn Animatable>] {
        &self.children
    }

    /// Index of the child currently receiving ticks.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Time owed to the active child from the previous child's overshoot.
    pub fn leftover_ms(&self) -> f64 {
        self.leftover_ms
    }

    /// Completed passes over the children (only grows with `repeat`).
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn step_finished(&mut self, targets: &mut dyn TargetStore) {
        let next = self.current + 1;
        if next < self.children.len() {
            self.current = next;
            if let Err(err) = self.children[next].prepare(targets) {
                log::warn!("stack step {next} could not start: {err}");
                self.life.detach();
            }
        } else if self.repeat {
            self.cycles += 1;
            if let Err(err) = self.prepare(targets) {
                log::warn!("stack restart failed: {err}");
                self.life.detach();
            }
        } else {
            self.life.finish_with_overshoot(self.leftover_ms);
        }
    }
}

impl Animatable for StackAnimation {
    fn prepare(&mut self, targets: &mut dyn TargetStore) -> Result<(), AnimationError> {
        self.life.reset();
        if !self.repeat {
            self.leftover_ms = 0.0;
        }
        self.current = 0;
        self.children[0].prepare(targets)
    }

    fn tick(&mut self, dt_ms: f64, targets: &mut dyn TargetStore) {
        if !self.life.state().is_running() {
            return;
        }
        self.life.advance(dt_ms);

        let child = &mut self.children[self.current];
        child.tick(dt_ms + self.leftover_ms, targets);
        if child.is_ended() {
            self.leftover_ms = child.overshoot_ms();
            self.step_finished(targets);
        } else {
            self.leftover_ms = 0.0;
        }
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.life
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.life
    }

    fn kind(&self) -> &'static str {
        "stack"
    }
}
