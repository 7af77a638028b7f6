//! Composite animations built from other animations.
//!
//! [`StackAnimation`] runs its children one after another and carries the
//! overshoot of each finished child into the next. [`GroupAnimation`] runs
//! its children side by side and ends with the last of them.

mod group;
mod stack;

pub use group::GroupAnimation;
pub use stack::StackAnimation;

use crate::error::AnimationError;
use crate::lifecycle::Animatable;

pub(crate) fn require_children(
    kind: &str,
    children: &[Box<dyn Animatable>],
) -> Result<(), AnimationError> {
    if children.is_empty() {
        return Err(AnimationError::invalid(format!(
            "{kind} needs at least one child animation"
        )));
    }
    Ok(())
}
