//! Groups: several animations over independent elements run as one.
//!
//! A group builds a synthetic `Animation<GroupContainer>` in which every member
//! is a child reached through a shared-handle accessor. Performing the group
//! performs that synthetic animation, so all instance and driver rules apply
//! unchanged. Groups nest by adding a group's synthetic animation as a member.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::animation::{Animation, PerformOptions};
use crate::config::Config;
use crate::curve::Curve;
use crate::error::AnimationError;
use crate::instance::AnimationInstance;
use crate::property::{PropertyPath, Subelement};
use crate::timing::RepeatStyle;

/// Element of a group's synthetic animation. Holds the member elements alive;
/// members are reached through their own handles, not through the container.
#[derive(Default)]
pub struct GroupContainer {
    members: Vec<Rc<dyn Any>>,
}

impl GroupContainer {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Debug for GroupContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupContainer")
            .field("members", &self.members.len())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct AnimationGroup {
    container: Rc<RefCell<GroupContainer>>,
    animation: Animation<GroupContainer>,
}

impl Default for AnimationGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationGroup {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            container: Rc::new(RefCell::new(GroupContainer::default())),
            animation: Animation::with_config(config),
        }
    }

    /// Adds `animation` over `element` on the window `[start, start + duration]`
    /// of the group's timeline.
    pub fn add_animation<S: 'static>(
        &mut self,
        animation: Animation<S>,
        element: Rc<RefCell<S>>,
        start: f64,
        duration: f64,
    ) -> Result<&mut Self, AnimationError> {
        let index = self.container.borrow().members.len();
        let accessor = Subelement::shared(
            PropertyPath::new(format!("member{index}")),
            Rc::clone(&element),
        );
        self.animation
            .add_child(animation, &accessor, start, duration)?;
        self.container.borrow_mut().members.push(element);
        Ok(self)
    }

    /// Nests `group` as a member on the window `[start, start + duration]`.
    pub fn add_group(
        &mut self,
        group: AnimationGroup,
        start: f64,
        duration: f64,
    ) -> Result<&mut Self, AnimationError> {
        let (animation, container) = group.into_parts();
        self.add_animation(animation, container, start, duration)
    }

    pub fn implicit_duration(&self) -> f64 {
        self.animation.implicit_duration
    }

    pub fn set_implicit_duration(&mut self, duration: f64) -> &mut Self {
        self.animation.implicit_duration = duration;
        self
    }

    pub fn implicit_repeat_style(&self) -> RepeatStyle {
        self.animation.implicit_repeat_style
    }

    pub fn set_implicit_repeat_style(&mut self, repeat_style: RepeatStyle) -> &mut Self {
        self.animation.implicit_repeat_style = repeat_style;
        self
    }

    pub fn curve(&self) -> &Curve {
        &self.animation.curve
    }

    pub fn set_curve(&mut self, curve: Curve) -> &mut Self {
        self.animation.curve = curve;
        self
    }

    pub fn animation(&self) -> &Animation<GroupContainer> {
        &self.animation
    }

    pub fn perform(&self) -> AnimationInstance<GroupContainer> {
        self.animation.perform(Rc::clone(&self.container))
    }

    pub fn perform_with(
        &self,
        options: PerformOptions,
    ) -> Result<AnimationInstance<GroupContainer>, AnimationError> {
        self.animation
            .perform_with(Rc::clone(&self.container), options)
    }

    /// The synthetic animation and the container it animates.
    pub fn into_parts(self) -> (Animation<GroupContainer>, Rc<RefCell<GroupContainer>>) {
        (self.animation, self.container)
    }
}
