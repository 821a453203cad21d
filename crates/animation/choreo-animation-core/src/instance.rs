//! A performed animation bound to one element.
//!
//! The instance owns its own copy of the animation tree (assignment capture
//! state included), the element handle and a driver. Status moves
//! `Pending -> Animating -> Complete | Canceled` and never leaves a terminal
//! state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::animation::child::BlockEvent;
use crate::animation::Animation;
use crate::driver::{DrivenAnimation, Driver};
use crate::executor::Inclusivity;
use crate::ids::{alloc_instance, InstanceId};

/// How a cancelled animation leaves its element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelationBehavior {
    /// Run back to progress 0, restoring the pre-animation state.
    Revert,
    /// Stop where it is.
    Halt,
    /// Jump to the state the animation would have ended in.
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimationStatus {
    Pending,
    Animating { progress: f64 },
    Complete,
    Canceled { behavior: CancelationBehavior },
}

impl AnimationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnimationStatus::Complete | AnimationStatus::Canceled { .. }
        )
    }

    /// `Some(true)` after natural completion, `Some(false)` after cancellation.
    pub fn outcome(&self) -> Option<bool> {
        match self {
            AnimationStatus::Complete => Some(true),
            AnimationStatus::Canceled { .. } => Some(false),
            _ => None,
        }
    }
}

type Completion = Box<dyn FnOnce(bool)>;

/// Everything a driver operates on.
struct InstanceCore<E: 'static> {
    id: InstanceId,
    animation: Animation<E>,
    /// Flattened blocks of `animation`; the tree is fixed once performed.
    events: Vec<BlockEvent>,
    element: Rc<RefCell<E>>,
    status: AnimationStatus,
    completions: Vec<Completion>,
}

impl<E: 'static> InstanceCore<E> {
    fn settle(&mut self, status: AnimationStatus) {
        self.status = status;
        let finished = status.outcome().unwrap_or(false);
        for completion in std::mem::take(&mut self.completions) {
            completion(finished);
        }
    }
}

impl<E: 'static> DrivenAnimation for InstanceCore<E> {
    fn execute_blocks(&mut self, from: f64, inclusivity: Inclusivity, to: f64) {
        let mut element = self.element.borrow_mut();
        self.animation
            .execute_block_events(&self.events, &mut element, from, inclusivity, to);
    }

    fn render_frame(&mut self, relative_timestamp: f64) {
        {
            let mut element = self.element.borrow_mut();
            self.animation.render(&mut element, relative_timestamp);
        }
        self.status = AnimationStatus::Animating {
            progress: relative_timestamp,
        };
    }

    fn mark_animation_as_complete(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        debug!("animation {} complete", self.id);
        self.settle(AnimationStatus::Complete);
    }
}

/// A running animation.
pub struct AnimationInstance<E: 'static> {
    core: InstanceCore<E>,
    driver: Box<dyn Driver>,
    started_at: Instant,
}

impl<E: 'static> AnimationInstance<E> {
    /// Captures initial values and hands control to `driver`.
    pub(crate) fn start(
        mut animation: Animation<E>,
        element: Rc<RefCell<E>>,
        mut driver: Box<dyn Driver>,
    ) -> Self {
        animation.capture_initial_values(&element.borrow());
        let events = animation.block_events();
        let id = alloc_instance();
        debug!("animation {} started", id);

        let mut core = InstanceCore {
            id,
            animation,
            events,
            element,
            status: AnimationStatus::Pending,
            completions: Vec::new(),
        };
        driver.animation_instance_did_initialize(&mut core);

        Self {
            core,
            driver,
            started_at: Instant::now(),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.core.id
    }

    pub fn status(&self) -> AnimationStatus {
        self.core.status
    }

    pub fn element(&self) -> &Rc<RefCell<E>> {
        &self.core.element
    }

    /// Advances to `elapsed` seconds since the animation was performed.
    pub fn tick(&mut self, elapsed: f64) {
        if self.core.status.is_terminal() {
            return;
        }
        self.driver.tick(&mut self.core, elapsed);
    }

    /// Advances to the wall-clock time since the animation was performed.
    pub fn update(&mut self) {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        self.tick(elapsed);
    }

    /// Stops the animation, leaving the element as `behavior` describes.
    /// No effect once the animation has completed or been cancelled.
    pub fn cancel(&mut self, behavior: CancelationBehavior) {
        if self.core.status.is_terminal() {
            return;
        }
        debug!("animation {} canceled ({:?})", self.core.id, behavior);
        self.driver
            .animation_instance_did_cancel(&mut self.core, behavior);
        self.core.settle(AnimationStatus::Canceled { behavior });
    }

    /// Registers `completion` to run once with `true` on natural completion
    /// or `false` on cancellation. Runs immediately if that already happened.
    pub fn add_completion<F>(&mut self, completion: F)
    where
        F: FnOnce(bool) + 'static,
    {
        match self.core.status.outcome() {
            Some(finished) => completion(finished),
            None => self.core.completions.push(Box::new(completion)),
        }
    }
}

impl<E: 'static> fmt::Debug for AnimationInstance<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationInstance")
            .field("id", &self.core.id)
            .field("status", &self.core.status)
            .finish()
    }
}
