//! Child animations nested through a subelement accessor.
//!
//! A child runs on a window `[start, start + duration]` of its parent's curved
//! timeline and animates a narrower element reached through a [`Subelement`].
//! Every tree operation is projected through that accessor, so the parent never
//! sees the child's element type.

use std::fmt;

use hashbrown::HashSet;

use super::blocks::Direction;
use super::Animation;
use crate::curve::Curve;
use crate::property::{PropertyPath, Subelement};

/// A discrete block mapped onto the top-level raw timeline.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BlockEvent {
    pub(crate) timestamp: f64,
    /// Child indices from the top-level node, then the block index.
    pub(crate) address: Vec<usize>,
}

/// Maps a node's raw progress onto the top-level raw timeline.
pub(crate) type Lift<'a> = &'a dyn Fn(f64) -> Option<f64>;

/// Element-independent view of an animation node.
pub(crate) trait AnimationNode {
    fn curve(&self) -> &Curve;
    fn set_curve(&mut self, curve: Curve);
    /// Keyframes, discrete blocks or per-frame blocks on this node itself.
    fn has_own_content(&self) -> bool;
    fn has_per_frame_blocks(&self) -> bool;
    fn is_empty(&self) -> bool {
        !self.has_own_content() && self.child_count() == 0
    }
    fn keyframe_paths(&self) -> Vec<PropertyPath>;
    fn remove_keyframes(&mut self, shadowed: &HashSet<PropertyPath>) -> usize;
    fn child_count(&self) -> usize;
    fn child_span(&self, index: usize) -> (f64, f64);
    fn child_path(&self, index: usize) -> &PropertyPath;
    fn child_node(&self, index: usize) -> &dyn AnimationNode;
    fn child_node_mut(&mut self, index: usize) -> &mut dyn AnimationNode;
    fn retain_children(&mut self, keep: &mut dyn FnMut(&dyn AnimationNode) -> bool);
    fn collect_events(&self, lift: Lift<'_>, prefix: &mut Vec<usize>, out: &mut Vec<BlockEvent>);
}

/// Element-typed operations of a child, projected into the parent's element.
pub(crate) trait ChildContent<E> {
    fn node(&self) -> &dyn AnimationNode;
    fn node_mut(&mut self) -> &mut dyn AnimationNode;
    fn subelement_path(&self) -> &PropertyPath;
    fn capture_initial_values(&mut self, element: &E);
    fn apply(&self, element: &mut E, raw: f64);
    fn run_per_frame(&self, element: &mut E, raw: f64);
    fn fire(&mut self, element: &mut E, address: &[usize], direction: Direction);
    fn clone_box(&self) -> Box<dyn ChildContent<E>>;
}

pub(crate) struct NestedAnimation<E, S: 'static> {
    subelement: Subelement<E, S>,
    animation: Animation<S>,
}

impl<E: 'static, S: 'static> NestedAnimation<E, S> {
    pub(crate) fn new(subelement: Subelement<E, S>, animation: Animation<S>) -> Self {
        Self {
            subelement,
            animation,
        }
    }
}

impl<E: 'static, S: 'static> ChildContent<E> for NestedAnimation<E, S> {
    fn node(&self) -> &dyn AnimationNode {
        &self.animation
    }

    fn node_mut(&mut self) -> &mut dyn AnimationNode {
        &mut self.animation
    }

    fn subelement_path(&self) -> &PropertyPath {
        self.subelement.path()
    }

    fn capture_initial_values(&mut self, element: &E) {
        let Self {
            subelement,
            animation,
        } = self;
        subelement.with_ref(element, |child| animation.capture_initial_values(child));
    }

    fn apply(&self, element: &mut E, raw: f64) {
        self.subelement
            .with_mut(element, |child| self.animation.apply(child, raw));
    }

    fn run_per_frame(&self, element: &mut E, raw: f64) {
        self.subelement
            .with_mut(element, |child| self.animation.run_per_frame(child, raw));
    }

    fn fire(&mut self, element: &mut E, address: &[usize], direction: Direction) {
        let Self {
            subelement,
            animation,
        } = self;
        subelement.with_mut(element, |child| animation.fire(child, address, direction));
    }

    fn clone_box(&self) -> Box<dyn ChildContent<E>> {
        Box::new(NestedAnimation {
            subelement: self.subelement.clone(),
            animation: self.animation.clone(),
        })
    }
}

/// A child and its window on the parent's curved timeline.
pub(crate) struct ChildAnimation<E> {
    pub(crate) start: f64,
    pub(crate) duration: f64,
    pub(crate) content: Box<dyn ChildContent<E>>,
}

impl<E> ChildAnimation<E> {
    pub(crate) fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Local raw progress for the parent's curved `progress`.
    pub(crate) fn local_progress(&self, progress: f64) -> f64 {
        (progress - self.start) / self.duration
    }
}

impl<E> Clone for ChildAnimation<E> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            duration: self.duration,
            content: self.content.clone_box(),
        }
    }
}

impl<E> fmt::Debug for ChildAnimation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildAnimation")
            .field("start", &self.start)
            .field("duration", &self.duration)
            .field("subelement", self.content.subelement_path())
            .finish()
    }
}
