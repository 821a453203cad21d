//! Declarative animation definitions.
//!
//! An [`Animation<E>`] is an immutable-once-started description of how an
//! element of type `E` changes over a relative timeline `[0, 1]`: keyframe
//! series per property, discrete assignments and execution blocks, per-frame
//! blocks and nested child animations over subelements. Wall-clock timing is
//! only attached when the animation is performed.

pub mod blocks;
pub(crate) mod child;
pub(crate) mod keyframes;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashSet;
use log::{debug, warn};

use crate::config::Config;
use crate::curve::Curve;
use crate::driver::{Driver, TimelineDriver};
use crate::error::AnimationError;
use crate::instance::AnimationInstance;
use crate::interp::Animatable;
use crate::property::{Property, PropertyPath, Subelement};
use crate::timing::{RepeatStyle, Timing};

pub use blocks::FrameContext;
use blocks::{Assignment, DiscreteBlock, ExecutionBlock, PerFrameBlock};
use child::{AnimationNode, BlockEvent, ChildAnimation, Lift, NestedAnimation};
use keyframes::{AnyKeyframeSeries, Keyframe, KeyframeSeries, KeyframeValue};

/// Overrides for a single `perform` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformOptions {
    /// Seconds before the first frame.
    pub delay: f64,
    /// Seconds per cycle; the animation's implicit duration when `None`.
    pub duration: Option<f64>,
    /// The animation's implicit repeat style when `None`.
    pub repeat_style: Option<RepeatStyle>,
}

/// Definition of how an element of type `E` changes over relative time.
pub struct Animation<E: 'static> {
    /// Seconds per cycle when performed without an explicit duration.
    pub implicit_duration: f64,
    pub implicit_repeat_style: RepeatStyle,
    /// Maps this node's raw progress to the progress its content sees.
    pub curve: Curve,
    pub(crate) keyframe_series: Vec<Box<dyn AnyKeyframeSeries<E>>>,
    pub(crate) discrete: Vec<Box<dyn DiscreteBlock<E>>>,
    pub(crate) per_frame: Vec<PerFrameBlock<E>>,
    pub(crate) children: Vec<ChildAnimation<E>>,
    pub(crate) boundary_epsilon: f64,
}

impl<E: 'static> Default for Animation<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Animation<E> {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            implicit_duration: config.default_duration,
            implicit_repeat_style: config.default_repeat_style,
            curve: Curve::Linear,
            keyframe_series: Vec::new(),
            discrete: Vec::new(),
            per_frame: Vec::new(),
            children: Vec::new(),
            boundary_epsilon: config.boundary_epsilon,
        }
    }

    /// Adds a keyframe with a fixed value at `timestamp` (curved progress).
    pub fn add_keyframe<V: Animatable>(
        &mut self,
        property: &Property<E, V>,
        timestamp: f64,
        value: V,
    ) -> &mut Self {
        self.insert_keyframe(
            property,
            Keyframe {
                timestamp,
                value: KeyframeValue::Absolute(value),
            },
        );
        self
    }

    /// Adds a keyframe whose value is computed from the property's value when
    /// the animation started.
    pub fn add_relative_keyframe<V, F>(
        &mut self,
        property: &Property<E, V>,
        timestamp: f64,
        relative: F,
    ) -> &mut Self
    where
        V: Animatable,
        F: Fn(&V) -> V + 'static,
    {
        self.insert_keyframe(
            property,
            Keyframe {
                timestamp,
                value: KeyframeValue::Relative(Rc::new(relative)),
            },
        );
        self
    }

    fn insert_keyframe<V: Animatable>(&mut self, property: &Property<E, V>, keyframe: Keyframe<V>) {
        let path = property.path();
        let existing = self
            .keyframe_series
            .iter()
            .position(|series| series.path() == path);

        if let Some(index) = existing {
            if let Some(series) = self.keyframe_series[index]
                .as_any_mut()
                .downcast_mut::<KeyframeSeries<E, V>>()
            {
                series.insert(keyframe);
                return;
            }
            warn!(
                "property {} already has keyframes of another value type; replacing them",
                path
            );
            self.keyframe_series.remove(index);
        }

        let mut series = KeyframeSeries::new(property.clone());
        series.insert(keyframe);
        self.keyframe_series.push(Box::new(series));
    }

    /// Sets `property` to `value` when playback crosses `timestamp` forward and
    /// restores the overwritten value when it crosses back.
    pub fn add_assignment<V: Clone + 'static>(
        &mut self,
        property: &Property<E, V>,
        timestamp: f64,
        value: V,
    ) -> &mut Self {
        self.discrete
            .push(Box::new(Assignment::new(timestamp, property.clone(), value)));
        self
    }

    /// Runs `forward` when playback crosses `timestamp` forward and `reverse`
    /// when it crosses back.
    pub fn add_execution<F, R>(&mut self, timestamp: f64, forward: F, reverse: R) -> &mut Self
    where
        F: Fn(&mut E) + 'static,
        R: Fn(&mut E) + 'static,
    {
        self.discrete.push(Box::new(ExecutionBlock::new(
            timestamp,
            Some(Rc::new(forward)),
            Some(Rc::new(reverse)),
        )));
        self
    }

    /// Runs `forward` when playback crosses `timestamp` forward; nothing on the way back.
    pub fn add_forward_execution<F>(&mut self, timestamp: f64, forward: F) -> &mut Self
    where
        F: Fn(&mut E) + 'static,
    {
        self.discrete.push(Box::new(ExecutionBlock::new(
            timestamp,
            Some(Rc::new(forward)),
            None,
        )));
        self
    }

    /// Runs `block` after every rendered frame while this node is active.
    pub fn add_per_frame_execution<F>(&mut self, block: F) -> &mut Self
    where
        F: Fn(&mut FrameContext<'_, E>) + 'static,
    {
        self.per_frame.push(Rc::new(block));
        self
    }

    /// Nests `child` over the subelement reached through `subelement`, on the
    /// window `[start, start + duration]` of this animation's curved timeline.
    pub fn add_child<S: 'static>(
        &mut self,
        child: Animation<S>,
        subelement: &Subelement<E, S>,
        start: f64,
        duration: f64,
    ) -> Result<&mut Self, AnimationError> {
        AnimationError::check_child_range(start, duration)?;
        self.children.push(ChildAnimation {
            start,
            duration,
            content: Box::new(NestedAnimation::new(subelement.clone(), child)),
        });
        Ok(self)
    }

    /// Property paths with keyframes on this node (not its children).
    pub fn keyframed_paths(&self) -> Vec<PropertyPath> {
        self.keyframe_series.iter().map(|s| s.path().clone()).collect()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Starts the animation on `element` with its implicit duration and repeat style.
    pub fn perform(&self, element: Rc<RefCell<E>>) -> AnimationInstance<E> {
        let timing = Timing {
            delay: 0.0,
            duration: self.implicit_duration,
            repeat_style: self.implicit_repeat_style,
        };
        self.perform_with_driver(element, Box::new(TimelineDriver::new(timing)))
    }

    pub fn perform_with(
        &self,
        element: Rc<RefCell<E>>,
        options: PerformOptions,
    ) -> Result<AnimationInstance<E>, AnimationError> {
        let timing = Timing::new(
            options.delay,
            options.duration.unwrap_or(self.implicit_duration),
            options.repeat_style.unwrap_or(self.implicit_repeat_style),
        )?;
        Ok(self.perform_with_driver(element, Box::new(TimelineDriver::new(timing))))
    }

    /// Starts the animation under a caller-supplied driver.
    pub fn perform_with_driver(
        &self,
        element: Rc<RefCell<E>>,
        driver: Box<dyn Driver>,
    ) -> AnimationInstance<E> {
        AnimationInstance::start(self.clone(), element, driver)
    }

    fn fire_own(&mut self, element: &mut E, index: usize, direction: blocks::Direction) {
        match self.discrete.get_mut(index) {
            Some(block) => block.fire(element, direction),
            None => debug!("no discrete block at index {}", index),
        }
    }

    /// Fires the block at `address` (child indices, then the block index).
    pub(crate) fn fire(&mut self, element: &mut E, address: &[usize], direction: blocks::Direction) {
        match address {
            [] => {}
            [index] => self.fire_own(element, *index, direction),
            [child, rest @ ..] => {
                if let Some(child) = self.children.get_mut(*child) {
                    child.content.fire(element, rest, direction);
                }
            }
        }
    }
}

impl<E: 'static> Clone for Animation<E> {
    fn clone(&self) -> Self {
        Self {
            implicit_duration: self.implicit_duration,
            implicit_repeat_style: self.implicit_repeat_style,
            curve: self.curve.clone(),
            keyframe_series: self.keyframe_series.iter().map(|s| s.clone_box()).collect(),
            discrete: self.discrete.iter().map(|b| b.clone_box()).collect(),
            per_frame: self.per_frame.clone(),
            children: self.children.clone(),
            boundary_epsilon: self.boundary_epsilon,
        }
    }
}

impl<E: 'static> fmt::Debug for Animation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("implicit_duration", &self.implicit_duration)
            .field("implicit_repeat_style", &self.implicit_repeat_style)
            .field("curve", &self.curve)
            .field("keyframe_series", &self.keyframe_series)
            .field("discrete", &self.discrete)
            .field("per_frame", &self.per_frame.len())
            .field("children", &self.children)
            .finish()
    }
}

/// Snaps values within rounding distance of 0 or 1 onto them.
fn snap_unit(value: f64) -> f64 {
    const SNAP: f64 = 1e-12;
    if value.abs() <= SNAP {
        0.0
    } else if (value - 1.0).abs() <= SNAP {
        1.0
    } else {
        value
    }
}

impl<E: 'static> AnimationNode for Animation<E> {
    fn curve(&self) -> &Curve {
        &self.curve
    }

    fn set_curve(&mut self, curve: Curve) {
        self.curve = curve;
    }

    fn has_own_content(&self) -> bool {
        !self.keyframe_series.is_empty() || !self.discrete.is_empty() || !self.per_frame.is_empty()
    }

    fn has_per_frame_blocks(&self) -> bool {
        !self.per_frame.is_empty()
    }

    fn keyframe_paths(&self) -> Vec<PropertyPath> {
        self.keyframed_paths()
    }

    fn remove_keyframes(&mut self, shadowed: &HashSet<PropertyPath>) -> usize {
        let before = self.keyframe_series.len();
        self.keyframe_series
            .retain(|series| !shadowed.contains(series.path()));
        before - self.keyframe_series.len()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_span(&self, index: usize) -> (f64, f64) {
        let child = &self.children[index];
        (child.start, child.duration)
    }

    fn child_path(&self, index: usize) -> &PropertyPath {
        self.children[index].content.subelement_path()
    }

    fn child_node(&self, index: usize) -> &dyn AnimationNode {
        self.children[index].content.node()
    }

    fn child_node_mut(&mut self, index: usize) -> &mut dyn AnimationNode {
        self.children[index].content.node_mut()
    }

    fn retain_children(&mut self, keep: &mut dyn FnMut(&dyn AnimationNode) -> bool) {
        self.children.retain(|child| keep(child.content.node()));
    }

    fn collect_events(&self, lift: Lift<'_>, prefix: &mut Vec<usize>, out: &mut Vec<BlockEvent>) {
        // Children first: at equal timestamps a parent's blocks run after its
        // children's going forward and before them going back.
        for (index, child) in self.children.iter().enumerate() {
            let (start, duration) = (child.start, child.duration);
            let child_lift = |raw: f64| {
                self.curve
                    .first_raw_progress(snap_unit(start + raw * duration))
                    .and_then(lift)
            };
            prefix.push(index);
            child.content.node().collect_events(&child_lift, prefix, out);
            prefix.pop();
        }

        for (index, block) in self.discrete.iter().enumerate() {
            let Some(timestamp) = self
                .curve
                .first_raw_progress(block.timestamp())
                .and_then(lift)
            else {
                debug!(
                    "block at {} is never reached by the curve; skipping",
                    block.timestamp()
                );
                continue;
            };
            let mut address = prefix.clone();
            address.push(index);
            out.push(BlockEvent {
                timestamp: snap_unit(timestamp),
                address,
            });
        }
    }
}
