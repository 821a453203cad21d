//! Discrete content: property assignments, execution blocks and per-frame blocks.

use std::fmt;
use std::rc::Rc;

use crate::property::Property;

/// Direction in which a discrete block is crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
}

/// Content that fires when playback crosses its timestamp.
pub(crate) trait DiscreteBlock<E> {
    /// Curved timestamp on the owning node's timeline.
    fn timestamp(&self) -> f64;
    fn fire(&mut self, element: &mut E, direction: Direction);
    fn clone_box(&self) -> Box<dyn DiscreteBlock<E>>;
}

/// Whether an assignment has seen the value it overwrote.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CaptureState<V> {
    NotYetCaptured,
    Captured(V),
}

/// Sets a property when crossed forward; restores the overwritten value when
/// crossed in reverse.
pub(crate) struct Assignment<E, V> {
    timestamp: f64,
    property: Property<E, V>,
    value: V,
    captured: CaptureState<V>,
}

impl<E, V> Assignment<E, V> {
    pub(crate) fn new(timestamp: f64, property: Property<E, V>, value: V) -> Self {
        Self {
            timestamp,
            property,
            value,
            captured: CaptureState::NotYetCaptured,
        }
    }
}

impl<E: 'static, V: Clone + 'static> DiscreteBlock<E> for Assignment<E, V> {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn fire(&mut self, element: &mut E, direction: Direction) {
        match direction {
            Direction::Forward => {
                self.captured = CaptureState::Captured(self.property.get(element));
                self.property.set(element, self.value.clone());
            }
            Direction::Reverse => {
                if let CaptureState::Captured(previous) = &self.captured {
                    self.property.set(element, previous.clone());
                }
            }
        }
    }

    fn clone_box(&self) -> Box<dyn DiscreteBlock<E>> {
        Box::new(Assignment {
            timestamp: self.timestamp,
            property: self.property.clone(),
            value: self.value.clone(),
            captured: self.captured.clone(),
        })
    }
}

pub(crate) type ElementBlock<E> = Rc<dyn Fn(&mut E)>;

/// Arbitrary side effect with an optional undo.
pub(crate) struct ExecutionBlock<E> {
    timestamp: f64,
    forward: Option<ElementBlock<E>>,
    reverse: Option<ElementBlock<E>>,
}

impl<E> ExecutionBlock<E> {
    pub(crate) fn new(
        timestamp: f64,
        forward: Option<ElementBlock<E>>,
        reverse: Option<ElementBlock<E>>,
    ) -> Self {
        Self {
            timestamp,
            forward,
            reverse,
        }
    }
}

impl<E: 'static> DiscreteBlock<E> for ExecutionBlock<E> {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn fire(&mut self, element: &mut E, direction: Direction) {
        let block = match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        };
        if let Some(block) = block {
            block(element);
        }
    }

    fn clone_box(&self) -> Box<dyn DiscreteBlock<E>> {
        Box::new(ExecutionBlock {
            timestamp: self.timestamp,
            forward: self.forward.clone(),
            reverse: self.reverse.clone(),
        })
    }
}

impl<E> fmt::Debug for dyn DiscreteBlock<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteBlock")
            .field("timestamp", &self.timestamp())
            .finish()
    }
}

/// State handed to a per-frame block on every rendered frame.
pub struct FrameContext<'a, E> {
    pub element: &'a mut E,
    /// Raw progress on the owning node's timeline.
    pub uncurved_progress: f64,
    /// Progress after the owning node's curve.
    pub progress: f64,
}

pub(crate) type PerFrameBlock<E> = Rc<dyn Fn(&mut FrameContext<'_, E>)>;
