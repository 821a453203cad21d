//! Keyframe series: the ordered (timestamp, value) pairs for one property.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::interp::Animatable;
use crate::property::{Property, PropertyPath};

/// Value of a keyframe, either fixed or derived from the property's initial value.
pub(crate) enum KeyframeValue<V> {
    Absolute(V),
    Relative(Rc<dyn Fn(&V) -> V>),
}

impl<V: Clone> KeyframeValue<V> {
    fn resolve(&self, initial: &V) -> V {
        match self {
            KeyframeValue::Absolute(v) => v.clone(),
            KeyframeValue::Relative(f) => f(initial),
        }
    }
}

impl<V: Clone> Clone for KeyframeValue<V> {
    fn clone(&self) -> Self {
        match self {
            KeyframeValue::Absolute(v) => KeyframeValue::Absolute(v.clone()),
            KeyframeValue::Relative(f) => KeyframeValue::Relative(Rc::clone(f)),
        }
    }
}

#[derive(Clone)]
pub(crate) struct Keyframe<V> {
    pub(crate) timestamp: f64,
    pub(crate) value: KeyframeValue<V>,
}

/// All keyframes for one property of an element of type `E`.
pub(crate) struct KeyframeSeries<E, V> {
    property: Property<E, V>,
    /// Sorted by timestamp, unique timestamps.
    keyframes: Vec<Keyframe<V>>,
    initial: Option<V>,
}

impl<E: 'static, V: Animatable> KeyframeSeries<E, V> {
    pub(crate) fn new(property: Property<E, V>) -> Self {
        Self {
            property,
            keyframes: Vec::new(),
            initial: None,
        }
    }

    /// Inserts in timestamp order; a keyframe at an existing timestamp replaces it.
    pub(crate) fn insert(&mut self, keyframe: Keyframe<V>) {
        match self
            .keyframes
            .binary_search_by(|k| k.timestamp.total_cmp(&keyframe.timestamp))
        {
            Ok(i) => self.keyframes[i] = keyframe,
            Err(i) => self.keyframes.insert(i, keyframe),
        }
    }

    /// Value at `progress`: exact keyframe, bracket interpolation, or the
    /// nearest end value outside the keyframed range.
    pub(crate) fn value_at(&self, progress: f64, initial: &V) -> Option<V> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if progress.is_nan() || progress <= first.timestamp {
            return Some(first.value.resolve(initial));
        }
        if progress >= last.timestamp {
            return Some(last.value.resolve(initial));
        }
        let upper = self.keyframes.partition_point(|k| k.timestamp < progress);
        let hi = &self.keyframes[upper];
        if hi.timestamp == progress {
            return Some(hi.value.resolve(initial));
        }
        let lo = &self.keyframes[upper - 1];
        let t = (progress - lo.timestamp) / (hi.timestamp - lo.timestamp);
        Some(V::value_between(
            &lo.value.resolve(initial),
            &hi.value.resolve(initial),
            t,
        ))
    }
}

/// Type-erased keyframe series as stored on an animation node.
pub(crate) trait AnyKeyframeSeries<E> {
    fn path(&self) -> &PropertyPath;
    fn timestamps(&self) -> Vec<f64>;
    fn capture_initial_value(&mut self, element: &E);
    fn apply(&self, element: &mut E, progress: f64);
    fn clone_box(&self) -> Box<dyn AnyKeyframeSeries<E>>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: 'static, V: Animatable> AnyKeyframeSeries<E> for KeyframeSeries<E, V> {
    fn path(&self) -> &PropertyPath {
        self.property.path()
    }

    fn timestamps(&self) -> Vec<f64> {
        self.keyframes.iter().map(|k| k.timestamp).collect()
    }

    fn capture_initial_value(&mut self, element: &E) {
        self.initial = Some(self.property.get(element));
    }

    fn apply(&self, element: &mut E, progress: f64) {
        let value = match &self.initial {
            Some(initial) => self.value_at(progress, initial),
            None => self.value_at(progress, &self.property.get(element)),
        };
        if let Some(value) = value {
            self.property.set(element, value);
        }
    }

    fn clone_box(&self) -> Box<dyn AnyKeyframeSeries<E>> {
        Box::new(KeyframeSeries {
            property: self.property.clone(),
            keyframes: self.keyframes.clone(),
            initial: self.initial.clone(),
        })
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<E> fmt::Debug for dyn AnyKeyframeSeries<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeSeries")
            .field("path", self.path())
            .field("timestamps", &self.timestamps())
            .finish()
    }
}
