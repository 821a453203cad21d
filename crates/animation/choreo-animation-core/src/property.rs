//! Typed property accessors and subelement lenses.
//!
//! An element is any type; the engine never inspects it. Animations address
//! its state through [`Property`] (get/set pair for one value) and reach nested
//! state through [`Subelement`] (projection from an element to a narrower one).
//! Both carry a [`PropertyPath`] so definitions for the same property can be
//! matched across nesting levels.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Dot-separated address of a property relative to some element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Path with a single segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// The empty path (the element itself).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// `prefix` followed by `self`.
    pub fn prefixed(&self, prefix: &PropertyPath) -> PropertyPath {
        let mut segments = Vec::with_capacity(prefix.segments.len() + self.segments.len());
        segments.extend(prefix.segments.iter().cloned());
        segments.extend(self.segments.iter().cloned());
        PropertyPath { segments }
    }

    /// Remainder of `self` after `prefix`, if `self` starts with it.
    pub fn strip_prefix(&self, prefix: &PropertyPath) -> Option<PropertyPath> {
        if self.segments.len() < prefix.segments.len() {
            return None;
        }
        let (head, tail) = self.segments.split_at(prefix.segments.len());
        if head != prefix.segments.as_slice() {
            return None;
        }
        Some(PropertyPath {
            segments: tail.to_vec(),
        })
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("self");
        }
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for PropertyPath {
    fn from(s: &str) -> Self {
        Self {
            segments: s
                .split('.')
                .filter(|seg| !seg.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

type Getter<E, V> = Rc<dyn Fn(&E) -> V>;
type Setter<E, V> = Rc<dyn Fn(&mut E, V)>;

/// Read/write access to one value of type `V` on an element of type `E`.
pub struct Property<E, V> {
    path: PropertyPath,
    getter: Getter<E, V>,
    setter: Setter<E, V>,
}

impl<E: 'static, V: 'static> Property<E, V> {
    pub fn new<G, S>(path: impl Into<PropertyPath>, get: G, set: S) -> Self
    where
        G: Fn(&E) -> V + 'static,
        S: Fn(&mut E, V) + 'static,
    {
        Self {
            path: path.into(),
            getter: Rc::new(get),
            setter: Rc::new(set),
        }
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    #[inline]
    pub fn get(&self, element: &E) -> V {
        (self.getter)(element)
    }

    #[inline]
    pub fn set(&self, element: &mut E, value: V) {
        (self.setter)(element, value)
    }

    /// The same property reached from a parent element through `subelement`.
    pub fn through<P: 'static>(&self, subelement: &Subelement<P, E>) -> Property<P, V> {
        let read_lens = subelement.clone();
        let write_lens = subelement.clone();
        let getter = Rc::clone(&self.getter);
        let setter = Rc::clone(&self.setter);
        Property {
            path: self.path.prefixed(subelement.path()),
            getter: Rc::new(move |parent: &P| read_lens.with_ref(parent, |child| getter(child))),
            setter: Rc::new(move |parent: &mut P, value: V| {
                write_lens.with_mut(parent, |child| setter(child, value))
            }),
        }
    }
}

impl<E, V> Clone for Property<E, V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            getter: Rc::clone(&self.getter),
            setter: Rc::clone(&self.setter),
        }
    }
}

impl<E, V> fmt::Debug for Property<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("path", &self.path).finish()
    }
}

type RefProjection<E, S> = Rc<dyn Fn(&E) -> &S>;
type MutProjection<E, S> = Rc<dyn Fn(&mut E) -> &mut S>;

enum Access<E, S> {
    /// `S` lives inside `E`.
    Field {
        get: RefProjection<E, S>,
        get_mut: MutProjection<E, S>,
    },
    /// `S` is owned elsewhere; the parent only holds a handle to it.
    Shared(Rc<RefCell<S>>),
}

/// Accessor from an element `E` to a narrower subelement `S`.
pub struct Subelement<E, S> {
    path: PropertyPath,
    access: Access<E, S>,
}

impl<E: 'static, S: 'static> Subelement<E, S> {
    /// Projection into a part of the parent element.
    pub fn new<G, M>(path: impl Into<PropertyPath>, get: G, get_mut: M) -> Self
    where
        G: Fn(&E) -> &S + 'static,
        M: Fn(&mut E) -> &mut S + 'static,
    {
        Self {
            path: path.into(),
            access: Access::Field {
                get: Rc::new(get),
                get_mut: Rc::new(get_mut),
            },
        }
    }

    /// An element owned outside the parent; the parent value is ignored.
    pub fn shared(path: impl Into<PropertyPath>, element: Rc<RefCell<S>>) -> Self {
        Self {
            path: path.into(),
            access: Access::Shared(element),
        }
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn with_ref<R>(&self, element: &E, f: impl FnOnce(&S) -> R) -> R {
        match &self.access {
            Access::Field { get, .. } => f(get(element)),
            Access::Shared(cell) => f(&*cell.borrow()),
        }
    }

    pub fn with_mut<R>(&self, element: &mut E, f: impl FnOnce(&mut S) -> R) -> R {
        match &self.access {
            Access::Field { get_mut, .. } => f(get_mut(element)),
            Access::Shared(cell) => f(&mut *cell.borrow_mut()),
        }
    }
}

impl<E: 'static> Subelement<E, E> {
    /// The element itself; a child added through it animates the parent's element.
    pub fn identity() -> Self {
        Self::new(PropertyPath::root(), |e: &E| e, |e: &mut E| e)
    }
}

impl<E, S> Clone for Subelement<E, S> {
    fn clone(&self) -> Self {
        let access = match &self.access {
            Access::Field { get, get_mut } => Access::Field {
                get: Rc::clone(get),
                get_mut: Rc::clone(get_mut),
            },
            Access::Shared(cell) => Access::Shared(Rc::clone(cell)),
        };
        Self {
            path: self.path.clone(),
            access,
        }
    }
}

impl<E, S> fmt::Debug for Subelement<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.access {
            Access::Field { .. } => "field",
            Access::Shared(_) => "shared",
        };
        f.debug_struct("Subelement")
            .field("path", &self.path)
            .field("access", &kind)
            .finish()
    }
}
