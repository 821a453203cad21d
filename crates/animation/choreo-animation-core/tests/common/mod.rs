#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use choreo_animation_core::{DrivenAnimation, Inclusivity, Property, Rect, Subelement};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subview {
    pub alpha: f64,
    pub tag: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct View {
    pub alpha: f64,
    pub x: f64,
    pub label: String,
    pub frame: Rect,
    pub subview: Subview,
    pub log: Vec<String>,
}

pub fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

pub fn alpha() -> Property<View, f64> {
    Property::new("alpha", |v: &View| v.alpha, |v: &mut View, a| v.alpha = a)
}

pub fn x() -> Property<View, f64> {
    Property::new("x", |v: &View| v.x, |v: &mut View, x| v.x = x)
}

pub fn label() -> Property<View, String> {
    Property::new(
        "label",
        |v: &View| v.label.clone(),
        |v: &mut View, l| v.label = l,
    )
}

pub fn frame() -> Property<View, Rect> {
    Property::new("frame", |v: &View| v.frame, |v: &mut View, f| v.frame = f)
}

pub fn subview() -> Subelement<View, Subview> {
    Subelement::new(
        "subview",
        |v: &View| &v.subview,
        |v: &mut View| &mut v.subview,
    )
}

pub fn subview_alpha() -> Property<Subview, f64> {
    Property::new("alpha", |s: &Subview| s.alpha, |s: &mut Subview, a| s.alpha = a)
}

pub fn subview_tag() -> Property<Subview, i32> {
    Property::new("tag", |s: &Subview| s.tag, |s: &mut Subview, t| s.tag = t)
}

/// Appends `entry` to the view's log; for execution blocks.
pub fn logger(entry: &'static str) -> impl Fn(&mut View) + 'static {
    move |v: &mut View| v.log.push(entry.to_string())
}

/// One call a driver made.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Execute(f64, Inclusivity, f64),
    Render(f64),
    Complete,
}

pub const INCL: Inclusivity = Inclusivity::Inclusive;
pub const EXCL: Inclusivity = Inclusivity::Exclusive;

/// Records every call a driver makes, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    /// Returns and clears the calls recorded so far.
    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl DrivenAnimation for Recorder {
    fn execute_blocks(&mut self, from: f64, inclusivity: Inclusivity, to: f64) {
        self.calls.push(Call::Execute(from, inclusivity, to));
    }

    fn render_frame(&mut self, relative_timestamp: f64) {
        self.calls.push(Call::Render(relative_timestamp));
    }

    fn mark_animation_as_complete(&mut self) {
        self.calls.push(Call::Complete);
    }
}
