//! Planar geometry value types, interpolated component-wise.

use serde::{Deserialize, Serialize};

use super::functions::lerp;
use super::Animatable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

impl Animatable for Point {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        Point::new(
            lerp(initial.x, final_value.x, progress),
            lerp(initial.y, final_value.y, progress),
        )
    }
}

impl Animatable for Size {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        Size::new(
            lerp(initial.width, final_value.width, progress),
            lerp(initial.height, final_value.height, progress),
        )
    }
}

impl Animatable for Rect {
    fn value_between(initial: &Self, final_value: &Self, progress: f64) -> Self {
        Rect {
            origin: Point::value_between(&initial.origin, &final_value.origin, progress),
            size: Size::value_between(&initial.size, &final_value.size, progress),
        }
    }
}
