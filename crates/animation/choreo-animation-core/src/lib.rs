//! Choreo Animation Core
//!
//! Declarative keyframe animation for arbitrary element types: animations are
//! built as trees of keyframe series, discrete blocks and nested children,
//! then performed on an element under a driver that maps elapsed time onto
//! the tree. Hosts supply the element and the ticks; the engine never owns a
//! timer or a thread.

pub mod animation;
pub mod config;
pub mod curve;
pub mod driver;
pub mod error;
pub mod executor;
pub mod group;
pub mod ids;
pub mod instance;
pub mod interp;
pub mod optimizer;
pub mod property;
pub mod timing;

// Re-exports for hosts
pub use animation::{Animation, FrameContext, PerformOptions};
pub use config::Config;
pub use curve::{AnimationCurve, CubicBezierCurve, Curve, SpringCurve};
pub use driver::{DrivenAnimation, Driver, TimelineDriver};
pub use error::AnimationError;
pub use executor::Inclusivity;
pub use group::{AnimationGroup, GroupContainer};
pub use ids::InstanceId;
pub use instance::{AnimationInstance, AnimationStatus, CancelationBehavior};
pub use interp::affine::AffineTransform;
pub use interp::color::{Color, ColorSpace};
pub use interp::geometry::{Point, Rect, Size};
pub use interp::transform3d::Transform3D;
pub use interp::{Animatable, AnimatableOptional};
pub use optimizer::optimize;
pub use property::{Property, PropertyPath, Subelement};
pub use timing::{RepeatStyle, Timing};

pub type Result<T> = std::result::Result<T, AnimationError>;
