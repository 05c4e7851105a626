//! Kinetic Core Math
//!
//! Foundational math for the Kinetic animation engine:
//!
//! - **Interpolatable values**: type-tagged fixed-width numeric vectors
//!   with componentwise linear interpolation
//! - **Easing**: the full named cubic-bezier curve family plus a
//!   WebKit-style unit-bezier solver
//! - **Springs**: RK4-integrated damped harmonic oscillators
//! - **Geometry**: points, sizes, rects, colors, edge insets, and 4x4
//!   transform matrices with decompose/recompose

pub mod easing;
pub mod geometry;
pub mod spring;
pub mod value;

pub use easing::Easing;
pub use geometry::{Color, EdgeInsets, Matrix4x4, Point, Rect, Size, Vector3};
pub use spring::Spring;
pub use value::{Value, ValueKind};
