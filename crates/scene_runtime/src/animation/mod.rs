//! Property animation: easing curves, value interpolation, animated cells
//!
//! An [`AnimatedCell`](cell::AnimatedCell) is the smallest animatable unit
//! in the runtime. It holds one property's value, and when asked to animate
//! it blends from the value it currently shows toward a target over a fixed
//! duration. Cells only move during the owning node's apply step, so readers
//! never observe a half-written value.

pub mod cell;
pub mod easing;
pub mod interpolate;

pub use cell::{AnimatedCell, CellEvents};
pub use easing::Easing;
pub use interpolate::Interpolate;
