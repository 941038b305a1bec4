//! Value interpolation for animatable types
//!
//! Scalar and vector types blend component-wise. Rotations blend with
//! spherical interpolation so angular velocity stays uniform across the
//! arc; a component-wise blend of quaternions would speed up and slow down
//! through the rotation.

use crate::foundation::math::{Quat, Transform, Vec2, Vec3, Vec4};

/// A value that can be blended toward a target
///
/// `t` is eased time in `[0, 1]`. Implementations must return `self` at
/// `t = 0` and the target at `t = 1` exactly.
pub trait Interpolate: Clone {
    /// Blend from `self` toward `target` at eased time `t`
    fn interpolate(&self, target: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        self + (target - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

impl Interpolate for Vec4 {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        // Antipodal pairs have no unique shortest arc; snap to the nearer
        // endpoint instead of panicking.
        match self.try_slerp(target, t, f32::EPSILON) {
            Some(q) => q,
            None => {
                if t < 0.5 {
                    *self
                } else {
                    *target
                }
            }
        }
    }
}

impl Interpolate for Transform {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        Transform {
            position: self.position.interpolate(&target.position, t),
            rotation: self.rotation.interpolate(&target.rotation, t),
            scale: self.scale.interpolate(&target.scale, t),
        }
    }
}
