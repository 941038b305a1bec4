//! Easing functions mapping normalized time to eased time
//!
//! All curves take and return values in `[0, 1]`. Input outside that range
//! is clamped, so a finished animation always reports exactly `1.0`.

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized animation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant velocity from start to target
    #[default]
    Linear,
    /// Cubic acceleration from rest
    EaseIn,
    /// Cubic deceleration into the target
    EaseOut,
    /// Cubic acceleration then deceleration
    EaseInOut,
    /// Hold the start value, snap to the target at completion
    Step,
}

impl Easing {
    /// Map normalized time `t` to eased time
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Easing::Step => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Step,
    ];

    #[test]
    fn test_boundary_exactness() {
        // Every curve must pin t=0 to 0 and t=1 to 1 so animations start at
        // the start value and finish exactly on the target.
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at t=0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at t=1");
        }
    }

    #[test]
    fn test_out_of_range_input_clamps() {
        for easing in ALL {
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(1.5), 1.0);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        assert_relative_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn test_ease_in_starts_slow() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
    }

    #[test]
    fn test_ease_out_starts_fast() {
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn test_ease_in_out_symmetric() {
        let lo = Easing::EaseInOut.apply(0.25);
        let hi = Easing::EaseInOut.apply(0.75);
        assert_relative_eq!(lo + hi, 1.0, epsilon = 1e-6);
        assert_relative_eq!(Easing::EaseInOut.apply(0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_step_holds_until_completion() {
        assert_eq!(Easing::Step.apply(0.999), 0.0);
        assert_eq!(Easing::Step.apply(1.0), 1.0);
    }
}
