//! Animated property cell
//!
//! The smallest unit of the property engine: one value plus its animation
//! state. A cell's current value changes only inside [`AnimatedCell::advance`],
//! which the owning node calls during its apply step, so every reader within
//! a frame observes the same value.

use bitflags::bitflags;

use super::easing::Easing;
use super::interpolate::Interpolate;

bitflags! {
    /// Notifications produced by one advance of a cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellEvents: u8 {
        /// The animation began moving this frame
        const STARTED = 1;
        /// The animation reached its target this frame
        const COMPLETED = 1 << 1;
    }
}

/// One property's value and animation state
///
/// When idle, reading the value is a plain field access; the animation
/// machinery adds no cost until an animation is requested.
#[derive(Debug, Clone)]
pub struct AnimatedCell<T: Interpolate> {
    start: T,
    current: T,
    target: T,
    elapsed: f32,
    duration: f32,
    easing: Easing,
    animating: bool,
    start_pending: bool,
}

impl<T: Interpolate> AnimatedCell<T> {
    /// Create a cell holding `value`, not animating
    pub fn new(value: T) -> Self {
        Self {
            start: value.clone(),
            current: value.clone(),
            target: value,
            elapsed: 0.0,
            duration: 0.0,
            easing: Easing::default(),
            animating: false,
            start_pending: false,
        }
    }

    /// The value the cell currently shows
    pub fn value(&self) -> &T {
        &self.current
    }

    /// The value the cell is moving toward (the current value when idle)
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Whether an animation is in flight
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Normalized progress of the current animation, `1.0` when idle
    pub fn progress(&self) -> f32 {
        if self.animating && self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Assign a value immediately, discarding any in-flight animation
    ///
    /// No notification is produced; an abandoned animation never completes.
    pub fn set_immediate(&mut self, value: T) {
        self.start = value.clone();
        self.current = value.clone();
        self.target = value;
        self.elapsed = 0.0;
        self.duration = 0.0;
        self.animating = false;
        self.start_pending = false;
    }

    /// Begin animating toward `target` over `duration` seconds
    ///
    /// The blend starts from the value the cell currently shows. Re-animating
    /// a cell mid-flight therefore continues from the interpolated value, not
    /// the original start, so the displayed value never snaps.
    ///
    /// `duration` must be positive; callers validate before reaching the cell.
    pub fn animate(&mut self, target: T, duration: f32, easing: Easing) {
        debug_assert!(duration > 0.0, "animate requires a positive duration");
        self.start = self.current.clone();
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration;
        self.easing = easing;
        self.animating = true;
        self.start_pending = true;
    }

    /// Advance the animation by `delta_time` seconds
    ///
    /// Invoked only from the owning node's apply step. Returns the
    /// notifications produced by this advance; `COMPLETED` is reported
    /// exactly once per animation, on the advance that reaches the target.
    pub fn advance(&mut self, delta_time: f32) -> CellEvents {
        if !self.animating {
            return CellEvents::empty();
        }

        let mut events = CellEvents::empty();
        if self.start_pending {
            events |= CellEvents::STARTED;
            self.start_pending = false;
        }

        self.elapsed = (self.elapsed + delta_time).min(self.duration);
        if self.elapsed >= self.duration {
            // Land exactly on the target, never on a blended approximation.
            self.current = self.target.clone();
            self.start = self.target.clone();
            self.animating = false;
            events |= CellEvents::COMPLETED;
        } else {
            let t = self.easing.apply(self.elapsed / self.duration);
            self.current = self.start.interpolate(&self.target, t);
        }

        events
    }

    /// Abandon the current animation, freezing the displayed value
    ///
    /// Elapsed progress is discarded and no completion is ever reported for
    /// the abandoned animation. Used when the owning node deactivates.
    pub fn cancel(&mut self) {
        if self.animating {
            self.start = self.current.clone();
            self.target = self.current.clone();
            self.elapsed = 0.0;
            self.duration = 0.0;
            self.animating = false;
            self.start_pending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_idle_cell_reports_nothing() {
        let mut cell = AnimatedCell::new(1.0_f32);
        assert_eq!(cell.advance(0.5), CellEvents::empty());
        assert_eq!(*cell.value(), 1.0);
    }

    #[test]
    fn test_linear_animation_midpoint_and_completion() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(10.0, 2.0, Easing::Linear);

        let events = cell.advance(1.0);
        assert!(events.contains(CellEvents::STARTED));
        assert_relative_eq!(*cell.value(), 5.0);

        let events = cell.advance(1.0);
        assert!(events.contains(CellEvents::COMPLETED));
        assert_eq!(*cell.value(), 10.0);
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(4.0, 1.0, Easing::Linear);

        let mut completions = 0;
        // Straddle the boundary with many small steps past the end.
        for _ in 0..8 {
            if cell.advance(0.3).contains(CellEvents::COMPLETED) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(*cell.value(), 4.0);
    }

    #[test]
    fn test_overshoot_lands_exactly_on_target() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(7.0, 1.0, Easing::EaseInOut);
        cell.advance(100.0);
        assert_eq!(*cell.value(), 7.0);
    }

    #[test]
    fn test_zero_advance_shows_start_value() {
        let mut cell = AnimatedCell::new(3.0_f32);
        cell.animate(9.0, 1.0, Easing::Linear);
        cell.advance(0.0);
        assert_eq!(*cell.value(), 3.0);
    }

    #[test]
    fn test_restart_continues_from_interpolated_value() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(10.0, 2.0, Easing::Linear);
        cell.advance(1.0);
        assert_relative_eq!(*cell.value(), 5.0);

        // Retarget mid-flight: the new blend starts at 5.0, not 0.0.
        cell.animate(0.0, 1.0, Easing::Linear);
        cell.advance(0.5);
        assert_relative_eq!(*cell.value(), 2.5);
    }

    #[test]
    fn test_cancel_freezes_value_without_completion() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(10.0, 2.0, Easing::Linear);
        cell.advance(0.5);
        assert_relative_eq!(*cell.value(), 2.5);

        cell.cancel();
        assert!(!cell.is_animating());
        assert_relative_eq!(*cell.value(), 2.5);

        // A later advance must not resurrect the animation.
        assert_eq!(cell.advance(5.0), CellEvents::empty());
        assert_relative_eq!(*cell.value(), 2.5);
    }

    #[test]
    fn test_set_immediate_discards_animation() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(10.0, 2.0, Easing::Linear);
        cell.set_immediate(42.0);
        assert!(!cell.is_animating());
        assert_eq!(cell.advance(1.0), CellEvents::empty());
        assert_eq!(*cell.value(), 42.0);
    }

    #[test]
    fn test_started_reported_on_first_advance_only() {
        let mut cell = AnimatedCell::new(0.0_f32);
        cell.animate(10.0, 2.0, Easing::Linear);
        assert!(cell.advance(0.1).contains(CellEvents::STARTED));
        assert!(!cell.advance(0.1).contains(CellEvents::STARTED));
    }
}
