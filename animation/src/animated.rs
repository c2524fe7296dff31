use std::time::{Duration, Instant};

use log::debug;

use crate::{Interpolatable, Interpolation};

/// `Animated` represents a value that may be animated over time.
///
/// There is no internal clock. All operations that depend on time take the current instant, so the
/// owner decides when the animation proceeds (usually once per frame).
///
/// There is only one animation at a time. A new animation or an immediate value replaces the
/// running animation; the new animation starts at the value the running one had reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Animated<T> {
    state: AnimationState<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationState<T> {
    Idle(T),
    Animating {
        from: T,
        to: T,
        start: Instant,
        duration: Duration,
        interpolation: Interpolation,
    },
}

impl<T: Default + Interpolatable> Default for Animated<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Interpolatable> Animated<T> {
    pub fn new(value: T) -> Self {
        Self {
            state: AnimationState::Idle(value),
        }
    }

    pub fn state(&self) -> &AnimationState<T> {
        &self.state
    }

    /// Animate from the current value to `target`, starting at `now`.
    ///
    /// A zero duration sets the target immediately.
    pub fn animate(
        &mut self,
        target: T,
        now: Instant,
        duration: Duration,
        interpolation: Interpolation,
    ) {
        if self.is_animating() {
            debug!("Replacing running animation");
        }

        if duration.is_zero() {
            self.state = AnimationState::Idle(target);
            return;
        }

        let from = self.value(now);
        self.state = AnimationState::Animating {
            from,
            to: target,
            start: now,
            duration,
            interpolation,
        };
    }

    /// Stop the animation, if any, and set the current value.
    pub fn set_immediately(&mut self, value: T) {
        self.state = AnimationState::Idle(value);
    }

    /// Jump to the final value and stop animating.
    pub fn finish(&mut self) {
        if let AnimationState::Animating { to, .. } = &self.state {
            self.state = AnimationState::Idle(to.clone());
        }
    }

    /// The value at `now`.
    ///
    /// This does not change the state. Instants before the animation's start return its starting
    /// value.
    pub fn value(&self, now: Instant) -> T {
        match &self.state {
            AnimationState::Idle(value) => value.clone(),
            AnimationState::Animating {
                from,
                to,
                start,
                duration,
                interpolation,
            } => {
                let t = progress(*start, *duration, now);
                if t >= 1.0 {
                    return to.clone();
                }
                T::interpolate(from, to, interpolation.ease(t))
            }
        }
    }

    /// Proceed the animation to `now` and return the current value.
    ///
    /// When the animation has run through, the state becomes idle with the target value.
    pub fn tick(&mut self, now: Instant) -> T {
        if let AnimationState::Animating {
            to,
            start,
            duration,
            ..
        } = &self.state
        {
            if progress(*start, *duration, now) >= 1.0 {
                self.state = AnimationState::Idle(to.clone());
            }
        }
        self.value(now)
    }

    /// The value after the running animation ended, or the current value when idle.
    pub fn final_value(&self) -> &T {
        match &self.state {
            AnimationState::Idle(value) => value,
            AnimationState::Animating { to, .. } => to,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating { .. })
    }
}

fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    let elapsed = now.saturating_duration_since(start);
    // `t` may be NaN if duration is zero.
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    if t.is_finite() { t } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use approx::assert_relative_eq;

    use super::{Animated, AnimationState};
    use crate::Interpolation;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn idle_value_does_not_depend_on_time() {
        let animated = Animated::new(3.0);
        let now = Instant::now();
        assert_eq!(animated.value(now), 3.0);
        assert_eq!(animated.value(now + SECOND * 10), 3.0);
        assert!(!animated.is_animating());
    }

    #[test]
    fn linear_animation_interpolates_between_start_and_end() {
        let start = Instant::now();
        let mut animated = Animated::new(0.0);
        animated.animate(10.0, start, SECOND, Interpolation::Linear);

        assert_eq!(animated.value(start), 0.0);
        assert_relative_eq!(animated.value(start + SECOND / 4), 2.5, epsilon = 1e-9);
        assert_eq!(animated.value(start + SECOND), 10.0);
        assert_eq!(*animated.final_value(), 10.0);
    }

    #[test]
    fn tick_after_the_end_returns_to_idle() {
        let start = Instant::now();
        let mut animated = Animated::new(0.0);
        animated.animate(1.0, start, SECOND, Interpolation::CubicInOut);

        assert!(animated.is_animating());
        animated.tick(start + SECOND / 2);
        assert!(animated.is_animating());

        assert_eq!(animated.tick(start + SECOND * 2), 1.0);
        assert_eq!(animated.state(), &AnimationState::Idle(1.0));
    }

    #[test]
    fn zero_duration_sets_final_value() {
        let now = Instant::now();
        let mut animated = Animated::new(0.0);
        animated.animate(10.0, now, Duration::ZERO, Interpolation::Linear);

        assert!(!animated.is_animating());
        assert_eq!(animated.value(now), 10.0);
    }

    #[test]
    fn new_animation_replaces_running_one_from_current_value() {
        let start = Instant::now();
        let mut animated = Animated::new(0.0);
        animated.animate(10.0, start, SECOND, Interpolation::Linear);

        let halfway = start + SECOND / 2;
        animated.animate(-10.0, halfway, SECOND, Interpolation::Linear);

        match animated.state() {
            AnimationState::Animating { from, to, start, .. } => {
                assert_relative_eq!(*from, 5.0, epsilon = 1e-9);
                assert_eq!(*to, -10.0);
                assert_eq!(*start, halfway);
            }
            state => panic!("expected a running animation, got {state:?}"),
        }
        assert_eq!(animated.value(halfway + SECOND), -10.0);
    }

    #[test]
    fn set_immediately_cancels_animation() {
        let start = Instant::now();
        let mut animated = Animated::new(0.0);
        animated.animate(10.0, start, SECOND, Interpolation::Linear);
        animated.set_immediately(4.0);

        assert!(!animated.is_animating());
        assert_eq!(animated.value(start + SECOND / 2), 4.0);
    }

    #[test]
    fn finish_jumps_to_target() {
        let start = Instant::now();
        let mut animated = Animated::new(0.0);
        animated.animate(8.0, start, SECOND, Interpolation::QuadraticOut);
        animated.finish();

        assert_eq!(animated.state(), &AnimationState::Idle(8.0));
    }

    #[test]
    fn instants_before_start_return_the_starting_value() {
        let now = Instant::now();
        let mut animated = Animated::new(2.0);
        animated.animate(4.0, now + SECOND, SECOND, Interpolation::Linear);
        assert_eq!(animated.value(now), 2.0);
    }
}
