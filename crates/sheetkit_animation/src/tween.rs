//! Time-based tweens
//!
//! A [`Tween`] moves a value from a start to an end over a fixed duration
//! along an [`Easing`] curve. The sheet uses tweens for frame relayouts
//! (content-size and keyboard changes) and for the dimming fade that runs
//! alongside present/dismiss transitions.

use crate::easing::Easing;
use crate::values::Interpolate;

/// A fixed-duration eased interpolation
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    /// Create a tween. A non-positive duration completes on the first tick.
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds and return the current value
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Current value without advancing time
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.easing.apply(self.progress()))
    }

    /// Linear time progress in 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}
