//! Easing curves for timed animations
//!
//! Curves map linear time progress (0..1) to eased progress. Keyboard
//! notifications report their curve as a raw platform value; [`Easing::from_raw`]
//! maps those onto the closest curve here.

/// Easing functions for timed animations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    /// Platform default for view animations
    #[default]
    EaseInOut,
    /// Decelerating curve the software keyboard slides with
    Keyboard,
}

impl Easing {
    /// Map a raw animation-curve value (as delivered with keyboard frame
    /// changes) to an easing curve
    ///
    /// Values 0..=3 are the public ease-in-out / ease-in / ease-out / linear
    /// curves. 7 is the private curve the keyboard itself uses; anything else
    /// falls back to ease-in-out.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Easing::EaseInOut,
            1 => Easing::EaseIn,
            2 => Easing::EaseOut,
            3 => Easing::Linear,
            7 => Easing::Keyboard,
            _ => Easing::EaseInOut,
        }
    }

    /// Apply easing to a value
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::Keyboard => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
        }
    }
}
