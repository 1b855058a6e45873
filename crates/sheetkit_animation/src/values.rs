//! Animatable value types
//!
//! Linear interpolation for the values a sheet animates: scalars (opacity,
//! translation) and rectangles (frames).

use sheetkit_core::{Point, Rect, Size};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` is not clamped, so spring overshoot carries through.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Rect Implementation
// ============================================================================

impl Interpolate for Rect {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rect::from_origin_size(
            Point::new(
                self.origin.x.lerp(&other.origin.x, t),
                self.origin.y.lerp(&other.origin.y, t),
            ),
            Size::new(
                self.size.width.lerp(&other.size.width, t),
                self.size.height.lerp(&other.size.height, t),
            ),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.origin.x.approx_eq(&other.origin.x, epsilon)
            && self.origin.y.approx_eq(&other.origin.y, epsilon)
            && self.size.width.approx_eq(&other.size.width, epsilon)
            && self.size.height.approx_eq(&other.size.height, epsilon)
    }
}
