//! Touch and gesture input types
//!
//! Raw touches arrive from the platform layer as [`Touch`] values; gesture
//! recognizers turn them into [`PanSample`]s and taps.

use std::sync::atomic::{AtomicU64, Ordering};

use sheetkit_core::{Point, Vec2};

// ============================================================================
// Touches
// ============================================================================

/// Touch phase reported by the platform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// Touch began
    Began,
    /// Touch moved
    Moved,
    /// Touch ended
    Ended,
    /// Touch cancelled
    Cancelled,
}

/// A single touch point
#[derive(Clone, Copy, Debug)]
pub struct Touch {
    /// Unique identifier for this touch
    pub id: u64,
    /// Position in container coordinates (logical points)
    pub position: Point,
    /// Touch phase
    pub phase: TouchPhase,
    /// Event timestamp in milliseconds
    pub time_ms: u64,
}

impl Touch {
    /// Create a new touch event
    pub fn new(id: u64, x: f32, y: f32, phase: TouchPhase, time_ms: u64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            phase,
            time_ms,
        }
    }
}

// ============================================================================
// Recognizer identity
// ============================================================================

static NEXT_RECOGNIZER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a gesture recognizer
///
/// Used to express failure requirements between recognizers (the sheet's pan
/// must wait for an embedded scroll view's own pan to fail).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(u64);

impl RecognizerId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        Self(NEXT_RECOGNIZER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

// ============================================================================
// Pan gestures
// ============================================================================

/// Gesture recognizer phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Touches are down but the gesture has not been recognized yet
    #[default]
    Possible,
    /// Gesture recognized
    Began,
    /// Gesture moved
    Changed,
    /// Gesture finished normally
    Ended,
    /// Gesture cancelled by the system
    Cancelled,
    /// Gesture failed to be recognized
    Failed,
}

impl GesturePhase {
    /// Phases that carry live movement
    pub fn is_active(&self) -> bool {
        matches!(self, GesturePhase::Began | GesturePhase::Changed)
    }

    /// Phases that end the gesture
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed
        )
    }
}

/// Dominant direction of a pan, classified from its velocity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
    /// No dominant direction (zero velocity, or a tie on the horizontal axis)
    Neutral,
}

impl PanDirection {
    /// Classify a velocity vector
    ///
    /// Vertical wins only when `|v.y| > |v.x|`; ties are treated as horizontal.
    pub fn from_velocity(velocity: Vec2) -> Self {
        let vertical = velocity.y.abs() > velocity.x.abs();
        if vertical {
            if velocity.y < 0.0 {
                PanDirection::Up
            } else {
                PanDirection::Down
            }
        } else if velocity.x > 0.0 {
            PanDirection::Right
        } else if velocity.x < 0.0 {
            PanDirection::Left
        } else {
            PanDirection::Neutral
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, PanDirection::Up | PanDirection::Down)
    }

    pub fn is_horizontal(&self) -> bool {
        !self.is_vertical()
    }
}

/// One update from a pan recognizer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSample {
    /// Recognizer phase
    pub phase: GesturePhase,
    /// Translation since the gesture started
    pub translation: Vec2,
    /// Velocity in points per second
    pub velocity: Vec2,
}

impl PanSample {
    pub fn new(phase: GesturePhase, translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase,
            translation,
            velocity,
        }
    }

    /// Vertical-only sample, the common case for sheet drags
    pub fn vertical(phase: GesturePhase, translation_y: f32, velocity_y: f32) -> Self {
        Self::new(
            phase,
            Vec2::new(0.0, translation_y),
            Vec2::new(0.0, velocity_y),
        )
    }

    pub fn direction(&self) -> PanDirection {
        PanDirection::from_velocity(self.velocity)
    }
}
