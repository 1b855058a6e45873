//! Gesture recognizers
//!
//! Converts raw [`Touch`] streams into pan samples and taps. Recognizers track
//! a single touch; additional touches are ignored until the tracked one lifts.
//!
//! ```text
//!  Touch::Began ──► Possible ──(moved > slop, should_begin)──► Began ──► Changed ... ──► Ended
//!                      │                     │                                  └──► Cancelled
//!                      │                     └──(should_begin == false)──► Failed
//!                      └──(lifted before slop)──► no gesture
//! ```

use sheetkit_core::{Point, Vec2};

use crate::input::{GesturePhase, PanSample, RecognizerId, Touch, TouchPhase};

/// Movement (in points) a touch must travel before a pan is recognized
pub const PAN_SLOP: f32 = 10.0;

/// Movement (in points) after which a touch no longer counts as a tap
pub const TAP_SLOP: f32 = 10.0;

// ============================================================================
// Velocity tracking
// ============================================================================

/// Ring buffer size for velocity tracking samples
const HISTORY_SIZE: usize = 20;

/// Only use samples within the last 100ms for velocity calculation
const HORIZON_MS: u64 = 100;

/// Estimates pointer velocity from recent positions
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<(u64, Point)>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record a position at the given time
    pub fn add(&mut self, time_ms: u64, position: Point) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some((time_ms, position));
    }

    /// Velocity in points/second across the samples inside the horizon
    ///
    /// Returns zero with fewer than two samples or no elapsed time.
    pub fn velocity(&self) -> Vec2 {
        let Some((newest_time, newest_pos)) = self.samples[self.index] else {
            return Vec2::ZERO;
        };

        let mut oldest = (newest_time, newest_pos);
        let mut cursor = self.index;
        for _ in 1..HISTORY_SIZE {
            cursor = if cursor == 0 {
                HISTORY_SIZE - 1
            } else {
                cursor - 1
            };
            match self.samples[cursor] {
                Some((time, pos)) if newest_time.saturating_sub(time) <= HORIZON_MS => {
                    oldest = (time, pos);
                }
                _ => break,
            }
        }

        let elapsed_ms = newest_time.saturating_sub(oldest.0);
        if elapsed_ms == 0 {
            return Vec2::ZERO;
        }
        newest_pos
            .delta_from(oldest.1)
            .scaled(1000.0 / elapsed_ms as f32)
    }
}

// ============================================================================
// Pan recognizer
// ============================================================================

/// Recognizes single-touch pans and emits [`PanSample`]s
#[derive(Debug)]
pub struct PanRecognizer {
    id: RecognizerId,
    phase: GesturePhase,
    touch_id: Option<u64>,
    start: Point,
    last: Point,
    tracker: VelocityTracker,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PanRecognizer {
    pub fn new() -> Self {
        Self::with_id(RecognizerId::next())
    }

    /// Create a recognizer with a pre-allocated id
    pub fn with_id(id: RecognizerId) -> Self {
        Self {
            id,
            phase: GesturePhase::Possible,
            touch_id: None,
            start: Point::ZERO,
            last: Point::ZERO,
            tracker: VelocityTracker::new(),
        }
    }

    pub fn id(&self) -> RecognizerId {
        self.id
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Process a touch, recognizing unconditionally
    pub fn process(&mut self, touch: &Touch) -> Option<PanSample> {
        self.process_with(touch, |_| true)
    }

    /// Process a touch
    ///
    /// `should_begin` is consulted once, when movement first exceeds
    /// [`PAN_SLOP`]. Returning `false` fails the gesture; the remaining touches
    /// of that sequence are swallowed.
    pub fn process_with(
        &mut self,
        touch: &Touch,
        should_begin: impl FnOnce(&PanSample) -> bool,
    ) -> Option<PanSample> {
        match touch.phase {
            TouchPhase::Began => {
                if self.touch_id.is_some() {
                    return None;
                }
                self.touch_id = Some(touch.id);
                self.phase = GesturePhase::Possible;
                self.start = touch.position;
                self.last = touch.position;
                self.tracker.reset();
                self.tracker.add(touch.time_ms, touch.position);
                None
            }
            TouchPhase::Moved => {
                if self.touch_id != Some(touch.id) {
                    return None;
                }
                self.last = touch.position;
                self.tracker.add(touch.time_ms, touch.position);

                match self.phase {
                    GesturePhase::Possible => {
                        if self.translation().length() <= PAN_SLOP {
                            return None;
                        }
                        let candidate = self.sample(GesturePhase::Began);
                        if should_begin(&candidate) {
                            self.phase = GesturePhase::Began;
                            tracing::trace!("pan {:?} began at {:?}", self.id, candidate);
                            Some(candidate)
                        } else {
                            self.phase = GesturePhase::Failed;
                            tracing::trace!("pan {:?} denied by should_begin", self.id);
                            None
                        }
                    }
                    GesturePhase::Began | GesturePhase::Changed => {
                        self.phase = GesturePhase::Changed;
                        Some(self.sample(GesturePhase::Changed))
                    }
                    _ => None,
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.touch_id != Some(touch.id) {
                    return None;
                }
                if touch.phase == TouchPhase::Ended {
                    self.last = touch.position;
                    self.tracker.add(touch.time_ms, touch.position);
                }
                let was_active = self.phase.is_active();
                let terminal = if touch.phase == TouchPhase::Ended {
                    GesturePhase::Ended
                } else {
                    GesturePhase::Cancelled
                };
                let sample = self.sample(terminal);
                self.touch_id = None;
                self.phase = GesturePhase::Possible;
                was_active.then_some(sample)
            }
        }
    }

    fn translation(&self) -> Vec2 {
        self.last.delta_from(self.start)
    }

    fn sample(&self, phase: GesturePhase) -> PanSample {
        PanSample::new(phase, self.translation(), self.tracker.velocity())
    }
}

// ============================================================================
// Tap recognizer
// ============================================================================

/// Recognizes single taps
#[derive(Debug)]
pub struct TapRecognizer {
    id: RecognizerId,
    touch_id: Option<u64>,
    tap_start: Option<Point>,
    tap_in_progress: bool,
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TapRecognizer {
    pub fn new() -> Self {
        Self::with_id(RecognizerId::next())
    }

    pub fn with_id(id: RecognizerId) -> Self {
        Self {
            id,
            touch_id: None,
            tap_start: None,
            tap_in_progress: false,
        }
    }

    pub fn id(&self) -> RecognizerId {
        self.id
    }

    /// Process a touch; returns the tap location when a tap completes
    pub fn process(&mut self, touch: &Touch) -> Option<Point> {
        match touch.phase {
            TouchPhase::Began => {
                if self.touch_id.is_none() {
                    self.touch_id = Some(touch.id);
                    self.tap_in_progress = true;
                    self.tap_start = Some(touch.position);
                }
                None
            }
            TouchPhase::Moved => {
                if self.touch_id == Some(touch.id) {
                    if let Some(start) = self.tap_start {
                        if touch.position.delta_from(start).length() > TAP_SLOP {
                            self.tap_in_progress = false;
                        }
                    }
                }
                None
            }
            TouchPhase::Ended => {
                if self.touch_id != Some(touch.id) {
                    return None;
                }
                let tapped = self.tap_in_progress;
                self.reset();
                tapped.then_some(touch.position)
            }
            TouchPhase::Cancelled => {
                if self.touch_id == Some(touch.id) {
                    self.reset();
                }
                None
            }
        }
    }

    fn reset(&mut self) {
        self.touch_id = None;
        self.tap_start = None;
        self.tap_in_progress = false;
    }
}
