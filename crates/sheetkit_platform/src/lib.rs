//! Sheetkit Platform Layer
//!
//! Platform-facing input types for the sheet presentation crates.
//!
//! # Architecture
//!
//! - [`Touch`] - raw touches delivered by the platform shell
//! - [`PanRecognizer`] / [`TapRecognizer`] - turn touches into gestures
//! - [`PanSample`] - one pan update: phase, translation, velocity
//! - [`KeyboardNotification`] - software keyboard transitions
//! - [`EventSource`] / [`Subscription`] - scoped, single-threaded event delivery
//!
//! # Example
//!
//! ```rust
//! use sheetkit_platform::{GesturePhase, PanRecognizer, Touch, TouchPhase};
//!
//! let mut pan = PanRecognizer::new();
//! pan.process(&Touch::new(1, 0.0, 0.0, TouchPhase::Began, 0));
//! let sample = pan
//!     .process(&Touch::new(1, 0.0, 40.0, TouchPhase::Moved, 16))
//!     .unwrap();
//! assert_eq!(sample.phase, GesturePhase::Began);
//! ```

mod input;
mod keyboard;
mod recognizer;
mod subscription;

// Re-export all public types
pub use input::{GesturePhase, PanDirection, PanSample, RecognizerId, Touch, TouchPhase};
pub use keyboard::{KeyboardEventKind, KeyboardNotification, KeyboardTiming};
pub use recognizer::{PanRecognizer, TapRecognizer, VelocityTracker, PAN_SLOP, TAP_SLOP};
pub use subscription::{EventSource, Subscription};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::input::{GesturePhase, PanDirection, PanSample, RecognizerId, Touch, TouchPhase};
    pub use crate::keyboard::{KeyboardEventKind, KeyboardNotification};
    pub use crate::recognizer::{PanRecognizer, TapRecognizer};
    pub use crate::subscription::{EventSource, Subscription};
}
