//! Sheetkit Core Primitives
//!
//! Shared value types for the sheet presentation crates:
//!
//! - **Geometry**: points, sizes, rectangles, vectors, edge insets
//! - **Style**: affine transforms, colors, per-corner radii
//!
//! # Example
//!
//! ```rust
//! use sheetkit_core::{Affine2D, Rect};
//!
//! let container = Rect::new(0.0, 0.0, 390.0, 844.0);
//! let sheet = container.with_y(400.0).with_height(444.0);
//! assert_eq!(sheet.max_y(), container.max_y());
//!
//! let dragged = Affine2D::vertical(24.0);
//! assert!(!dragged.is_identity());
//! ```

pub mod geometry;
pub mod style;

pub use geometry::{EdgeInsets, Point, Rect, Size, Vec2};
pub use style::{Affine2D, Color, CornerRadius};
