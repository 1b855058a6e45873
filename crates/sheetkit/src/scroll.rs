//! Tracked scroll collaborator
//!
//! A sheet may embed a scrollable view. Its edge state decides whether a drag
//! moves the sheet or scrolls the content, and its content size drives the
//! sheet's height.

use sheetkit_core::{EdgeInsets, Size};
use sheetkit_platform::{RecognizerId, Subscription};

/// Read-only snapshot of a scroll view's vertical state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical content offset
    pub offset_y: f32,
    /// Height of the scrollable content
    pub content_height: f32,
    /// Adjusted content insets (safe area included)
    pub insets: EdgeInsets,
    /// Height of the scroll view's own bounds
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn new(offset_y: f32, content_height: f32, insets: EdgeInsets, viewport_height: f32) -> Self {
        Self {
            offset_y,
            content_height,
            insets,
            viewport_height,
        }
    }

    /// Offset at which the last row of content is fully visible
    pub fn vertical_offset_for_bottom(&self) -> f32 {
        self.content_height + self.insets.bottom - self.viewport_height
    }

    /// Scrolled to (or pulled past) the top. Compares rounded values.
    pub fn is_at_top(&self) -> bool {
        self.offset_y.round() <= (-self.insets.top).round()
    }

    /// Scrolled to (or pushed past) the bottom. Compares rounded values.
    pub fn is_at_bottom(&self) -> bool {
        self.offset_y.round() >= self.vertical_offset_for_bottom().round()
    }

    /// Height needed to show all content with its insets
    pub fn fitted_height(&self) -> f32 {
        self.content_height + self.insets.vertical_total()
    }

    pub fn with_offset(mut self, offset_y: f32) -> Self {
        self.offset_y = offset_y;
        self
    }
}

/// Scrollable content embedded in a sheet
///
/// Implemented by the host toolkit's scroll view. All methods are queried on
/// demand, so implementations report live state.
pub trait ScrollCollaborator {
    /// Current vertical metrics
    fn metrics(&self) -> ScrollMetrics;

    /// Whether the user's finger is currently down on the scroll view
    fn is_tracking(&self) -> bool;

    /// The scroll view's own pan recognizer
    fn pan_recognizer(&self) -> RecognizerId;

    /// Content-size change notifications, if the scroll view publishes them
    fn subscribe_content_size(&self) -> Option<Subscription<Size>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(offset_y: f32) -> ScrollMetrics {
        ScrollMetrics::new(offset_y, 1000.0, EdgeInsets::vertical(20.0, 34.0), 400.0)
    }

    #[test]
    fn test_top_edge_uses_adjusted_inset() {
        assert!(metrics(-20.0).is_at_top());
        assert!(metrics(-60.0).is_at_top());
        assert!(metrics(-19.6).is_at_top());
        assert!(!metrics(-19.4).is_at_top());
        assert!(!metrics(100.0).is_at_top());
    }

    #[test]
    fn test_bottom_edge_uses_adjusted_inset() {
        let m = metrics(0.0);
        assert_eq!(m.vertical_offset_for_bottom(), 634.0);
        assert!(m.with_offset(634.0).is_at_bottom());
        assert!(m.with_offset(633.6).is_at_bottom());
        assert!(m.with_offset(700.0).is_at_bottom());
        assert!(!m.with_offset(600.0).is_at_bottom());
    }

    #[test]
    fn test_short_content_is_at_both_edges() {
        let m = ScrollMetrics::new(0.0, 100.0, EdgeInsets::ZERO, 400.0);
        assert!(m.is_at_top());
        assert!(m.is_at_bottom());
    }

    #[test]
    fn test_fitted_height() {
        assert_eq!(metrics(0.0).fitted_height(), 1054.0);
    }
}
