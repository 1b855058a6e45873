//! Sheet drag vs. scroll disambiguation
//!
//! When a sheet embeds a scroll view, both want the same vertical pans. The
//! sheet only takes a pan that starts on a scroll edge and moves away from the
//! content: down from the top, or up from the bottom.

use sheetkit_platform::{PanDirection, RecognizerId};

use crate::scroll::{ScrollCollaborator, ScrollMetrics};

/// Scroll state relevant to the begin decision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGate {
    /// Whether the finger is down on the scroll view
    pub tracking: bool,
    pub metrics: ScrollMetrics,
}

impl ScrollGate {
    /// Snapshot a live collaborator
    pub fn of(scroll: &dyn ScrollCollaborator) -> Self {
        Self {
            tracking: scroll.is_tracking(),
            metrics: scroll.metrics(),
        }
    }
}

/// Decide whether the sheet's drag gesture may begin
///
/// Without a tracked scroll view, or when the touch is outside it, the sheet
/// always drags. Over the scroll view, only edge pans leading away from the
/// content are taken; horizontal and neutral pans stay with the scroll view.
pub fn should_begin_sheet_drag(direction: PanDirection, scroll: Option<ScrollGate>) -> bool {
    let Some(gate) = scroll else {
        return true;
    };
    if !gate.tracking {
        return true;
    }

    match direction {
        PanDirection::Down => gate.metrics.is_at_top(),
        PanDirection::Up => gate.metrics.is_at_bottom(),
        PanDirection::Left | PanDirection::Right | PanDirection::Neutral => false,
    }
}

/// Whether the sheet's drag must wait for `other` to fail
///
/// True only for the tracked scroll view's own pan recognizer.
pub fn should_require_failure_of(other: RecognizerId, scroll_pan: Option<RecognizerId>) -> bool {
    scroll_pan == Some(other)
}
