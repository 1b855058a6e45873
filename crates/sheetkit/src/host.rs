//! Host collaborator
//!
//! The toolkit embedding the sheet implements [`SheetHost`]. It owns the real
//! view hierarchy; the presentation only asks it questions and requests
//! dismissal. Every query may come back empty while views are being torn
//! down, and the presentation skips the work in that case.

use std::rc::Rc;

use sheetkit_core::{Color, Rect, Size};

use crate::scroll::ScrollCollaborator;

/// What the presentation needs to know about the presented content
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentedContent {
    /// Size the content asks for
    pub preferred_size: Size,
    /// Bar height when the content is a navigation host
    pub navigation_bar_height: Option<f32>,
    /// Background color, copied onto the backing surface
    pub background: Color,
}

impl PresentedContent {
    pub fn new(preferred_size: Size) -> Self {
        Self {
            preferred_size,
            navigation_bar_height: None,
            background: Color::WHITE,
        }
    }

    pub fn navigation_bar(mut self, height: f32) -> Self {
        self.navigation_bar_height = Some(height);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

/// The toolkit side of a sheet presentation
pub trait SheetHost {
    /// Bounds of the container the sheet is laid out in
    fn container_bounds(&self) -> Option<Rect>;

    /// The presented content, if its surface exists
    fn presented_content(&self) -> Option<PresentedContent>;

    /// Size of the surface the sheet is presented over
    fn presenting_size(&self) -> Option<Size>;

    /// Overwrite the presented content's preferred size
    fn set_preferred_content_size(&mut self, size: Size);

    /// Dismiss the presented content
    ///
    /// An accepted dismissal is followed by `will_dismiss`. A host that keeps
    /// the sheet on screen calls `SheetPresentation::dismiss_declined` so a
    /// dragged sheet returns to rest.
    fn dismiss(&mut self, animated: bool);

    /// First subview of the presented content, when it is scrollable
    fn first_content_scroll(&self) -> Option<Rc<dyn ScrollCollaborator>> {
        None
    }

    /// First subview of a navigation host's top content, when it is scrollable
    fn navigation_top_scroll(&self) -> Option<Rc<dyn ScrollCollaborator>> {
        None
    }
}

/// Present or dismiss transition the lifecycle callbacks run alongside
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionContext {
    /// Animate alongside the transition; false applies end states at once
    pub animated: bool,
    /// Transition duration; the configured default when absent
    pub duration: Option<f32>,
}

impl TransitionContext {
    pub fn animated() -> Self {
        Self {
            animated: true,
            duration: None,
        }
    }

    pub fn immediate() -> Self {
        Self {
            animated: false,
            duration: None,
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }
}
