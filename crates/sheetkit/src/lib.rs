//! Sheetkit
//!
//! Draggable bottom-sheet presentation core. A sheet slides up over existing
//! content, fits its content's height (and the software keyboard), follows
//! drags with a rubber band, and hands vertical pans to an embedded scroll
//! view until that view reaches an edge.
//!
//! # Architecture
//!
//! - [`geometry`] - target frame, live drag offset, dimming curve (pure)
//! - [`gesture`] - whether a pan belongs to the sheet or its scroll view
//! - [`drag`] - drag state machine with dismiss/snap-back decisions
//! - [`SheetPresentation`] - lifecycle controller tying it all together
//! - [`TransitionRegistry`] - caller-owned, self-pruning delegate map
//!
//! The host toolkit implements [`SheetHost`] (and optionally
//! [`ScrollCollaborator`]) and renders [`SheetSurfaces`] each frame.
//!
//! # Example
//!
//! ```rust
//! use sheetkit::prelude::*;
//!
//! struct Host {
//!     dismissed: bool,
//! }
//!
//! impl SheetHost for Host {
//!     fn container_bounds(&self) -> Option<Rect> {
//!         Some(Rect::new(0.0, 0.0, 390.0, 844.0))
//!     }
//!     fn presented_content(&self) -> Option<PresentedContent> {
//!         Some(PresentedContent::new(Size::new(390.0, 300.0)))
//!     }
//!     fn presenting_size(&self) -> Option<Size> {
//!         None
//!     }
//!     fn set_preferred_content_size(&mut self, _size: Size) {}
//!     fn dismiss(&mut self, _animated: bool) {
//!         self.dismissed = true;
//!     }
//! }
//!
//! let mut sheet = present_sheet(Host { dismissed: false }, PresentationContext::default());
//! sheet.will_present(TransitionContext::immediate());
//! sheet.presentation_did_end(true);
//! assert_eq!(sheet.surfaces().presented.frame.y(), 544.0);
//!
//! sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 40.0, 0.0));
//! sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 200.0, 0.0));
//! assert!(sheet.host().dismissed);
//! ```

pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod presentation;
pub mod registry;
pub mod scroll;
pub mod surfaces;

pub use config::{HandleConfig, SheetConfig, SnapBackConfig};
pub use drag::{DragMachine, DragOutput, DragState, ReleaseDecision, StateTransitions};
pub use error::{Result, SheetError};
pub use geometry::{GeometryPolicy, KeyboardState};
pub use host::{PresentedContent, SheetHost, TransitionContext};
pub use presentation::{
    present_sheet, PresentationContext, SheetPresentation, SheetRecognizers, TouchTarget,
    TransitionPhase,
};
pub use registry::{DismissalAnimation, PresentationId, TransitionDelegate, TransitionRegistry};
pub use scroll::{ScrollCollaborator, ScrollMetrics};
pub use surfaces::SheetSurfaces;

pub use sheetkit_core::{Affine2D, Color, EdgeInsets, Point, Rect, Size, Vec2};
pub use sheetkit_platform::{
    GesturePhase, KeyboardEventKind, KeyboardNotification, PanDirection, PanSample, RecognizerId,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::SheetConfig;
    pub use crate::drag::DragState;
    pub use crate::host::{PresentedContent, SheetHost, TransitionContext};
    pub use crate::presentation::{present_sheet, PresentationContext, SheetPresentation};
    pub use crate::registry::{PresentationId, TransitionRegistry};
    pub use crate::scroll::{ScrollCollaborator, ScrollMetrics};

    pub use sheetkit_core::{Rect, Size};
    pub use sheetkit_platform::{GesturePhase, KeyboardNotification, PanSample};
}
