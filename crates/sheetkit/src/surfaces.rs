//! Sheet render state
//!
//! Plain values describing every surface the sheet manages. The host reads
//! [`SheetSurfaces`] after each event or tick and mirrors it onto its own view
//! hierarchy; nothing here draws.
//!
//! Coordinates are container coordinates, except the handle, which is placed
//! relative to the presented surface's origin.

use sheetkit_core::{Affine2D, Color, CornerRadius, Rect};

use crate::config::{HandleConfig, SheetConfig};

/// Grabber handle fill
pub const HANDLE_COLOR: Color = Color::rgb(0.898, 0.898, 0.918);

/// The presented content's surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentedSurface {
    pub frame: Rect,
    /// Live drag offset; identity at rest
    pub transform: Affine2D,
    /// Only the two top corners are rounded
    pub corner_radius: CornerRadius,
    /// Corners use the continuous (squircle) curve
    pub continuous_corners: bool,
}

impl Default for PresentedSurface {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            transform: Affine2D::IDENTITY,
            corner_radius: CornerRadius::ZERO,
            continuous_corners: false,
        }
    }
}

/// Translucent backdrop behind the sheet
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimmingSurface {
    /// Inserted at the back of the container
    pub installed: bool,
    /// Fills the container
    pub frame: Rect,
    pub color: Color,
    /// View opacity in `[0, 1]`, multiplied with `color`'s alpha
    pub alpha: f32,
}

impl Default for DimmingSurface {
    fn default() -> Self {
        Self {
            installed: false,
            frame: Rect::ZERO,
            color: Color::BLACK,
            alpha: 0.0,
        }
    }
}

/// Strip under the sheet's bottom edge that moves with it
///
/// Visible only when the sheet is pulled upward, where it hides the gap
/// between the sheet and the container's bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackingSurface {
    pub installed: bool,
    pub frame: Rect,
    pub transform: Affine2D,
    /// Follows the presented content's background
    pub color: Color,
}

impl Default for BackingSurface {
    fn default() -> Self {
        Self {
            installed: false,
            frame: Rect::ZERO,
            transform: Affine2D::IDENTITY,
            color: Color::TRANSPARENT,
        }
    }
}

/// Non-interactive grabber at the top of the sheet
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleSurface {
    pub installed: bool,
    /// Relative to the presented surface
    pub frame: Rect,
    pub color: Color,
    pub corner_radius: f32,
}

impl Default for HandleSurface {
    fn default() -> Self {
        Self {
            installed: false,
            frame: Rect::ZERO,
            color: HANDLE_COLOR,
            corner_radius: 0.0,
        }
    }
}

/// Everything the host renders for one sheet
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SheetSurfaces {
    pub presented: PresentedSurface,
    pub dimming: DimmingSurface,
    pub backing: BackingSurface,
    pub handle: HandleSurface,
}

impl SheetSurfaces {
    /// Apply a drag offset to the sheet and backing surface together
    pub fn set_offset(&mut self, offset: f32) {
        let transform = if offset == 0.0 {
            Affine2D::IDENTITY
        } else {
            Affine2D::vertical(offset)
        };
        self.presented.transform = transform;
        self.backing.transform = transform;
    }

    /// Current drag offset of the sheet
    pub fn offset(&self) -> f32 {
        self.presented.transform.translation_y()
    }

    pub fn reset_transforms(&mut self) {
        self.set_offset(0.0);
    }

    /// Style the presented surface and install the handle
    pub(crate) fn style_presented(&mut self, config: &SheetConfig) {
        self.presented.corner_radius = CornerRadius::top(config.corner_radius);
        self.presented.continuous_corners = true;
        self.handle = HandleSurface {
            installed: true,
            frame: handle_frame(self.presented.frame.width(), &config.handle),
            color: HANDLE_COLOR,
            corner_radius: config.handle.height / 2.0,
        };
    }

    /// Assign the sheet's frame, keeping the handle centred
    pub(crate) fn set_presented_frame(&mut self, frame: Rect, handle: &HandleConfig) {
        self.presented.frame = frame;
        if self.handle.installed {
            self.handle.frame = handle_frame(frame.width(), handle);
        }
    }

    pub(crate) fn install_dimming(&mut self, container: Rect, config: &SheetConfig) {
        self.dimming = DimmingSurface {
            installed: true,
            frame: container.size().to_rect(),
            color: Color::BLACK.with_alpha(config.dimming_alpha),
            alpha: 0.0,
        };
    }

    pub(crate) fn install_backing(&mut self, container: Rect, color: Color) {
        self.backing = BackingSurface {
            installed: true,
            frame: backing_frame(container),
            transform: self.presented.transform,
            color,
        };
    }

    pub(crate) fn remove_backing(&mut self) {
        self.backing.installed = false;
    }

    /// Drop everything installed for the session
    pub(crate) fn uninstall(&mut self) {
        self.dimming = DimmingSurface::default();
        self.backing = BackingSurface::default();
        self.handle = HandleSurface::default();
        self.reset_transforms();
    }
}

/// Handle frame inside a sheet of the given width
pub fn handle_frame(sheet_width: f32, handle: &HandleConfig) -> Rect {
    Rect::new(
        (sheet_width - handle.width) / 2.0,
        handle.top_inset,
        handle.width,
        handle.height,
    )
}

/// Backing surface frame: container-sized, starting one point above its bottom
pub fn backing_frame(container: Rect) -> Rect {
    container.with_y(container.max_y() - 1.0)
}
