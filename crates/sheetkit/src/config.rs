//! Sheet configuration
//!
//! A single [`SheetConfig`] drives every presentation. Defaults reproduce the
//! stock sheet behavior; individual values can be overridden with the builder
//! methods or loaded from TOML:
//!
//! ```rust
//! use sheetkit::SheetConfig;
//!
//! let config = SheetConfig::from_toml_str(
//!     r#"
//!     allows_dismissing = false
//!
//!     [snap_back]
//!     damping_ratio = 0.8
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(!config.allows_dismissing);
//! assert_eq!(config.snap_back.damping_ratio, 0.8);
//! assert_eq!(config.snap_back.duration, 0.5);
//! ```

use serde::{Deserialize, Serialize};
use sheetkit_animation::SpringConfig;

use crate::error::{Result, SheetError};
use crate::geometry::GeometryPolicy;

// =============================================================================
// Nested sections
// =============================================================================

/// Spring used when the sheet snaps back after an aborted drag
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapBackConfig {
    /// Response duration in seconds
    pub duration: f32,
    /// Fraction of critical damping
    pub damping_ratio: f32,
    /// Initial velocity as a fraction of the total distance per second
    pub initial_velocity: f32,
}

impl Default for SnapBackConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            damping_ratio: 0.65,
            initial_velocity: 0.5,
        }
    }
}

impl SnapBackConfig {
    pub fn spring(&self) -> SpringConfig {
        SpringConfig::from_duration(self.duration, self.damping_ratio)
    }
}

/// Grabber handle drawn at the top of the sheet
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HandleConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the sheet's top edge
    pub top_inset: f32,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 5.0,
            top_inset: 10.0,
        }
    }
}

// =============================================================================
// SheetConfig
// =============================================================================

/// Sheet presentation configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Allow drag-to-dismiss and tap-to-dismiss. When false the sheet still
    /// rubber-bands under a drag but always returns to rest.
    pub allows_dismissing: bool,
    /// Largest sheet height as a fraction of the keyboard-adjusted container
    pub max_height_fraction: f32,
    /// Extra height added on top of the navigation bar for navigation hosts
    pub navigation_compensation: f32,
    /// Rubber-band resistance: drag distance is divided by this
    pub rubber_band_divisor: f32,
    /// Downward release velocity (points/second) that dismisses
    pub dismiss_velocity: f32,
    /// Duration of live relayouts (content-size changes), seconds
    pub relayout_duration: f32,
    /// Duration of the present/dismiss transition the dimming fade follows
    pub transition_duration: f32,
    /// Corner radius of the sheet's top corners
    pub corner_radius: f32,
    /// Opacity of the black dimming overlay color
    pub dimming_alpha: f32,
    pub snap_back: SnapBackConfig,
    pub handle: HandleConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            allows_dismissing: true,
            max_height_fraction: 0.9,
            navigation_compensation: 100.0,
            rubber_band_divisor: 15.0,
            dismiss_velocity: 500.0,
            relayout_duration: 1.0 / 3.0,
            transition_duration: 0.35,
            corner_radius: 15.0,
            dimming_alpha: 1.0 / 3.0,
            snap_back: SnapBackConfig::default(),
            handle: HandleConfig::default(),
        }
    }
}

impl SheetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SheetConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SheetError {
            SheetError::InvalidConfig {
                field,
                reason: reason.into(),
            }
        }

        if !(self.max_height_fraction > 0.0 && self.max_height_fraction <= 1.0) {
            return Err(invalid(
                "max_height_fraction",
                format!("must be in (0, 1], got {}", self.max_height_fraction),
            ));
        }
        if !(self.rubber_band_divisor > 0.0) {
            return Err(invalid(
                "rubber_band_divisor",
                format!("must be positive, got {}", self.rubber_band_divisor),
            ));
        }
        if !(self.dismiss_velocity >= 0.0) {
            return Err(invalid("dismiss_velocity", "must not be negative"));
        }
        if !(self.relayout_duration >= 0.0) {
            return Err(invalid("relayout_duration", "must not be negative"));
        }
        if !(self.transition_duration >= 0.0) {
            return Err(invalid("transition_duration", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.dimming_alpha) {
            return Err(invalid("dimming_alpha", "must be in [0, 1]"));
        }
        if !(self.snap_back.duration > 0.0) {
            return Err(invalid("snap_back.duration", "must be positive"));
        }
        if !(self.snap_back.damping_ratio > 0.0) {
            return Err(invalid("snap_back.damping_ratio", "must be positive"));
        }
        Ok(())
    }

    /// Geometry constants derived from this configuration
    pub fn geometry_policy(&self) -> GeometryPolicy {
        GeometryPolicy {
            max_height_fraction: self.max_height_fraction,
            navigation_compensation: self.navigation_compensation,
            rubber_band_divisor: self.rubber_band_divisor,
        }
    }

    /// Set whether the sheet can be dismissed by the user
    pub fn allows_dismissing(mut self, allows: bool) -> Self {
        self.allows_dismissing = allows;
        self
    }

    /// Set the maximum height fraction
    pub fn max_height_fraction(mut self, fraction: f32) -> Self {
        self.max_height_fraction = fraction;
        self
    }

    /// Set the dismiss velocity threshold
    pub fn dismiss_velocity(mut self, velocity: f32) -> Self {
        self.dismiss_velocity = velocity;
        self
    }

    /// Set the transition duration the dimming fade follows
    pub fn transition_duration(mut self, seconds: f32) -> Self {
        self.transition_duration = seconds;
        self
    }

    /// Set the snap-back spring
    pub fn snap_back(mut self, snap_back: SnapBackConfig) -> Self {
        self.snap_back = snap_back;
        self
    }
}
