//! Sheet geometry
//!
//! Pure functions computing where the sheet sits and how a drag moves it.
//! Nothing here touches presentation state, so every result can be
//! recomputed at will: calling [`target_frame`] twice with the same inputs
//! always yields the same rectangle.

use sheetkit_core::Rect;

use crate::scroll::ScrollMetrics;

/// Software keyboard state as last reported by notifications
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyboardState {
    pub visible: bool,
    /// Height of the keyboard's end frame
    pub height: f32,
}

impl KeyboardState {
    pub const HIDDEN: KeyboardState = KeyboardState {
        visible: false,
        height: 0.0,
    };

    pub fn shown(height: f32) -> Self {
        Self {
            visible: true,
            height,
        }
    }

    /// Height the keyboard takes away from the container
    pub fn occluded_height(&self) -> f32 {
        if self.visible {
            self.height.max(0.0)
        } else {
            0.0
        }
    }
}

/// Geometry constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryPolicy {
    /// Largest sheet height as a fraction of the effective container height
    pub max_height_fraction: f32,
    /// Added to the navigation bar height for navigation hosts
    pub navigation_compensation: f32,
    /// Drag distance is divided by this when rubber-banding
    pub rubber_band_divisor: f32,
}

impl Default for GeometryPolicy {
    fn default() -> Self {
        Self {
            max_height_fraction: 0.9,
            navigation_compensation: 100.0,
            rubber_band_divisor: 15.0,
        }
    }
}

/// Container height left once the keyboard is accounted for
pub fn effective_container_height(container: Rect, keyboard: KeyboardState) -> f32 {
    container.height() - keyboard.occluded_height()
}

/// Height the sheet wants before the navigation-host compensation
///
/// With a tracked scroll view the sheet fits the scroll content plus its
/// adjusted insets; otherwise it uses the presented content's preferred height.
/// Either way the result is capped at the policy's fraction of `effective`.
pub fn content_height(
    effective: f32,
    preferred_height: f32,
    scroll: Option<&ScrollMetrics>,
    policy: &GeometryPolicy,
) -> f32 {
    let cap = policy.max_height_fraction * effective;
    let wanted = match scroll {
        Some(metrics) => metrics.fitted_height(),
        None => preferred_height,
    };
    cap.min(wanted)
}

/// Frame the sheet should occupy inside `container`
///
/// The sheet spans the container's width and sits on top of the keyboard (or
/// the container's bottom edge). Navigation hosts grow by their bar height plus
/// the policy's compensation, applied after the cap. Without a container the
/// result is [`Rect::ZERO`].
pub fn target_frame(
    container: Option<Rect>,
    preferred_height: f32,
    scroll: Option<&ScrollMetrics>,
    keyboard: KeyboardState,
    navigation_bar_height: Option<f32>,
    policy: &GeometryPolicy,
) -> Rect {
    let Some(container) = container else {
        return Rect::ZERO;
    };

    let effective = effective_container_height(container, keyboard);
    let mut height = content_height(effective, preferred_height, scroll, policy);
    if let Some(bar) = navigation_bar_height {
        height += bar + policy.navigation_compensation;
    }

    Rect::new(container.x(), effective - height, container.width(), height)
}

/// Vertical offset applied to the sheet for a drag translation
///
/// Downward drags follow the finger when dismissal is allowed; upward drags,
/// and every drag when dismissal is disabled, are rubber-banded.
pub fn live_transform(translation_y: f32, dismiss_allowed: bool, policy: &GeometryPolicy) -> f32 {
    if dismiss_allowed && translation_y > 0.0 {
        translation_y
    } else {
        translation_y / policy.rubber_band_divisor
    }
}

/// Dimming opacity for a drag translation, in `[0, 1]`
///
/// Fades linearly from 1 at rest to 0 once the sheet has moved its own
/// height. A non-positive `presented_height` gives 1 at or above rest and 0
/// below it.
pub fn dimming_opacity(translation_y: f32, presented_height: f32) -> f32 {
    if presented_height <= 0.0 {
        return if translation_y <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - translation_y / presented_height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetkit_core::EdgeInsets;

    fn container() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 800.0)
    }

    #[test]
    fn test_preferred_height_fits_under_cap() {
        let frame = target_frame(
            Some(container()),
            300.0,
            None,
            KeyboardState::HIDDEN,
            None,
            &GeometryPolicy::default(),
        );
        assert_eq!(frame, Rect::new(0.0, 500.0, 400.0, 300.0));
    }

    #[test]
    fn test_height_capped_at_fraction() {
        let frame = target_frame(
            Some(container()),
            2000.0,
            None,
            KeyboardState::HIDDEN,
            None,
            &GeometryPolicy::default(),
        );
        assert_eq!(frame.height(), 720.0);
        assert_eq!(frame.y(), 80.0);
    }

    #[test]
    fn test_keyboard_shrinks_effective_height() {
        let frame = target_frame(
            Some(container()),
            2000.0,
            None,
            KeyboardState::shown(300.0),
            None,
            &GeometryPolicy::default(),
        );
        assert_eq!(frame.height(), 450.0);
        assert_eq!(frame.max_y(), 500.0);
    }

    #[test]
    fn test_negative_keyboard_height_ignored() {
        let keyboard = KeyboardState::shown(-40.0);
        assert_eq!(effective_container_height(container(), keyboard), 800.0);
    }

    #[test]
    fn test_hidden_keyboard_height_ignored() {
        let keyboard = KeyboardState {
            visible: false,
            height: 300.0,
        };
        assert_eq!(effective_container_height(container(), keyboard), 800.0);
    }

    #[test]
    fn test_scroll_content_drives_height() {
        let metrics = ScrollMetrics::new(0.0, 400.0, EdgeInsets::vertical(20.0, 34.0), 400.0);
        let frame = target_frame(
            Some(container()),
            100.0,
            Some(&metrics),
            KeyboardState::HIDDEN,
            None,
            &GeometryPolicy::default(),
        );
        assert_eq!(frame.height(), 454.0);
    }

    #[test]
    fn test_navigation_host_compensation_after_cap() {
        let frame = target_frame(
            Some(container()),
            2000.0,
            None,
            KeyboardState::HIDDEN,
            Some(44.0),
            &GeometryPolicy::default(),
        );
        assert_eq!(frame.height(), 720.0 + 144.0);
        assert_eq!(frame.y(), 800.0 - 864.0);
    }

    #[test]
    fn test_container_origin_and_width_respected() {
        let frame = target_frame(
            Some(Rect::new(20.0, 0.0, 300.0, 600.0)),
            100.0,
            None,
            KeyboardState::HIDDEN,
            None,
            &GeometryPolicy::default(),
        );
        assert_eq!(frame, Rect::new(20.0, 500.0, 300.0, 100.0));
    }

    #[test]
    fn test_absent_container_is_zero() {
        let frame = target_frame(
            None,
            300.0,
            None,
            KeyboardState::HIDDEN,
            None,
            &GeometryPolicy::default(),
        );
        assert_eq!(frame, Rect::ZERO);
    }

    #[test]
    fn test_target_frame_idempotent() {
        let policy = GeometryPolicy::default();
        let a = target_frame(Some(container()), 350.0, None, KeyboardState::shown(200.0), None, &policy);
        let b = target_frame(Some(container()), 350.0, None, KeyboardState::shown(200.0), None, &policy);
        assert_eq!(a, b);
    }

    #[test]
    fn test_live_transform_follows_downward_drag() {
        let policy = GeometryPolicy::default();
        assert_eq!(live_transform(150.0, true, &policy), 150.0);
        assert_eq!(live_transform(-150.0, true, &policy), -10.0);
    }

    #[test]
    fn test_live_transform_rubber_bands_without_dismissal() {
        let policy = GeometryPolicy::default();
        assert_eq!(live_transform(150.0, false, &policy), 10.0);
        assert_eq!(live_transform(-150.0, false, &policy), -10.0);
    }

    #[test]
    fn test_dimming_opacity_curve() {
        assert_eq!(dimming_opacity(0.0, 400.0), 1.0);
        assert_eq!(dimming_opacity(200.0, 400.0), 0.5);
        assert_eq!(dimming_opacity(400.0, 400.0), 0.0);
        assert_eq!(dimming_opacity(800.0, 400.0), 0.0);
        assert_eq!(dimming_opacity(-100.0, 400.0), 1.0);
    }

    #[test]
    fn test_dimming_opacity_zero_height() {
        assert_eq!(dimming_opacity(0.0, 0.0), 1.0);
        assert_eq!(dimming_opacity(-5.0, 0.0), 1.0);
        assert_eq!(dimming_opacity(5.0, 0.0), 0.0);
    }
}
