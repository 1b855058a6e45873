//! Software keyboard notifications
//!
//! The platform posts one [`KeyboardNotification`] per keyboard transition.
//! Payload fields mirror what the platform actually delivers and may be
//! missing; consumers treat an incomplete payload as a no-op.

use sheetkit_core::Rect;

/// Which keyboard transition a notification describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyboardEventKind {
    /// Keyboard is about to appear
    WillShow,
    /// Keyboard is about to disappear
    WillHide,
    /// Keyboard frame is about to change (rotation, input-accessory, split)
    WillChangeFrame,
}

/// A keyboard transition notification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardNotification {
    pub kind: KeyboardEventKind,
    /// Keyboard frame at the end of the transition
    pub end_frame: Option<Rect>,
    /// Transition duration in seconds
    pub duration: Option<f64>,
    /// Raw platform animation-curve value
    pub curve: Option<u32>,
}

/// The animation timing carried by a complete notification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardTiming {
    pub duration: f64,
    pub curve: u32,
}

impl KeyboardNotification {
    pub fn new(kind: KeyboardEventKind) -> Self {
        Self {
            kind,
            end_frame: None,
            duration: None,
            curve: None,
        }
    }

    /// Complete `WillShow` notification
    pub fn will_show(end_frame: Rect, duration: f64, curve: u32) -> Self {
        Self::new(KeyboardEventKind::WillShow)
            .with_end_frame(end_frame)
            .with_timing(duration, curve)
    }

    /// Complete `WillHide` notification
    pub fn will_hide(end_frame: Rect, duration: f64, curve: u32) -> Self {
        Self::new(KeyboardEventKind::WillHide)
            .with_end_frame(end_frame)
            .with_timing(duration, curve)
    }

    /// Complete `WillChangeFrame` notification
    pub fn will_change_frame(end_frame: Rect, duration: f64, curve: u32) -> Self {
        Self::new(KeyboardEventKind::WillChangeFrame)
            .with_end_frame(end_frame)
            .with_timing(duration, curve)
    }

    pub fn with_end_frame(mut self, end_frame: Rect) -> Self {
        self.end_frame = Some(end_frame);
        self
    }

    pub fn with_timing(mut self, duration: f64, curve: u32) -> Self {
        self.duration = Some(duration);
        self.curve = Some(curve);
        self
    }

    /// Duration and curve, when both are present
    pub fn timing(&self) -> Option<KeyboardTiming> {
        Some(KeyboardTiming {
            duration: self.duration?,
            curve: self.curve?,
        })
    }

    /// Height of the keyboard's end frame, when present
    pub fn end_height(&self) -> Option<f32> {
        self.end_frame.map(|frame| frame.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_notification() {
        let note = KeyboardNotification::will_show(Rect::new(0.0, 508.0, 390.0, 336.0), 0.25, 7);
        assert_eq!(note.kind, KeyboardEventKind::WillShow);
        assert_eq!(note.end_height(), Some(336.0));
        assert_eq!(
            note.timing(),
            Some(KeyboardTiming {
                duration: 0.25,
                curve: 7
            })
        );
    }

    #[test]
    fn test_partial_payload_has_no_timing() {
        let note = KeyboardNotification::new(KeyboardEventKind::WillHide);
        assert!(note.timing().is_none());
        assert!(note.end_height().is_none());

        let mut only_duration = note;
        only_duration.duration = Some(0.25);
        assert!(only_duration.timing().is_none());
    }
}
