//! Transition registry
//!
//! Keeps each sheet's transition delegate alive from the moment the caller
//! asks for one until its dismissal animation is queried. The registry is
//! owned by the caller (typically the app shell) and prunes itself: the
//! dismissal query removes the entry.
//!
//! ```rust
//! use sheetkit::{SheetConfig, TransitionRegistry};
//!
//! let mut registry = TransitionRegistry::new();
//! let id = registry.shared_delegate(SheetConfig::default());
//! assert!(registry.contains(id));
//!
//! registry.dismissal_animation_controller(id);
//! assert!(registry.is_empty());
//! ```

use slotmap::{new_key_type, SlotMap};
use sheetkit_platform::{KeyboardNotification, Subscription};

use crate::config::SheetConfig;
use crate::host::SheetHost;
use crate::presentation::{present_sheet, PresentationContext, SheetPresentation};

new_key_type! {
    /// Identity of one sheet presentation in a [`TransitionRegistry`]
    pub struct PresentationId;
}

/// Per-presentation transition delegate
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionDelegate {
    pub config: SheetConfig,
}

/// Animation used for a dismissal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DismissalAnimation {
    /// The platform's standard slide-down
    #[default]
    Default,
}

/// Caller-owned map of live transition delegates
#[derive(Debug, Default)]
pub struct TransitionRegistry {
    delegates: SlotMap<PresentationId, TransitionDelegate>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delegate for a new presentation
    pub fn shared_delegate(&mut self, config: SheetConfig) -> PresentationId {
        let id = self.delegates.insert(TransitionDelegate { config });
        tracing::debug!(
            "TransitionRegistry::shared_delegate - {:?}, now {} live",
            id,
            self.delegates.len()
        );
        id
    }

    pub fn delegate(&self, id: PresentationId) -> Option<&TransitionDelegate> {
        self.delegates.get(id)
    }

    /// Build the presentation for a registered delegate
    ///
    /// Returns `None` when `id` was never registered or has been pruned.
    pub fn presentation_for<H: SheetHost>(
        &self,
        id: PresentationId,
        host: H,
        keyboard: Option<Subscription<KeyboardNotification>>,
    ) -> Option<SheetPresentation<H>> {
        let delegate = self.delegates.get(id)?;
        let context = PresentationContext {
            config: delegate.config.clone(),
            keyboard,
        };
        Some(present_sheet(host, context))
    }

    /// Dismissal animation for a presentation
    ///
    /// Removes the presentation's entry. Sheets always dismiss with the
    /// standard animation.
    pub fn dismissal_animation_controller(&mut self, id: PresentationId) -> DismissalAnimation {
        if self.delegates.remove(id).is_some() {
            tracing::debug!(
                "TransitionRegistry::dismissal_animation_controller - pruned {:?}, {} live",
                id,
                self.delegates.len()
            );
        }
        DismissalAnimation::Default
    }

    pub fn contains(&self, id: PresentationId) -> bool {
        self.delegates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}
