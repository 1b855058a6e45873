//! Drag state machine
//!
//! Interprets pan samples for the sheet:
//!
//! ```text
//!            DRAG                 DISMISS               DISMISSED
//!   Idle ──────────► Dragging ──────────────► Dismissing ──────────► Idle
//!    ▲                 │  ▲                       │
//!    │      SNAP_BACK  │  │ DRAG                  │ DECLINED
//!    │                 ▼  │                       │
//!    └─────────── SnappingBack ◄──────────────────┘
//!        SETTLED
//! ```
//!
//! Live samples produce an offset and dimming opacity from the geometry
//! functions; the terminal sample produces a dismiss or snap-back decision.
//! The machine owns no animation: the presentation runs the snap-back spring
//! and reports `SETTLED` when it comes to rest.

use std::hash::Hash;

use sheetkit_platform::PanSample;

use crate::geometry::{dimming_opacity, live_transform, GeometryPolicy};

/// Event-driven state transitions
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Drag interaction state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    /// Sheet at rest
    #[default]
    Idle,
    /// Finger down, sheet following
    Dragging,
    /// Released past the threshold, dismissal requested
    Dismissing,
    /// Released short of the threshold, spring returning to rest
    SnappingBack,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging)
    }

    pub fn is_snapping_back(&self) -> bool {
        matches!(self, DragState::SnappingBack)
    }

    pub fn is_dismissing(&self) -> bool {
        matches!(self, DragState::Dismissing)
    }
}

/// Events driving [`DragState`]
pub mod drag_events {
    /// Began or changed sample
    pub const DRAG: u32 = 20000;
    /// Released past the dismiss threshold
    pub const DISMISS: u32 = 20001;
    /// Released short of the threshold, or dismissal disabled
    pub const SNAP_BACK: u32 = 20002;
    /// Snap-back spring came to rest
    pub const SETTLED: u32 = 20003;
    /// Dismissal finished
    pub const DISMISSED: u32 = 20004;
    /// Host declined the requested dismissal
    pub const DECLINED: u32 = 20005;
}

impl StateTransitions for DragState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use drag_events::*;

        match (self, event) {
            // Idle -> Dragging: gesture began
            (DragState::Idle, DRAG) => Some(DragState::Dragging),

            // Dragging -> Dragging: keep following (no change)
            (DragState::Dragging, DRAG) => None,

            // Dragging -> Dismissing / SnappingBack: released
            (DragState::Dragging, DISMISS) => Some(DragState::Dismissing),
            (DragState::Dragging, SNAP_BACK) => Some(DragState::SnappingBack),

            // SnappingBack -> Dragging: new drag interrupts the spring
            (DragState::SnappingBack, DRAG) => Some(DragState::Dragging),

            // SnappingBack -> Idle: spring settled
            (DragState::SnappingBack, SETTLED) => Some(DragState::Idle),

            // Dismissing -> Idle: sheet gone
            (DragState::Dismissing, DISMISSED) => Some(DragState::Idle),

            // Dismissing -> SnappingBack: host kept the sheet
            (DragState::Dismissing, DECLINED) => Some(DragState::SnappingBack),

            _ => None,
        }
    }
}

// =============================================================================
// Release decision
// =============================================================================

/// Outcome of releasing a drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseDecision {
    Dismiss,
    SnapBack,
}

/// Decide what a released drag does
///
/// Dismisses when allowed and the sheet was dragged past half its height or
/// flung downward faster than `dismiss_velocity`.
pub fn release_decision(
    translation_y: f32,
    velocity_y: f32,
    presented_height: f32,
    dismiss_allowed: bool,
    dismiss_velocity: f32,
) -> ReleaseDecision {
    if !dismiss_allowed {
        return ReleaseDecision::SnapBack;
    }
    if translation_y > presented_height / 2.0 || velocity_y > dismiss_velocity {
        ReleaseDecision::Dismiss
    } else {
        ReleaseDecision::SnapBack
    }
}

// =============================================================================
// Machine
// =============================================================================

/// Inputs a sample is interpreted against
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragContext {
    /// Height of the presented surface's frame
    pub presented_height: f32,
    pub dismiss_allowed: bool,
    /// Downward release velocity that dismisses
    pub dismiss_velocity: f32,
    pub policy: GeometryPolicy,
}

/// What the presentation should apply after a sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutput {
    /// Sample ignored
    None,
    /// Apply a live offset to the sheet and backing surface, and dim
    Update { offset: f32, dimming: f32 },
    /// Ask the host to dismiss
    Dismiss,
    /// Spring back to rest
    SnapBack,
}

/// Drag state machine
#[derive(Clone, Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Interpret one pan sample
    pub fn handle(&mut self, sample: &PanSample, ctx: &DragContext) -> DragOutput {
        if sample.phase.is_active() {
            if !self.dispatch(drag_events::DRAG) && !self.state.is_dragging() {
                return DragOutput::None;
            }
            let ty = sample.translation.y;
            let offset = live_transform(ty, ctx.dismiss_allowed, &ctx.policy);
            let dimming = dimming_opacity(ty, ctx.presented_height);
            tracing::trace!(ty, offset, dimming, "sheet drag update");
            return DragOutput::Update { offset, dimming };
        }

        if sample.phase.is_terminal() && self.state.is_dragging() {
            let decision = release_decision(
                sample.translation.y,
                sample.velocity.y,
                ctx.presented_height,
                ctx.dismiss_allowed,
                ctx.dismiss_velocity,
            );
            tracing::debug!(
                phase = ?sample.phase,
                ty = sample.translation.y,
                vy = sample.velocity.y,
                ?decision,
                "sheet drag released"
            );
            return match decision {
                ReleaseDecision::Dismiss => {
                    self.dispatch(drag_events::DISMISS);
                    DragOutput::Dismiss
                }
                ReleaseDecision::SnapBack => {
                    self.dispatch(drag_events::SNAP_BACK);
                    DragOutput::SnapBack
                }
            };
        }

        DragOutput::None
    }

    /// Snap-back spring came to rest
    pub fn settled(&mut self) -> bool {
        self.dispatch(drag_events::SETTLED)
    }

    /// Dismissal finished
    pub fn dismissed(&mut self) -> bool {
        self.dispatch(drag_events::DISMISSED)
    }

    /// Host declined the requested dismissal
    pub fn declined(&mut self) -> bool {
        self.dispatch(drag_events::DECLINED)
    }

    /// Force back to idle (session ended)
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    fn dispatch(&mut self, event: u32) -> bool {
        match self.state.on_event(event) {
            Some(next) => {
                tracing::trace!("drag state {:?} -> {:?}", self.state, next);
                self.state = next;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetkit_platform::GesturePhase;

    fn ctx(dismiss_allowed: bool) -> DragContext {
        DragContext {
            presented_height: 400.0,
            dismiss_allowed,
            dismiss_velocity: 500.0,
            policy: GeometryPolicy::default(),
        }
    }

    fn drag(machine: &mut DragMachine, ty: f32, ctx: &DragContext) -> DragOutput {
        machine.handle(&PanSample::vertical(GesturePhase::Changed, ty, 0.0), ctx)
    }

    #[test]
    fn test_transitions_table() {
        use drag_events::*;
        assert_eq!(DragState::Idle.on_event(DRAG), Some(DragState::Dragging));
        assert_eq!(DragState::Dragging.on_event(DRAG), None);
        assert_eq!(DragState::Dragging.on_event(DISMISS), Some(DragState::Dismissing));
        assert_eq!(DragState::Dragging.on_event(SNAP_BACK), Some(DragState::SnappingBack));
        assert_eq!(DragState::SnappingBack.on_event(DRAG), Some(DragState::Dragging));
        assert_eq!(DragState::SnappingBack.on_event(SETTLED), Some(DragState::Idle));
        assert_eq!(DragState::Dismissing.on_event(DRAG), None);
        assert_eq!(DragState::Dismissing.on_event(DISMISSED), Some(DragState::Idle));
        assert_eq!(DragState::Dismissing.on_event(DECLINED), Some(DragState::SnappingBack));
        assert_eq!(DragState::Dragging.on_event(DECLINED), None);
        assert_eq!(DragState::Idle.on_event(SETTLED), None);
    }

    #[test]
    fn test_release_decision_thresholds() {
        assert_eq!(release_decision(201.0, 0.0, 400.0, true, 500.0), ReleaseDecision::Dismiss);
        assert_eq!(release_decision(200.0, 0.0, 400.0, true, 500.0), ReleaseDecision::SnapBack);
        assert_eq!(release_decision(0.0, 501.0, 400.0, true, 500.0), ReleaseDecision::Dismiss);
        assert_eq!(release_decision(0.0, 500.0, 400.0, true, 500.0), ReleaseDecision::SnapBack);
        assert_eq!(release_decision(0.0, 0.0, 400.0, true, 500.0), ReleaseDecision::SnapBack);
        assert_eq!(release_decision(399.0, 900.0, 400.0, false, 500.0), ReleaseDecision::SnapBack);
    }

    #[test]
    fn test_drag_produces_offset_and_dimming() {
        let mut machine = DragMachine::new();
        let ctx = ctx(true);
        let began = machine.handle(&PanSample::vertical(GesturePhase::Began, 100.0, 0.0), &ctx);
        assert_eq!(
            began,
            DragOutput::Update {
                offset: 100.0,
                dimming: 0.75
            }
        );
        assert_eq!(machine.state(), DragState::Dragging);

        let up = drag(&mut machine, -150.0, &ctx);
        assert_eq!(
            up,
            DragOutput::Update {
                offset: -10.0,
                dimming: 1.0
            }
        );
    }

    #[test]
    fn test_rubber_band_when_dismissal_disabled() {
        let mut machine = DragMachine::new();
        let ctx = ctx(false);
        match drag(&mut machine, 150.0, &ctx) {
            DragOutput::Update { offset, .. } => assert_eq!(offset, 10.0),
            other => panic!("unexpected output {other:?}"),
        }
        let released = machine.handle(&PanSample::vertical(GesturePhase::Ended, 390.0, 2000.0), &ctx);
        assert_eq!(released, DragOutput::SnapBack);
        assert_eq!(machine.state(), DragState::SnappingBack);
    }

    #[test]
    fn test_release_past_half_dismisses() {
        let mut machine = DragMachine::new();
        let ctx = ctx(true);
        drag(&mut machine, 150.0, &ctx);
        let released = machine.handle(&PanSample::vertical(GesturePhase::Ended, 201.0, 0.0), &ctx);
        assert_eq!(released, DragOutput::Dismiss);
        assert_eq!(machine.state(), DragState::Dismissing);

        // Further samples are ignored while dismissing
        assert_eq!(drag(&mut machine, 50.0, &ctx), DragOutput::None);
        assert!(machine.dismissed());
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn test_cancel_and_fail_also_release() {
        for phase in [GesturePhase::Cancelled, GesturePhase::Failed] {
            let mut machine = DragMachine::new();
            let ctx = ctx(true);
            drag(&mut machine, 10.0, &ctx);
            let released = machine.handle(&PanSample::vertical(phase, 10.0, 0.0), &ctx);
            assert_eq!(released, DragOutput::SnapBack);
        }
    }

    #[test]
    fn test_new_drag_interrupts_snap_back() {
        let mut machine = DragMachine::new();
        let ctx = ctx(true);
        drag(&mut machine, 50.0, &ctx);
        machine.handle(&PanSample::vertical(GesturePhase::Ended, 50.0, 0.0), &ctx);
        assert!(machine.state().is_snapping_back());

        let resumed = machine.handle(&PanSample::vertical(GesturePhase::Began, 20.0, 0.0), &ctx);
        assert!(matches!(resumed, DragOutput::Update { .. }));
        assert!(machine.state().is_dragging());
        assert!(!machine.settled());
    }

    #[test]
    fn test_terminal_without_drag_ignored() {
        let mut machine = DragMachine::new();
        let ended = machine.handle(&PanSample::vertical(GesturePhase::Ended, 300.0, 900.0), &ctx(true));
        assert_eq!(ended, DragOutput::None);
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn test_possible_phase_ignored() {
        let mut machine = DragMachine::new();
        let out = machine.handle(&PanSample::vertical(GesturePhase::Possible, 30.0, 0.0), &ctx(true));
        assert_eq!(out, DragOutput::None);
    }
}
