//! Sheet presentation lifecycle
//!
//! [`SheetPresentation`] is the per-sheet session object. The host drives it
//! with lifecycle callbacks, layout passes, gestures and frame ticks, and reads
//! back [`SheetSurfaces`] to render.
//!
//! ```text
//!  present_sheet ──► will_present ──► presentation_did_end(true) ──► Presented
//!                        │                                              │
//!                        └─(completed == false)──► ended                │
//!                                                                       ▼
//!          ended ◄──(true)── dismissal_did_end ◄── will_dismiss ◄── host.dismiss
//!                                   └──(false)──► Presented
//! ```
//!
//! Keyboard and content-size notifications arrive through subscriptions that
//! are drained by [`SheetPresentation::process_events`] (also called from
//! [`SheetPresentation::tick`]). Layout requests are coalesced into a single
//! pass, run by [`SheetPresentation::layout_if_needed`].

use std::rc::Rc;

use sheetkit_animation::{Easing, Spring, Tween};
use sheetkit_core::{Rect, Size};
use sheetkit_platform::{
    KeyboardEventKind, KeyboardNotification, PanRecognizer, PanSample, RecognizerId, Subscription,
    TapRecognizer, Touch,
};

use crate::config::SheetConfig;
use crate::drag::{DragContext, DragMachine, DragOutput, DragState};
use crate::geometry::{self, GeometryPolicy, KeyboardState};
use crate::gesture::{self, ScrollGate};
use crate::host::{SheetHost, TransitionContext};
use crate::scroll::ScrollCollaborator;
use crate::surfaces::SheetSurfaces;

/// Largest integration step for the snap-back spring
const MAX_SPRING_STEP: f32 = 1.0 / 120.0;

/// Where the session is in its present/dismiss lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Created, `will_present` not yet called
    #[default]
    Pending,
    /// Present transition running
    Presenting,
    /// On screen, no transition running
    Presented,
    /// Dismiss transition running
    Dismissing,
    /// Session over; surfaces uninstalled
    Ended,
}

impl TransitionPhase {
    /// Present or dismiss transition in flight
    pub fn is_transitioning(&self) -> bool {
        matches!(self, TransitionPhase::Presenting | TransitionPhase::Dismissing)
    }
}

/// Which surface a touch landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchTarget {
    /// The sheet itself
    Presented,
    /// The container, outside the sheet
    Container,
    /// The dimming overlay
    Dimming,
}

/// Ids of the recognizers a session attaches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetRecognizers {
    /// Drag recognizer on the presented surface
    pub presented_pan: RecognizerId,
    /// Drag recognizer on the container
    pub container_pan: RecognizerId,
    /// Tap-to-dismiss recognizer on the dimming overlay
    pub dimming_tap: RecognizerId,
}

/// Inputs for building a presentation
#[derive(Debug, Default)]
pub struct PresentationContext {
    pub config: SheetConfig,
    /// Keyboard notifications; drained while the session is live
    pub keyboard: Option<Subscription<KeyboardNotification>>,
}

impl PresentationContext {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            config,
            keyboard: None,
        }
    }

    pub fn keyboard(mut self, keyboard: Subscription<KeyboardNotification>) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Build the session object for one sheet presentation
pub fn present_sheet<H: SheetHost>(host: H, context: PresentationContext) -> SheetPresentation<H> {
    SheetPresentation::new(host, context)
}

/// Spring-driven return to rest after an aborted drag
#[derive(Clone, Debug)]
struct SnapBack {
    progress: Spring,
    from_offset: f32,
    from_dimming: f32,
}

impl SnapBack {
    fn offset(&self) -> f32 {
        self.from_offset * (1.0 - self.progress.value())
    }

    fn dimming(&self) -> f32 {
        let p = self.progress.value();
        (self.from_dimming + (1.0 - self.from_dimming) * p).clamp(0.0, 1.0)
    }
}

/// One sheet presentation session
pub struct SheetPresentation<H: SheetHost> {
    host: H,
    config: SheetConfig,
    policy: GeometryPolicy,
    phase: TransitionPhase,

    keyboard: KeyboardState,
    keyboard_events: Option<Subscription<KeyboardNotification>>,

    scroll: Option<Rc<dyn ScrollCollaborator>>,
    scroll_explicit: bool,
    content_size_events: Option<Subscription<Size>>,

    surfaces: SheetSurfaces,
    drag: DragMachine,
    needs_layout: bool,

    frame_animation: Option<Tween<Rect>>,
    dimming_animation: Option<Tween<f32>>,
    snap_back: Option<SnapBack>,

    presented_pan: PanRecognizer,
    container_pan: PanRecognizer,
    dimming_tap: TapRecognizer,
    recognizers_attached: bool,
}

impl<H: SheetHost> SheetPresentation<H> {
    pub fn new(host: H, context: PresentationContext) -> Self {
        let policy = context.config.geometry_policy();
        Self {
            host,
            config: context.config,
            policy,
            phase: TransitionPhase::Pending,
            keyboard: KeyboardState::HIDDEN,
            keyboard_events: context.keyboard,
            scroll: None,
            scroll_explicit: false,
            content_size_events: None,
            surfaces: SheetSurfaces::default(),
            drag: DragMachine::new(),
            needs_layout: false,
            frame_animation: None,
            dimming_animation: None,
            snap_back: None,
            presented_pan: PanRecognizer::new(),
            container_pan: PanRecognizer::new(),
            dimming_tap: TapRecognizer::new(),
            recognizers_attached: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Render state for the current frame
    pub fn surfaces(&self) -> &SheetSurfaces {
        &self.surfaces
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn keyboard(&self) -> KeyboardState {
        self.keyboard
    }

    /// Session is between `will_present` and its end
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, TransitionPhase::Pending | TransitionPhase::Ended)
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn allows_dismissing(&self) -> bool {
        self.config.allows_dismissing
    }

    pub fn set_allows_dismissing(&mut self, allows: bool) {
        self.config.allows_dismissing = allows;
    }

    /// Recognizers attached by `will_present`
    pub fn recognizers(&self) -> Option<SheetRecognizers> {
        self.recognizers_attached.then(|| SheetRecognizers {
            presented_pan: self.presented_pan.id(),
            container_pan: self.container_pan.id(),
            dimming_tap: self.dimming_tap.id(),
        })
    }

    pub fn tracked_scroll(&self) -> Option<&Rc<dyn ScrollCollaborator>> {
        self.scroll.as_ref()
    }

    /// Frame the sheet should have right now
    pub fn target_frame(&self) -> Rect {
        let content = self.host.presented_content();
        let metrics = self.scroll.as_ref().map(|scroll| scroll.metrics());
        geometry::target_frame(
            self.host.container_bounds(),
            content.map_or(0.0, |c| c.preferred_size.height),
            metrics.as_ref(),
            self.keyboard,
            content.and_then(|c| c.navigation_bar_height),
            &self.policy,
        )
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Present transition is about to start
    pub fn will_present(&mut self, transition: TransitionContext) {
        if self.phase != TransitionPhase::Pending {
            tracing::debug!("SheetPresentation::will_present - ignored in {:?}", self.phase);
            return;
        }
        self.phase = TransitionPhase::Presenting;

        // Only notifications posted from here on count
        if let Some(keyboard) = &self.keyboard_events {
            keyboard.drain();
        }

        if let Some(size) = self.host.presenting_size() {
            self.host.set_preferred_content_size(size);
        }

        if !self.scroll_explicit {
            self.scroll = self
                .host
                .first_content_scroll()
                .or_else(|| self.host.navigation_top_scroll());
        }
        self.subscribe_content_size();

        let content = self.host.presented_content();
        if content.is_some() {
            self.surfaces.presented.frame = self.target_frame();
            self.surfaces.style_presented(&self.config);
            self.recognizers_attached = true;
        }

        if let Some(container) = self.host.container_bounds() {
            self.surfaces.install_dimming(container, &self.config);
            let background = content.map(|c| c.background).unwrap_or_default();
            self.surfaces.install_backing(container, background);
        }

        self.animate_dimming(1.0, transition);

        tracing::debug!(
            "SheetPresentation::will_present - frame {:?}, tracking scroll: {}",
            self.surfaces.presented.frame,
            self.scroll.is_some()
        );
    }

    /// Present transition finished
    ///
    /// An interrupted presentation ends the session.
    pub fn presentation_did_end(&mut self, completed: bool) {
        if self.phase != TransitionPhase::Presenting {
            return;
        }
        if completed {
            self.phase = TransitionPhase::Presented;
            tracing::debug!("SheetPresentation::presentation_did_end - presented");
        } else {
            tracing::debug!("SheetPresentation::presentation_did_end - cancelled");
            self.end_session();
        }
    }

    /// Dismiss transition is about to start
    pub fn will_dismiss(&mut self, transition: TransitionContext) {
        if !self.is_active() {
            return;
        }
        self.phase = TransitionPhase::Dismissing;
        self.surfaces.remove_backing();
        self.animate_dimming(0.0, transition);
        tracing::debug!("SheetPresentation::will_dismiss");
    }

    /// Dismiss transition finished
    ///
    /// A completed dismissal ends the session. A cancelled one (an interactive
    /// dismissal the user abandoned) puts the sheet back at rest.
    pub fn dismissal_did_end(&mut self, completed: bool) {
        if self.phase != TransitionPhase::Dismissing {
            return;
        }
        self.surfaces.reset_transforms();
        self.drag.dismissed();

        if completed {
            tracing::debug!("SheetPresentation::dismissal_did_end - dismissed");
            self.end_session();
            return;
        }

        tracing::debug!("SheetPresentation::dismissal_did_end - cancelled, restoring");
        self.phase = TransitionPhase::Presented;
        if let Some(container) = self.host.container_bounds() {
            let background = self
                .host
                .presented_content()
                .map(|c| c.background)
                .unwrap_or_default();
            self.surfaces.install_backing(container, background);
        }
        self.dimming_animation = None;
        self.surfaces.dimming.alpha = 1.0;
    }

    /// Host kept the sheet after a drag asked it to dismiss
    ///
    /// Springs the displaced sheet back to rest. Ignored once the dismiss
    /// transition has started.
    pub fn dismiss_declined(&mut self) {
        if self.phase == TransitionPhase::Dismissing || !self.drag.declined() {
            return;
        }
        tracing::debug!("SheetPresentation::dismiss_declined - snapping back");
        self.start_snap_back();
    }

    /// Ask the host to dismiss, if dismissal is allowed
    pub fn request_dismiss(&mut self) {
        if !self.config.allows_dismissing {
            tracing::debug!("SheetPresentation::request_dismiss - dismissal disabled");
            return;
        }
        if !self.is_active() || self.phase == TransitionPhase::Dismissing {
            return;
        }
        tracing::debug!("SheetPresentation::request_dismiss - dismissing");
        self.host.dismiss(true);
    }

    /// The dimming overlay was tapped
    pub fn handle_dimming_tap(&mut self) {
        self.request_dismiss();
    }

    fn end_session(&mut self) {
        self.phase = TransitionPhase::Ended;
        self.keyboard_events = None;
        self.content_size_events = None;
        self.scroll = None;
        self.scroll_explicit = false;
        self.frame_animation = None;
        self.dimming_animation = None;
        self.snap_back = None;
        self.needs_layout = false;
        self.recognizers_attached = false;
        self.drag.reset();
        self.surfaces.uninstall();
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Request a layout pass
    pub fn set_needs_layout(&mut self) {
        self.needs_layout = true;
    }

    /// Presented content changed its preferred size
    pub fn preferred_content_size_did_change(&mut self) {
        self.set_needs_layout();
    }

    /// Presented content's fitting size changed
    pub fn fitting_size_did_change(&mut self) {
        self.set_needs_layout();
    }

    /// Run the pending layout pass, if one was requested
    pub fn layout_if_needed(&mut self) {
        if self.needs_layout {
            self.container_will_layout_subviews();
        }
    }

    /// Container is about to lay out its subviews
    ///
    /// Skipped while the sheet is displaced by a drag. During the present or
    /// dismiss transition the frame is applied directly; otherwise it animates.
    pub fn container_will_layout_subviews(&mut self) {
        self.needs_layout = false;
        if !self.is_active() || self.host.presented_content().is_none() {
            return;
        }
        if !self.surfaces.presented.transform.is_identity() {
            tracing::trace!("SheetPresentation::layout - skipped, sheet displaced");
            return;
        }
        if let Some(container) = self.host.container_bounds() {
            self.surfaces.dimming.frame = container.size().to_rect();
        }

        let target = self.target_frame();
        if self.phase.is_transitioning() {
            self.frame_animation = None;
            self.surfaces
                .set_presented_frame(target, &self.config.handle);
        } else {
            self.animate_frame(target, self.config.relayout_duration, Easing::EaseInOut);
        }
    }

    fn animate_frame(&mut self, target: Rect, duration: f32, easing: Easing) {
        let current = self.surfaces.presented.frame;
        let already_heading = self
            .frame_animation
            .as_ref()
            .is_some_and(|tween| *tween.target() == target);
        if already_heading || (self.frame_animation.is_none() && current == target) {
            return;
        }
        tracing::trace!("SheetPresentation::animate_frame - {:?} -> {:?}", current, target);
        self.frame_animation = Some(Tween::new(current, target, duration, easing));
    }

    fn animate_dimming(&mut self, target: f32, transition: TransitionContext) {
        if !self.surfaces.dimming.installed {
            return;
        }
        if !transition.animated {
            self.dimming_animation = None;
            self.surfaces.dimming.alpha = target;
            return;
        }
        let duration = transition
            .duration
            .unwrap_or(self.config.transition_duration);
        self.dimming_animation = Some(Tween::new(
            self.surfaces.dimming.alpha,
            target,
            duration,
            Easing::EaseInOut,
        ));
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Use `scroll` as the tracked scroll view instead of auto-detecting one
    pub fn set_tracked_scroll(&mut self, scroll: Option<Rc<dyn ScrollCollaborator>>) {
        self.scroll = scroll;
        self.scroll_explicit = true;
        if self.is_active() {
            self.subscribe_content_size();
            self.set_needs_layout();
        }
    }

    fn subscribe_content_size(&mut self) {
        self.content_size_events = self
            .scroll
            .as_ref()
            .and_then(|scroll| scroll.subscribe_content_size());
    }

    /// Drain pending keyboard and content-size notifications
    ///
    /// Returns true if anything was handled.
    pub fn process_events(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        let keyboard_notes = self
            .keyboard_events
            .as_ref()
            .map(|sub| sub.drain())
            .unwrap_or_default();
        let content_sizes = self
            .content_size_events
            .as_ref()
            .map(|sub| sub.drain())
            .unwrap_or_default();

        let handled = !keyboard_notes.is_empty() || !content_sizes.is_empty();
        for note in keyboard_notes {
            self.handle_keyboard(&note);
        }
        if let Some(size) = content_sizes.last() {
            tracing::trace!("SheetPresentation::process_events - content size {:?}", size);
            self.set_needs_layout();
        }
        handled
    }

    /// Apply one keyboard notification
    ///
    /// Notifications missing their timing, or a show/change missing its end
    /// frame, are ignored.
    pub fn handle_keyboard(&mut self, note: &KeyboardNotification) {
        let Some(timing) = note.timing() else {
            tracing::debug!("SheetPresentation::keyboard - {:?} without timing", note.kind);
            return;
        };

        match note.kind {
            KeyboardEventKind::WillShow => {
                let Some(height) = note.end_height() else {
                    tracing::debug!("SheetPresentation::keyboard - show without end frame");
                    return;
                };
                self.keyboard = KeyboardState::shown(height);
            }
            KeyboardEventKind::WillHide => {
                self.keyboard = KeyboardState::HIDDEN;
            }
            KeyboardEventKind::WillChangeFrame => {
                let Some(height) = note.end_height() else {
                    tracing::debug!("SheetPresentation::keyboard - frame change without end frame");
                    return;
                };
                self.keyboard.height = height;
            }
        }

        tracing::debug!(
            "SheetPresentation::keyboard - {:?}, now {:?}",
            note.kind,
            self.keyboard
        );

        if self.host.presented_content().is_none() || self.host.container_bounds().is_none() {
            return;
        }
        let target = self.target_frame();
        self.animate_frame(target, timing.duration as f32, Easing::from_raw(timing.curve));
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    fn scroll_gate(&self) -> Option<ScrollGate> {
        self.scroll
            .as_ref()
            .map(|scroll| ScrollGate::of(scroll.as_ref()))
    }

    /// Whether the sheet drag may begin for `sample`
    pub fn gesture_should_begin(&self, sample: &PanSample) -> bool {
        gesture::should_begin_sheet_drag(sample.direction(), self.scroll_gate())
    }

    /// Whether the sheet drag must wait for `other` to fail
    pub fn should_be_required_to_fail_by(&self, other: RecognizerId) -> bool {
        let scroll_pan = self.scroll.as_ref().map(|scroll| scroll.pan_recognizer());
        gesture::should_require_failure_of(other, scroll_pan)
    }

    /// Route a raw touch through the session's recognizers
    pub fn handle_touch(&mut self, target: TouchTarget, touch: &Touch) {
        if !self.recognizers_attached {
            return;
        }
        match target {
            TouchTarget::Dimming => {
                if self.dimming_tap.process(touch).is_some() {
                    self.handle_dimming_tap();
                }
            }
            TouchTarget::Presented | TouchTarget::Container => {
                let gate = self.scroll_gate();
                let recognizer = if target == TouchTarget::Presented {
                    &mut self.presented_pan
                } else {
                    &mut self.container_pan
                };
                let sample = recognizer.process_with(touch, |candidate| {
                    gesture::should_begin_sheet_drag(candidate.direction(), gate)
                });
                if let Some(sample) = sample {
                    self.handle_pan(&sample);
                }
            }
        }
    }

    /// Apply one pan sample from a sheet drag recognizer
    pub fn handle_pan(&mut self, sample: &PanSample) {
        if !self.is_active() {
            return;
        }
        if self.host.container_bounds().is_none() || self.host.presented_content().is_none() {
            tracing::trace!("SheetPresentation::handle_pan - surfaces missing");
            return;
        }

        let ctx = DragContext {
            presented_height: self.surfaces.presented.frame.height(),
            dismiss_allowed: self.config.allows_dismissing,
            dismiss_velocity: self.config.dismiss_velocity,
            policy: self.policy,
        };

        match self.drag.handle(sample, &ctx) {
            DragOutput::None => {}
            DragOutput::Update { offset, dimming } => {
                if self.snap_back.take().is_some() {
                    tracing::debug!("SheetPresentation::handle_pan - snap-back interrupted");
                }
                // The drag owns the dimming from here on
                self.dimming_animation = None;
                self.surfaces.set_offset(offset);
                self.surfaces.dimming.alpha = dimming;
            }
            DragOutput::Dismiss => {
                tracing::debug!("SheetPresentation::handle_pan - dismissing");
                self.host.dismiss(true);
            }
            DragOutput::SnapBack => self.start_snap_back(),
        }
    }

    fn start_snap_back(&mut self) {
        let snap = &self.config.snap_back;
        self.dimming_animation = None;
        self.snap_back = Some(SnapBack {
            progress: Spring::progress(snap.spring()).with_velocity(snap.initial_velocity),
            from_offset: self.surfaces.offset(),
            from_dimming: self.surfaces.dimming.alpha,
        });
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance by `dt` seconds
    ///
    /// Drains notifications, runs a pending layout pass, then steps the frame,
    /// dimming and snap-back animations. Returns true while anything is still
    /// animating.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.process_events();
        self.layout_if_needed();

        if let Some(tween) = self.frame_animation.as_mut() {
            let frame = tween.advance(dt);
            let finished = tween.is_finished();
            self.surfaces.set_presented_frame(frame, &self.config.handle);
            if finished {
                self.frame_animation = None;
            }
        }

        if let Some(tween) = self.dimming_animation.as_mut() {
            self.surfaces.dimming.alpha = tween.advance(dt).clamp(0.0, 1.0);
            if tween.is_finished() {
                self.dimming_animation = None;
            }
        }

        self.step_snap_back(dt);

        self.frame_animation.is_some()
            || self.dimming_animation.is_some()
            || self.snap_back.is_some()
    }

    fn step_snap_back(&mut self, dt: f32) {
        let Some(snap) = self.snap_back.as_mut() else {
            return;
        };

        let mut remaining = dt.max(0.0);
        while remaining > 0.0 && !snap.progress.is_settled() {
            let step = remaining.min(MAX_SPRING_STEP);
            snap.progress.step(step);
            remaining -= step;
        }

        if snap.progress.is_settled() {
            self.snap_back = None;
            self.surfaces.reset_transforms();
            self.surfaces.dimming.alpha = 1.0;
            self.drag.settled();
            tracing::debug!("SheetPresentation::snap_back - settled");
        } else {
            let (offset, dimming) = (snap.offset(), snap.dimming());
            self.surfaces.set_offset(offset);
            self.surfaces.dimming.alpha = dimming;
        }
    }
}

impl<H: SheetHost> std::fmt::Debug for SheetPresentation<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetPresentation")
            .field("phase", &self.phase)
            .field("drag", &self.drag.state())
            .field("keyboard", &self.keyboard)
            .field("frame", &self.surfaces.presented.frame)
            .field("tracking_scroll", &self.scroll.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PresentedContent;
    use sheetkit_core::{EdgeInsets, Vec2};
    use sheetkit_platform::{EventSource, GesturePhase, TouchPhase};
    use std::cell::Cell;

    use crate::scroll::ScrollMetrics;

    #[derive(Default)]
    struct TestHost {
        container: Option<Rect>,
        content: Option<PresentedContent>,
        preferred: Option<Size>,
        dismiss_requests: usize,
        scroll: Option<Rc<dyn ScrollCollaborator>>,
    }

    impl TestHost {
        fn new() -> Self {
            Self {
                container: Some(Rect::new(0.0, 0.0, 400.0, 800.0)),
                content: Some(PresentedContent::new(Size::new(400.0, 300.0))),
                ..Default::default()
            }
        }
    }

    impl SheetHost for TestHost {
        fn container_bounds(&self) -> Option<Rect> {
            self.container
        }

        fn presented_content(&self) -> Option<PresentedContent> {
            self.content.map(|mut content| {
                if let Some(size) = self.preferred {
                    content.preferred_size = size;
                }
                content
            })
        }

        fn presenting_size(&self) -> Option<Size> {
            None
        }

        fn set_preferred_content_size(&mut self, size: Size) {
            self.preferred = Some(size);
        }

        fn dismiss(&mut self, _animated: bool) {
            self.dismiss_requests += 1;
        }

        fn first_content_scroll(&self) -> Option<Rc<dyn ScrollCollaborator>> {
            self.scroll.clone()
        }
    }

    struct TestScroll {
        metrics: Cell<ScrollMetrics>,
        tracking: Cell<bool>,
        pan: RecognizerId,
        sizes: EventSource<Size>,
    }

    impl TestScroll {
        fn new(offset_y: f32) -> Rc<Self> {
            Rc::new(Self {
                metrics: Cell::new(ScrollMetrics::new(
                    offset_y,
                    1000.0,
                    EdgeInsets::ZERO,
                    400.0,
                )),
                tracking: Cell::new(true),
                pan: RecognizerId::next(),
                sizes: EventSource::new(),
            })
        }
    }

    impl ScrollCollaborator for TestScroll {
        fn metrics(&self) -> ScrollMetrics {
            self.metrics.get()
        }

        fn is_tracking(&self) -> bool {
            self.tracking.get()
        }

        fn pan_recognizer(&self) -> RecognizerId {
            self.pan
        }

        fn subscribe_content_size(&self) -> Option<Subscription<Size>> {
            Some(self.sizes.subscribe())
        }
    }

    fn presented(host: TestHost, config: SheetConfig) -> SheetPresentation<TestHost> {
        let mut sheet = present_sheet(host, PresentationContext::new(config));
        sheet.will_present(TransitionContext::immediate());
        sheet.presentation_did_end(true);
        sheet
    }

    fn settle(sheet: &mut SheetPresentation<TestHost>) {
        for _ in 0..600 {
            if !sheet.tick(1.0 / 60.0) {
                return;
            }
        }
        panic!("sheet never settled");
    }

    #[test]
    fn test_will_present_installs_surfaces() {
        let mut sheet = present_sheet(TestHost::new(), PresentationContext::default());
        sheet.will_present(TransitionContext::animated());

        let surfaces = sheet.surfaces();
        assert_eq!(sheet.phase(), TransitionPhase::Presenting);
        assert_eq!(surfaces.presented.frame, Rect::new(0.0, 500.0, 400.0, 300.0));
        assert!(surfaces.dimming.installed);
        assert_eq!(surfaces.dimming.alpha, 0.0);
        assert!(surfaces.backing.installed);
        assert_eq!(surfaces.backing.frame.y(), 799.0);
        assert!(surfaces.handle.installed);
        assert!(sheet.recognizers().is_some());

        settle(&mut sheet);
        assert_eq!(sheet.surfaces().dimming.alpha, 1.0);
    }

    #[test]
    fn test_layout_skipped_while_displaced() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 40.0, 0.0));

        sheet.host_mut().content = Some(PresentedContent::new(Size::new(400.0, 500.0)));
        sheet.host_mut().preferred = None;
        sheet.container_will_layout_subviews();
        assert!(sheet.frame_animation.is_none());
        assert_eq!(sheet.surfaces().presented.frame.height(), 300.0);
    }

    #[test]
    fn test_layout_animates_after_presentation() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.host_mut().content = Some(PresentedContent::new(Size::new(400.0, 500.0)));
        sheet.preferred_content_size_did_change();
        assert!(sheet.needs_layout());

        assert!(sheet.tick(0.0));
        let tween = sheet.frame_animation.as_ref().expect("relayout animation");
        assert!((tween.duration() - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(tween.easing(), Easing::EaseInOut);

        settle(&mut sheet);
        assert_eq!(sheet.surfaces().presented.frame, Rect::new(0.0, 300.0, 400.0, 500.0));
    }

    #[test]
    fn test_layout_during_transition_is_immediate() {
        let mut sheet = present_sheet(TestHost::new(), PresentationContext::default());
        sheet.will_present(TransitionContext::animated());
        sheet.host_mut().content = Some(PresentedContent::new(Size::new(400.0, 200.0)));
        sheet.container_will_layout_subviews();
        assert!(sheet.frame_animation.is_none());
        assert_eq!(sheet.surfaces().presented.frame.height(), 200.0);
    }

    #[test]
    fn test_keyboard_show_and_hide() {
        let keyboard = EventSource::new();
        let context = PresentationContext::default().keyboard(keyboard.subscribe());
        let mut sheet = present_sheet(TestHost::new(), context);
        sheet.will_present(TransitionContext::immediate());
        sheet.presentation_did_end(true);

        keyboard.send(KeyboardNotification::will_show(
            Rect::new(0.0, 500.0, 400.0, 300.0),
            0.25,
            7,
        ));
        assert!(sheet.process_events());
        assert_eq!(sheet.keyboard(), KeyboardState::shown(300.0));
        let tween = sheet.frame_animation.as_ref().expect("keyboard relayout");
        assert_eq!(tween.easing(), Easing::Keyboard);
        assert_eq!(tween.target().max_y(), 500.0);

        keyboard.send(KeyboardNotification::will_hide(Rect::ZERO, 0.25, 7));
        settle(&mut sheet);
        assert_eq!(sheet.keyboard(), KeyboardState::HIDDEN);
        assert_eq!(sheet.surfaces().presented.frame.max_y(), 800.0);
    }

    #[test]
    fn test_incomplete_keyboard_payload_ignored() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_keyboard(&KeyboardNotification::new(KeyboardEventKind::WillShow));
        sheet.handle_keyboard(
            &KeyboardNotification::new(KeyboardEventKind::WillShow).with_timing(0.25, 7),
        );
        assert_eq!(sheet.keyboard(), KeyboardState::HIDDEN);
        assert!(sheet.frame_animation.is_none());
    }

    #[test]
    fn test_drag_updates_sheet_and_backing() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Changed, 150.0, 0.0));
        let surfaces = sheet.surfaces();
        assert_eq!(surfaces.offset(), 150.0);
        assert_eq!(surfaces.backing.transform, surfaces.presented.transform);
        assert_eq!(surfaces.dimming.alpha, 0.5);
        assert_eq!(sheet.drag_state(), DragState::Dragging);
    }

    #[test]
    fn test_drag_without_container_is_noop() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.host_mut().container = None;
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 150.0, 0.0));
        assert!(sheet.surfaces().presented.transform.is_identity());
        assert_eq!(sheet.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_drag_without_presented_content_is_noop() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.host_mut().content = None;
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 150.0, 0.0));
        assert!(sheet.surfaces().presented.transform.is_identity());
        assert_eq!(sheet.surfaces().dimming.alpha, 1.0);
        assert_eq!(sheet.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_drag_during_present_fade_owns_dimming() {
        let mut sheet = present_sheet(TestHost::new(), PresentationContext::default());
        sheet.will_present(TransitionContext::animated());
        sheet.tick(0.05);
        assert!(sheet.surfaces().dimming.alpha < 0.5);

        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 150.0, 0.0));
        assert_eq!(sheet.surfaces().dimming.alpha, 0.5);
        sheet.tick(0.016);
        assert_eq!(sheet.surfaces().dimming.alpha, 0.5);
        assert_eq!(sheet.surfaces().offset(), 150.0);

        // Snap-back picks up from the drag's dimming, not the fade's
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 150.0, 0.0));
        sheet.tick(0.0);
        assert!(sheet.surfaces().dimming.alpha >= 0.5);
        settle(&mut sheet);
        assert_eq!(sheet.surfaces().dimming.alpha, 1.0);
        assert_eq!(sheet.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_declined_dismiss_snaps_back() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 250.0, 0.0));
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 250.0, 0.0));
        assert_eq!(sheet.drag_state(), DragState::Dismissing);
        assert_eq!(sheet.host().dismiss_requests, 1);

        // Host keeps the sheet: no will_dismiss arrives
        sheet.dismiss_declined();
        assert_eq!(sheet.drag_state(), DragState::SnappingBack);
        settle(&mut sheet);
        assert_eq!(sheet.drag_state(), DragState::Idle);
        assert!(sheet.surfaces().presented.transform.is_identity());
        assert_eq!(sheet.surfaces().dimming.alpha, 1.0);

        // Dragging works again
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 30.0, 0.0));
        assert_eq!(sheet.surfaces().offset(), 30.0);
        assert_eq!(sheet.drag_state(), DragState::Dragging);
    }

    #[test]
    fn test_dismiss_declined_ignored_once_dismissing() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 250.0, 0.0));
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 250.0, 0.0));
        sheet.will_dismiss(TransitionContext::animated());
        sheet.dismiss_declined();
        assert_eq!(sheet.drag_state(), DragState::Dismissing);
        assert!(sheet.snap_back.is_none());
    }

    #[test]
    fn test_snap_back_returns_to_rest() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 100.0, 0.0));
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 100.0, 0.0));
        assert_eq!(sheet.drag_state(), DragState::SnappingBack);

        assert!(sheet.tick(1.0 / 60.0));
        assert!(sheet.surfaces().offset() < 100.0);

        settle(&mut sheet);
        assert!(sheet.surfaces().presented.transform.is_identity());
        assert_eq!(sheet.surfaces().dimming.alpha, 1.0);
        assert_eq!(sheet.drag_state(), DragState::Idle);
        assert_eq!(sheet.host().dismiss_requests, 0);
    }

    #[test]
    fn test_fling_requests_dismiss() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 20.0, 900.0));
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 30.0, 900.0));
        assert_eq!(sheet.drag_state(), DragState::Dismissing);
        assert_eq!(sheet.host().dismiss_requests, 1);

        sheet.will_dismiss(TransitionContext::immediate());
        assert!(!sheet.surfaces().backing.installed);
        assert_eq!(sheet.surfaces().dimming.alpha, 0.0);

        sheet.dismissal_did_end(true);
        assert_eq!(sheet.phase(), TransitionPhase::Ended);
        assert_eq!(sheet.drag_state(), DragState::Idle);
        assert!(sheet.surfaces().presented.transform.is_identity());
        assert!(!sheet.surfaces().dimming.installed);
    }

    #[test]
    fn test_cancelled_dismissal_restores_sheet() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 250.0, 0.0));
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 250.0, 0.0));
        sheet.will_dismiss(TransitionContext::immediate());
        sheet.dismissal_did_end(false);

        assert_eq!(sheet.phase(), TransitionPhase::Presented);
        assert_eq!(sheet.drag_state(), DragState::Idle);
        assert!(sheet.surfaces().backing.installed);
        assert_eq!(sheet.surfaces().dimming.alpha, 1.0);
        assert!(sheet.surfaces().presented.transform.is_identity());
    }

    #[test]
    fn test_dismissal_disabled() {
        let mut sheet = presented(TestHost::new(), SheetConfig::new().allows_dismissing(false));
        sheet.handle_dimming_tap();
        assert_eq!(sheet.host().dismiss_requests, 0);

        sheet.handle_pan(&PanSample::vertical(GesturePhase::Began, 150.0, 0.0));
        assert_eq!(sheet.surfaces().offset(), 10.0);
        sheet.handle_pan(&PanSample::vertical(GesturePhase::Ended, 390.0, 3000.0));
        assert_eq!(sheet.drag_state(), DragState::SnappingBack);
        assert_eq!(sheet.host().dismiss_requests, 0);
    }

    #[test]
    fn test_dimming_tap_dismisses() {
        let mut sheet = presented(TestHost::new(), SheetConfig::default());
        sheet.handle_touch(TouchTarget::Dimming, &Touch::new(1, 20.0, 20.0, TouchPhase::Began, 0));
        sheet.handle_touch(TouchTarget::Dimming, &Touch::new(1, 21.0, 20.0, TouchPhase::Ended, 50));
        assert_eq!(sheet.host().dismiss_requests, 1);
    }

    #[test]
    fn test_scroll_auto_detected_and_gates_drag() {
        let scroll = TestScroll::new(300.0);
        let host = TestHost {
            scroll: Some(scroll.clone()),
            ..TestHost::new()
        };
        let sheet = presented(host, SheetConfig::default());
        assert!(sheet.tracked_scroll().is_some());

        let down = PanSample::new(GesturePhase::Began, Vec2::new(0.0, 20.0), Vec2::new(0.0, 300.0));
        assert!(!sheet.gesture_should_begin(&down));

        scroll.metrics.set(scroll.metrics.get().with_offset(0.0));
        assert!(sheet.gesture_should_begin(&down));

        scroll.tracking.set(false);
        scroll.metrics.set(scroll.metrics.get().with_offset(300.0));
        assert!(sheet.gesture_should_begin(&down));

        assert!(sheet.should_be_required_to_fail_by(scroll.pan));
        assert!(!sheet.should_be_required_to_fail_by(RecognizerId::next()));
    }

    #[test]
    fn test_scroll_content_size_requests_layout() {
        let scroll = TestScroll::new(0.0);
        let host = TestHost {
            scroll: Some(scroll.clone()),
            ..TestHost::new()
        };
        let mut sheet = presented(host, SheetConfig::default());
        assert_eq!(sheet.surfaces().presented.frame.height(), 720.0);

        scroll.sizes.send(Size::new(400.0, 200.0));
        scroll.metrics.set(ScrollMetrics::new(0.0, 200.0, EdgeInsets::ZERO, 400.0));
        sheet.process_events();
        assert!(sheet.needs_layout());

        settle(&mut sheet);
        assert_eq!(sheet.surfaces().presented.frame.height(), 200.0);
    }

    #[test]
    fn test_explicit_scroll_overrides_detection() {
        let detected = TestScroll::new(0.0);
        let explicit = TestScroll::new(0.0);
        let host = TestHost {
            scroll: Some(detected.clone()),
            ..TestHost::new()
        };
        let mut sheet = present_sheet(host, PresentationContext::default());
        sheet.set_tracked_scroll(Some(explicit.clone()));
        sheet.will_present(TransitionContext::immediate());

        assert!(sheet.should_be_required_to_fail_by(explicit.pan));
        assert!(!sheet.should_be_required_to_fail_by(detected.pan));
        assert_eq!(explicit.sizes.subscriber_count(), 1);
        assert_eq!(detected.sizes.subscriber_count(), 0);
    }

    #[test]
    fn test_session_end_releases_subscriptions() {
        let keyboard = EventSource::new();
        let scroll = TestScroll::new(0.0);
        let host = TestHost {
            scroll: Some(scroll.clone()),
            ..TestHost::new()
        };
        let mut sheet = present_sheet(host, PresentationContext::default().keyboard(keyboard.subscribe()));
        sheet.will_present(TransitionContext::immediate());
        sheet.presentation_did_end(false);

        assert_eq!(sheet.phase(), TransitionPhase::Ended);
        assert_eq!(keyboard.subscriber_count(), 0);
        assert_eq!(scroll.sizes.subscriber_count(), 0);
        assert!(sheet.recognizers().is_none());
    }
}
