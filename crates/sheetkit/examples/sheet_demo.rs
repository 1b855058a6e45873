//! Sheet Demo
//!
//! Headless walk through a sheet presentation: present, keyboard, a drag that
//! snaps back, a fling that dismisses. Prints the render state the host would
//! draw at each step.
//!
//! Run with: cargo run -p sheetkit --example sheet_demo [config.toml]
//! Set RUST_LOG=sheetkit=debug to see lifecycle decisions.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use sheetkit::prelude::*;
use sheetkit::{Color, TouchTarget};
use sheetkit_platform::{EventSource, Touch, TouchPhase};
use tracing_subscriber::EnvFilter;

const FRAME: f32 = 1.0 / 60.0;

const DEFAULT_CONFIG: &str = r#"
allows_dismissing = true
dismiss_velocity = 500.0

[snap_back]
duration = 0.5
damping_ratio = 0.65
"#;

/// Host side of the demo: a phone-sized container and a 320pt tall form
struct DemoHost {
    preferred: Size,
    dismissed: Rc<RefCell<bool>>,
}

impl SheetHost for DemoHost {
    fn container_bounds(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 390.0, 844.0))
    }

    fn presented_content(&self) -> Option<PresentedContent> {
        Some(
            PresentedContent::new(self.preferred)
                .background(Color::rgb(0.97, 0.97, 0.98)),
        )
    }

    fn presenting_size(&self) -> Option<Size> {
        Some(Size::new(390.0, 844.0))
    }

    fn set_preferred_content_size(&mut self, size: Size) {
        self.preferred = size;
    }

    fn dismiss(&mut self, animated: bool) {
        tracing::info!("host asked to dismiss (animated: {})", animated);
        *self.dismissed.borrow_mut() = true;
    }
}

fn run_until_idle(sheet: &mut SheetPresentation<DemoHost>, label: &str) {
    let mut frames = 0;
    while sheet.tick(FRAME) && frames < 600 {
        frames += 1;
    }
    let surfaces = sheet.surfaces();
    println!(
        "{label:<24} frame={:?} offset={:.1} dimming={:.2} drag={:?} ({} frames)",
        surfaces.presented.frame,
        surfaces.offset(),
        surfaces.dimming.alpha,
        sheet.drag_state(),
        frames
    );
}

fn drag(sheet: &mut SheetPresentation<DemoHost>, path: &[(f32, u64)]) {
    let last = path.len().saturating_sub(1);
    for (index, &(y, time_ms)) in path.iter().enumerate() {
        let phase = match index {
            0 => TouchPhase::Began,
            i if i == last => TouchPhase::Ended,
            _ => TouchPhase::Moved,
        };
        sheet.handle_touch(TouchTarget::Presented, &Touch::new(1, 195.0, y, phase, time_ms));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let source = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading sheet config from {path}"))?,
        None => DEFAULT_CONFIG.to_string(),
    };
    let config = SheetConfig::from_toml_str(&source).context("loading sheet config")?;

    let mut registry = TransitionRegistry::new();
    let id = registry.shared_delegate(config);

    let keyboard = EventSource::<KeyboardNotification>::new();
    let dismissed = Rc::new(RefCell::new(false));
    let host = DemoHost {
        preferred: Size::ZERO,
        dismissed: dismissed.clone(),
    };
    let mut sheet = registry
        .presentation_for(id, host, Some(keyboard.subscribe()))
        .context("presentation was not registered")?;

    sheet.will_present(TransitionContext::animated());
    sheet.host_mut().preferred = Size::new(390.0, 320.0);
    sheet.preferred_content_size_did_change();
    run_until_idle(&mut sheet, "presented");
    sheet.presentation_did_end(true);

    keyboard.send(KeyboardNotification::will_show(
        Rect::new(0.0, 508.0, 390.0, 336.0),
        0.25,
        7,
    ));
    run_until_idle(&mut sheet, "keyboard shown");

    keyboard.send(KeyboardNotification::will_hide(
        Rect::new(0.0, 844.0, 390.0, 336.0),
        0.25,
        7,
    ));
    run_until_idle(&mut sheet, "keyboard hidden");

    drag(&mut sheet, &[(560.0, 0), (590.0, 16), (640.0, 48), (640.0, 400)]);
    run_until_idle(&mut sheet, "short drag");

    drag(&mut sheet, &[(560.0, 1000), (580.0, 1016), (620.0, 1032), (640.0, 1048)]);
    if *dismissed.borrow() {
        sheet.will_dismiss(TransitionContext::animated());
        run_until_idle(&mut sheet, "dismissing");
        sheet.dismissal_did_end(true);
        registry.dismissal_animation_controller(id);
    }

    println!(
        "session {:?}, {} presentation(s) still registered",
        sheet.phase(),
        registry.len()
    );
    Ok(())
}
