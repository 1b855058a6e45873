//! Sheetkit Animation System
//!
//! Spring physics and timed tweens for sheet motion.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass,
//!   or the duration / damping-ratio form used by platform spring animations
//! - **Tweens**: fixed-duration interpolation for frames and opacities
//! - **Easing**: platform curves, including the keyboard's own curve
//! - **Interruptible**: springs keep their velocity when retargeted

pub mod easing;
pub mod spring;
pub mod tween;
pub mod values;

pub use easing::Easing;
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
pub use values::Interpolate;
