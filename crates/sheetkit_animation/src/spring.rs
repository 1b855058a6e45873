//! Spring physics animation
//!
//! RK4-integrated spring physics for the sheet's snap-back motion.
//! Configurations can be given directly (stiffness, damping, mass) or in the
//! duration / damping-ratio form that UIKit's spring animations use.

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Envelope exponent reached by the end of a `from_duration` spring
    const SETTLE_DECAY: f32 = 10.0;

    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Build a unit-mass spring from a total duration and damping ratio
    ///
    /// `duration` is the time in seconds for the motion to decay to rest
    /// (envelope down to `e^-10` of its travel) and `damping_ratio` is the
    /// fraction of critical damping (1.0 = no overshoot). A non-positive
    /// duration is treated as an effectively instant spring.
    pub fn from_duration(duration: f32, damping_ratio: f32) -> Self {
        let duration = duration.max(0.001);
        let ratio = damping_ratio.max(0.0);
        // Slowest decay rate per unit of angular frequency
        let decay = if ratio < 1.0 {
            ratio.max(0.05)
        } else {
            ratio - (ratio * ratio - 1.0).sqrt()
        };
        let angular = Self::SETTLE_DECAY / (decay * duration);
        Self {
            stiffness: angular * angular,
            damping: 2.0 * ratio * angular,
            mass: 1.0,
        }
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
        }
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Ratio of this spring's damping to critical damping
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_epsilon: f32,
    rest_velocity: f32,
}

impl Spring {
    /// Settling thresholds tuned for values measured in points
    const POINT_EPSILON: f32 = 0.5;
    const POINT_VELOCITY_EPSILON: f32 = 5.0;

    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_epsilon: Self::POINT_EPSILON,
            rest_velocity: Self::POINT_VELOCITY_EPSILON,
        }
    }

    /// Spring over a normalized 0..1 progress value
    ///
    /// Uses settling thresholds fine enough for fractions, so the value is not
    /// snapped to the target while still visibly moving.
    pub fn progress(config: SpringConfig) -> Self {
        let mut spring = Self::new(config, 0.0);
        spring.target = 1.0;
        spring.rest_epsilon = 0.001;
        spring.rest_velocity = 0.01;
        spring
    }

    /// Set the starting velocity (units per second)
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Check if the spring has settled (within epsilon of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest_epsilon
            && self.velocity.abs() < self.rest_velocity
    }

    /// Step the spring simulation using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
