//! # Motion Collaborators
//!
//! The boss does not own its movement math. It consults two collaborators
//! every moving tick:
//!
//! - a [`SpeedEasing`] that ramps the current speed toward the configured
//!   maximum based on how long the leg has been running, and
//! - a [`MotionSmoother`] that advances the position toward the leg target.
//!
//! Both are traits so the host (or a test) can swap them. The defaults are
//! [`LinearRamp`] and the critically damped [`SmoothDamp`].

use winger_event_system::Vec3;

/// Smallest smoothing time the damped spring accepts.
const MIN_SMOOTH_TIME: f64 = 0.0001;

/// Ramps the current speed of a mover toward a maximum.
pub trait SpeedEasing: Send {
    /// Returns the eased speed after `elapsed` seconds of the current leg.
    fn ease(&self, current: f64, max: f64, elapsed: f64) -> f64;
}

/// Linear interpolation from the current speed toward the maximum, reaching
/// it after `ramp_seconds` of leg time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRamp {
    pub ramp_seconds: f64,
}

impl LinearRamp {
    pub fn new(ramp_seconds: f64) -> Self {
        Self { ramp_seconds }
    }
}

impl SpeedEasing for LinearRamp {
    fn ease(&self, current: f64, max: f64, elapsed: f64) -> f64 {
        if self.ramp_seconds <= 0.0 {
            return max;
        }
        let t = (elapsed / self.ramp_seconds).clamp(0.0, 1.0);
        current + (max - current) * t
    }
}

/// Advances a position toward a target.
pub trait MotionSmoother: Send {
    /// Returns the new position after `delta` seconds and updates `velocity`.
    ///
    /// `smooth_time` is the approximate time to reach the target and
    /// `max_speed` caps how fast the smoother may move. Callers only pass
    /// finite smoothing times.
    fn step(
        &self,
        current: Vec3,
        target: Vec3,
        velocity: &mut Vec3,
        smooth_time: f64,
        max_speed: f64,
        delta: f64,
    ) -> Vec3;
}

/// Critically damped spring toward the target.
///
/// Uses the cubic approximation of `exp(-omega * dt)`, caps the per-step
/// change by `max_speed * smooth_time` and never overshoots: if the step
/// would carry the position past the target it stops exactly on it with zero
/// velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothDamp;

impl MotionSmoother for SmoothDamp {
    fn step(
        &self,
        current: Vec3,
        target: Vec3,
        velocity: &mut Vec3,
        smooth_time: f64,
        max_speed: f64,
        delta: f64,
    ) -> Vec3 {
        if delta <= 0.0 {
            return current;
        }

        let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
        let omega = 2.0 / smooth_time;
        let x = omega * delta;
        let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let original_target = target;
        let change = (current - target).clamp_length(max_speed * smooth_time);
        let target = current - change;

        let temp = (*velocity + change * omega) * delta;
        *velocity = (*velocity - temp * omega) * exp;
        let mut output = target + (change + temp) * exp;

        if (original_target - current).dot(output - original_target) > 0.0 {
            output = original_target;
            *velocity = Vec3::zero();
        }

        output
    }
}
