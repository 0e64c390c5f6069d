//! Throw momentum
//!
//! After a drag is released with velocity, the track keeps travelling and
//! slows down with friction. Friction is specified per 1/60 s frame and
//! rescaled for the actual frame delta, so the throw distance does not depend
//! on the display refresh rate.

use serde::{Deserialize, Serialize};

/// Configuration for post-release momentum
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InertiaConfig {
    /// Velocity retained per 1/60 s (0.0-1.0, lower = stops sooner)
    pub friction: f32,
    /// Speed below which the throw ends (units per second)
    pub velocity_threshold: f32,
    /// Upper bound on release speed (units per second)
    pub max_velocity: f32,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            friction: 0.95,
            velocity_threshold: 0.5,
            max_velocity: 5000.0,
        }
    }
}

impl InertiaConfig {
    /// No momentum: releases stop immediately
    pub fn none() -> Self {
        Self {
            friction: 0.0,
            ..Default::default()
        }
    }
}

/// Decaying velocity fed into a track after release
#[derive(Clone, Copy, Debug, Default)]
pub struct Inertia {
    config: InertiaConfig,
    velocity: f32,
    active: bool,
}

impl Inertia {
    pub fn new(config: InertiaConfig) -> Self {
        Self {
            config,
            velocity: 0.0,
            active: false,
        }
    }

    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a throw; returns false when the velocity is too small to move
    pub fn throw(&mut self, velocity: f32) -> bool {
        if !velocity.is_finite() || self.config.friction <= 0.0 {
            self.cancel();
            return false;
        }
        let max = self.config.max_velocity.abs();
        self.velocity = velocity.clamp(-max, max);
        self.active = self.velocity.abs() >= self.config.velocity_threshold;
        if !self.active {
            self.velocity = 0.0;
        }
        self.active
    }

    /// Stop immediately, discarding residual momentum
    pub fn cancel(&mut self) {
        self.velocity = 0.0;
        self.active = false;
    }

    /// Advance by `dt` seconds
    ///
    /// Returns the distance travelled this tick, or `None` once settled.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        if !self.active {
            return None;
        }

        let distance = self.velocity * dt;
        self.velocity *= self.config.friction.powf(dt * 60.0);

        // Subnormal speeds stop decaying, so they end the throw too
        let speed = self.velocity.abs();
        if speed < self.config.velocity_threshold || speed < f32::MIN_POSITIVE {
            self.cancel();
        }

        Some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_decelerates_and_settles() {
        let mut inertia = Inertia::new(InertiaConfig::default());
        assert!(inertia.throw(1200.0));

        let initial = inertia.velocity();
        let travelled = inertia.tick(1.0 / 60.0).unwrap();
        assert!(travelled > 0.0);
        assert!(inertia.velocity() < initial);

        let mut total = travelled;
        for _ in 0..2000 {
            match inertia.tick(1.0 / 60.0) {
                Some(d) => total += d,
                None => break,
            }
        }
        assert!(!inertia.is_active());
        // Geometric series bound: v * dt / (1 - friction)
        assert!(total < 1200.0 / 60.0 / 0.05 + 1.0);
    }

    #[test]
    fn test_frame_rate_independence() {
        let mut at_60 = Inertia::new(InertiaConfig::default());
        let mut at_120 = Inertia::new(InertiaConfig::default());
        at_60.throw(600.0);
        at_120.throw(600.0);

        for _ in 0..30 {
            at_60.tick(1.0 / 60.0);
        }
        for _ in 0..60 {
            at_120.tick(1.0 / 120.0);
        }
        assert!((at_60.velocity() - at_120.velocity()).abs() < 0.5);
    }

    #[test]
    fn test_cancel_stops_momentum() {
        let mut inertia = Inertia::new(InertiaConfig::default());
        inertia.throw(-800.0);
        inertia.cancel();
        assert_eq!(inertia.tick(1.0 / 60.0), None);
        assert_eq!(inertia.velocity(), 0.0);
    }

    #[test]
    fn test_small_or_invalid_throws_ignored() {
        let mut inertia = Inertia::new(InertiaConfig::default());
        assert!(!inertia.throw(0.1));
        assert!(!inertia.throw(f32::NAN));
        assert!(!inertia.is_active());

        let mut none = Inertia::new(InertiaConfig::none());
        assert!(!none.throw(1000.0));
    }

    #[test]
    fn test_zero_threshold_still_settles() {
        let mut inertia = Inertia::new(InertiaConfig {
            velocity_threshold: 0.0,
            ..Default::default()
        });
        assert!(inertia.throw(600.0));

        let mut ticks = 0;
        while inertia.tick(1.0 / 60.0).is_some() {
            ticks += 1;
            assert!(ticks < 10_000, "throw never settled");
        }
        assert!(!inertia.is_active());
        assert_eq!(inertia.velocity(), 0.0);
    }

    #[test]
    fn test_release_speed_clamped() {
        let mut inertia = Inertia::new(InertiaConfig::default());
        inertia.throw(1.0e9);
        assert_eq!(inertia.velocity(), 5000.0);
    }
}
