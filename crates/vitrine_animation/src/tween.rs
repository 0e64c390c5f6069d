//! Fixed-duration tweens
//!
//! A [`Tween`] interpolates one scalar from a start to an end value over a
//! duration with an easing curve. [`QuickTo`] wraps a tween that can be
//! retargeted every frame: each new target restarts the tween from the value
//! currently displayed, so a pointer-following element never jumps.

use crate::easing::Easing;

/// A single scalar tween, timed in seconds
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// A tween that is already finished at `value`
    pub fn settled(value: f32) -> Self {
        Self::new(value, value, 0.0, Easing::Linear)
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Normalized progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `dt` seconds; returns true while still running
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.elapsed += dt.max(0.0);
        !self.is_finished()
    }
}

/// A retargetable tween with fixed duration and easing
#[derive(Clone, Copy, Debug)]
pub struct QuickTo {
    tween: Tween,
    duration: f32,
    easing: Easing,
}

impl QuickTo {
    pub fn new(initial: f32, duration: f32, easing: Easing) -> Self {
        Self {
            tween: Tween::settled(initial),
            duration,
            easing,
        }
    }

    /// Start moving toward `target` from the current value
    pub fn set(&mut self, target: f32) {
        let from = self.tween.value();
        self.tween = Tween::new(from, target, self.duration, self.easing);
    }

    /// Jump to `value` immediately
    pub fn snap(&mut self, value: f32) {
        self.tween = Tween::settled(value);
    }

    pub fn value(&self) -> f32 {
        self.tween.value()
    }

    pub fn target(&self) -> f32 {
        self.tween.target()
    }

    pub fn is_settled(&self) -> bool {
        self.tween.is_finished()
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        self.tween.tick(dt)
    }
}
