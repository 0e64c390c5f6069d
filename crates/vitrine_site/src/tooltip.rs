//! Hover caption following the pointer
//!
//! The caption starts hidden and parked off-screen. Entering the featured
//! image fades it in, leaving fades it out, and pointer movement retargets
//! its position with a short quick-to so it trails the cursor at a fixed
//! offset.

use serde::{Deserialize, Serialize};
use tracing::trace;
use vitrine_animation::{Animate, Easing, QuickTo, Tween};
use vitrine_core::{Result, VitrineError};

/// Off-screen coordinate used before the pointer first moves
pub const PARKED: f32 = -9999.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Horizontal distance from the pointer, in pixels
    pub offset_x: f32,
    /// Vertical distance from the pointer, in pixels
    pub offset_y: f32,
    /// Seconds to catch up with the pointer
    pub follow_duration: f32,
    pub follow_easing: Easing,
    /// Seconds to fade in or out
    pub fade_duration: f32,
    pub fade_easing: Easing,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 180.0,
            offset_y: 50.0,
            follow_duration: 0.1,
            follow_easing: Easing::EaseOutQuart,
            fade_duration: 0.2,
            fade_easing: Easing::EaseOutCubic,
        }
    }
}

impl TooltipConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.follow_duration >= 0.0 && self.fade_duration >= 0.0) {
            return Err(VitrineError::InvalidConfig(
                "tooltip durations must not be negative".to_string(),
            ));
        }
        if !(self.offset_x.is_finite() && self.offset_y.is_finite()) {
            return Err(VitrineError::InvalidConfig(
                "tooltip offsets must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Snapshot of what the host should apply to the caption element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipStyle {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    /// False once fully transparent, so the caption stops catching the pointer
    pub visible: bool,
}

/// Caption state driven by hover and pointer events
#[derive(Clone, Debug)]
pub struct Tooltip {
    config: TooltipConfig,
    alpha: Tween,
    x: QuickTo,
    y: QuickTo,
    hovered: bool,
}

impl Tooltip {
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            alpha: Tween::settled(0.0),
            x: QuickTo::new(PARKED, config.follow_duration, config.follow_easing),
            y: QuickTo::new(PARKED, config.follow_duration, config.follow_easing),
            hovered: false,
            config,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.fade_to(1.0);
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.fade_to(0.0);
    }

    /// Pointer moved to client coordinates `(x, y)`
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.x.set(x + self.config.offset_x);
        self.y.set(y + self.config.offset_y);
    }

    pub fn opacity(&self) -> f32 {
        self.alpha.value()
    }

    pub fn visible(&self) -> bool {
        self.alpha.value() > 0.0
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x.value(), self.y.value())
    }

    pub fn style(&self) -> TooltipStyle {
        let (x, y) = self.position();
        TooltipStyle {
            x,
            y,
            opacity: self.opacity(),
            visible: self.visible(),
        }
    }

    /// Advance every tween by `dt` seconds; returns true while still moving
    pub fn step(&mut self, dt: f32) -> bool {
        let fading = self.alpha.tick(dt);
        let moving_x = self.x.tick(dt);
        let moving_y = self.y.tick(dt);
        fading || moving_x || moving_y
    }

    fn fade_to(&mut self, target: f32) {
        let from = self.alpha.value();
        trace!("Tooltip fade {:.2} -> {:.2}", from, target);
        self.alpha = Tween::new(
            from,
            target,
            self.config.fade_duration,
            self.config.fade_easing,
        );
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new(TooltipConfig::default())
    }
}

impl Animate for Tooltip {
    fn tick(&mut self, dt: f32) -> bool {
        self.step(dt)
    }
}
