//! Wrap-around position engine
//!
//! Drives a looping carousel: input intents accumulate into a `target`
//! offset, every frame `current` closes a fixed fraction of the remaining
//! distance, and each slot is rendered at `current` folded back into one
//! period around the viewport. Motion looks infinite in both directions.
//!
//! Input handling and rendering are split: [`WrapEngine::apply_input`] only
//! touches `target` and the throw state, while [`WrapEngine::step`] is the
//! sole writer of `current` and of rendered positions.
//!
//! # Example
//!
//! ```rust
//! use vitrine_animation::{EngineConfig, FrameOutcome, Track, WrapEngine};
//! use vitrine_core::Intent;
//!
//! let track = Track::from_extents(&[100.0, 100.0, 100.0]).unwrap();
//! let config = EngineConfig { ease_factor: 0.5, scroll_speed: 1.0, ..Default::default() };
//! let mut engine = WrapEngine::new(track, config, Vec::<f32>::new());
//!
//! engine.apply_input(Intent::Scroll(300.0));
//! assert_eq!(engine.step(1.0 / 60.0), FrameOutcome::Rendered);
//! assert_eq!(engine.current(), 150.0);
//! assert_eq!(engine.sink(), &vec![150.0, -50.0, 50.0]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use vitrine_core::{
    event_types, Axis, GestureState, InputSource, Intent, LayoutSource, Result, SlotSink,
    StateTransitions, VitrineError,
};

use crate::inertia::{Inertia, InertiaConfig};
use crate::scheduler::Animate;
use crate::track::{Track, WrapMode};

/// Tuning for a wrap-around track
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Axis the track scrolls along
    pub axis: Axis,
    /// Fraction of the remaining distance closed per frame, in (0, 1]
    pub ease_factor: f32,
    /// Distances below this are treated as arrived
    pub epsilon: f32,
    /// Multiplier for wheel/touch deltas
    pub scroll_speed: f32,
    /// Multiplier for drag and throw deltas
    pub drag_speed: f32,
    /// Wrap correction strategy
    pub wrap: WrapMode,
    /// Constant autoplay velocity in track units per second (marquees)
    pub drift: f32,
    /// Post-release momentum
    pub inertia: InertiaConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            ease_factor: 0.08,
            epsilon: 0.01,
            scroll_speed: 0.04,
            drag_speed: 0.08,
            wrap: WrapMode::PerSlot,
            drift: 0.0,
            inertia: InertiaConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Config for a fixed-width marquee drifting at `velocity` units per second
    pub fn marquee(velocity: f32) -> Self {
        Self {
            wrap: WrapMode::HalfPeriod,
            drift: velocity,
            ..Default::default()
        }
    }

    /// Check every value is within its accepted range
    pub fn validate(&self) -> Result<()> {
        if !(self.ease_factor > 0.0 && self.ease_factor <= 1.0) {
            return Err(VitrineError::InvalidConfig(format!(
                "ease_factor must be in (0, 1], got {}",
                self.ease_factor
            )));
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(VitrineError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        for (name, value) in [
            ("scroll_speed", self.scroll_speed),
            ("drag_speed", self.drag_speed),
            ("drift", self.drift),
        ] {
            if !value.is_finite() {
                return Err(VitrineError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        let friction = self.inertia.friction;
        if !(0.0..1.0).contains(&friction) {
            return Err(VitrineError::InvalidConfig(format!(
                "inertia.friction must be in [0, 1), got {friction}"
            )));
        }
        let threshold = self.inertia.velocity_threshold;
        if !(threshold > 0.0 && threshold.is_finite()) {
            return Err(VitrineError::InvalidConfig(format!(
                "inertia.velocity_threshold must be positive, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Result of one engine frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing moved; no positions were written
    Idle,
    /// `current` advanced and every slot position was written
    Rendered,
}

/// Looping carousel state for one track
pub struct WrapEngine<S: SlotSink> {
    track: Track,
    config: EngineConfig,
    current: f32,
    target: f32,
    inertia: Inertia,
    gesture: GestureState,
    positions: Vec<f32>,
    sink: S,
}

impl<S: SlotSink> WrapEngine<S> {
    /// Create an engine at offset zero
    ///
    /// The config is used as given; see [`EngineConfig::validate`].
    pub fn new(track: Track, config: EngineConfig, sink: S) -> Self {
        let positions = track.slots().iter().map(|slot| slot.base).collect();
        Self {
            inertia: Inertia::new(config.inertia),
            track,
            config,
            current: 0.0,
            target: 0.0,
            gesture: GestureState::Idle,
            positions,
            sink,
        }
    }

    /// Measure `layout`, build the engine and place every slot
    ///
    /// A missing layout or invalid config means the feature is unavailable
    /// on this page: the failure is logged and `None` returned.
    pub fn setup(layout: &dyn LayoutSource, config: EngineConfig, sink: S) -> Option<Self> {
        if let Err(err) = config.validate() {
            warn!("Carousel disabled: {}", err);
            return None;
        }

        let track = match Track::measure(layout) {
            Ok(track) => track,
            Err(err) => {
                warn!("Carousel disabled: {}", err);
                return None;
            }
        };

        debug!(
            "Carousel ready: {} slots, period {:.2}, wrap {:?}",
            track.len(),
            track.period(),
            config.wrap
        );

        let mut engine = Self::new(track, config, sink);
        engine.render();
        Some(engine)
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn inertia(&self) -> &Inertia {
        &self.inertia
    }

    /// Positions written by the last render, in slot order
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// True when nothing will move on the next frame
    pub fn is_settled(&self) -> bool {
        (self.target - self.current).abs() < self.config.epsilon
            && !self.inertia.is_active()
            && self.config.drift == 0.0
    }

    /// Consume one input intent
    ///
    /// Only `target` and the throw state change; `current` and the rendered
    /// positions wait for the next [`step`](Self::step). Deltas that would
    /// make `target` non-finite are dropped, and a release without a
    /// preceding press is ignored.
    pub fn apply_input(&mut self, intent: Intent) {
        if let Some(delta) = intent.delta() {
            let moved = self.target + delta * self.speed(intent.source());
            if !moved.is_finite() {
                warn!("Ignoring non-finite {:?}", intent);
                return;
            }
            self.target = moved;
        }

        match intent {
            Intent::Scroll(_) => {
                self.transition(event_types::SCROLL);
            }
            Intent::ScrollEnd => {
                self.transition(event_types::SCROLL_END);
            }
            Intent::DragStart => {
                if self.inertia.is_active() {
                    debug!(
                        "Press cancelled throw (velocity {:.1})",
                        self.inertia.velocity()
                    );
                }
                self.inertia.cancel();
                self.transition(event_types::PRESS);
            }
            Intent::Drag(_) => {
                self.transition(event_types::DRAG);
            }
            Intent::DragEnd { velocity } => {
                if !self.gesture.is_dragging() {
                    debug!("Release without press ignored");
                    return;
                }
                if self.inertia.throw(velocity) {
                    self.transition(event_types::RELEASE_THROW);
                } else {
                    self.transition(event_types::RELEASE);
                }
            }
        }
    }

    /// Sensitivity applied to deltas from `source`
    fn speed(&self, source: InputSource) -> f32 {
        match source {
            InputSource::Scroll => self.config.scroll_speed,
            InputSource::Drag => self.config.drag_speed,
        }
    }

    /// Consume several intents in order
    pub fn apply_all(&mut self, intents: impl IntoIterator<Item = Intent>) {
        for intent in intents {
            self.apply_input(intent);
        }
    }

    /// Set the target offset directly
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Move both offsets to `offset` without easing and re-render
    pub fn jump_to(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        self.inertia.cancel();
        self.current = offset;
        self.target = offset;
        self.render();
    }

    /// Ease toward the offset that brings slot `index` to the track origin
    ///
    /// Picks the equivalent offset (modulo one period) nearest `current`, so
    /// the track takes the short way round. Returns false for unknown slots.
    pub fn focus_slot(&mut self, index: usize) -> bool {
        let Some(slot) = self.track.slots().get(index) else {
            return false;
        };
        if !self.track.is_renderable() {
            return false;
        }

        let period = self.track.period();
        let desired = -slot.base;
        let turns = ((self.current - desired) / period).round();
        self.inertia.cancel();
        self.target = desired + turns * period;
        true
    }

    /// Advance one frame by `dt` seconds
    pub fn step(&mut self, dt: f32) -> FrameOutcome {
        if !self.track.is_renderable() {
            return FrameOutcome::Idle;
        }

        match self.inertia.tick(dt) {
            Some(distance) => self.target += distance * self.config.drag_speed,
            None => {
                if self.gesture.is_throwing() {
                    self.transition(event_types::SETTLED);
                }
            }
        }

        if self.config.drift != 0.0 && !self.gesture.is_dragging() {
            self.target += self.config.drift * dt;
        }

        let diff = self.target - self.current;
        if diff.abs() < self.config.epsilon {
            return FrameOutcome::Idle;
        }

        self.current += diff * self.config.ease_factor;
        trace!(
            "Carousel frame: current {:.3} target {:.3}",
            self.current,
            self.target
        );

        self.render();
        FrameOutcome::Rendered
    }

    /// Write the position of every slot for the current offset
    pub fn render(&mut self) {
        if !self.track.is_renderable() {
            return;
        }

        self.positions.clear();
        let mode = self.config.wrap;
        for (index, position) in self.track.positions(self.current, mode).enumerate() {
            self.positions.push(position);
            self.sink.set_position(index, position);
        }
    }

    fn transition(&mut self, event: u32) {
        let previous = self.gesture;
        if self.gesture.apply(event) {
            debug!("Carousel gesture {:?} -> {:?}", previous, self.gesture);
        }
    }
}

impl<S: SlotSink> Animate for WrapEngine<S> {
    fn tick(&mut self, dt: f32) -> bool {
        self.step(dt);
        !self.is_settled()
    }
}
