//! Input intents
//!
//! Raw host events (wheel, touch, pointer press/drag/release) are translated
//! by an [`InputAdapter`] into typed [`Intent`] messages. Engines consume
//! intents only, so they never depend on a particular input plugin and can be
//! driven from tests without a live input environment.

use smallvec::SmallVec;

use crate::layout::Axis;

/// Which sensitivity constant scales an intent's delta
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Wheel, touch and pointer aggregate movement
    Scroll,
    /// Press-drag and post-release throw
    Drag,
}

/// A typed request to move a track
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Aggregate wheel/touch movement along the track axis
    Scroll(f32),
    /// Wheel/touch movement stopped
    ScrollEnd,
    /// Pointer pressed: cancels any in-flight throw
    DragStart,
    /// Pointer moved while pressed
    Drag(f32),
    /// Pointer released with the given velocity (units per second)
    DragEnd { velocity: f32 },
}

impl Intent {
    /// The sensitivity class of this intent
    pub fn source(&self) -> InputSource {
        match self {
            Intent::Scroll(_) | Intent::ScrollEnd => InputSource::Scroll,
            Intent::DragStart | Intent::Drag(_) | Intent::DragEnd { .. } => InputSource::Drag,
        }
    }

    /// The signed delta carried by this intent, if any
    pub fn delta(&self) -> Option<f32> {
        match self {
            Intent::Scroll(delta) | Intent::Drag(delta) => Some(*delta),
            _ => None,
        }
    }
}

/// Raw events as delivered by a host's input facility
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawInput {
    Wheel { delta_x: f32, delta_y: f32 },
    Touch { delta_x: f32, delta_y: f32 },
    /// No wheel/touch movement since the last frame
    ScrollStop,
    Press { x: f32, y: f32 },
    DragMove { delta_x: f32, delta_y: f32 },
    Release { velocity_x: f32, velocity_y: f32 },
}

/// Translates raw events into intents for one track axis
#[derive(Clone, Copy, Debug)]
pub struct InputAdapter {
    axis: Axis,
    /// Wheel/touch deltas move content against the gesture direction
    invert_scroll: bool,
}

impl InputAdapter {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            invert_scroll: true,
        }
    }

    /// Keep wheel/touch deltas in the direction the host reports them
    pub fn natural_scroll(mut self) -> Self {
        self.invert_scroll = false;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Translate one raw event
    pub fn translate(&self, raw: RawInput) -> Option<Intent> {
        let sign = if self.invert_scroll { -1.0 } else { 1.0 };
        match raw {
            // Wheels report mostly vertical deltas; a horizontal track still
            // follows whichever component dominates.
            RawInput::Wheel { delta_x, delta_y } => {
                let delta = if delta_x.abs() > delta_y.abs() {
                    delta_x
                } else {
                    delta_y
                };
                non_zero(delta).map(|d| Intent::Scroll(d * sign))
            }
            RawInput::Touch { delta_x, delta_y } => {
                non_zero(self.axis.pick(delta_x, delta_y)).map(|d| Intent::Scroll(d * sign))
            }
            RawInput::ScrollStop => Some(Intent::ScrollEnd),
            RawInput::Press { .. } => Some(Intent::DragStart),
            RawInput::DragMove { delta_x, delta_y } => {
                non_zero(self.axis.pick(delta_x, delta_y)).map(Intent::Drag)
            }
            RawInput::Release {
                velocity_x,
                velocity_y,
            } => Some(Intent::DragEnd {
                velocity: self.axis.pick(velocity_x, velocity_y),
            }),
        }
    }
}

fn non_zero(delta: f32) -> Option<f32> {
    if delta == 0.0 || !delta.is_finite() {
        None
    } else {
        Some(delta)
    }
}

/// Intents buffered between frames
///
/// Event callbacks push here without touching the engine; the frame callback
/// drains the queue before stepping.
#[derive(Clone, Debug, Default)]
pub struct IntentQueue {
    pending: SmallVec<[Intent; 8]>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    /// Translate and enqueue a raw event, dropping events with no intent
    pub fn push_raw(&mut self, adapter: &InputAdapter, raw: RawInput) {
        if let Some(intent) = adapter.translate(raw) {
            self.pending.push(intent);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take all pending intents in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = Intent> + '_ {
        self.pending.drain(..)
    }
}
