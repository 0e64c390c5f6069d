//! Gesture state machine
//!
//! Tracks what is currently moving a track: wheel/touch scrolling, a held
//! drag, or the inertial throw that follows a release. Transitions are pure
//! functions of `(state, event)` so hosts and tests can drive them directly.

/// Event identifiers consumed by the gesture state machine
pub mod event_types {
    /// Wheel, touch or pointer aggregate movement
    pub const SCROLL: u32 = 1;
    /// Wheel/touch movement stopped for a frame
    pub const SCROLL_END: u32 = 2;
    /// Pointer pressed on the track
    pub const PRESS: u32 = 3;
    /// Pointer moved while pressed
    pub const DRAG: u32 = 4;
    /// Pointer released with enough velocity to throw
    pub const RELEASE_THROW: u32 = 5;
    /// Pointer released without velocity
    pub const RELEASE: u32 = 6;
    /// Throw momentum decayed below threshold
    pub const SETTLED: u32 = 7;
}

/// Types whose value changes in response to numbered events
pub trait StateTransitions: Copy + PartialEq {
    /// Returns the next state, or `None` when the event leaves the state unchanged
    fn on_event(&self, event: u32) -> Option<Self>;

    /// Applies `event` in place, returning true when the state changed
    fn apply(&mut self, event: u32) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            _ => false,
        }
    }
}

/// What is currently driving a track's target offset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureState {
    /// Nothing is pushing the target
    #[default]
    Idle,
    /// Wheel/touch deltas are arriving
    Scrolling,
    /// Pointer is held down on the track
    Dragging,
    /// Released with momentum, inertia is feeding the target
    Throwing,
}

impl GestureState {
    /// Returns true while the user holds the pointer down
    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging)
    }

    /// Returns true while throw momentum is active
    pub fn is_throwing(&self) -> bool {
        matches!(self, GestureState::Throwing)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, GestureState::Idle)
    }
}

impl StateTransitions for GestureState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use event_types::*;

        match (self, event) {
            // Any press takes over, including mid-throw
            (_, PRESS) => Some(GestureState::Dragging),

            (GestureState::Idle, SCROLL) => Some(GestureState::Scrolling),
            (GestureState::Scrolling, SCROLL_END) => Some(GestureState::Idle),

            // Wheel during a throw keeps the throw going; the deltas just add up
            (GestureState::Throwing, SCROLL) => None,
            (GestureState::Throwing, SETTLED) => Some(GestureState::Idle),

            (GestureState::Dragging, RELEASE_THROW) => Some(GestureState::Throwing),
            (GestureState::Dragging, RELEASE) => Some(GestureState::Idle),

            _ => None,
        }
    }
}
