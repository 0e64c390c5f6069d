//! Vitrine Core
//!
//! Host-facing seams shared by the vitrine animation crates:
//!
//! - **Input Intents**: raw wheel/touch/pointer events translated to typed messages
//! - **Gesture FSM**: Idle, Scrolling, Dragging and Throwing transitions
//! - **Layout**: slot extent measurement and track axes
//! - **Sinks**: where computed slot positions are written each frame
//! - **Errors**: setup failures shared across crates
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::{Axis, InputAdapter, Intent, RawInput};
//!
//! let adapter = InputAdapter::new(Axis::Horizontal);
//! let intent = adapter.translate(RawInput::Press { x: 10.0, y: 20.0 });
//! assert_eq!(intent, Some(Intent::DragStart));
//! ```

pub mod error;
pub mod fsm;
pub mod input;
pub mod layout;
pub mod sink;

pub use error::{Result, VitrineError};
pub use fsm::{event_types, GestureState, StateTransitions};
pub use input::{InputAdapter, InputSource, Intent, IntentQueue, RawInput};
pub use layout::{validate_extents, Axis, LayoutSource, MissingLayout, StaticLayout, Viewport};
pub use sink::{FnSink, NullSink, RecordingSink, SlotSink};
