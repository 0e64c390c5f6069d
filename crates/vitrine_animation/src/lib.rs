//! Vitrine Animation System
//!
//! Looping carousels, throw momentum, tweens and frame scheduling.
//!
//! # Features
//!
//! - **Wrap-Around Engine**: exponential easing toward a target offset, folded
//!   over a track of variable-width slots so motion loops without a seam
//! - **Inertia**: frame-rate independent throw momentum, cancelled by a press
//! - **Tweens**: fixed-duration tweens and retargetable quick-to followers
//! - **Easing**: quad to quint, sine and expo curves with `power2.out` style names
//! - **Frame Loop**: slotmap registry of animations driven by an injected clock

pub mod easing;
pub mod engine;
pub mod inertia;
pub mod scheduler;
pub mod track;
pub mod tween;

pub use easing::Easing;
pub use engine::{EngineConfig, FrameOutcome, WrapEngine};
pub use inertia::{Inertia, InertiaConfig};
pub use scheduler::{Animate, AnimationId, Clock, FrameLoop, ManualClock, SystemClock};
pub use track::{Slot, Track, WrapMode};
pub use tween::{QuickTo, Tween};
