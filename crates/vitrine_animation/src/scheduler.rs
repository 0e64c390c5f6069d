//! Frame scheduling
//!
//! The host's rendering scheduler calls [`FrameLoop::frame`] once per display
//! refresh. Each registered animation receives the elapsed time since the
//! previous frame, measured by an injected [`Clock`]. Tests use a
//! [`ManualClock`] (or [`FrameLoop::frame_with`]) to drive frames
//! deterministically without real-time waiting.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

new_key_type! {
    /// Handle to an animation registered with a [`FrameLoop`]
    pub struct AnimationId;
}

/// Something advanced once per frame
pub trait Animate {
    /// Advance by `dt` seconds; returns true while still moving
    fn tick(&mut self, dt: f32) -> bool;
}

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced explicitly; clones share the same time
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs.max(0.0)));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Registry of animations ticked together every frame
pub struct FrameLoop<C: Clock = SystemClock> {
    clock: C,
    animations: SlotMap<AnimationId, Box<dyn Animate>>,
    last_frame: Duration,
    /// Longest delta handed to animations (a backgrounded tab can stall for seconds)
    max_dt: f32,
    frames: u64,
    active: bool,
}

impl FrameLoop<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for FrameLoop<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameLoop<C> {
    pub fn with_clock(clock: C) -> Self {
        let last_frame = clock.now();
        Self {
            clock,
            animations: SlotMap::with_key(),
            last_frame,
            max_dt: 0.1,
            frames: 0,
            active: false,
        }
    }

    /// Cap the delta passed to animations, in seconds
    pub fn set_max_dt(&mut self, max_dt: f32) {
        self.max_dt = max_dt.max(0.0);
    }

    pub fn add(&mut self, animation: impl Animate + 'static) -> AnimationId {
        self.active = true;
        self.animations.insert(Box::new(animation))
    }

    pub fn remove(&mut self, id: AnimationId) -> bool {
        self.animations.remove(id).is_some()
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.animations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Whether any animation reported movement on the last frame
    ///
    /// Hosts use this to stop requesting frames while everything is at rest.
    pub fn has_active(&self) -> bool {
        self.active
    }

    /// Run one frame with the delta measured by the clock
    pub fn frame(&mut self) -> bool {
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_with(dt.min(self.max_dt))
    }

    /// Run one frame with an explicit delta, in seconds
    pub fn frame_with(&mut self, dt: f32) -> bool {
        self.frames += 1;

        let mut active = false;
        for (_, animation) in self.animations.iter_mut() {
            // Every animation ticks, even after one reports activity
            active |= animation.tick(dt);
        }

        if active != self.active {
            trace!("Frame loop active: {} (frame {})", active, self.frames);
        }
        self.active = active;
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Counts down a number of frames, recording each delta
    struct Countdown {
        remaining: u32,
        deltas: Rc<RefCell<Vec<f32>>>,
    }

    impl Animate for Countdown {
        fn tick(&mut self, dt: f32) -> bool {
            self.deltas.borrow_mut().push(dt);
            self.remaining = self.remaining.saturating_sub(1);
            self.remaining > 0
        }
    }

    fn countdown(remaining: u32) -> (Countdown, Rc<RefCell<Vec<f32>>>) {
        let deltas = Rc::new(RefCell::new(Vec::new()));
        (
            Countdown {
                remaining,
                deltas: Rc::clone(&deltas),
            },
            deltas,
        )
    }

    #[test]
    fn test_manual_clock_drives_deltas() {
        let clock = ManualClock::new();
        let mut frames = FrameLoop::with_clock(clock.clone());
        let (anim, deltas) = countdown(10);
        frames.add(anim);

        clock.advance(Duration::from_millis(16));
        frames.frame();
        clock.advance(Duration::from_millis(33));
        frames.frame();

        let deltas = deltas.borrow();
        assert!((deltas[0] - 0.016).abs() < 1e-6);
        assert!((deltas[1] - 0.033).abs() < 1e-6);
        assert_eq!(frames.frame_count(), 2);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let clock = ManualClock::new();
        let mut frames = FrameLoop::with_clock(clock.clone());
        let (anim, deltas) = countdown(10);
        frames.add(anim);

        clock.advance_secs(5.0);
        frames.frame();
        assert_eq!(deltas.borrow()[0], 0.1);
    }

    #[test]
    fn test_activity_tracking() {
        let mut frames = FrameLoop::with_clock(ManualClock::new());
        assert!(!frames.has_active());

        let (short, _) = countdown(1);
        let (long, _) = countdown(3);
        frames.add(short);
        frames.add(long);
        assert!(frames.has_active());

        assert!(frames.frame_with(0.016));
        assert!(frames.frame_with(0.016));
        assert!(!frames.frame_with(0.016));
        assert!(!frames.has_active());
    }

    #[test]
    fn test_add_and_remove() {
        let mut frames = FrameLoop::with_clock(ManualClock::new());
        let (anim, deltas) = countdown(5);
        let id = frames.add(anim);
        assert!(frames.contains(id));
        assert_eq!(frames.len(), 1);

        assert!(frames.remove(id));
        assert!(!frames.remove(id));
        assert!(frames.is_empty());

        frames.frame_with(0.016);
        assert!(deltas.borrow().is_empty());
    }
}
