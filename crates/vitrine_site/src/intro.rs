//! Opening image burst
//!
//! For the first seconds of a visit, images pop up on the beat at random
//! spots of a full-screen container, tilted slightly, and disappear a few
//! seconds later. The burst then reports completion so the page can reveal
//! its content.
//!
//! Time only advances through [`IntroBurst::step`], and all randomness comes
//! from the injected RNG, so a seeded burst replays identically.

use std::collections::VecDeque;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::{debug, trace};
use vitrine_animation::Animate;
use vitrine_core::{Result, Viewport, VitrineError};

/// Fastest accepted tempo, in beats per minute
pub const MAX_BPM: f32 = 6000.0;

new_key_type! {
    /// Handle to an image on screen
    pub struct SpriteId;
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Spawn tempo, in beats per minute
    pub bpm: f32,
    /// Seconds after which spawning stops
    pub duration: f32,
    /// Seconds each image stays on screen
    pub lifetime: f32,
    /// Viewports narrower than this use the compact counts
    pub compact_breakpoint: f32,
    /// Images spawned per beat
    pub spawn_count: usize,
    pub compact_spawn_count: usize,
    /// Images kept on screen at most; the oldest goes first
    pub max_elements: usize,
    pub compact_max_elements: usize,
    /// A file among the last picks is drawn again, when enough files exist
    pub recent_window: usize,
    /// Maximum tilt either way, in degrees
    pub max_rotation: f32,
    pub scale: f32,
    /// Image size assumed before it has loaded, as a fraction of the container
    pub fallback_fraction: f32,
    /// Which media files are images
    pub media_pattern: String,
    /// Prefix joined to file names to build image sources
    pub media_dir: String,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            bpm: 260.0,
            duration: 5.0,
            lifetime: 6.0,
            compact_breakpoint: 768.0,
            spawn_count: 4,
            compact_spawn_count: 2,
            max_elements: 140,
            compact_max_elements: 40,
            recent_window: 5,
            max_rotation: 10.0,
            scale: 1.05,
            fallback_fraction: 0.25,
            media_pattern: r"(?i)\.(jpg|jpeg|png|gif|webp)$".to_string(),
            media_dir: "./images/anim-intro/".to_string(),
        }
    }
}

impl IntroConfig {
    /// Seconds between beats
    pub fn beat_interval(&self) -> f32 {
        60.0 / self.bpm
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.bpm > 0.0 && self.bpm <= MAX_BPM) {
            return Err(VitrineError::InvalidConfig(format!(
                "intro.bpm must be in (0, {MAX_BPM}], got {}",
                self.bpm
            )));
        }
        if !(self.duration >= 0.0
            && self.duration.is_finite()
            && self.lifetime > 0.0
            && self.lifetime.is_finite())
        {
            return Err(VitrineError::InvalidConfig(
                "intro.duration must not be negative and intro.lifetime must be positive"
                    .to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fallback_fraction) {
            return Err(VitrineError::InvalidConfig(format!(
                "intro.fallback_fraction must be in [0, 1], got {}",
                self.fallback_fraction
            )));
        }
        Regex::new(&self.media_pattern)
            .map_err(|err| VitrineError::InvalidConfig(format!("intro.media_pattern: {err}")))?;
        Ok(())
    }

    fn is_compact(&self, viewport: Viewport) -> bool {
        viewport.width < self.compact_breakpoint
    }
}

/// Where and how an image is drawn inside the container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Pixels from the container's left edge
    pub left: f32,
    /// Pixels from the container's top edge
    pub top: f32,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
}

impl Placement {
    /// CSS transform for the tilt and scale
    pub fn transform_css(&self) -> String {
        format!("rotate({:.2}deg) scale({})", self.rotation, self.scale)
    }
}

/// One image on screen
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub file: String,
    pub src: String,
    pub placement: Placement,
    /// Seconds since spawn
    pub age: f32,
    /// Placed with the assumed size, not yet with the loaded one
    pub provisional: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntroEvent {
    Spawned(SpriteId),
    /// Re-placed after its real size became known
    Placed(SpriteId),
    Removed(SpriteId),
    /// Spawning stopped; emitted once per run
    Completed,
}

/// The intro burst state machine
pub struct IntroBurst<R: Rng> {
    config: IntroConfig,
    media: Vec<String>,
    viewport: Viewport,
    spawn_count: usize,
    max_elements: usize,
    sprites: SlotMap<SpriteId, Sprite>,
    order: VecDeque<SpriteId>,
    recent: VecDeque<usize>,
    events: SmallVec<[IntroEvent; 8]>,
    running: bool,
    elapsed: f32,
    /// Batches spawned this run, the opening one included
    beats: u32,
    rng: R,
}

impl<R: Rng> IntroBurst<R> {
    /// Create an idle burst over `media` file names
    ///
    /// Files not matching the media pattern are ignored.
    pub fn new(
        media: impl IntoIterator<Item = impl Into<String>>,
        viewport: Viewport,
        config: IntroConfig,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let pattern = Regex::new(&config.media_pattern)
            .map_err(|err| VitrineError::InvalidConfig(format!("intro.media_pattern: {err}")))?;

        let media: Vec<String> = media
            .into_iter()
            .map(Into::into)
            .filter(|file: &String| pattern.is_match(file))
            .collect();

        let compact = config.is_compact(viewport);
        let spawn_count = if compact {
            config.compact_spawn_count
        } else {
            config.spawn_count
        };
        let max_elements = if compact {
            config.compact_max_elements
        } else {
            config.max_elements
        };

        debug!(
            "Intro prepared: {} images, {} per beat, at most {} on screen",
            media.len(),
            spawn_count,
            max_elements
        );

        Ok(Self {
            config,
            media,
            viewport,
            spawn_count,
            max_elements,
            sprites: SlotMap::with_key(),
            order: VecDeque::new(),
            recent: VecDeque::new(),
            events: SmallVec::new(),
            running: false,
            elapsed: 0.0,
            beats: 0,
            rng,
        })
    }

    pub fn config(&self) -> &IntroConfig {
        &self.config
    }

    /// Eligible image files
    pub fn media(&self) -> &[String] {
        &self.media
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn spawn_count(&self) -> usize {
        self.spawn_count
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Seconds since the current run started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id)
    }

    /// Sprites on screen, oldest first
    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.sprites.get(id).map(|sprite| (id, sprite)))
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Begin spawning; returns false when a run is already in progress
    ///
    /// The first batch spawns immediately, then one batch per beat.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }

        debug!("Intro started");
        self.running = true;
        self.elapsed = 0.0;
        self.spawn_batch(0.0);
        self.beats = 1;
        true
    }

    /// Viewport changed size
    ///
    /// The per-beat count follows the new width; the on-screen cap keeps the
    /// value chosen at construction.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.spawn_count = if self.config.is_compact(viewport) {
            self.config.compact_spawn_count
        } else {
            self.config.spawn_count
        };
    }

    /// An image finished loading with its real size; place it again
    pub fn media_loaded(&mut self, id: SpriteId, width: f32, height: f32) -> bool {
        if !self.sprites.contains_key(id) {
            return false;
        }
        let placement = place(
            &mut self.rng,
            &self.config,
            self.viewport,
            Some((width, height)),
        );
        if let Some(sprite) = self.sprites.get_mut(id) {
            sprite.placement = placement;
            sprite.provisional = false;
        }
        self.events.push(IntroEvent::Placed(id));
        true
    }

    /// Advance by `dt` seconds and return what happened
    pub fn step(&mut self, dt: f32) -> SmallVec<[IntroEvent; 8]> {
        self.advance(dt);
        self.take_events()
    }

    /// Events produced since the last call
    pub fn take_events(&mut self) -> SmallVec<[IntroEvent; 8]> {
        std::mem::take(&mut self.events)
    }

    fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        for sprite in self.sprites.values_mut() {
            sprite.age += dt;
        }
        self.expire();

        if !self.running {
            return;
        }

        self.elapsed += dt;
        // Beat times come from the beat index so they never stop advancing
        let interval = f64::from(self.config.beat_interval());
        let elapsed = f64::from(self.elapsed);
        let duration = f64::from(self.config.duration);
        loop {
            let beat = f64::from(self.beats) * interval;
            if beat > elapsed || beat >= duration {
                break;
            }
            // Beats missed by a long frame still spawn, already aged
            self.spawn_batch((elapsed - beat) as f32);
            self.beats += 1;
        }

        if self.elapsed >= self.config.duration {
            self.running = false;
            self.events.push(IntroEvent::Completed);
            debug!(
                "Intro completed after {:.2}s, {} images on screen",
                self.elapsed,
                self.sprites.len()
            );
        }
    }

    fn expire(&mut self) {
        let lifetime = self.config.lifetime;
        let expired: SmallVec<[SpriteId; 8]> = self
            .sprites
            .iter()
            .filter(|(_, sprite)| sprite.age >= lifetime)
            .map(|(id, _)| id)
            .collect();

        for id in expired {
            self.remove(id);
        }
    }

    fn spawn_batch(&mut self, age: f32) {
        for _ in 0..self.spawn_count {
            self.spawn(age);
        }
    }

    fn spawn(&mut self, age: f32) {
        let Some(index) = self.pick_media() else {
            return;
        };

        let file = self.media[index].clone();
        let placement = place(&mut self.rng, &self.config, self.viewport, None);
        let sprite = Sprite {
            src: format!("{}{}", self.config.media_dir, file),
            file,
            placement,
            age,
            provisional: true,
        };

        let id = self.sprites.insert(sprite);
        self.order.push_back(id);
        self.events.push(IntroEvent::Spawned(id));
        trace!("Intro spawned {:?} ({} on screen)", id, self.sprites.len());

        if self.sprites.len() > self.max_elements {
            if let Some(oldest) = self.order.front().copied() {
                self.remove(oldest);
            }
        }
    }

    fn remove(&mut self, id: SpriteId) {
        if self.sprites.remove(id).is_some() {
            self.order.retain(|&other| other != id);
            self.events.push(IntroEvent::Removed(id));
        }
    }

    /// Random eligible file, avoiding recent picks when there are enough files
    fn pick_media(&mut self) -> Option<usize> {
        let len = self.media.len();
        if len == 0 {
            return None;
        }

        let avoid_recent = len > self.config.recent_window;
        let index = loop {
            let candidate = self.rng.gen_range(0..len);
            if !avoid_recent || !self.recent.contains(&candidate) {
                break candidate;
            }
        };

        self.recent.push_back(index);
        if self.recent.len() > self.config.recent_window {
            self.recent.pop_front();
        }
        Some(index)
    }
}

impl<R: Rng> Animate for IntroBurst<R> {
    /// Events accumulate until [`IntroBurst::take_events`]
    fn tick(&mut self, dt: f32) -> bool {
        self.advance(dt);
        self.running || !self.sprites.is_empty()
    }
}

/// Random position inside the container, and a slight tilt
fn place<R: Rng>(
    rng: &mut R,
    config: &IntroConfig,
    container: Viewport,
    size: Option<(f32, f32)>,
) -> Placement {
    let (width, height) = size.unwrap_or((0.0, 0.0));
    // Unknown or zero sizes fall back to a fraction of the container
    let width = if width > 0.0 {
        width
    } else {
        container.width * config.fallback_fraction
    };
    let height = if height > 0.0 {
        height
    } else {
        container.height * config.fallback_fraction
    };

    Placement {
        left: rng.gen::<f32>() * (container.width - width).max(0.0),
        top: rng.gen::<f32>() * (container.height - height).max(0.0),
        rotation: (rng.gen::<f32>() - 0.5) * 2.0 * config.max_rotation,
        scale: config.scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME: f32 = 1.0 / 60.0;

    fn media(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("photo-{i}.jpg")).collect()
    }

    fn burst(count: usize, width: f32) -> IntroBurst<StdRng> {
        IntroBurst::new(
            media(count),
            Viewport::new(width, 900.0),
            IntroConfig::default(),
            StdRng::seed_from_u64(7),
        )
        .unwrap()
    }

    fn run_for(burst: &mut IntroBurst<StdRng>, secs: f32) -> Vec<IntroEvent> {
        let frames = (secs / FRAME).round() as usize;
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(burst.step(FRAME));
        }
        events
    }

    fn spawned(events: &[IntroEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, IntroEvent::Spawned(_)))
            .count()
    }

    #[test]
    fn test_filters_non_images() {
        let burst = IntroBurst::new(
            vec!["a.JPG", "b.webp", "clip.mp4", "notes.txt", "c.Png"],
            Viewport::new(1440.0, 900.0),
            IntroConfig::default(),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(burst.media(), &["a.JPG", "b.webp", "c.Png"]);
    }

    #[test]
    fn test_counts_follow_viewport() {
        let wide = burst(10, 1440.0);
        assert_eq!(wide.spawn_count(), 4);
        assert_eq!(wide.max_elements(), 140);

        let mut compact = burst(10, 500.0);
        assert_eq!(compact.spawn_count(), 2);
        assert_eq!(compact.max_elements(), 40);

        // Resize changes the per-beat count only
        compact.resize(Viewport::new(1200.0, 800.0));
        assert_eq!(compact.spawn_count(), 4);
        assert_eq!(compact.max_elements(), 40);
    }

    #[test]
    fn test_start_spawns_first_batch() {
        let mut burst = burst(10, 1440.0);
        assert!(burst.start());
        assert!(!burst.start());

        let events = burst.take_events();
        assert_eq!(spawned(&events), 4);
        assert_eq!(burst.sprite_count(), 4);
        for (_, sprite) in burst.sprites() {
            assert!(sprite.src.starts_with("./images/anim-intro/photo-"));
            assert!(sprite.provisional);
        }
    }

    #[test]
    fn test_spawns_on_beat_and_completes_once() {
        let mut burst = burst(20, 1440.0);
        burst.start();
        let mut events: Vec<IntroEvent> = burst.take_events().into_iter().collect();
        events.extend(run_for(&mut burst, 7.0));

        // Beats at 0, 60/260, ... strictly before 5s: 22 batches of 4
        assert_eq!(spawned(&events), 22 * 4);
        let completed = events
            .iter()
            .filter(|e| matches!(e, IntroEvent::Completed))
            .count();
        assert_eq!(completed, 1);
        assert!(!burst.is_running());
    }

    #[test]
    fn test_sprites_expire_after_lifetime() {
        let mut burst = burst(20, 1440.0);
        burst.start();
        run_for(&mut burst, 5.5);
        assert!(burst.sprite_count() > 0);

        // Last beat is under 5s, so everything is gone by 11s
        run_for(&mut burst, 5.6);
        assert_eq!(burst.sprite_count(), 0);
        assert!(!Animate::tick(&mut burst, FRAME));
    }

    #[test]
    fn test_cap_removes_oldest() {
        let config = IntroConfig {
            max_elements: 6,
            ..Default::default()
        };
        let mut burst = IntroBurst::new(
            media(20),
            Viewport::new(1440.0, 900.0),
            config,
            StdRng::seed_from_u64(3),
        )
        .unwrap();

        burst.start();
        let first: Vec<SpriteId> = burst.sprites().map(|(id, _)| id).collect();
        burst.take_events();

        // Second beat adds 4 more; the two oldest make room
        let events = run_for(&mut burst, 0.25);
        assert_eq!(burst.sprite_count(), 6);
        assert!(events.contains(&IntroEvent::Removed(first[0])));
        assert!(events.contains(&IntroEvent::Removed(first[1])));
        assert!(burst.sprite(first[2]).is_some());
    }

    #[test]
    fn test_recent_picks_avoided() {
        let mut burst = burst(8, 1440.0);
        burst.start();
        run_for(&mut burst, 4.0);

        let files: Vec<String> = burst.sprites().map(|(_, s)| s.file.clone()).collect();
        for window in files.windows(6) {
            let last = &window[5];
            assert!(
                !window[..5].contains(last),
                "{last} repeated within five picks"
            );
        }
    }

    #[test]
    fn test_small_library_may_repeat() {
        let mut burst = burst(2, 1440.0);
        burst.start();
        assert_eq!(spawned(&burst.take_events()), 4);
    }

    #[test]
    fn test_no_images_still_completes() {
        let mut burst = IntroBurst::new(
            vec!["teaser.mp4"],
            Viewport::new(1440.0, 900.0),
            IntroConfig::default(),
            StdRng::seed_from_u64(9),
        )
        .unwrap();
        burst.start();
        let events = run_for(&mut burst, 5.1);
        assert_eq!(events, vec![IntroEvent::Completed]);
    }

    #[test]
    fn test_placement_inside_container() {
        let mut burst = burst(10, 1000.0);
        burst.start();
        for (_, sprite) in burst.sprites() {
            let p = sprite.placement;
            assert!(p.left >= 0.0 && p.left <= 750.0);
            assert!(p.top >= 0.0 && p.top <= 675.0);
            assert!(p.rotation >= -10.0 && p.rotation < 10.0);
            assert_eq!(p.scale, 1.05);
        }
    }

    #[test]
    fn test_media_loaded_replaces() {
        let mut burst = burst(10, 1000.0);
        burst.start();
        let id = burst.sprites().next().map(|(id, _)| id).unwrap();
        burst.take_events();

        // Wider than the container: pinned to the left edge
        assert!(burst.media_loaded(id, 1200.0, 100.0));
        let sprite = burst.sprite(id).unwrap();
        assert_eq!(sprite.placement.left, 0.0);
        assert!(!sprite.provisional);
        assert_eq!(burst.take_events().as_slice(), &[IntroEvent::Placed(id)]);
    }

    #[test]
    fn test_seeded_runs_replay() {
        let mut a = burst(30, 1440.0);
        let mut b = burst(30, 1440.0);
        a.start();
        b.start();
        run_for(&mut a, 1.0);
        run_for(&mut b, 1.0);
        let a_sprites: Vec<Sprite> = a.sprites().map(|(_, s)| s.clone()).collect();
        let b_sprites: Vec<Sprite> = b.sprites().map(|(_, s)| s.clone()).collect();
        assert_eq!(a_sprites, b_sprites);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = IntroConfig {
            bpm: 0.0,
            ..Default::default()
        };
        assert!(IntroBurst::new(
            media(3),
            Viewport::new(800.0, 600.0),
            config,
            StdRng::seed_from_u64(0)
        )
        .is_err());

        let config = IntroConfig {
            media_pattern: "(".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tempo_bounded() {
        let config = IntroConfig {
            bpm: 1.0e9,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // The fastest tempo still finishes a long catch-up step
        let config = IntroConfig {
            bpm: MAX_BPM,
            duration: 1.0e6,
            ..Default::default()
        };
        let mut burst = IntroBurst::new(
            media(20),
            Viewport::new(1440.0, 900.0),
            config,
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        burst.start();
        let events = burst.step(3.0);

        // One batch every 10ms: the opening batch plus about 300 more
        let batches = spawned(&events) / 4;
        assert!((300..=301).contains(&batches), "{batches} batches");
        assert!(burst.is_running());
        assert_eq!(burst.sprite_count(), burst.max_elements());
    }

    #[test]
    fn test_transform_css() {
        let placement = Placement {
            left: 0.0,
            top: 0.0,
            rotation: -4.5,
            scale: 1.05,
        };
        assert_eq!(placement.transform_css(), "rotate(-4.50deg) scale(1.05)");
    }
}
