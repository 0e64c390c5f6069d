//! Headless carousel simulation
//!
//! Replays a scripted sequence of intents against a wrap-around engine and
//! prints the slot positions of every rendered frame.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use vitrine_animation::{EngineConfig, FrameOutcome, WrapEngine};
use vitrine_core::{Intent, IntentQueue, StaticLayout};

/// One scripted input, applied before the given frame
#[derive(Debug, Deserialize)]
pub struct ScriptStep {
    pub frame: u64,
    pub intent: ScriptIntent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptIntent {
    Scroll(f32),
    ScrollEnd,
    DragStart,
    Drag(f32),
    DragEnd { velocity: f32 },
}

impl From<ScriptIntent> for Intent {
    fn from(intent: ScriptIntent) -> Self {
        match intent {
            ScriptIntent::Scroll(delta) => Intent::Scroll(delta),
            ScriptIntent::ScrollEnd => Intent::ScrollEnd,
            ScriptIntent::DragStart => Intent::DragStart,
            ScriptIntent::Drag(delta) => Intent::Drag(delta),
            ScriptIntent::DragEnd { velocity } => Intent::DragEnd { velocity },
        }
    }
}

/// A rendered frame, as printed with `--json`
#[derive(Debug, Serialize)]
struct FrameReport<'a> {
    frame: u64,
    current: f32,
    target: f32,
    gesture: String,
    positions: &'a [f32],
}

pub struct SimulateOptions {
    pub extents: Vec<f32>,
    pub frames: u64,
    pub dt: f32,
    pub scroll: Option<f32>,
    pub script: Option<Vec<ScriptStep>>,
    pub json: bool,
}

/// Parse a comma-separated extent list such as `40,100,60`
pub fn parse_extents(list: &str) -> Result<Vec<f32>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .with_context(|| format!("Invalid extent `{s}`"))
        })
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(steps)
}

fn check_dt(dt: f32) -> Result<()> {
    if !(dt > 0.0 && dt.is_finite()) {
        bail!("--dt must be a positive number of seconds, got {dt}");
    }
    Ok(())
}

pub fn run(config: EngineConfig, options: SimulateOptions) -> Result<()> {
    config.validate()?;
    check_dt(options.dt)?;

    let layout = StaticLayout::new(options.extents);
    let Some(mut engine) = WrapEngine::setup(&layout, config, Vec::<f32>::new()) else {
        bail!("Carousel could not be set up");
    };
    if !engine.track().is_renderable() {
        warn!("Track has no extent; nothing will move");
    }

    let mut script = options.script.unwrap_or_default();
    script.sort_by_key(|step| step.frame);
    let mut script = script.into_iter().peekable();

    let mut queue = IntentQueue::new();
    if let Some(delta) = options.scroll {
        queue.push(Intent::Scroll(delta));
    }

    let mut rendered = 0u64;
    for frame in 0..options.frames {
        while let Some(step) = script.next_if(|step| step.frame <= frame) {
            queue.push(step.intent.into());
        }
        engine.apply_all(queue.drain());

        if engine.step(options.dt) == FrameOutcome::Rendered {
            rendered += 1;
            report(frame, &engine, options.json)?;
        }
    }

    info!(
        "Simulated {} frames, {} rendered, final offset {:.3}",
        options.frames,
        rendered,
        engine.current()
    );
    Ok(())
}

fn report(frame: u64, engine: &WrapEngine<Vec<f32>>, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(&FrameReport {
            frame,
            current: engine.current(),
            target: engine.target(),
            gesture: format!("{:?}", engine.gesture()),
            positions: engine.positions(),
        })?;
        println!("{line}");
    } else {
        let positions: Vec<String> = engine
            .positions()
            .iter()
            .map(|p| format!("{p:8.3}"))
            .collect();
        println!(
            "frame {:>5}  current {:>10.3}  [{}]",
            frame,
            engine.current(),
            positions.join(", ")
        );
    }
    Ok(())
}
