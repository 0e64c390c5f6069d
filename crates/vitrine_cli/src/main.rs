//! Vitrine CLI
//!
//! Run the site animations headless: replay carousel input, watch the intro
//! burst unfold, or print the effective configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vitrine_core::Viewport;
use vitrine_site::{IntroBurst, IntroEvent};

mod config;
mod simulate;

use simulate::SimulateOptions;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless runner for the Vitrine site animations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./vitrine.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay input against the panel carousel and print slot positions
    Simulate {
        /// Slot extents in percent of the viewport, comma separated
        #[arg(short, long, default_value = "100,100,100")]
        extents: String,

        /// Number of frames to run
        #[arg(short, long, default_value = "180")]
        frames: u64,

        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// Single scroll delta applied before the first frame
        #[arg(short, long, allow_hyphen_values = true)]
        scroll: Option<f32>,

        /// JSON file of scripted intents
        #[arg(long)]
        script: Option<PathBuf>,

        /// Simulate the marquee track instead of the panel carousel
        #[arg(long)]
        marquee: bool,

        /// Print one JSON object per rendered frame
        #[arg(long)]
        json: bool,
    },

    /// Run the intro burst and print its events
    Intro {
        /// Viewport width in pixels
        #[arg(long, default_value = "1440")]
        width: f32,

        /// Viewport height in pixels
        #[arg(long, default_value = "900")]
        height: f32,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Media file names, comma separated
        #[arg(long)]
        media: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let site = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            extents,
            frames,
            dt,
            scroll,
            script,
            marquee,
            json,
        } => {
            let engine_config = if marquee { site.marquee } else { site.carousel };
            let script = match script {
                Some(path) => Some(simulate::load_script(&path)?),
                None => None,
            };
            simulate::run(
                engine_config,
                SimulateOptions {
                    extents: simulate::parse_extents(&extents)?,
                    frames,
                    dt,
                    scroll,
                    script,
                    json,
                },
            )
        }

        Commands::Intro {
            width,
            height,
            seed,
            media,
        } => {
            let media: Vec<String> = match media {
                Some(list) => list
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                None => (1..=24).map(|i| format!("intro-{i:02}.jpg")).collect(),
            };
            run_intro(site.intro, Viewport::new(width, height), seed, media)
        }

        Commands::Config => {
            print!("{}", site.to_toml_string()?);
            Ok(())
        }
    }
}

fn run_intro(
    config: vitrine_site::IntroConfig,
    viewport: Viewport,
    seed: u64,
    media: Vec<String>,
) -> Result<()> {
    const FRAME: f32 = 1.0 / 60.0;
    const MEDIA_SIZE: (f32, f32) = (480.0, 640.0);

    // Enough frames for the burst plus the last images' lifetime
    let max_frames = ((config.duration + config.lifetime) / FRAME).ceil() as u64 + 2;

    let mut burst = IntroBurst::new(media, viewport, config, StdRng::seed_from_u64(seed))?;
    burst.start();
    let mut events = burst.take_events();

    for _ in 0..max_frames {
        print_events(burst.elapsed(), &burst, &events);

        // Images arrive one frame after they are requested
        for event in &events {
            if let IntroEvent::Spawned(id) = event {
                burst.media_loaded(*id, MEDIA_SIZE.0, MEDIA_SIZE.1);
            }
        }

        events = burst.step(FRAME);
        if !burst.is_running() && burst.sprite_count() == 0 {
            break;
        }
    }
    print_events(burst.elapsed(), &burst, &events);

    info!("Intro finished after {:.2}s", burst.elapsed());
    Ok(())
}

fn print_events(
    time: f32,
    burst: &IntroBurst<StdRng>,
    events: &[IntroEvent],
) {
    for &event in events {
        match event {
            IntroEvent::Spawned(id) | IntroEvent::Placed(id) => {
                if let Some(sprite) = burst.sprite(id) {
                    let verb = if matches!(event, IntroEvent::Spawned(_)) {
                        "spawn"
                    } else {
                        "place"
                    };
                    println!(
                        "{:>6.3}s  {verb:<6} {:<20} left {:>7.1} top {:>7.1} {}",
                        time,
                        sprite.file,
                        sprite.placement.left,
                        sprite.placement.top,
                        sprite.placement.transform_css()
                    );
                }
            }
            IntroEvent::Removed(id) => println!("{:>6.3}s  remove {:?}", time, id),
            IntroEvent::Completed => println!("{:>6.3}s  complete", time),
        }
    }
}
