//! Vitrine site behaviors
//!
//! The page-level animations built on `vitrine_animation`:
//!
//! - [`intro`] - opening image burst on the beat
//! - [`tooltip`] - hover caption trailing the pointer
//! - [`config`] - TOML configuration for every site animation

pub mod config;
pub mod intro;
pub mod tooltip;

pub use config::{SiteConfig, MARQUEE_DRIFT};
pub use intro::{IntroBurst, IntroConfig, IntroEvent, Placement, Sprite, SpriteId, MAX_BPM};
pub use tooltip::{Tooltip, TooltipConfig, TooltipStyle, PARKED};
