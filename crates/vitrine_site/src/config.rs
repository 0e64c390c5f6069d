//! Site configuration
//!
//! All tunables of the site animations in one TOML document. Every section
//! and every field is optional; missing values take their defaults.
//!
//! ```toml
//! [carousel]
//! axis = "horizontal"
//! ease_factor = 0.08
//! scroll_speed = 0.04
//!
//! [carousel.inertia]
//! friction = 0.95
//!
//! [marquee]
//! wrap = "half-period"
//! drift = -4.0
//!
//! [tooltip]
//! offset_x = 180.0
//! follow_easing = "power3.out"
//!
//! [intro]
//! bpm = 260.0
//! ```

use serde::{Deserialize, Serialize};
use vitrine_animation::EngineConfig;
use vitrine_core::{Result, VitrineError};

use crate::intro::IntroConfig;
use crate::tooltip::TooltipConfig;

/// Default marquee drift, in percent of the viewport per second
pub const MARQUEE_DRIFT: f32 = -4.0;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Main panel carousel
    pub carousel: EngineConfig,
    /// Decorative looping bands
    pub marquee: EngineConfig,
    pub tooltip: TooltipConfig,
    pub intro: IntroConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            carousel: EngineConfig::default(),
            marquee: EngineConfig::marquee(MARQUEE_DRIFT),
            tooltip: TooltipConfig::default(),
            intro: IntroConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig =
            toml::from_str(content).map_err(|err| VitrineError::ConfigParse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| VitrineError::ConfigParse(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.carousel.validate()?;
        self.marquee.validate()?;
        self.tooltip.validate()?;
        self.intro.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_animation::{Easing, WrapMode};
    use vitrine_core::Axis;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.marquee.wrap, WrapMode::HalfPeriod);
        assert_eq!(config.carousel.wrap, WrapMode::PerSlot);
    }

    #[test]
    fn test_partial_sections() {
        let config = SiteConfig::from_toml_str(
            r#"
            [carousel]
            axis = "vertical"
            ease_factor = 0.12

            [carousel.inertia]
            friction = 0.9

            [tooltip]
            follow_easing = "power2.inOut"

            [intro]
            bpm = 120.0
            "#,
        )
        .unwrap();

        assert_eq!(config.carousel.axis, Axis::Vertical);
        assert_eq!(config.carousel.ease_factor, 0.12);
        assert_eq!(config.carousel.epsilon, 0.01);
        assert_eq!(config.carousel.inertia.friction, 0.9);
        assert_eq!(config.carousel.inertia.velocity_threshold, 0.5);
        assert_eq!(config.tooltip.follow_easing, Easing::EaseInOutCubic);
        assert_eq!(config.tooltip.offset_x, 180.0);
        assert_eq!(config.intro.bpm, 120.0);
        assert_eq!(config.intro.lifetime, 6.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SiteConfig::from_toml_str("[carousel]\nease_factor = 2.0\n").unwrap_err();
        assert!(matches!(err, VitrineError::InvalidConfig(_)));

        let err = SiteConfig::from_toml_str("[tooltip]\nfade_easing = \"elastic.out\"\n")
            .unwrap_err();
        assert!(matches!(err, VitrineError::ConfigParse(_)));

        let err = SiteConfig::from_toml_str("[carousel\n").unwrap_err();
        assert!(matches!(err, VitrineError::ConfigParse(_)));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let mut config = SiteConfig::default();
        config.marquee.drift = 6.5;
        config.intro.max_elements = 90;

        let text = config.to_toml_string().unwrap();
        assert_eq!(SiteConfig::from_toml_str(&text).unwrap(), config);
    }
}
