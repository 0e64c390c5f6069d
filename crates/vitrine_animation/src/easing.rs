//! Easing curves
//!
//! Maps normalized progress `t ∈ [0, 1]` to eased progress. Names follow the
//! usual quad/cubic/quart/quint families; [`Easing::from_str`] also accepts
//! the `power1..power4` notation (`"power2.out"`, `"power3.inOut"`) used by
//! web tweening libraries, where `power1` is quad and `power4` is quint.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vitrine_core::VitrineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
}

impl Easing {
    /// Evaluate the curve; `t` is clamped to `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => ease_in(t, 2),
            Easing::EaseOutQuad => ease_out(t, 2),
            Easing::EaseInOutQuad => ease_in_out(t, 2),
            Easing::EaseInCubic => ease_in(t, 3),
            Easing::EaseOutCubic => ease_out(t, 3),
            Easing::EaseInOutCubic => ease_in_out(t, 3),
            Easing::EaseInQuart => ease_in(t, 4),
            Easing::EaseOutQuart => ease_out(t, 4),
            Easing::EaseInOutQuart => ease_in_out(t, 4),
            Easing::EaseInQuint => ease_in(t, 5),
            Easing::EaseOutQuint => ease_out(t, 5),
            Easing::EaseInOutQuint => ease_in_out(t, 5),
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }

    /// Canonical name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "power1.in",
            Easing::EaseOutQuad => "power1.out",
            Easing::EaseInOutQuad => "power1.inOut",
            Easing::EaseInCubic => "power2.in",
            Easing::EaseOutCubic => "power2.out",
            Easing::EaseInOutCubic => "power2.inOut",
            Easing::EaseInQuart => "power3.in",
            Easing::EaseOutQuart => "power3.out",
            Easing::EaseInOutQuart => "power3.inOut",
            Easing::EaseInQuint => "power4.in",
            Easing::EaseOutQuint => "power4.out",
            Easing::EaseInOutQuint => "power4.inOut",
            Easing::EaseInSine => "sine.in",
            Easing::EaseOutSine => "sine.out",
            Easing::EaseInOutSine => "sine.inOut",
            Easing::EaseInExpo => "expo.in",
            Easing::EaseOutExpo => "expo.out",
            Easing::EaseInOutExpo => "expo.inOut",
        }
    }
}

fn ease_in(t: f32, power: i32) -> f32 {
    t.powi(power)
}

fn ease_out(t: f32, power: i32) -> f32 {
    1.0 - (1.0 - t).powi(power)
}

fn ease_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

impl FromStr for Easing {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if matches!(s, "linear" | "none" | "power0" | "power0.out") {
            return Ok(Easing::Linear);
        }

        let (family, kind) = s.split_once('.').unwrap_or((s, "out"));
        let kind = match kind.to_ascii_lowercase().as_str() {
            "in" => 0,
            "out" => 1,
            "inout" => 2,
            _ => return Err(VitrineError::InvalidConfig(format!("unknown easing `{s}`"))),
        };

        let variants = match family {
            "power1" | "quad" => [Easing::EaseInQuad, Easing::EaseOutQuad, Easing::EaseInOutQuad],
            "power2" | "cubic" => [
                Easing::EaseInCubic,
                Easing::EaseOutCubic,
                Easing::EaseInOutCubic,
            ],
            "power3" | "quart" => [
                Easing::EaseInQuart,
                Easing::EaseOutQuart,
                Easing::EaseInOutQuart,
            ],
            "power4" | "quint" | "strong" => [
                Easing::EaseInQuint,
                Easing::EaseOutQuint,
                Easing::EaseInOutQuint,
            ],
            "sine" => [Easing::EaseInSine, Easing::EaseOutSine, Easing::EaseInOutSine],
            "expo" => [Easing::EaseInExpo, Easing::EaseOutExpo, Easing::EaseInOutExpo],
            _ => return Err(VitrineError::InvalidConfig(format!("unknown easing `{s}`"))),
        };

        Ok(variants[kind])
    }
}

impl TryFrom<String> for Easing {
    type Error = VitrineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
