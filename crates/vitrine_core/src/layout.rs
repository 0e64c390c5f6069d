//! Layout measurement seam
//!
//! Tracks are built from extents measured by the host. Extents are expressed
//! in percent of the viewport along the track axis, the same unit the engine
//! writes back into render transforms.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitrineError};

/// Direction a track scrolls in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// Select the component of an `(x, y)` pair along this axis
    pub fn pick(&self, x: f32, y: f32) -> f32 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }

    /// CSS transform placing an element at `offset` percent along this axis
    pub fn transform_css(&self, offset: f32) -> String {
        match self {
            Axis::Horizontal => format!("translate3d({offset:.4}%, 0, 0)"),
            Axis::Vertical => format!("translate3d(0, {offset:.4}%, 0)"),
        }
    }
}

/// Host viewport size in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent of a pixel length as percent of the viewport along `axis`
    pub fn percent_of(&self, axis: Axis, px: f32) -> f32 {
        let total = axis.pick(self.width, self.height);
        if total <= 0.0 {
            0.0
        } else {
            px / total * 100.0
        }
    }
}

/// Anything that can report the rendered extents of a track's slots
pub trait LayoutSource {
    /// Extents in slot order
    ///
    /// Returns `MissingElement` when the track container is absent.
    fn measure(&self) -> Result<Vec<f32>>;
}

/// Extents known ahead of time (tests, configuration, the CLI)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticLayout {
    extents: Vec<f32>,
}

impl StaticLayout {
    pub fn new(extents: impl Into<Vec<f32>>) -> Self {
        Self {
            extents: extents.into(),
        }
    }

    /// `count` slots of identical extent
    pub fn uniform(count: usize, extent: f32) -> Self {
        Self {
            extents: vec![extent; count],
        }
    }
}

impl LayoutSource for StaticLayout {
    fn measure(&self) -> Result<Vec<f32>> {
        Ok(self.extents.clone())
    }
}

/// A layout whose container could not be found
#[derive(Clone, Debug)]
pub struct MissingLayout(pub String);

impl LayoutSource for MissingLayout {
    fn measure(&self) -> Result<Vec<f32>> {
        Err(VitrineError::MissingElement(self.0.clone()))
    }
}

/// Reject negative or non-finite extents
pub fn validate_extents(extents: &[f32]) -> Result<()> {
    for (index, &value) in extents.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(VitrineError::InvalidExtent { index, value });
        }
    }
    Ok(())
}
