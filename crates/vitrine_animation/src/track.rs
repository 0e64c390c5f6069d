//! Tracks of repeating slots
//!
//! A track is the ordered list of slots a looping carousel cycles through.
//! Each slot has an extent and a base offset (the running sum of the extents
//! before it). The total extent is the wrap period: shifting the whole track
//! by one period looks identical to not shifting it at all.

use serde::{Deserialize, Serialize};
use vitrine_core::{validate_extents, LayoutSource, Result};

/// How a slot's raw offset is folded back near the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapMode {
    /// Fold using each slot's own extent (variable-width panels)
    ///
    /// Positions stay within `[-extent, period - extent]`, so a wide slot
    /// leaves the viewport entirely before it reappears on the other side.
    #[default]
    PerSlot,
    /// Fold at half the period (fixed-width marquee items)
    HalfPeriod,
}

/// One repeating visual unit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    pub extent: f32,
    pub base: f32,
}

/// Ordered slots plus their cumulative layout
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    slots: Vec<Slot>,
    period: f32,
    max_extent: f32,
}

impl Track {
    /// Build from extents in slot order
    pub fn from_extents(extents: &[f32]) -> Result<Self> {
        validate_extents(extents)?;

        let mut base = 0.0;
        let mut max_extent: f32 = 0.0;
        let slots = extents
            .iter()
            .map(|&extent| {
                let slot = Slot { extent, base };
                base += extent;
                max_extent = max_extent.max(extent);
                slot
            })
            .collect();

        Ok(Self {
            slots,
            period: base,
            max_extent,
        })
    }

    /// Measure a layout and build the track from it
    pub fn measure(layout: &dyn LayoutSource) -> Result<Self> {
        let extents = layout.measure()?;
        Self::from_extents(&extents)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total extent of all slots
    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn max_extent(&self) -> f32 {
        self.max_extent
    }

    /// Whether frames over this track can render anything
    ///
    /// Empty tracks and zero-length periods have no defined remainder.
    pub fn is_renderable(&self) -> bool {
        !self.slots.is_empty() && self.period > 0.0 && self.period.is_finite()
    }

    /// Rendered position of `slot` when the track is shifted by `offset`
    ///
    /// Callers must check [`Track::is_renderable`] first.
    pub fn position(&self, slot: &Slot, offset: f32, mode: WrapMode) -> f32 {
        let period = self.period;
        // Truncated remainder: the sign follows `base + offset`
        let mut raw = (slot.base + offset) % period;

        match mode {
            WrapMode::PerSlot => {
                if raw > period - slot.extent {
                    raw -= period;
                }
                if raw < -slot.extent {
                    raw += period;
                }
            }
            WrapMode::HalfPeriod => {
                let half = period / 2.0;
                if raw > half {
                    raw -= period;
                }
                if raw < -half {
                    raw += period;
                }
            }
        }

        raw
    }

    /// Positions of every slot for `offset`, in slot order
    pub fn positions(&self, offset: f32, mode: WrapMode) -> impl Iterator<Item = f32> + '_ {
        self.slots
            .iter()
            .map(move |slot| self.position(slot, offset, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{MissingLayout, StaticLayout, VitrineError};

    #[test]
    fn test_base_offsets_are_running_sum() {
        let track = Track::from_extents(&[40.0, 100.0, 60.0]).unwrap();
        let bases: Vec<f32> = track.slots().iter().map(|s| s.base).collect();
        assert_eq!(bases, vec![0.0, 40.0, 140.0]);
        assert_eq!(track.period(), 200.0);
        assert_eq!(track.max_extent(), 100.0);
        let sum: f32 = track.slots().iter().map(|s| s.extent).sum();
        assert_eq!(sum, track.period());
    }

    #[test]
    fn test_measure_propagates_missing_element() {
        let err = Track::measure(&MissingLayout(".gallery".into())).unwrap_err();
        assert_eq!(err, VitrineError::MissingElement(".gallery".into()));

        let track = Track::measure(&StaticLayout::uniform(4, 25.0)).unwrap();
        assert_eq!(track.period(), 100.0);
    }

    #[test]
    fn test_renderable() {
        assert!(!Track::default().is_renderable());
        assert!(!Track::from_extents(&[0.0, 0.0]).unwrap().is_renderable());
        assert!(Track::from_extents(&[1.0]).unwrap().is_renderable());
    }

    #[test]
    fn test_per_slot_threshold_uses_own_extent() {
        let track = Track::from_extents(&[200.0, 50.0, 50.0]).unwrap();

        let narrow = track.slots()[1];
        assert_eq!(track.position(&narrow, 0.0, WrapMode::PerSlot), 200.0);
        // 260 > 300 - 50
        assert_eq!(track.position(&narrow, 60.0, WrapMode::PerSlot), -40.0);

        // The wide slot folds once 300 - 200 is passed, well before half the period
        let wide = track.slots()[0];
        assert_eq!(track.position(&wide, 60.0, WrapMode::PerSlot), 60.0);
        assert_eq!(track.position(&wide, 60.0, WrapMode::HalfPeriod), 60.0);
        assert_eq!(track.position(&wide, 120.0, WrapMode::PerSlot), -180.0);
        assert_eq!(track.position(&wide, 120.0, WrapMode::HalfPeriod), 120.0);
    }

    #[test]
    fn test_negative_offsets_fold_forward() {
        let track = Track::from_extents(&[100.0, 100.0, 100.0]).unwrap();
        let first = track.slots()[0];
        // -250 % 300 = -250 < -100 → +300
        assert_eq!(track.position(&first, -250.0, WrapMode::PerSlot), 50.0);
        assert_eq!(track.position(&first, -50.0, WrapMode::PerSlot), -50.0);
        assert_eq!(track.position(&first, -250.0, WrapMode::HalfPeriod), 50.0);
    }

    #[test]
    fn test_positions_stay_bounded() {
        let track = Track::from_extents(&[30.0, 120.0, 45.0, 80.0]).unwrap();
        let period = track.period();
        let mut offset = -2000.0;
        while offset < 2000.0 {
            let positions = track.positions(offset, WrapMode::PerSlot);
            for (slot, position) in track.slots().iter().zip(positions) {
                assert!(position >= -slot.extent - 1e-3, "{position} at {offset}");
                assert!(position <= period - slot.extent + 1e-3, "{position} at {offset}");
                assert!(position >= -track.max_extent() - 1e-3);
                assert!(position <= period);
            }
            for position in track.positions(offset, WrapMode::HalfPeriod) {
                assert!(position.abs() <= period / 2.0 + 1e-3);
            }
            offset += 7.3;
        }
    }

    #[test]
    fn test_single_slot_wraps_negative() {
        let track = Track::from_extents(&[50.0]).unwrap();
        let slot = track.slots()[0];
        assert_eq!(track.position(&slot, 0.0, WrapMode::PerSlot), 0.0);
        assert_eq!(track.position(&slot, 10.0, WrapMode::PerSlot), -40.0);
        assert_eq!(track.position(&slot, 49.0, WrapMode::PerSlot), -1.0);
        assert_eq!(track.position(&slot, -10.0, WrapMode::PerSlot), -10.0);
    }

    #[test]
    fn test_invalid_extent_rejected() {
        assert!(Track::from_extents(&[10.0, f32::INFINITY]).is_err());
    }
}
