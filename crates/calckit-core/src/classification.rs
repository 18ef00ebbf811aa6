//! Ordered threshold tables mapping a scalar score to a labelled bucket.
//!
//! A table is a list of bands sorted by strictly increasing lower bound.
//! The first band is open-ended downward (its lower bound is documentary)
//! and the last band is open-ended upward, so every score maps to exactly
//! one band. A score equal to a cut point belongs to the higher band.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bucket of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdBand<L: 'static> {
    pub lower_bound: Decimal,
    pub label: L,
    pub guidance: &'static str,
}

/// A static, ordered table of bands.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<L: 'static> {
    bands: &'static [ThresholdBand<L>],
}

impl<L: Copy> ThresholdTable<L> {
    pub const fn new(bands: &'static [ThresholdBand<L>]) -> Self {
        assert!(!bands.is_empty(), "threshold table needs at least one band");
        Self { bands }
    }

    pub fn bands(&self) -> &'static [ThresholdBand<L>] {
        self.bands
    }

    /// Lower bounds of every band after the first, in ascending order.
    pub fn cut_points(&self) -> impl Iterator<Item = Decimal> + 'static {
        self.bands.iter().skip(1).map(|b| b.lower_bound)
    }

    /// Bounds strictly increase from band to band.
    pub fn is_monotonic(&self) -> bool {
        self.bands
            .windows(2)
            .all(|w| w[0].lower_bound < w[1].lower_bound)
    }

    /// Select the band for `score`.
    pub fn classify(&self, score: Decimal) -> &'static ThresholdBand<L> {
        let mut selected = &self.bands[0];
        for band in &self.bands[1..] {
            if score >= band.lower_bound {
                selected = band;
            } else {
                break;
            }
        }
        selected
    }

    /// Select the band for `score` and copy it into a serializable result.
    pub fn classification(&self, score: Decimal) -> Classification<L> {
        Classification::from(self.classify(score))
    }
}

/// Label plus advisory text attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification<L> {
    pub label: L,
    pub guidance: String,
}

impl<L: Copy> From<&ThresholdBand<L>> for Classification<L> {
    fn from(band: &ThresholdBand<L>) -> Self {
        Classification {
            label: band.label,
            guidance: band.guidance.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Level {
        Low,
        Mid,
        High,
    }

    const TABLE: ThresholdTable<Level> = ThresholdTable::new(&[
        ThresholdBand {
            lower_bound: dec!(0),
            label: Level::Low,
            guidance: "low",
        },
        ThresholdBand {
            lower_bound: dec!(10),
            label: Level::Mid,
            guidance: "mid",
        },
        ThresholdBand {
            lower_bound: dec!(20),
            label: Level::High,
            guidance: "high",
        },
    ]);

    #[test]
    fn test_bottom_band_is_open_ended() {
        assert_eq!(TABLE.classify(dec!(-1000)).label, Level::Low);
    }

    #[test]
    fn test_top_band_is_open_ended() {
        assert_eq!(TABLE.classify(dec!(1_000_000_000)).label, Level::High);
    }

    #[test]
    fn test_cut_point_belongs_to_higher_band() {
        assert_eq!(TABLE.classify(dec!(9.9999)).label, Level::Low);
        assert_eq!(TABLE.classify(dec!(10)).label, Level::Mid);
        assert_eq!(TABLE.classify(dec!(20)).label, Level::High);
    }

    #[test]
    fn test_monotonic() {
        assert!(TABLE.is_monotonic());
        assert_eq!(TABLE.cut_points().collect::<Vec<_>>(), vec![dec!(10), dec!(20)]);
    }

    #[test]
    fn test_classification_copies_guidance() {
        let c = TABLE.classification(dec!(15));
        assert_eq!(c.label, Level::Mid);
        assert_eq!(c.guidance, "mid");
    }
}
