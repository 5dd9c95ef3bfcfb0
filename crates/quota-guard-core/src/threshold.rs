//! Threshold decision rule
//!
//! Checker routines do not agree on how the configured threshold is expressed:
//! some read it as a fraction of the limit (`0.8`), others as a percentage
//! (`80`), and a few treat reaching the threshold as crossing it. Each routine
//! declares its convention through a [`ThresholdRule`] instead of baking it into
//! arithmetic; the configured value is passed through unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the configured threshold value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdUnit {
    /// `0.8` means 80% of the limit
    Fraction,
    /// `80` means 80% of the limit
    Percent,
}

/// Comparator applied between the usage ratio and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Strictly greater than
    Above,
    /// Greater than or equal to
    AtOrAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub unit: ThresholdUnit,
    pub comparison: Comparison,
}

impl ThresholdRule {
    pub const FRACTION_ABOVE: Self = Self::new(ThresholdUnit::Fraction, Comparison::Above);
    pub const PERCENT_ABOVE: Self = Self::new(ThresholdUnit::Percent, Comparison::Above);
    pub const PERCENT_AT_OR_ABOVE: Self =
        Self::new(ThresholdUnit::Percent, Comparison::AtOrAbove);

    pub const fn new(unit: ThresholdUnit, comparison: Comparison) -> Self {
        Self { unit, comparison }
    }

    /// Usage relative to the limit, scaled to this rule's unit.
    ///
    /// Returns `None` when the limit is zero.
    pub fn scaled_ratio(&self, usage: Decimal, limit: Decimal) -> Option<Decimal> {
        let ratio = usage.checked_div(limit)?;
        match self.unit {
            ThresholdUnit::Fraction => Some(ratio),
            ThresholdUnit::Percent => ratio.checked_mul(Decimal::ONE_HUNDRED),
        }
    }

    /// Whether `usage` against `limit` crosses `threshold`.
    ///
    /// A zero limit is crossed by any positive usage.
    pub fn crosses(&self, usage: Decimal, limit: Decimal, threshold: Decimal) -> bool {
        let Some(ratio) = self.scaled_ratio(usage, limit) else {
            return usage > Decimal::ZERO;
        };

        match self.comparison {
            Comparison::Above => ratio > threshold,
            Comparison::AtOrAbove => ratio >= threshold,
        }
    }

    /// Threshold expressed as a percentage, for log messages.
    pub fn threshold_percent(&self, threshold: Decimal) -> Decimal {
        match self.unit {
            ThresholdUnit::Fraction => threshold * Decimal::ONE_HUNDRED,
            ThresholdUnit::Percent => threshold,
        }
    }
}
