// Pitch die assignment: a pitcher's ERA measured against the league of its season.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::PitchDieTable;

/// Die a pitcher rolls on the card, best first.
///
/// The derived ordering follows quality: `D20 < D12 < ... < MinusD6`, so a
/// "greater" die is a worse one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchDie {
    #[serde(rename = "d20")]
    D20,
    #[serde(rename = "d12")]
    D12,
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d4")]
    D4,
    #[serde(rename = "d0")]
    D0,
    #[serde(rename = "-d4")]
    MinusD4,
    #[serde(rename = "-d6")]
    MinusD6,
}

impl PitchDie {
    pub fn label(&self) -> &'static str {
        match self {
            PitchDie::D20 => "d20",
            PitchDie::D12 => "d12",
            PitchDie::D8 => "d8",
            PitchDie::D4 => "d4",
            PitchDie::D0 => "d0",
            PitchDie::MinusD4 => "-d4",
            PitchDie::MinusD6 => "-d6",
        }
    }

    /// Tier number: 0 for the relief-ace die, 1 (best) through 6 (worst)
    /// for the table tiers.
    pub fn tier(&self) -> u8 {
        match self {
            PitchDie::D20 => 0,
            PitchDie::D12 => 1,
            PitchDie::D8 => 2,
            PitchDie::D4 => 3,
            PitchDie::D0 => 4,
            PitchDie::MinusD4 => 5,
            PitchDie::MinusD6 => 6,
        }
    }
}

impl fmt::Display for PitchDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// League ERA mean and spread for one season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraBaseline {
    pub mean_era: f64,
    pub sigma: f64,
}

impl EraBaseline {
    /// Absolute ERA sitting `z` standard deviations from the mean.
    pub fn threshold(&self, z: f64) -> f64 {
        self.mean_era + z * self.sigma
    }
}

/// Look up the baseline for a season.
pub fn era_baseline(year: i32, table: &PitchDieTable) -> EraBaseline {
    let mean_era = table
        .windows
        .iter()
        .find(|w| year <= w.end_year)
        .map_or(table.fallback_mean_era, |w| w.mean_era);
    let sigma = table
        .sigma_bands
        .iter()
        .find(|b| (b.from_year..=b.through_year).contains(&year))
        .map_or(table.default_sigma, |b| b.sigma);
    EraBaseline { mean_era, sigma }
}

/// Assign a pitch die from ERA.
///
/// Non-starters far enough below the league mean skip the table and get the
/// relief-ace die. Everyone else lands in the first tier whose absolute
/// cutoff (mean + z·σ) the ERA does not exceed.
pub fn assign_pitch_die(era: f64, year: i32, is_starter: bool, table: &PitchDieTable) -> PitchDie {
    let baseline = era_baseline(year, table);

    if !is_starter && era <= baseline.threshold(table.relief_ace_z) {
        return table.relief_ace_die;
    }

    table
        .cutoffs
        .iter()
        .find(|c| era <= baseline.threshold(c.z))
        .map_or(table.floor, |c| c.die)
}
