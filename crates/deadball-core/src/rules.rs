// Era-dependent rating thresholds.
//
// Every number the classifiers compare against lives here as plain data.
// `EraRules::default()` carries the standard tables; callers may override
// any part (the CLI reads overrides from TOML) and pass the result into the
// pure rating functions.

use serde::{Deserialize, Serialize};

use crate::pitch_die::PitchDie;

/// Minimum plate appearances (AB+BB+HBP+SF) for a pitcher's real batting
/// line to be used on the card.
pub const SYNTHETIC_BATTING_MIN_PA: u32 = 20;
/// Sides on each die rolled for a synthetic pitcher batting average.
pub const SYNTHETIC_BATTING_DIE_SIDES: u32 = 8;
/// Number of dice rolled for a synthetic pitcher batting average.
pub const SYNTHETIC_BATTING_DICE: u32 = 2;
/// Points added to the synthetic average to form the on-base figure.
pub const SYNTHETIC_BATTING_OBP_BONUS: u32 = 4;

/// Broad rule regime a season falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era {
    /// Dead-ball seasons, judged on raw counts.
    Ancient,
    /// Everything later, judged on rates.
    Modern,
}

/// All rating thresholds, grouped by concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraRules {
    /// Last season rated under the Ancient rules.
    pub ancient_through: i32,
    /// Last season played on the short schedule.
    pub short_schedule_through: i32,
    pub short_schedule_games: u32,
    pub full_schedule_games: u32,
    pub modern_batting: ModernBatting,
    pub ancient_batting: AncientBatting,
    pub fielding: Fielding,
    pub modern_pitching: ModernPitching,
    pub ancient_pitching: AncientPitching,
    pub control: Control,
    pub pitch_die: PitchDieTable,
    pub pitcher_batting: PitcherBatting,
}

impl Default for EraRules {
    fn default() -> Self {
        EraRules {
            ancient_through: 1915,
            short_schedule_through: 1960,
            short_schedule_games: 154,
            full_schedule_games: 162,
            modern_batting: ModernBatting::default(),
            ancient_batting: AncientBatting::default(),
            fielding: Fielding::default(),
            modern_pitching: ModernPitching::default(),
            ancient_pitching: AncientPitching::default(),
            control: Control::default(),
            pitch_die: PitchDieTable::default(),
            pitcher_batting: PitcherBatting::default(),
        }
    }
}

impl EraRules {
    pub fn era(&self, year: i32) -> Era {
        if year <= self.ancient_through {
            Era::Ancient
        } else {
            Era::Modern
        }
    }

    /// Length of the regular season used to normalize counting stats.
    pub fn schedule_games(&self, year: i32) -> u32 {
        if year <= self.short_schedule_through {
            self.short_schedule_games
        } else {
            self.full_schedule_games
        }
    }
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

/// Rate-based batting thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModernBatting {
    /// Isolated power at or above which a hitter is `power++`.
    pub power_plus_plus_iso: f64,
    pub power_plus_iso: f64,
    /// Isolated power at or below which a hitter is `power--`.
    pub power_minus_minus_iso: f64,
    pub power_minus_iso: f64,
    /// Schedule-normalized doubles.
    pub contact_plus_doubles: f64,
    pub contact_minus_doubles: f64,
    pub speed_plus_steals: u32,
}

impl Default for ModernBatting {
    fn default() -> Self {
        ModernBatting {
            power_plus_plus_iso: 0.260,
            power_plus_iso: 0.220,
            power_minus_minus_iso: 0.100,
            power_minus_iso: 0.125,
            contact_plus_doubles: 35.0,
            contact_minus_doubles: 10.0,
            speed_plus_steals: 20,
        }
    }
}

/// Count-based batting thresholds for the dead-ball seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AncientBatting {
    pub power_plus_plus_home_runs: u32,
    pub power_plus_home_runs: u32,
    /// Homerless hitters with fewer doubles than this are `power-`.
    pub power_minus_doubles: u32,
    /// Homerless hitters with fewer doubles than this are `power--`.
    pub power_minus_minus_doubles: u32,
    pub contact_plus_doubles: f64,
    pub contact_minus_strikeouts: u32,
    /// Walks per plate appearance below which a hitter is `contact-`.
    pub contact_minus_walk_rate: f64,
    pub speed_plus_steals: u32,
}

impl Default for AncientBatting {
    fn default() -> Self {
        AncientBatting {
            power_plus_plus_home_runs: 10,
            power_plus_home_runs: 5,
            power_minus_doubles: 10,
            power_minus_minus_doubles: 5,
            contact_plus_doubles: 25.0,
            contact_minus_strikeouts: 70,
            contact_minus_walk_rate: 0.04,
            speed_plus_steals: 35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fielding {
    pub glove_plus: f64,
    pub glove_minus: f64,
}

impl Default for Fielding {
    fn default() -> Self {
        Fielding {
            glove_plus: 0.998,
            glove_minus: 0.950,
        }
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModernPitching {
    pub strikeout_plus_k9: f64,
    pub starter_stamina_innings: f64,
    pub reliever_stamina_innings: f64,
}

impl Default for ModernPitching {
    fn default() -> Self {
        ModernPitching {
            strikeout_plus_k9: 10.0,
            starter_stamina_innings: 200.0,
            reliever_stamina_innings: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AncientPitching {
    pub strikeout_plus_k9: f64,
    pub groundball_max_k9: f64,
    pub groundball_max_era: f64,
    pub stamina_innings: f64,
}

impl Default for AncientPitching {
    fn default() -> Self {
        AncientPitching {
            strikeout_plus_k9: 5.0,
            groundball_max_k9: 2.5,
            groundball_max_era: 2.5,
            stamina_innings: 300.0,
        }
    }
}

/// Walk-rate thresholds shared by both eras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Control {
    /// BB/9 strictly below this is `control+`.
    pub control_plus_below_bb9: f64,
    /// BB/9 at or above this is `control-`.
    pub control_minus_bb9: f64,
}

impl Default for Control {
    fn default() -> Self {
        Control {
            control_plus_below_bb9: 2.0,
            control_minus_bb9: 3.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Pitch die table
// ---------------------------------------------------------------------------

/// League ERA baseline for a run of seasons ending at `end_year`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EraWindow {
    pub end_year: i32,
    pub mean_era: f64,
}

/// Spread of league ERAs for an inclusive range of seasons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmaBand {
    pub from_year: i32,
    pub through_year: i32,
    pub sigma: f64,
}

/// Upper bound (in standard deviations from the mean) of a die tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DieCutoff {
    pub z: f64,
    pub die: PitchDie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchDieTable {
    /// Checked in order; the first window ending at or after the season wins.
    pub windows: Vec<EraWindow>,
    /// Checked in order; seasons in no band use `default_sigma`.
    pub sigma_bands: Vec<SigmaBand>,
    pub default_sigma: f64,
    /// Baseline for seasons past the last window.
    pub fallback_mean_era: f64,
    /// Relievers this many sigmas (or more) better than the mean get
    /// `relief_ace_die`.
    pub relief_ace_z: f64,
    pub relief_ace_die: PitchDie,
    /// Ascending z cutoffs, best tier first.
    pub cutoffs: Vec<DieCutoff>,
    /// Tier for anything worse than the last cutoff.
    pub floor: PitchDie,
}

impl Default for PitchDieTable {
    fn default() -> Self {
        let window = |end_year, mean_era| EraWindow { end_year, mean_era };
        let cutoff = |z, die| DieCutoff { z, die };
        PitchDieTable {
            windows: vec![
                window(1919, 2.82),
                window(1935, 4.20),
                window(1962, 3.90),
                window(1969, 3.20),
                window(1992, 3.80),
                window(2009, 4.60),
                window(2025, 4.15),
            ],
            sigma_bands: vec![
                SigmaBand {
                    from_year: 0,
                    through_year: 1920,
                    sigma: 0.65,
                },
                SigmaBand {
                    from_year: 1993,
                    through_year: 2009,
                    sigma: 0.95,
                },
            ],
            default_sigma: 0.80,
            fallback_mean_era: 4.15,
            relief_ace_z: -2.0,
            relief_ace_die: PitchDie::D20,
            cutoffs: vec![
                cutoff(-1.645, PitchDie::D12),
                cutoff(-1.036, PitchDie::D8),
                cutoff(-0.385, PitchDie::D4),
                cutoff(0.524, PitchDie::D0),
                cutoff(1.645, PitchDie::MinusD4),
            ],
            floor: PitchDie::MinusD6,
        }
    }
}

// ---------------------------------------------------------------------------
// Pitcher batting
// ---------------------------------------------------------------------------

/// How pitchers with too little batting data get a rolled batting line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitcherBatting {
    pub min_plate_appearances: u32,
    pub dice: u32,
    pub die_sides: u32,
    pub on_base_bonus: u32,
}

impl Default for PitcherBatting {
    fn default() -> Self {
        PitcherBatting {
            min_plate_appearances: SYNTHETIC_BATTING_MIN_PA,
            dice: SYNTHETIC_BATTING_DICE,
            die_sides: SYNTHETIC_BATTING_DIE_SIDES,
            on_base_bonus: SYNTHETIC_BATTING_OBP_BONUS,
        }
    }
}
