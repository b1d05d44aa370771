// Trait tags and batting lines derived from a season's stats.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::FieldingRecord;
use crate::rules::{Era, EraRules};
use crate::stats::StatLine;

/// Sentinel batting line for a player without at-bats.
pub const EMPTY_BATTING_LINE: &str = "-/-";

/// A discrete card trait summarizing one statistical tendency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Trait {
    #[serde(rename = "power++")]
    PowerPlusPlus,
    #[serde(rename = "power+")]
    PowerPlus,
    #[serde(rename = "power-")]
    PowerMinus,
    #[serde(rename = "power--")]
    PowerMinusMinus,
    #[serde(rename = "contact+")]
    ContactPlus,
    #[serde(rename = "contact-")]
    ContactMinus,
    #[serde(rename = "speed+")]
    SpeedPlus,
    #[serde(rename = "speed-")]
    SpeedMinus,
    #[serde(rename = "glove+")]
    GlovePlus,
    #[serde(rename = "glove-")]
    GloveMinus,
    #[serde(rename = "strikeout+")]
    StrikeoutPlus,
    #[serde(rename = "groundball+")]
    GroundballPlus,
    #[serde(rename = "stamina+")]
    StaminaPlus,
    #[serde(rename = "control+")]
    ControlPlus,
    #[serde(rename = "control-")]
    ControlMinus,
}

impl Trait {
    pub fn label(&self) -> &'static str {
        match self {
            Trait::PowerPlusPlus => "power++",
            Trait::PowerPlus => "power+",
            Trait::PowerMinus => "power-",
            Trait::PowerMinusMinus => "power--",
            Trait::ContactPlus => "contact+",
            Trait::ContactMinus => "contact-",
            Trait::SpeedPlus => "speed+",
            Trait::SpeedMinus => "speed-",
            Trait::GlovePlus => "glove+",
            Trait::GloveMinus => "glove-",
            Trait::StrikeoutPlus => "strikeout+",
            Trait::GroundballPlus => "groundball+",
            Trait::StaminaPlus => "stamina+",
            Trait::ControlPlus => "control+",
            Trait::ControlMinus => "control-",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// De-duplicated, deterministically ordered set of traits.
pub type TraitSet = BTreeSet<Trait>;

// ---------------------------------------------------------------------------
// Batting line
// ---------------------------------------------------------------------------

/// Card batting line "AA/OO": average and on-base percentage as whole
/// points, truncated rather than rounded.
///
/// Integer arithmetic keeps `.290` at 29 where `0.29 * 100.0` would floor
/// to 28.
pub fn batting_line(stats: &StatLine) -> String {
    if stats.at_bats == 0 {
        return EMPTY_BATTING_LINE.to_string();
    }
    let average = (100 * stats.hits) / stats.at_bats;
    let on_base = (100 * (stats.hits + stats.walks + stats.hit_by_pitch))
        / stats.on_base_denominator();
    format!("{average}/{on_base}")
}

// ---------------------------------------------------------------------------
// Fielding percentage
// ---------------------------------------------------------------------------

/// (PO + A) / chances summed over every stint, falling back to a supplied
/// percentage when no stints exist. Zero when there is nothing to measure.
pub fn fielding_percentage(stats: &StatLine, records: &[FieldingRecord]) -> f64 {
    if records.is_empty() {
        return stats.fielding_percentage.unwrap_or(0.0);
    }
    let (made, chances) = records.iter().fold((0u32, 0u32), |(made, chances), r| {
        let plays = r.putouts + r.assists;
        (made + plays, chances + plays + r.errors)
    });
    if chances == 0 {
        return 0.0;
    }
    made as f64 / chances as f64
}

/// The glove trait on its own, judged from fielding whether or not the
/// player batted.
pub fn defensive_trait(
    stats: &StatLine,
    fielding: &[FieldingRecord],
    rules: &EraRules,
) -> Option<Trait> {
    glove_trait(fielding_percentage(stats, fielding), rules)
}

fn glove_trait(pct: f64, rules: &EraRules) -> Option<Trait> {
    if pct >= rules.fielding.glove_plus {
        Some(Trait::GlovePlus)
    } else if pct > 0.0 && pct < rules.fielding.glove_minus {
        Some(Trait::GloveMinus)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Batter traits
// ---------------------------------------------------------------------------

/// Traits for a hitter's season, judged under the season's era rules.
///
/// A line with no plate appearances produces no traits.
pub fn batter_traits(
    stats: &StatLine,
    year: i32,
    fielding: &[FieldingRecord],
    rules: &EraRules,
) -> TraitSet {
    let mut traits = TraitSet::new();
    let plate_appearances = stats.effective_plate_appearances();
    if plate_appearances == 0 {
        return traits;
    }

    let normalized_doubles = if stats.games_played > 0 {
        stats.doubles as f64 / stats.games_played as f64 * rules.schedule_games(year) as f64
    } else {
        0.0
    };

    match rules.era(year) {
        Era::Modern => {
            let t = &rules.modern_batting;
            let iso = stats.slugging().unwrap_or(0.0) - stats.batting_average().unwrap_or(0.0);

            if iso >= t.power_plus_plus_iso {
                traits.insert(Trait::PowerPlusPlus);
            } else if iso >= t.power_plus_iso {
                traits.insert(Trait::PowerPlus);
            }
            if iso <= t.power_minus_minus_iso {
                traits.insert(Trait::PowerMinusMinus);
            } else if iso <= t.power_minus_iso {
                traits.insert(Trait::PowerMinus);
            }

            if normalized_doubles >= t.contact_plus_doubles {
                traits.insert(Trait::ContactPlus);
            }
            if normalized_doubles < t.contact_minus_doubles {
                traits.insert(Trait::ContactMinus);
            }

            if stats.stolen_bases >= t.speed_plus_steals {
                traits.insert(Trait::SpeedPlus);
            }
        }
        Era::Ancient => {
            let t = &rules.ancient_batting;
            let hr = stats.home_runs;

            if hr >= t.power_plus_plus_home_runs {
                traits.insert(Trait::PowerPlusPlus);
            } else if hr >= t.power_plus_home_runs {
                traits.insert(Trait::PowerPlus);
            }
            if hr == 0 && stats.doubles < t.power_minus_doubles {
                traits.insert(Trait::PowerMinus);
            }
            if hr == 0 && stats.doubles < t.power_minus_minus_doubles {
                traits.insert(Trait::PowerMinusMinus);
            }

            if normalized_doubles >= t.contact_plus_doubles {
                traits.insert(Trait::ContactPlus);
            }
            let walk_rate = stats.walks as f64 / plate_appearances as f64;
            if stats.strikeouts >= t.contact_minus_strikeouts
                || walk_rate < t.contact_minus_walk_rate
            {
                traits.insert(Trait::ContactMinus);
            }

            if stats.stolen_bases >= t.speed_plus_steals {
                traits.insert(Trait::SpeedPlus);
            }
        }
    }

    if stats.stolen_bases == 0 {
        traits.insert(Trait::SpeedMinus);
    }

    if let Some(glove) = defensive_trait(stats, fielding, rules) {
        traits.insert(glove);
    }

    traits
}

// ---------------------------------------------------------------------------
// Pitcher traits
// ---------------------------------------------------------------------------

/// Traits for a pitcher's season. A line with no innings produces none.
pub fn pitcher_traits(stats: &StatLine, year: i32, is_starter: bool, rules: &EraRules) -> TraitSet {
    let mut traits = TraitSet::new();
    if stats.innings.is_zero() {
        return traits;
    }

    let innings = stats.innings.as_f64();
    let k9 = stats.per_nine(stats.strikeouts);
    let bb9 = stats.per_nine(stats.walks);

    match rules.era(year) {
        Era::Modern => {
            let t = &rules.modern_pitching;
            if k9 >= t.strikeout_plus_k9 {
                traits.insert(Trait::StrikeoutPlus);
            }
            let stamina_innings = if is_starter {
                t.starter_stamina_innings
            } else {
                t.reliever_stamina_innings
            };
            if innings >= stamina_innings {
                traits.insert(Trait::StaminaPlus);
            }
        }
        Era::Ancient => {
            let t = &rules.ancient_pitching;
            if k9 >= t.strikeout_plus_k9 {
                traits.insert(Trait::StrikeoutPlus);
            }
            if k9 <= t.groundball_max_k9 && stats.era() <= t.groundball_max_era {
                traits.insert(Trait::GroundballPlus);
            }
            if innings >= t.stamina_innings {
                traits.insert(Trait::StaminaPlus);
            }
        }
    }

    if bb9 < rules.control.control_plus_below_bb9 {
        traits.insert(Trait::ControlPlus);
    }
    if bb9 >= rules.control.control_minus_bb9 {
        traits.insert(Trait::ControlMinus);
    }

    traits
}
