// Player identities, handedness, fielding records and rated game cards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pitch_die::PitchDie;
use crate::position::Position;
use crate::stats::{Innings, StatLine};
use crate::traits::TraitSet;

/// Identifier of a player as used by the statistics provider.
pub type PlayerId = u32;

/// Fielding stints keyed by player.
pub type FieldingIndex = HashMap<PlayerId, Vec<FieldingRecord>>;

/// Look up a player's fielding stints, empty when none were recorded.
pub fn fielding_for(index: &FieldingIndex, id: PlayerId) -> &[FieldingRecord] {
    index.get(&id).map(Vec::as_slice).unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    #[serde(rename = "L")]
    Left,
    #[default]
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "S")]
    Switch,
}

impl Hand {
    /// Lenient parse of a source hand code ("L", "right", "S ").
    ///
    /// Only the first letter counts; absent or unrecognized values are
    /// treated as right-handed.
    pub fn parse(raw: Option<&str>) -> Self {
        let first = raw
            .and_then(|s| s.trim().chars().next())
            .map(|c| c.to_ascii_uppercase());
        match first {
            Some('L') => Hand::Left,
            Some('S') => Hand::Switch,
            _ => Hand::Right,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
            Hand::Switch => "S",
        }
    }

    /// Card notation for a pitcher's throwing arm ("LHP"/"RHP").
    pub fn pitcher_code(&self) -> &'static str {
        match self {
            Hand::Left => "LHP",
            Hand::Right => "RHP",
            Hand::Switch => "SHP",
        }
    }
}

/// Batting side and throwing arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub bats: Hand,
    pub throws: Hand,
}

impl PlayerProfile {
    pub fn parse(bats: Option<&str>, throws: Option<&str>) -> Self {
        PlayerProfile {
            bats: Hand::parse(bats),
            throws: Hand::parse(throws),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Games and chances at one position for one stint of a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingRecord {
    pub position: Position,
    #[serde(default)]
    pub games: u32,
    #[serde(default)]
    pub putouts: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub errors: u32,
}

impl Default for FieldingRecord {
    fn default() -> Self {
        FieldingRecord {
            position: Position::Unresolved,
            games: 0,
            putouts: 0,
            assists: 0,
            errors: 0,
        }
    }
}

/// One player on a team's season roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    pub primary_position: Position,
}

/// A player eligible to hit, with the keys the lineup logic ranks by.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCandidate {
    pub id: PlayerId,
    pub name: String,
    pub stats: StatLine,
    pub profile: PlayerProfile,
    /// Concrete position after override and resolution.
    pub position: Position,
    pub obp: f64,
    pub ops: f64,
    pub plate_appearances: u32,
}

impl PlayerCandidate {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        stats: StatLine,
        profile: PlayerProfile,
        position: Position,
    ) -> Self {
        let obp = stats.on_base().unwrap_or(0.0);
        let ops = obp + stats.slugging().unwrap_or(0.0);
        let plate_appearances = stats.effective_plate_appearances();
        PlayerCandidate {
            id,
            name: name.into(),
            stats,
            profile,
            position,
            obp,
            ops,
            plate_appearances,
        }
    }
}

// ---------------------------------------------------------------------------
// Rated cards (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitcherRole {
    #[serde(rename = "SP")]
    Starter,
    #[serde(rename = "RP")]
    Reliever,
    #[serde(rename = "CP")]
    Closer,
}

/// How a pitcher hits when batting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingProfile {
    pub bats: Hand,
    /// "AA/OO" card line, possibly synthetic.
    pub batting_line: String,
    pub traits: TraitSet,
    pub plate_appearances: u32,
    /// True when the line was rolled rather than taken from real stats.
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedPitcher {
    pub id: PlayerId,
    pub name: String,
    pub role: PitcherRole,
    pub die: PitchDie,
    pub traits: TraitSet,
    pub throws: Hand,
    pub innings: Innings,
    pub era: f64,
    pub saves: u32,
    pub batting: BattingProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedBatter {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// 1-based batting-order index; `None` on the bench.
    pub order: Option<u8>,
    pub bats: Hand,
    pub throws: Hand,
    pub batting_line: String,
    pub traits: TraitSet,
    pub plate_appearances: u32,
    pub is_pitcher: bool,
}
