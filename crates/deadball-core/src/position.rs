// Fielding positions and resolution of non-specific nominal positions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::player::FieldingRecord;

/// The eight fielding positions every lineup has to cover, in the order the
/// auto lineup fills them.
pub const REQUIRED_FIELD_POSITIONS: [Position; 8] = [
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
];

/// Baseball positions as they appear on rosters, box scores and fielding
/// splits.
///
/// `Outfield`, `TwoWay` and `Unresolved` are nominal tags only: they never
/// describe a concrete spot on the field and are resolved via
/// [`resolve_position`] before a player is slotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    Pitcher,
    /// Generic outfield ("OF") with no specific side.
    Outfield,
    /// Two-way player ("TWP"/"Y").
    TwoWay,
    /// Anything else: pinch hitter/runner, blank or unknown text.
    Unresolved,
}

impl Position {
    /// Parse a position abbreviation or numeric scoring code.
    ///
    /// Handles:
    /// - abbreviations: "C", "1B", ..., "RF", "DH", "P", "OF", "TWP"
    /// - scorer codes: "1" (P) through "10" (DH), "O" (OF), "Y" (two-way)
    ///
    /// Unknown text (including "PH"/"PR") maps to `Unresolved`.
    pub fn from_str_pos(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "C" | "2" => Position::Catcher,
            "1B" | "3" => Position::FirstBase,
            "2B" | "4" => Position::SecondBase,
            "3B" | "5" => Position::ThirdBase,
            "SS" | "6" => Position::ShortStop,
            "LF" | "7" => Position::LeftField,
            "CF" | "8" => Position::CenterField,
            "RF" | "9" => Position::RightField,
            "DH" | "10" => Position::DesignatedHitter,
            "P" | "SP" | "RP" | "1" => Position::Pitcher,
            "OF" | "O" => Position::Outfield,
            "TWP" | "Y" => Position::TwoWay,
            _ => Position::Unresolved,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::Pitcher => "P",
            Position::Outfield => "OF",
            Position::TwoWay => "TWP",
            Position::Unresolved => "?",
        }
    }

    /// Whether this is one of the eight required fielding positions.
    pub fn is_required_field(&self) -> bool {
        REQUIRED_FIELD_POSITIONS.contains(self)
    }

    /// Left, center or right field.
    pub fn is_outfield(&self) -> bool {
        matches!(
            self,
            Position::LeftField | Position::CenterField | Position::RightField
        )
    }

    /// Outfield including the generic "OF" tag.
    pub fn is_outfield_class(&self) -> bool {
        self.is_outfield() || *self == Position::Outfield
    }

    /// Whether a nominal position has to be resolved from fielding data.
    pub fn needs_resolution(&self) -> bool {
        matches!(
            self,
            Position::Outfield | Position::TwoWay | Position::Pitcher | Position::Unresolved
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_str())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Position::from_str_pos(&raw))
    }
}

// ---------------------------------------------------------------------------
// Per-position game counts
// ---------------------------------------------------------------------------

/// Sum games per position across all fielding stints.
///
/// Positions are returned in order of first appearance so that callers
/// breaking ties on "first listed" stay deterministic.
pub fn games_by_position(records: &[FieldingRecord]) -> Vec<(Position, u32)> {
    let mut totals: Vec<(Position, u32)> = Vec::new();
    for record in records {
        match totals.iter_mut().find(|(pos, _)| *pos == record.position) {
            Some((_, games)) => *games += record.games,
            None => totals.push((record.position, record.games)),
        }
    }
    totals
}

/// Total games at one exact position across all stints.
pub fn games_at(records: &[FieldingRecord], position: Position) -> u32 {
    records
        .iter()
        .filter(|r| r.position == position)
        .map(|r| r.games)
        .sum()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a nominal position to one a player can be slotted at.
///
/// Specific positions pass through unchanged. Non-specific tags pick the
/// non-pitching position with the most games played (first listed wins a
/// tie); with no non-pitching fielding record the player becomes a
/// designated hitter.
pub fn resolve_position(nominal: Position, records: &[FieldingRecord]) -> Position {
    if !nominal.needs_resolution() {
        return nominal;
    }

    let mut best: Option<(Position, u32)> = None;
    for (position, games) in games_by_position(records) {
        if position == Position::Pitcher || position == Position::Unresolved {
            continue;
        }
        if best.map_or(true, |(_, most)| games > most) {
            best = Some((position, games));
        }
    }

    best.map_or(Position::DesignatedHitter, |(position, _)| position)
}
