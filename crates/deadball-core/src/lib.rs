// Library root: season stats in, Deadball game cards out.

pub mod eligibility;
pub mod lineup;
pub mod pitch_die;
pub mod player;
pub mod position;
pub mod roster;
pub mod rules;
pub mod stats;
pub mod traits;

pub use pitch_die::{assign_pitch_die, PitchDie};
pub use player::{
    FieldingIndex, FieldingRecord, Hand, PitcherRole, PlayerId, PlayerProfile, RatedBatter,
    RatedPitcher, RosterEntry,
};
pub use position::{resolve_position, Position};
pub use roster::{assemble_roster, BattingSlot, Bullpen, RosterRequest, RosterResult, SeasonData};
pub use rules::EraRules;
pub use stats::{aggregate, Innings, StatLine, StatSplit, TeamId};
pub use traits::{batter_traits, batting_line, pitcher_traits, Trait, TraitSet};
