// Roster assembly: one team's game-day card from a season of stats.

pub mod collisions;
pub mod pitching;

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::lineup::{order_lineup, select_starters, LINEUP_SLOTS};
use crate::player::{
    fielding_for, FieldingIndex, PlayerCandidate, PlayerId, PlayerProfile, RatedBatter,
    RatedPitcher, RosterEntry,
};
use crate::position::{resolve_position, Position};
use crate::rules::EraRules;
use crate::stats::StatLine;
use crate::traits::{batter_traits, batting_line};

pub use collisions::{resolve_duplicate_designated_hitters, resolve_duplicate_positions};
pub use pitching::{build_staff, Bullpen, BULLPEN_RELIEVERS, ROTATION_SIZE};

/// Hitters kept on the bench.
pub const BENCH_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Everything known about one team's season, keyed by player.
#[derive(Debug, Clone, Default)]
pub struct SeasonData {
    /// Players in roster order; order breaks ties throughout assembly.
    pub roster: Vec<RosterEntry>,
    /// Season hitting lines (already aggregated across splits).
    pub hitting: HashMap<PlayerId, StatLine>,
    /// Season pitching lines.
    pub pitching: HashMap<PlayerId, StatLine>,
    pub fielding: FieldingIndex,
    /// Handedness; players without a profile bat and throw right.
    pub profiles: HashMap<PlayerId, PlayerProfile>,
}

/// Game-specific choices layered over the season.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterRequest {
    pub year: i32,
    /// Explicit batting order; empty lets the optimizer build one.
    pub batting_order: Vec<PlayerId>,
    pub designated_hitter: bool,
    /// Pitcher who must start, whatever their season role.
    pub starting_pitcher: Option<PlayerId>,
    /// Leave slot 9 empty instead of batting the starting pitcher in a
    /// non-DH game (projected lineups).
    pub suppress_pitcher_entry: bool,
    /// In-game positions replacing primary positions for hitters.
    pub game_positions: HashMap<PlayerId, Position>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One spot in the batting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingSlot {
    /// 1-based.
    pub order: u8,
    pub batter: Option<RatedBatter>,
}

/// A team's complete game card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterResult {
    /// Always [`LINEUP_SLOTS`] entries; unfilled slots carry no batter.
    pub batting_order: Vec<BattingSlot>,
    pub rotation: Vec<RatedPitcher>,
    pub bullpen: Bullpen,
    pub bench: Vec<RatedBatter>,
}

impl RosterResult {
    /// Batters actually in the lineup, in batting order.
    pub fn lineup(&self) -> impl Iterator<Item = &RatedBatter> {
        self.batting_order.iter().filter_map(|s| s.batter.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Assemble one team's roster for a game.
///
/// Never fails: players without usable lines are skipped, unknown ids in an
/// explicit batting order are ignored, and short lineups leave empty slots.
/// `rng` is only drawn on for synthetic pitcher batting lines, in roster
/// order.
pub fn assemble_roster<R: Rng>(
    season: &SeasonData,
    request: &RosterRequest,
    rules: &EraRules,
    rng: &mut R,
) -> RosterResult {
    let year = request.year;
    let mut pitchers: Vec<RatedPitcher> = Vec::new();
    let mut candidates: Vec<PlayerCandidate> = Vec::new();

    for entry in &season.roster {
        let profile = season.profiles.get(&entry.id).copied().unwrap_or_default();
        let hitting = season.hitting.get(&entry.id);
        let fielding = fielding_for(&season.fielding, entry.id);
        let pure_pitcher = entry.primary_position == Position::Pitcher;
        let two_way = entry.primary_position == Position::TwoWay;

        if pure_pitcher || two_way {
            if let Some(line) = season.pitching.get(&entry.id) {
                pitchers.push(pitching::rate_pitcher(
                    entry.id,
                    &entry.name,
                    line,
                    hitting,
                    fielding,
                    profile,
                    year,
                    rules,
                    rng,
                ));
            }
        }

        if !pure_pitcher {
            if let Some(line) = hitting {
                let nominal = request
                    .game_positions
                    .get(&entry.id)
                    .copied()
                    .unwrap_or(entry.primary_position);
                candidates.push(PlayerCandidate::new(
                    entry.id,
                    entry.name.clone(),
                    line.clone(),
                    profile,
                    resolve_position(nominal, fielding),
                ));
            }
        }
    }
    debug!(
        "{} pitchers and {} hitting candidates for {}",
        pitchers.len(),
        candidates.len(),
        year
    );

    let all_pitchers = pitchers.clone();
    let (rotation, bullpen) = build_staff(pitchers, request.starting_pitcher);

    let mut used: HashSet<PlayerId> = HashSet::new();
    let batting_order = if request.batting_order.is_empty() {
        let mut lineup: Vec<RatedBatter> = Vec::new();
        let starters = select_starters(&candidates, &season.fielding, request.designated_hitter);
        for (i, starter) in order_lineup(starters, &candidates).into_iter().enumerate() {
            let candidate = &candidates[starter.candidate];
            let mut batter = rate_batter(candidate, starter.position, season, year, rules);
            batter.order = Some(i as u8 + 1);
            used.insert(batter.id);
            lineup.push(batter);
        }

        if !request.designated_hitter && !request.suppress_pitcher_entry {
            if let Some(pitcher) = rotation.first().or(bullpen.closer.as_ref()) {
                debug!("{} bats ninth", pitcher.name);
                let mut batter = pitcher_as_batter(pitcher);
                batter.order = Some(LINEUP_SLOTS as u8);
                used.insert(batter.id);
                lineup.push(batter);
            }
        }
        lineup
    } else {
        let lineup = explicit_lineup(
            &request.batting_order,
            &candidates,
            &all_pitchers,
            season,
            year,
            rules,
        );
        used.extend(lineup.iter().map(|b| b.id));
        let lineup = resolve_duplicate_designated_hitters(lineup, &season.fielding);
        resolve_duplicate_positions(lineup, &season.fielding, request.designated_hitter)
    };

    let mut bench_pool: Vec<&PlayerCandidate> =
        candidates.iter().filter(|c| !used.contains(&c.id)).collect();
    bench_pool.sort_by(|a, b| b.plate_appearances.cmp(&a.plate_appearances));
    let bench = bench_pool
        .into_iter()
        .take(BENCH_SIZE)
        .map(|c| rate_batter(c, c.position, season, year, rules))
        .collect();

    RosterResult {
        batting_order: into_slots(batting_order),
        rotation,
        bullpen,
        bench,
    }
}

/// Map an explicit order onto hitters, then pitchers, numbering from 1.
fn explicit_lineup(
    order: &[PlayerId],
    candidates: &[PlayerCandidate],
    pitchers: &[RatedPitcher],
    season: &SeasonData,
    year: i32,
    rules: &EraRules,
) -> Vec<RatedBatter> {
    let mut lineup: Vec<RatedBatter> = Vec::new();
    for &id in order {
        if lineup.len() == LINEUP_SLOTS {
            warn!("batting order longer than {LINEUP_SLOTS}, ignoring {id}");
            continue;
        }
        if lineup.iter().any(|b| b.id == id) {
            warn!("player {id} listed twice in batting order");
            continue;
        }

        let mut batter = if let Some(candidate) = candidates.iter().find(|c| c.id == id) {
            rate_batter(candidate, candidate.position, season, year, rules)
        } else if let Some(pitcher) = pitchers.iter().find(|p| p.id == id) {
            pitcher_as_batter(pitcher)
        } else {
            warn!("player {id} in batting order is not on the roster");
            continue;
        };

        batter.order = Some(lineup.len() as u8 + 1);
        lineup.push(batter);
    }
    lineup
}

fn rate_batter(
    candidate: &PlayerCandidate,
    position: Position,
    season: &SeasonData,
    year: i32,
    rules: &EraRules,
) -> RatedBatter {
    let fielding = fielding_for(&season.fielding, candidate.id);
    RatedBatter {
        id: candidate.id,
        name: candidate.name.clone(),
        position,
        order: None,
        bats: candidate.profile.bats,
        throws: candidate.profile.throws,
        batting_line: batting_line(&candidate.stats),
        traits: batter_traits(&candidate.stats, year, fielding, rules),
        plate_appearances: candidate.plate_appearances,
        is_pitcher: false,
    }
}

fn pitcher_as_batter(pitcher: &RatedPitcher) -> RatedBatter {
    RatedBatter {
        id: pitcher.id,
        name: pitcher.name.clone(),
        position: Position::Pitcher,
        order: None,
        bats: pitcher.batting.bats,
        throws: pitcher.throws,
        batting_line: pitcher.batting.batting_line.clone(),
        traits: pitcher.batting.traits.clone(),
        plate_appearances: pitcher.batting.plate_appearances,
        is_pitcher: true,
    }
}

/// Place numbered batters into the nine fixed slots.
fn into_slots(batters: Vec<RatedBatter>) -> Vec<BattingSlot> {
    let mut slots: Vec<BattingSlot> = (1..=LINEUP_SLOTS as u8)
        .map(|order| BattingSlot {
            order,
            batter: None,
        })
        .collect();
    for batter in batters {
        let Some(order) = batter.order else {
            continue;
        };
        if let Some(slot) = slots.get_mut((order as usize).saturating_sub(1)) {
            slot.batter = Some(batter);
        }
    }
    slots
}
