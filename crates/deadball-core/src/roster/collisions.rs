// Position collisions in a hand-written batting order.
//
// A supplied order names players, not positions, so two of them can arrive
// at the same spot. Two passes move the extras onto open field positions,
// preferring spots each player has a fielding record at.

use tracing::{debug, warn};

use crate::player::{fielding_for, FieldingIndex, RatedBatter};
use crate::position::{Position, REQUIRED_FIELD_POSITIONS};

/// Required field positions nobody in the lineup holds, in canonical order.
pub fn missing_positions(lineup: &[RatedBatter]) -> Vec<Position> {
    REQUIRED_FIELD_POSITIONS
        .iter()
        .copied()
        .filter(|pos| !lineup.iter().any(|b| b.position == *pos))
        .collect()
}

fn take(missing: &mut Vec<Position>, position: Position) -> Position {
    missing.retain(|m| *m != position);
    position
}

fn first_record_in(
    fielding: &FieldingIndex,
    batter: &RatedBatter,
    missing: &[Position],
) -> Option<Position> {
    fielding_for(fielding, batter.id)
        .iter()
        .map(|r| r.position)
        .find(|pos| missing.contains(pos))
}

fn reassign(batter: &mut RatedBatter, position: Position) {
    debug!(
        "{} moved from {} to {}",
        batter.name,
        batter.position.display_str(),
        position.display_str()
    );
    batter.position = position;
}

// ---------------------------------------------------------------------------
// Pass 1: extra designated hitters
// ---------------------------------------------------------------------------

/// Move all but one designated hitter onto open field positions.
///
/// DHs who have played an open position are handled first, walking from the
/// back of the (reordered) list, so the DH left in place is the one least
/// able to field. Each mover takes the first open position among their own
/// fielding records; failing that an open outfield spot if they have any
/// outfield record; failing that the first open position.
pub fn resolve_duplicate_designated_hitters(
    mut lineup: Vec<RatedBatter>,
    fielding: &FieldingIndex,
) -> Vec<RatedBatter> {
    let mut designated: Vec<usize> = lineup
        .iter()
        .enumerate()
        .filter(|(_, b)| b.position == Position::DesignatedHitter)
        .map(|(i, _)| i)
        .collect();
    if designated.len() < 2 {
        return lineup;
    }

    let mut missing = missing_positions(&lineup);
    designated.sort_by_key(|&i| first_record_in(fielding, &lineup[i], &missing).is_some());

    for &i in designated.iter().skip(1).rev() {
        if let Some(pos) = first_record_in(fielding, &lineup[i], &missing) {
            let pos = take(&mut missing, pos);
            reassign(&mut lineup[i], pos);
            continue;
        }
        if missing.is_empty() {
            continue;
        }

        let plays_outfield = fielding_for(fielding, lineup[i].id)
            .iter()
            .any(|r| r.position.is_outfield_class());
        let open_outfield = missing.iter().position(Position::is_outfield);
        let pos = match open_outfield {
            Some(k) if plays_outfield => missing.remove(k),
            _ => {
                warn!(
                    "{} has no record at an open position, placing at {}",
                    lineup[i].name,
                    missing[0].display_str()
                );
                missing.remove(0)
            }
        };
        reassign(&mut lineup[i], pos);
    }

    lineup
}

// ---------------------------------------------------------------------------
// Pass 2: any other shared position
// ---------------------------------------------------------------------------

/// Spread players sharing a position (pitchers excepted) onto open ones.
///
/// Groups are formed once, in order of first appearance. Within a group the
/// first player keeps the spot; each later one takes an open position from
/// their fielding records, else an open outfield spot (outfield groups
/// only), else DH when the game uses one and it is free, else the first
/// open position. With nothing open the player stays put.
pub fn resolve_duplicate_positions(
    mut lineup: Vec<RatedBatter>,
    fielding: &FieldingIndex,
    designated_hitter: bool,
) -> Vec<RatedBatter> {
    let mut groups: Vec<(Position, Vec<usize>)> = Vec::new();
    for (i, batter) in lineup.iter().enumerate() {
        match groups.iter_mut().find(|(pos, _)| *pos == batter.position) {
            Some((_, members)) => members.push(i),
            None => groups.push((batter.position, vec![i])),
        }
    }

    for (shared, members) in groups {
        if members.len() < 2 || shared == Position::Pitcher {
            continue;
        }

        let mut missing = missing_positions(&lineup);
        let mut dh_taken = lineup
            .iter()
            .any(|b| b.position == Position::DesignatedHitter);

        for &i in &members[1..] {
            if let Some(pos) = first_record_in(fielding, &lineup[i], &missing) {
                let pos = take(&mut missing, pos);
                reassign(&mut lineup[i], pos);
                continue;
            }
            if shared.is_outfield() {
                if let Some(k) = missing.iter().position(Position::is_outfield) {
                    let pos = missing.remove(k);
                    reassign(&mut lineup[i], pos);
                    continue;
                }
            }
            if designated_hitter && !dh_taken {
                dh_taken = true;
                reassign(&mut lineup[i], Position::DesignatedHitter);
                continue;
            }
            if missing.is_empty() {
                warn!(
                    "{} shares {} with no open position left",
                    lineup[i].name,
                    shared.display_str()
                );
                continue;
            }
            let pos = missing.remove(0);
            reassign(&mut lineup[i], pos);
        }
    }

    lineup
}
