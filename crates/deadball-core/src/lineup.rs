// Automatic starting lineup: who plays where, and in what order they bat.

use tracing::debug;

use crate::player::{fielding_for, FieldingIndex, PlayerCandidate};
use crate::position::{games_at, Position, REQUIRED_FIELD_POSITIONS};

/// Number of spots in a batting order.
pub const LINEUP_SLOTS: usize = 9;

/// A hitting candidate chosen to start, and where they play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Starter {
    /// Index into the candidate list the starter was chosen from.
    pub candidate: usize,
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Starter selection
// ---------------------------------------------------------------------------

/// Pick the starting hitters.
///
/// Each required field position is filled in order by the unused candidate
/// with the most games there (higher OPS breaks a tie, then list order).
/// A position nobody has played goes to the best-OPS candidate already
/// resolved to it, and outfield spots fall back further to general
/// outfielders. With a designated hitter the best remaining bat is added as
/// DH; open spots are then backfilled by OPS until the lineup holds 8
/// fielders (9 with a DH) or candidates run out.
pub fn select_starters(
    candidates: &[PlayerCandidate],
    fielding: &FieldingIndex,
    designated_hitter: bool,
) -> Vec<Starter> {
    let mut used = vec![false; candidates.len()];
    let mut starters: Vec<Starter> = Vec::new();

    for &slot in REQUIRED_FIELD_POSITIONS.iter() {
        let pick = most_games_at(candidates, fielding, &used, slot)
            .or_else(|| best_ops(candidates, &used, |c| c.position == slot))
            .or_else(|| {
                if slot.is_outfield() {
                    best_ops(candidates, &used, |c| c.position == Position::Outfield)
                } else {
                    None
                }
            });

        if let Some(index) = pick {
            debug!(
                "{} starts at {}",
                candidates[index].name,
                slot.display_str()
            );
            used[index] = true;
            starters.push(Starter {
                candidate: index,
                position: slot,
            });
        }
    }

    if designated_hitter {
        if let Some(index) = best_ops(candidates, &used, |_| true) {
            debug!("{} is the designated hitter", candidates[index].name);
            used[index] = true;
            starters.push(Starter {
                candidate: index,
                position: Position::DesignatedHitter,
            });
        }
    }

    let target = if designated_hitter {
        LINEUP_SLOTS
    } else {
        LINEUP_SLOTS - 1
    };
    while starters.len() < target {
        let Some(index) = best_ops(candidates, &used, |_| true) else {
            break;
        };
        let position = REQUIRED_FIELD_POSITIONS
            .iter()
            .copied()
            .find(|pos| !starters.iter().any(|s| s.position == *pos))
            .unwrap_or(Position::DesignatedHitter);
        debug!(
            "{} backfills at {}",
            candidates[index].name,
            position.display_str()
        );
        used[index] = true;
        starters.push(Starter {
            candidate: index,
            position,
        });
    }

    starters
}

/// Unused candidate with the most games at `slot`, if anyone has played it.
fn most_games_at(
    candidates: &[PlayerCandidate],
    fielding: &FieldingIndex,
    used: &[bool],
    slot: Position,
) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        if used[index] {
            continue;
        }
        let games = games_at(fielding_for(fielding, candidate.id), slot);
        if games == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((held, most)) => {
                games > most || (games == most && candidate.ops > candidates[held].ops)
            }
        };
        if better {
            best = Some((index, games));
        }
    }
    best.map(|(index, _)| index)
}

/// First unused candidate with the highest OPS among those passing `filter`.
fn best_ops(
    candidates: &[PlayerCandidate],
    used: &[bool],
    filter: impl Fn(&PlayerCandidate) -> bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        if used[index] || !filter(candidate) {
            continue;
        }
        if best.map_or(true, |held| candidate.ops > candidates[held].ops) {
            best = Some(index);
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Batting order
// ---------------------------------------------------------------------------

/// Arrange starters into batting order.
///
/// The three best OPS bat 3rd, 4th and 5th; the two best OBP of the rest
/// lead off; everyone else follows by OPS. Slots left empty by a short
/// lineup are squeezed out, so the returned order runs 1..n.
pub fn order_lineup(starters: Vec<Starter>, candidates: &[PlayerCandidate]) -> Vec<Starter> {
    let ops = |s: &Starter| candidates[s.candidate].ops;
    let obp = |s: &Starter| candidates[s.candidate].obp;

    let mut pool = starters;
    let mut slots: [Option<Starter>; LINEUP_SLOTS] = [None; LINEUP_SLOTS];

    for slot in 2..5 {
        slots[slot] = pop_best(&mut pool, ops);
    }
    for slot in 0..2 {
        slots[slot] = pop_best(&mut pool, obp);
    }
    for slot in 5..LINEUP_SLOTS {
        slots[slot] = pop_best(&mut pool, ops);
    }

    slots.into_iter().flatten().collect()
}

/// Remove and return the starter with the highest `metric`.
///
/// The pool is stably re-sorted on every pick, so equal values keep the
/// order the previous pick left them in.
fn pop_best(pool: &mut Vec<Starter>, metric: impl Fn(&Starter) -> f64) -> Option<Starter> {
    if pool.is_empty() {
        return None;
    }
    pool.sort_by(|a, b| metric(b).total_cmp(&metric(a)));
    Some(pool.remove(0))
}
