// Optional roster pre-filters: who was actually around for this game.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::{PlayerId, RosterEntry};
use crate::stats::TeamId;

/// Inclusive date range in which recorded activity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ActivityWindow {
    /// August 1 through October 31 of `year`.
    pub fn late_season(year: i32) -> Option<Self> {
        Some(ActivityWindow {
            start: NaiveDate::from_ymd_opt(year, 8, 1)?,
            end: NaiveDate::from_ymd_opt(year, 10, 31)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Whether a game is postseason, by date or by series label.
pub fn is_postseason(date: NaiveDate, series_label: Option<&str>) -> bool {
    if date.month() >= 10 {
        return true;
    }
    series_label.is_some_and(|label| {
        ["World Series", "CS", "DS"]
            .iter()
            .any(|marker| label.contains(marker))
    })
}

/// Players with at least one game date inside the window.
pub fn active_in_window(
    game_dates: &HashMap<PlayerId, Vec<NaiveDate>>,
    window: ActivityWindow,
) -> HashSet<PlayerId> {
    game_dates
        .iter()
        .filter(|(_, dates)| dates.iter().any(|d| window.contains(*d)))
        .map(|(id, _)| *id)
        .collect()
}

/// Drop players neither active late in the season nor on the safe list.
///
/// An empty active set means no activity data, so nothing is dropped.
pub fn filter_late_season_activity(
    roster: Vec<RosterEntry>,
    active: &HashSet<PlayerId>,
    safe: &HashSet<PlayerId>,
) -> Vec<RosterEntry> {
    if active.is_empty() {
        return roster;
    }
    let before = roster.len();
    let kept: Vec<RosterEntry> = roster
        .into_iter()
        .filter(|p| active.contains(&p.id) || safe.contains(&p.id))
        .collect();
    debug!(
        "late-season activity filter kept {} of {} players",
        kept.len(),
        before
    );
    kept
}

// ---------------------------------------------------------------------------
// Roster stints
// ---------------------------------------------------------------------------

/// A stretch a player spent on one team's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStint {
    pub team: TeamId,
    pub start: Option<NaiveDate>,
    /// Still on the roster when `None`.
    pub end: Option<NaiveDate>,
}

impl RosterStint {
    /// A stint with no start date never covers anything.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.start {
            Some(start) => start <= date && self.end.map_or(true, |end| date <= end),
            None => false,
        }
    }
}

/// Keep players on the team's roster on `date`.
///
/// Players with no stints for the team are kept (nothing to judge by), as are
/// safe-listed players.
pub fn filter_roster_entries(
    roster: Vec<RosterEntry>,
    stints: &HashMap<PlayerId, Vec<RosterStint>>,
    team: TeamId,
    date: NaiveDate,
    safe: &HashSet<PlayerId>,
) -> Vec<RosterEntry> {
    roster
        .into_iter()
        .filter(|p| {
            if safe.contains(&p.id) {
                return true;
            }
            let mut for_team = stints
                .get(&p.id)
                .into_iter()
                .flatten()
                .filter(|s| s.team == team)
                .peekable();
            if for_team.peek().is_none() {
                return true;
            }
            let covered = for_team.any(|s| s.covers(date));
            if !covered {
                debug!("{} not on the roster on {}", p.name, date);
            }
            covered
        })
        .collect()
}
