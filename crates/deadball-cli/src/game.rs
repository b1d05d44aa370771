// Game assembly: both teams' season tables in, both game cards out.

use std::collections::HashSet;

use deadball_core::eligibility::{
    active_in_window, filter_late_season_activity, filter_roster_entries, is_postseason,
    ActivityWindow,
};
use deadball_core::{
    aggregate, assemble_roster, FieldingIndex, PlayerId, RosterEntry, RosterRequest,
    RosterResult, SeasonData, StatLine, TeamId,
};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::{GameConfig, TeamConfig};
use crate::season::{load_season_dir, FieldingSplit, SeasonDataError, SeasonTables};

/// One team's finished card.
#[derive(Debug, Clone, Serialize)]
pub struct TeamCard {
    pub name: String,
    #[serde(flatten)]
    pub roster: RosterResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameCards {
    pub year: i32,
    pub away: TeamCard,
    pub home: TeamCard,
}

/// Load both teams and assemble their cards. Away is assembled first, so a
/// seeded `rng` gives the same cards every run.
pub fn build_cards<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<GameCards, SeasonDataError> {
    let away = build_team_card(config, &config.away, rng)?;
    let home = build_team_card(config, &config.home, rng)?;
    Ok(GameCards {
        year: config.year,
        away,
        home,
    })
}

fn build_team_card<R: Rng>(
    config: &GameConfig,
    team: &TeamConfig,
    rng: &mut R,
) -> Result<TeamCard, SeasonDataError> {
    let tables = load_season_dir(&team.data_dir)?;
    let season = season_data(&tables, config, team);
    let request = roster_request(config, team);
    let roster = assemble_roster(&season, &request, &config.rules, rng);
    info!(
        "{}: {} in the lineup, {} starters, {} on the bench",
        team.name,
        roster.lineup().count(),
        roster.rotation.len(),
        roster.bench.len()
    );
    Ok(TeamCard {
        name: team.name.clone(),
        roster,
    })
}

// ---------------------------------------------------------------------------
// Season data
// ---------------------------------------------------------------------------

/// Reduce loaded tables to one team's season: eligible players only, splits
/// for other clubs dropped and the rest summed. Players left with no line for
/// the team get none.
pub fn season_data(tables: &SeasonTables, config: &GameConfig, team: &TeamConfig) -> SeasonData {
    let roster = eligible_roster(tables, config, team);
    let on_roster: HashSet<PlayerId> = roster.iter().map(|p| p.id).collect();

    let hitting = tables
        .batting
        .iter()
        .filter(|(id, _)| on_roster.contains(id))
        .map(|(id, splits)| (*id, aggregate(splits, team.team_id)))
        .filter(|(_, line)| *line != StatLine::default())
        .collect();
    let pitching = tables
        .pitching
        .iter()
        .filter(|(id, _)| on_roster.contains(id))
        .map(|(id, splits)| (*id, aggregate(splits, team.team_id)))
        .filter(|(_, line)| *line != StatLine::default())
        .collect();

    SeasonData {
        fielding: fielding_index(&tables.fielding, &on_roster, team.team_id),
        profiles: tables.profiles.clone(),
        roster,
        hitting,
        pitching,
    }
}

fn fielding_index(
    splits: &[FieldingSplit],
    on_roster: &HashSet<PlayerId>,
    team: Option<TeamId>,
) -> FieldingIndex {
    let mut index = FieldingIndex::new();
    for split in splits {
        if !on_roster.contains(&split.id) {
            continue;
        }
        if let (Some(wanted), Some(recorded)) = (team, split.team) {
            if wanted != recorded {
                continue;
            }
        }
        index.entry(split.id).or_default().push(split.record.clone());
    }
    index
}

/// Apply the date-based filters.
///
/// Only dated games are filtered. Postseason games drop players with no
/// activity from August on, unless listed as postseason participants; any
/// dated game drops players whose roster stints for the team miss the date.
pub fn eligible_roster(
    tables: &SeasonTables,
    config: &GameConfig,
    team: &TeamConfig,
) -> Vec<RosterEntry> {
    let mut roster = tables.roster.clone();
    let Some(date) = config.date else {
        return roster;
    };

    let postseason = is_postseason(date, config.series_label.as_deref());
    let safe: HashSet<PlayerId> = if postseason {
        team.postseason_participants.iter().copied().collect()
    } else {
        HashSet::new()
    };

    if postseason {
        if let Some(window) = ActivityWindow::late_season(config.year) {
            let active = active_in_window(&tables.activity, window);
            roster = filter_late_season_activity(roster, &active, &safe);
        }
    }

    if let Some(team_id) = team.team_id {
        roster = filter_roster_entries(roster, &tables.stints, team_id, date, &safe);
    }

    roster
}

fn roster_request(config: &GameConfig, team: &TeamConfig) -> RosterRequest {
    RosterRequest {
        year: config.year,
        batting_order: team.batting_order.clone(),
        designated_hitter: config.designated_hitter,
        starting_pitcher: team.starting_pitcher,
        suppress_pitcher_entry: config.projected,
        game_positions: team.game_positions(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
