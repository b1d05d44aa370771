// Season data loading from a team's CSV directory.
//
// Required files: roster.csv, batting.csv, pitching.csv, fielding.csv.
// Optional files: activity.csv (one row per game appearance) and
// roster_entries.csv (roster stints), used by the date eligibility filters.
// Batting, pitching and fielding rows are splits: a player traded mid-season
// has one row per club, tagged by the Team column.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use deadball_core::eligibility::RosterStint;
use deadball_core::{
    FieldingRecord, Innings, PlayerId, PlayerProfile, Position, RosterEntry, StatLine, StatSplit,
    TeamId,
};
use serde::Deserialize;
use tracing::{debug, warn};

pub const ROSTER_FILE: &str = "roster.csv";
pub const BATTING_FILE: &str = "batting.csv";
pub const PITCHING_FILE: &str = "pitching.csv";
pub const FIELDING_FILE: &str = "fielding.csv";
pub const ACTIVITY_FILE: &str = "activity.csv";
pub const ROSTER_ENTRIES_FILE: &str = "roster_entries.csv";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A fielding stint with the team it was recorded for.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldingSplit {
    pub id: PlayerId,
    pub team: Option<TeamId>,
    pub record: FieldingRecord,
}

/// Everything read from one team directory, not yet filtered by team.
#[derive(Debug, Clone, Default)]
pub struct SeasonTables {
    pub roster: Vec<RosterEntry>,
    pub profiles: HashMap<PlayerId, PlayerProfile>,
    pub batting: HashMap<PlayerId, Vec<StatSplit>>,
    pub pitching: HashMap<PlayerId, Vec<StatSplit>>,
    pub fielding: Vec<FieldingSplit>,
    /// Game dates per player; empty when activity.csv is absent.
    pub activity: HashMap<PlayerId, Vec<NaiveDate>>,
    /// Roster stints per player; empty when roster_entries.csv is absent.
    pub stints: HashMap<PlayerId, Vec<RosterStint>>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SeasonDataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRosterRow {
    ID: PlayerId,
    Name: String,
    #[serde(default)]
    POS: String,
    #[serde(default)]
    Bats: Option<String>,
    #[serde(default)]
    Throws: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBattingRow {
    ID: PlayerId,
    #[serde(default)]
    Team: Option<TeamId>,
    #[serde(default)]
    G: Option<u32>,
    AB: u32,
    H: u32,
    #[serde(rename = "2B", default)]
    doubles: Option<u32>,
    #[serde(rename = "3B", default)]
    triples: Option<u32>,
    #[serde(default)]
    HR: Option<u32>,
    #[serde(default)]
    BB: Option<u32>,
    #[serde(default)]
    HBP: Option<u32>,
    #[serde(default)]
    SF: Option<u32>,
    #[serde(default)]
    SO: Option<u32>,
    #[serde(default)]
    SB: Option<u32>,
    #[serde(default)]
    PA: Option<u32>,
    /// Fielding percentage as published, used when fielding.csv has nothing.
    #[serde(default)]
    FPCT: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitchingRow {
    ID: PlayerId,
    #[serde(default)]
    Team: Option<TeamId>,
    G: u32,
    #[serde(default)]
    GS: Option<u32>,
    /// Baseball notation ("57.1").
    IP: String,
    ER: u32,
    #[serde(default)]
    SO: Option<u32>,
    #[serde(default)]
    BB: Option<u32>,
    #[serde(default)]
    SV: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawFieldingRow {
    ID: PlayerId,
    #[serde(default)]
    Team: Option<TeamId>,
    POS: String,
    G: u32,
    #[serde(default)]
    PO: Option<u32>,
    #[serde(default)]
    A: Option<u32>,
    #[serde(default)]
    E: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawActivityRow {
    ID: PlayerId,
    Date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRosterEntryRow {
    ID: PlayerId,
    Team: TeamId,
    #[serde(default)]
    Start: Option<NaiveDate>,
    #[serde(default)]
    End: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

type RosterRows = (Vec<RosterEntry>, HashMap<PlayerId, PlayerProfile>);

fn load_roster_from_reader<R: Read>(rdr: R) -> Result<RosterRows, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut roster: Vec<RosterEntry> = Vec::new();
    let mut profiles = HashMap::new();
    for result in reader.deserialize::<RawRosterRow>() {
        match result {
            Ok(raw) => {
                if roster.iter().any(|p| p.id == raw.ID) {
                    warn!("skipping duplicate roster row for player {}", raw.ID);
                    continue;
                }
                profiles.insert(
                    raw.ID,
                    PlayerProfile::parse(raw.Bats.as_deref(), raw.Throws.as_deref()),
                );
                roster.push(RosterEntry {
                    id: raw.ID,
                    name: raw.Name.trim().to_string(),
                    primary_position: Position::from_str_pos(&raw.POS),
                });
            }
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
            }
        }
    }
    Ok((roster, profiles))
}

fn load_batting_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<PlayerId, Vec<StatSplit>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut splits: HashMap<PlayerId, Vec<StatSplit>> = HashMap::new();
    for result in reader.deserialize::<RawBattingRow>() {
        match result {
            Ok(raw) => {
                let line = StatLine {
                    games_played: raw.G.unwrap_or(0),
                    at_bats: raw.AB,
                    hits: raw.H,
                    doubles: raw.doubles.unwrap_or(0),
                    triples: raw.triples.unwrap_or(0),
                    home_runs: raw.HR.unwrap_or(0),
                    walks: raw.BB.unwrap_or(0),
                    hit_by_pitch: raw.HBP.unwrap_or(0),
                    sac_flies: raw.SF.unwrap_or(0),
                    strikeouts: raw.SO.unwrap_or(0),
                    stolen_bases: raw.SB.unwrap_or(0),
                    plate_appearances: raw.PA.unwrap_or(0),
                    fielding_percentage: raw.FPCT.filter(|pct| pct.is_finite()),
                    ..StatLine::default()
                };
                splits.entry(raw.ID).or_default().push(StatSplit {
                    team: raw.Team,
                    line,
                });
            }
            Err(e) => {
                warn!("skipping malformed batting row: {}", e);
            }
        }
    }
    Ok(splits)
}

fn load_pitching_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<PlayerId, Vec<StatSplit>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut splits: HashMap<PlayerId, Vec<StatSplit>> = HashMap::new();
    for result in reader.deserialize::<RawPitchingRow>() {
        match result {
            Ok(raw) => {
                let Some(innings) = Innings::parse(&raw.IP) else {
                    warn!("skipping pitcher {}: bad IP value '{}'", raw.ID, raw.IP);
                    continue;
                };
                let line = StatLine {
                    games_played: raw.G,
                    games_started: raw.GS.unwrap_or(0),
                    innings,
                    earned_runs: raw.ER,
                    strikeouts: raw.SO.unwrap_or(0),
                    walks: raw.BB.unwrap_or(0),
                    saves: raw.SV.unwrap_or(0),
                    ..StatLine::default()
                };
                splits.entry(raw.ID).or_default().push(StatSplit {
                    team: raw.Team,
                    line,
                });
            }
            Err(e) => {
                warn!("skipping malformed pitching row: {}", e);
            }
        }
    }
    Ok(splits)
}

fn load_fielding_from_reader<R: Read>(rdr: R) -> Result<Vec<FieldingSplit>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut splits = Vec::new();
    for result in reader.deserialize::<RawFieldingRow>() {
        match result {
            Ok(raw) => {
                let position = Position::from_str_pos(&raw.POS);
                if position == Position::Unresolved {
                    debug!("ignoring fielding row for {} at '{}'", raw.ID, raw.POS);
                    continue;
                }
                splits.push(FieldingSplit {
                    id: raw.ID,
                    team: raw.Team,
                    record: FieldingRecord {
                        position,
                        games: raw.G,
                        putouts: raw.PO.unwrap_or(0),
                        assists: raw.A.unwrap_or(0),
                        errors: raw.E.unwrap_or(0),
                    },
                });
            }
            Err(e) => {
                warn!("skipping malformed fielding row: {}", e);
            }
        }
    }
    Ok(splits)
}

fn load_activity_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<PlayerId, Vec<NaiveDate>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut activity: HashMap<PlayerId, Vec<NaiveDate>> = HashMap::new();
    for result in reader.deserialize::<RawActivityRow>() {
        match result {
            Ok(raw) => activity.entry(raw.ID).or_default().push(raw.Date),
            Err(e) => {
                warn!("skipping malformed activity row: {}", e);
            }
        }
    }
    Ok(activity)
}

fn load_stints_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<PlayerId, Vec<RosterStint>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut stints: HashMap<PlayerId, Vec<RosterStint>> = HashMap::new();
    for result in reader.deserialize::<RawRosterEntryRow>() {
        match result {
            Ok(raw) => stints.entry(raw.ID).or_default().push(RosterStint {
                team: raw.Team,
                start: raw.Start,
                end: raw.End,
            }),
            Err(e) => {
                warn!("skipping malformed roster entry row: {}", e);
            }
        }
    }
    Ok(stints)
}

// ---------------------------------------------------------------------------
// Public loading functions
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, SeasonDataError> {
    std::fs::File::open(path).map_err(|e| SeasonDataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> SeasonDataError + '_ {
    move |e| SeasonDataError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

/// Load every season table in `dir`.
///
/// The four required files must exist; the two optional ones are read when
/// present. A roster with no readable rows is rejected.
pub fn load_season_dir(dir: &Path) -> Result<SeasonTables, SeasonDataError> {
    let path = dir.join(ROSTER_FILE);
    let (roster, profiles) = load_roster_from_reader(open(&path)?).map_err(csv_error(&path))?;
    if roster.is_empty() {
        return Err(SeasonDataError::Validation(format!(
            "no players in {}",
            path.display()
        )));
    }

    let path = dir.join(BATTING_FILE);
    let batting = load_batting_from_reader(open(&path)?).map_err(csv_error(&path))?;

    let path = dir.join(PITCHING_FILE);
    let pitching = load_pitching_from_reader(open(&path)?).map_err(csv_error(&path))?;

    let path = dir.join(FIELDING_FILE);
    let fielding = load_fielding_from_reader(open(&path)?).map_err(csv_error(&path))?;

    let path = dir.join(ACTIVITY_FILE);
    let activity = if path.exists() {
        load_activity_from_reader(open(&path)?).map_err(csv_error(&path))?
    } else {
        HashMap::new()
    };

    let path = dir.join(ROSTER_ENTRIES_FILE);
    let stints = if path.exists() {
        load_stints_from_reader(open(&path)?).map_err(csv_error(&path))?
    } else {
        HashMap::new()
    };

    debug!(
        "loaded {} players, {} batting and {} pitching lines from {}",
        roster.len(),
        batting.len(),
        pitching.len(),
        dir.display()
    );

    Ok(SeasonTables {
        roster,
        profiles,
        batting,
        pitching,
        fielding,
        activity,
        stints,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
