// Game description loading and validation (game.toml).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use deadball_core::lineup::LINEUP_SLOTS;
use deadball_core::{EraRules, PlayerId, Position, TeamId};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// game.toml structs
// ---------------------------------------------------------------------------

/// One game between two clubs, read from game.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Season the stats come from.
    pub year: i32,
    #[serde(default)]
    pub designated_hitter: bool,
    /// Game date ("YYYY-MM-DD"). Enables the roster eligibility filters.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Series label such as "World Series" or "ALCS"; marks a postseason game.
    #[serde(default)]
    pub series_label: Option<String>,
    /// Projected lineups: no pitcher is added to a non-DH batting order.
    #[serde(default)]
    pub projected: bool,
    pub away: TeamConfig,
    pub home: TeamConfig,
    /// Overrides for any rating threshold; unspecified values keep defaults.
    #[serde(default)]
    pub rules: EraRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    /// Directory holding the team's season CSV files. Relative paths are
    /// resolved against the directory containing game.toml.
    pub data_dir: PathBuf,
    /// Only count stat splits recorded for this team.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub batting_order: Vec<PlayerId>,
    #[serde(default)]
    pub starting_pitcher: Option<PlayerId>,
    /// In-game positions keyed by player id, e.g. `"545361" = "CF"`.
    #[serde(default)]
    pub positions: HashMap<String, String>,
    /// Players who appeared in this postseason; never filtered out.
    #[serde(default)]
    pub postseason_participants: Vec<PlayerId>,
}

impl TeamConfig {
    /// Parsed in-game positions. Entries that fail to parse are dropped;
    /// validation rejects them before this is reached.
    pub fn game_positions(&self) -> HashMap<PlayerId, Position> {
        self.positions
            .iter()
            .filter_map(|(id, pos)| {
                let id = id.trim().parse::<PlayerId>().ok()?;
                let pos = Position::from_str_pos(pos);
                (pos != Position::Unresolved).then_some((id, pos))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate a game description.
pub fn load_game_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let text = read_file(path)?;
    let mut config: GameConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(&config)?;

    if let Some(base) = path.parent() {
        for team in [&mut config.away, &mut config.home] {
            if team.data_dir.is_relative() {
                team.data_dir = base.join(&team.data_dir);
            }
        }
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    if config.year == 0 {
        return Err(ConfigError::ValidationError {
            field: "year".into(),
            message: "must be a season year, got 0".into(),
        });
    }

    for (side, team) in [("away", &config.away), ("home", &config.home)] {
        validate_team(side, team)?;
    }

    let cutoffs = &config.rules.pitch_die.cutoffs;
    if cutoffs.windows(2).any(|pair| pair[0].z >= pair[1].z) {
        return Err(ConfigError::ValidationError {
            field: "rules.pitch_die.cutoffs".into(),
            message: "z cutoffs must be strictly ascending".into(),
        });
    }

    if config.rules.pitcher_batting.die_sides == 0 {
        return Err(ConfigError::ValidationError {
            field: "rules.pitcher_batting.die_sides".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

fn validate_team(side: &str, team: &TeamConfig) -> Result<(), ConfigError> {
    if team.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: format!("{side}.data_dir"),
            message: "must not be empty".into(),
        });
    }

    if team.batting_order.len() > LINEUP_SLOTS {
        return Err(ConfigError::ValidationError {
            field: format!("{side}.batting_order"),
            message: format!(
                "at most {LINEUP_SLOTS} players, got {}",
                team.batting_order.len()
            ),
        });
    }

    for (id, pos) in &team.positions {
        if id.trim().parse::<PlayerId>().is_err() {
            return Err(ConfigError::ValidationError {
                field: format!("{side}.positions"),
                message: format!("player id '{id}' is not a number"),
            });
        }
        if Position::from_str_pos(pos) == Position::Unresolved {
            return Err(ConfigError::ValidationError {
                field: format!("{side}.positions"),
                message: format!("unknown position '{pos}' for player {id}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
