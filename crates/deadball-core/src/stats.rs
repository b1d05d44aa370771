// Season stat lines and aggregation of per-team splits.
//
// Rates are always recomputed from summed counting stats; averaging rates
// across splits would overweight short stints.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Identifier of a team as used by the statistics provider.
pub type TeamId = u32;

// ---------------------------------------------------------------------------
// Innings
// ---------------------------------------------------------------------------

/// Innings pitched, stored as recorded outs so sums stay exact.
///
/// Baseball notation writes partial innings as a tenths digit: "123.2" is
/// 123 and two-thirds innings, i.e. 371 outs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Innings {
    outs: u32,
}

impl Innings {
    pub fn from_outs(outs: u32) -> Self {
        Innings { outs }
    }

    /// Whole innings only.
    pub fn from_whole(innings: u32) -> Self {
        Innings { outs: innings * 3 }
    }

    /// Parse baseball notation ("200", "200.0", "57.1", "6.2").
    ///
    /// Returns `None` for anything whose fractional digit is not 0, 1 or 2.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Innings::default());
        }
        let (whole, partial) = match raw.split_once('.') {
            Some((whole, partial)) => (whole, partial),
            None => (raw, ""),
        };
        let whole: u32 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let partial: u32 = match partial {
            "" | "0" => 0,
            "1" => 1,
            "2" => 2,
            _ => return None,
        };
        Some(Innings {
            outs: whole * 3 + partial,
        })
    }

    pub fn outs(&self) -> u32 {
        self.outs
    }

    /// Innings as a real number (57.1 → 57.333...).
    pub fn as_f64(&self) -> f64 {
        self.outs as f64 / 3.0
    }

    pub fn is_zero(&self) -> bool {
        self.outs == 0
    }
}

impl fmt::Display for Innings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.outs / 3, self.outs % 3)
    }
}

impl Add for Innings {
    type Output = Innings;

    fn add(self, rhs: Innings) -> Innings {
        Innings {
            outs: self.outs + rhs.outs,
        }
    }
}

impl Sum for Innings {
    fn sum<I: Iterator<Item = Innings>>(iter: I) -> Innings {
        iter.fold(Innings::default(), Add::add)
    }
}

impl Serialize for Innings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Innings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Innings::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid innings value '{raw}'")))
    }
}

// ---------------------------------------------------------------------------
// StatLine
// ---------------------------------------------------------------------------

/// A season's counting stats for one player (hitting or pitching).
///
/// Derived rates are methods so they can never drift from the counts. Each
/// has a defined value for an empty denominator: `None` for the batting
/// rates and 0.00 for ERA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub games_played: u32,
    pub games_started: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub sac_flies: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    /// Recorded plate appearances; 0 when the source did not track them.
    pub plate_appearances: u32,
    pub innings: Innings,
    pub earned_runs: u32,
    pub saves: u32,
    /// Fielding percentage supplied directly by the source, used only when
    /// no stint-level fielding records exist.
    pub fielding_percentage: Option<f64>,
}

impl StatLine {
    /// Total bases: singles + 2·2B + 3·3B + 4·HR.
    pub fn total_bases(&self) -> u32 {
        self.hits + self.doubles + 2 * self.triples + 3 * self.home_runs
    }

    /// AB + BB + HBP + SF.
    pub fn on_base_denominator(&self) -> u32 {
        self.at_bats + self.walks + self.hit_by_pitch + self.sac_flies
    }

    /// Recorded plate appearances, or the on-base denominator when the
    /// source did not record them.
    pub fn effective_plate_appearances(&self) -> u32 {
        if self.plate_appearances > 0 {
            self.plate_appearances
        } else {
            self.on_base_denominator()
        }
    }

    pub fn batting_average(&self) -> Option<f64> {
        (self.at_bats > 0).then(|| self.hits as f64 / self.at_bats as f64)
    }

    pub fn slugging(&self) -> Option<f64> {
        (self.at_bats > 0).then(|| self.total_bases() as f64 / self.at_bats as f64)
    }

    pub fn on_base(&self) -> Option<f64> {
        let denominator = self.on_base_denominator();
        (denominator > 0).then(|| {
            (self.hits + self.walks + self.hit_by_pitch) as f64 / denominator as f64
        })
    }

    /// On-base plus slugging, with missing components counted as zero.
    pub fn ops(&self) -> f64 {
        self.on_base().unwrap_or(0.0) + self.slugging().unwrap_or(0.0)
    }

    /// Earned runs per nine innings; 0.00 by convention with no innings.
    pub fn era(&self) -> f64 {
        if self.innings.is_zero() {
            return 0.0;
        }
        // 9 * ER / (outs / 3)
        (self.earned_runs * 27) as f64 / self.innings.outs() as f64
    }

    /// Rate per nine innings for a pitching counting stat.
    pub fn per_nine(&self, count: u32) -> f64 {
        if self.innings.is_zero() {
            return 0.0;
        }
        (count * 27) as f64 / self.innings.outs() as f64
    }

    /// Add another line's counting stats into this one.
    ///
    /// The supplied fielding percentage is not additive and is cleared;
    /// [`aggregate`] decides what to carry.
    fn absorb(&mut self, other: &StatLine) {
        self.games_played += other.games_played;
        self.games_started += other.games_started;
        self.at_bats += other.at_bats;
        self.hits += other.hits;
        self.doubles += other.doubles;
        self.triples += other.triples;
        self.home_runs += other.home_runs;
        self.walks += other.walks;
        self.hit_by_pitch += other.hit_by_pitch;
        self.sac_flies += other.sac_flies;
        self.strikeouts += other.strikeouts;
        self.stolen_bases += other.stolen_bases;
        self.plate_appearances += other.plate_appearances;
        self.innings = self.innings + other.innings;
        self.earned_runs += other.earned_runs;
        self.saves += other.saves;
        self.fielding_percentage = None;
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// One partition of a player's season, e.g. the line with one club.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSplit {
    /// Team the split was recorded for; `None` when the source does not say.
    pub team: Option<TeamId>,
    pub line: StatLine,
}

impl StatSplit {
    fn matches(&self, team: Option<TeamId>) -> bool {
        match (team, self.team) {
            (Some(wanted), Some(recorded)) => wanted == recorded,
            _ => true,
        }
    }
}

/// Merge the splits that match `team` into one season line.
///
/// With no filter every split counts; untagged splits always count. The
/// supplied fielding percentage comes from the included split with the most
/// games that carries one; equal games take the higher percentage, so split
/// order never matters.
pub fn aggregate(splits: &[StatSplit], team: Option<TeamId>) -> StatLine {
    let included: Vec<&StatSplit> = splits.iter().filter(|s| s.matches(team)).collect();

    let mut total = StatLine::default();
    for split in &included {
        total.absorb(&split.line);
    }

    total.fielding_percentage = included
        .iter()
        .filter_map(|s| s.line.fielding_percentage.map(|pct| (s.line.games_played, pct)))
        .max_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
        .map(|(_, pct)| pct);

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hitting(ab: u32, h: u32, d: u32, t: u32, hr: u32, bb: u32) -> StatLine {
        StatLine {
            at_bats: ab,
            hits: h,
            doubles: d,
            triples: t,
            home_runs: hr,
            walks: bb,
            ..StatLine::default()
        }
    }

    // -- Innings --

    #[test]
    fn innings_parse_baseball_notation() {
        assert_eq!(Innings::parse("200").unwrap().outs(), 600);
        assert_eq!(Innings::parse("200.0").unwrap().outs(), 600);
        assert_eq!(Innings::parse("57.1").unwrap().outs(), 172);
        assert_eq!(Innings::parse("6.2").unwrap().outs(), 20);
        assert_eq!(Innings::parse(".1").unwrap().outs(), 1);
        assert_eq!(Innings::parse("").unwrap().outs(), 0);
    }

    #[test]
    fn innings_parse_rejects_bad_fraction() {
        assert!(Innings::parse("10.5").is_none());
        assert!(Innings::parse("abc").is_none());
        assert!(Innings::parse("1.33").is_none());
    }

    #[test]
    fn innings_display_round_trips_notation() {
        assert_eq!(Innings::from_outs(371).to_string(), "123.2");
        assert_eq!(Innings::from_whole(9).to_string(), "9.0");
    }

    #[test]
    fn innings_sum_carries_thirds() {
        let total: Innings = ["0.2", "0.2", "1.1"]
            .iter()
            .map(|s| Innings::parse(s).unwrap())
            .sum();
        assert_eq!(total.to_string(), "2.2");
    }

    // -- Rates --

    #[test]
    fn rates_from_counts() {
        let line = StatLine {
            hit_by_pitch: 2,
            sac_flies: 3,
            ..hitting(500, 150, 30, 5, 20, 45)
        };
        assert!((line.batting_average().unwrap() - 0.300).abs() < 1e-12);
        // TB = 150 + 30 + 10 + 60 = 250
        assert_eq!(line.total_bases(), 250);
        assert!((line.slugging().unwrap() - 0.500).abs() < 1e-12);
        // OBP = (150 + 45 + 2) / (500 + 45 + 2 + 3)
        let expected = 197.0 / 550.0;
        assert!((line.on_base().unwrap() - expected).abs() < 1e-12);
        assert!((line.ops() - (expected + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn zero_at_bats_leaves_rates_absent() {
        let line = StatLine::default();
        assert!(line.batting_average().is_none());
        assert!(line.slugging().is_none());
        assert!(line.on_base().is_none());
        assert_eq!(line.ops(), 0.0);
    }

    #[test]
    fn walks_only_still_defines_on_base() {
        let line = hitting(0, 0, 0, 0, 0, 3);
        assert!(line.batting_average().is_none());
        assert_eq!(line.on_base(), Some(1.0));
    }

    #[test]
    fn era_zero_innings_is_zero() {
        let line = StatLine {
            earned_runs: 4,
            ..StatLine::default()
        };
        assert_eq!(line.era(), 0.0);
    }

    #[test]
    fn era_uses_partial_innings() {
        let line = StatLine {
            innings: Innings::parse("8.1").unwrap(),
            earned_runs: 5,
            ..StatLine::default()
        };
        // 9 * 5 / 8.333... = 5.4
        assert!((line.era() - 5.4).abs() < 1e-12);
    }

    #[test]
    fn effective_plate_appearances_falls_back() {
        let mut line = hitting(100, 25, 0, 0, 0, 10);
        assert_eq!(line.effective_plate_appearances(), 110);
        line.plate_appearances = 115;
        assert_eq!(line.effective_plate_appearances(), 115);
    }

    // -- Aggregation --

    #[test]
    fn aggregate_recomputes_rates_from_sums() {
        // .400 in 10 AB and .200 in 100 AB is .218, not the .300 mean.
        let splits = vec![
            StatSplit {
                team: Some(1),
                line: hitting(10, 4, 0, 0, 0, 0),
            },
            StatSplit {
                team: Some(2),
                line: hitting(100, 20, 0, 0, 0, 0),
            },
        ];
        let total = aggregate(&splits, None);
        assert_eq!(total.at_bats, 110);
        assert_eq!(total.hits, 24);
        assert!((total.batting_average().unwrap() - 24.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn aggregate_team_filter_keeps_untagged_splits() {
        let splits = vec![
            StatSplit {
                team: Some(1),
                line: hitting(10, 4, 0, 0, 0, 0),
            },
            StatSplit {
                team: Some(2),
                line: hitting(100, 20, 0, 0, 0, 0),
            },
            StatSplit {
                team: None,
                line: hitting(5, 1, 0, 0, 0, 0),
            },
        ];
        let total = aggregate(&splits, Some(2));
        assert_eq!(total.at_bats, 105);
        assert_eq!(total.hits, 21);
    }

    #[test]
    fn aggregate_is_order_independent() {
        let a = StatSplit {
            team: Some(1),
            line: StatLine {
                innings: Innings::parse("40.1").unwrap(),
                earned_runs: 12,
                saves: 3,
                ..hitting(3, 1, 0, 0, 0, 0)
            },
        };
        let b = StatSplit {
            team: Some(2),
            line: StatLine {
                innings: Innings::parse("22.2").unwrap(),
                earned_runs: 9,
                ..hitting(7, 2, 1, 0, 0, 1)
            },
        };
        let forward = aggregate(&[a.clone(), b.clone()], None);
        let backward = aggregate(&[b, a], None);
        assert_eq!(forward, backward);
        assert_eq!(forward.innings.to_string(), "63.0");
        assert!((forward.era() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn aggregate_fielding_percentage_from_busiest_split() {
        let with_pct = |games: u32, pct: Option<f64>| StatSplit {
            team: None,
            line: StatLine {
                games_played: games,
                fielding_percentage: pct,
                ..StatLine::default()
            },
        };
        let one = aggregate(&[with_pct(40, Some(0.975)), with_pct(90, None)], None);
        assert_eq!(one.fielding_percentage, Some(0.975));

        // Traded player with a published percentage for both clubs.
        let two = aggregate(&[with_pct(30, Some(0.940)), with_pct(80, Some(0.999))], None);
        assert_eq!(two.fielding_percentage, Some(0.999));
        let swapped = aggregate(&[with_pct(80, Some(0.999)), with_pct(30, Some(0.940))], None);
        assert_eq!(swapped.fielding_percentage, Some(0.999));

        let tied = aggregate(&[with_pct(50, Some(0.990)), with_pct(50, Some(0.960))], None);
        assert_eq!(tied.fielding_percentage, Some(0.990));

        let none = aggregate(&[with_pct(50, None)], None);
        assert_eq!(none.fielding_percentage, None);
    }

    #[test]
    fn aggregate_empty_is_default() {
        assert_eq!(aggregate(&[], Some(3)), StatLine::default());
    }
}
