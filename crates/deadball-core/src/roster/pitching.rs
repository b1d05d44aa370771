// Pitching staff: rating each pitcher, then splitting rotation and bullpen.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pitch_die::assign_pitch_die;
use crate::player::{
    BattingProfile, FieldingRecord, PitcherRole, PlayerId, PlayerProfile, RatedPitcher,
};
use crate::rules::{EraRules, PitcherBatting};
use crate::stats::StatLine;
use crate::traits::{
    batter_traits, batting_line, defensive_trait, pitcher_traits, Trait, TraitSet,
    EMPTY_BATTING_LINE,
};

/// Starting pitchers kept in the rotation.
pub const ROTATION_SIZE: usize = 5;
/// Relievers kept behind the closer.
pub const BULLPEN_RELIEVERS: usize = 7;

/// Relief corps: the closer plus up to [`BULLPEN_RELIEVERS`] others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bullpen {
    pub closer: Option<RatedPitcher>,
    pub relievers: Vec<RatedPitcher>,
}

/// Starter iff more than half of appearances were starts.
pub fn is_starter(stats: &StatLine) -> bool {
    stats.games_played > 0 && stats.games_started * 2 > stats.games_played
}

/// Build a pitcher's card from the pitching line and, when present, the
/// hitting line.
///
/// Role, die and pitching traits follow the season's starts; a forced
/// starter is promoted later without being re-rated. A pitcher with no
/// recorded outs has no meaningful ERA and gets the table's floor die.
#[allow(clippy::too_many_arguments)]
pub fn rate_pitcher<R: Rng>(
    id: PlayerId,
    name: &str,
    pitching: &StatLine,
    hitting: Option<&StatLine>,
    fielding: &[FieldingRecord],
    profile: PlayerProfile,
    year: i32,
    rules: &EraRules,
    rng: &mut R,
) -> RatedPitcher {
    let starter = is_starter(pitching);
    let era = pitching.era();
    RatedPitcher {
        id,
        name: name.to_string(),
        role: if starter {
            PitcherRole::Starter
        } else {
            PitcherRole::Reliever
        },
        die: if pitching.innings.is_zero() {
            rules.pitch_die.floor
        } else {
            assign_pitch_die(era, year, starter, &rules.pitch_die)
        },
        traits: pitcher_traits(pitching, year, starter, rules),
        throws: profile.throws,
        innings: pitching.innings,
        era,
        saves: pitching.saves,
        batting: pitcher_batting(hitting, fielding, profile, year, rules, rng),
    }
}

// ---------------------------------------------------------------------------
// Pitcher batting
// ---------------------------------------------------------------------------

/// The pitcher's batting profile.
///
/// Real numbers are used when there are enough plate appearances behind a
/// defined line; otherwise the line is rolled and the traits reduced to the
/// fielding ones plus `power--` and `contact-`.
pub fn pitcher_batting<R: Rng>(
    hitting: Option<&StatLine>,
    fielding: &[FieldingRecord],
    profile: PlayerProfile,
    year: i32,
    rules: &EraRules,
    rng: &mut R,
) -> BattingProfile {
    let plate_appearances = hitting.map_or(0, StatLine::on_base_denominator);
    let traits = hitting
        .map(|line| batter_traits(line, year, fielding, rules))
        .unwrap_or_default();
    let line = hitting.map_or_else(|| EMPTY_BATTING_LINE.to_string(), batting_line);

    let thresholds = &rules.pitcher_batting;
    if line != EMPTY_BATTING_LINE && plate_appearances >= thresholds.min_plate_appearances {
        return BattingProfile {
            bats: profile.bats,
            batting_line: line,
            traits,
            plate_appearances,
            synthetic: false,
        };
    }

    let empty = StatLine::default();
    let mut traits: TraitSet = defensive_trait(hitting.unwrap_or(&empty), fielding, rules)
        .into_iter()
        .collect();
    traits.insert(Trait::PowerMinusMinus);
    traits.insert(Trait::ContactMinus);

    BattingProfile {
        bats: profile.bats,
        batting_line: synthetic_batting_line(thresholds, rng),
        traits,
        plate_appearances,
        synthetic: true,
    }
}

/// Roll a batting line: the dice total is the average, the bonus added on
/// top is the on-base figure.
pub fn synthetic_batting_line<R: Rng>(rules: &PitcherBatting, rng: &mut R) -> String {
    let sides = rules.die_sides.max(1);
    let average: u32 = (0..rules.dice).map(|_| rng.gen_range(1..=sides)).sum();
    format!("{}/{}", average, average + rules.on_base_bonus)
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

/// Split rated pitchers (in roster order) into rotation and bullpen.
///
/// A forced starter is promoted to the rotation and pitches first. Starters
/// past the fifth become relievers. The bullpen pool is every non-starter
/// in roster order followed by those extra starters; the most saves close
/// and the rest are ranked by innings.
pub fn build_staff(
    pitchers: Vec<RatedPitcher>,
    forced_starter: Option<PlayerId>,
) -> (Vec<RatedPitcher>, Bullpen) {
    let (mut starters, mut pool): (Vec<RatedPitcher>, Vec<RatedPitcher>) = pitchers
        .into_iter()
        .map(|mut p| {
            if Some(p.id) == forced_starter {
                p.role = PitcherRole::Starter;
            }
            p
        })
        .partition(|p| p.role == PitcherRole::Starter);

    starters.sort_by(|a, b| b.innings.cmp(&a.innings));
    if let Some(forced) = forced_starter {
        if let Some(index) = starters.iter().position(|p| p.id == forced) {
            let pitcher = starters.remove(index);
            debug!("{} forced to start", pitcher.name);
            starters.insert(0, pitcher);
        }
    }

    let overflow = if starters.len() > ROTATION_SIZE {
        starters.split_off(ROTATION_SIZE)
    } else {
        Vec::new()
    };
    for mut pitcher in overflow {
        debug!("{} moved from rotation to bullpen", pitcher.name);
        pitcher.role = PitcherRole::Reliever;
        pool.push(pitcher);
    }

    pool.sort_by(|a, b| b.saves.cmp(&a.saves));
    let closer = if pool.is_empty() {
        None
    } else {
        let mut closer = pool.remove(0);
        closer.role = PitcherRole::Closer;
        debug!("{} closes ({} saves)", closer.name, closer.saves);
        Some(closer)
    };

    pool.sort_by(|a, b| b.innings.cmp(&a.innings));
    pool.truncate(BULLPEN_RELIEVERS);
    for pitcher in &mut pool {
        pitcher.role = PitcherRole::Reliever;
    }

    (
        starters,
        Bullpen {
            closer,
            relievers: pool,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch_die::PitchDie;
    use crate::stats::Innings;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn card(id: PlayerId, role: PitcherRole, innings: u32, saves: u32) -> RatedPitcher {
        RatedPitcher {
            id,
            name: format!("P{id}"),
            role,
            die: PitchDie::D4,
            traits: TraitSet::new(),
            throws: Default::default(),
            innings: Innings::from_whole(innings),
            era: 4.0,
            saves,
            batting: BattingProfile {
                bats: Default::default(),
                batting_line: "10/14".to_string(),
                traits: TraitSet::new(),
                plate_appearances: 0,
                synthetic: true,
            },
        }
    }

    fn ids(pitchers: &[RatedPitcher]) -> Vec<PlayerId> {
        pitchers.iter().map(|p| p.id).collect()
    }

    // -- Roles --

    #[test]
    fn starter_needs_majority_of_starts() {
        let line = |g, gs| StatLine {
            games_played: g,
            games_started: gs,
            ..StatLine::default()
        };
        assert!(is_starter(&line(30, 30)));
        assert!(is_starter(&line(30, 16)));
        assert!(!is_starter(&line(30, 15)));
        assert!(!is_starter(&line(0, 0)));
    }

    #[test]
    fn rate_pitcher_uses_starts_for_role_and_die() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let line = StatLine {
            games_played: 10,
            games_started: 0,
            innings: Innings::from_whole(60),
            earned_runs: 10, // 1.50 ERA
            saves: 20,
            ..StatLine::default()
        };
        let rated = rate_pitcher(
            5,
            "Closer",
            &line,
            None,
            &[],
            PlayerProfile::default(),
            2015,
            &EraRules::default(),
            &mut rng,
        );
        assert_eq!(rated.role, PitcherRole::Reliever);
        assert_eq!(rated.die, PitchDie::D20);
        assert!((rated.era - 1.5).abs() < 1e-12);
        assert_eq!(rated.saves, 20);
    }

    #[test]
    fn no_outs_recorded_gets_floor_die() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let line = StatLine {
            games_played: 1,
            earned_runs: 3,
            ..StatLine::default()
        };
        let rules = EraRules::default();
        let rated = rate_pitcher(
            6,
            "Mop-up",
            &line,
            None,
            &[],
            PlayerProfile::default(),
            1927,
            &rules,
            &mut rng,
        );
        assert_eq!(rated.role, PitcherRole::Reliever);
        assert_eq!(rated.die, rules.pitch_die.floor);
        assert_eq!(rated.die, PitchDie::MinusD6);
    }

    // -- Pitcher batting --

    #[test]
    fn empty_hitting_line_keeps_glove_trait() {
        let hitting = StatLine {
            games_played: 3,
            ..StatLine::default()
        };
        let shaky_hands = vec![FieldingRecord {
            games: 30,
            putouts: 4,
            assists: 12,
            errors: 4,
            ..FieldingRecord::default()
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let profile = pitcher_batting(
            Some(&hitting),
            &shaky_hands,
            PlayerProfile::default(),
            1990,
            &EraRules::default(),
            &mut rng,
        );
        assert!(profile.synthetic);
        assert_eq!(profile.plate_appearances, 0);
        assert_eq!(
            profile.traits,
            [Trait::PowerMinusMinus, Trait::ContactMinus, Trait::GloveMinus]
                .into_iter()
                .collect::<TraitSet>()
        );

        // No hitting line at all still reads the fielding stints.
        let profile = pitcher_batting(
            None,
            &shaky_hands,
            PlayerProfile::default(),
            1990,
            &EraRules::default(),
            &mut rng,
        );
        assert!(profile.traits.contains(&Trait::GloveMinus));
    }

    #[test]
    fn real_line_with_enough_plate_appearances() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let hitting = StatLine {
            games_played: 35,
            at_bats: 70,
            hits: 14,
            walks: 5,
            ..StatLine::default()
        };
        let profile = pitcher_batting(
            Some(&hitting),
            &[],
            PlayerProfile::default(),
            1975,
            &EraRules::default(),
            &mut rng,
        );
        assert!(!profile.synthetic);
        assert_eq!(profile.batting_line, "20/25");
        assert_eq!(profile.plate_appearances, 75);
    }

    #[test]
    fn thin_line_is_rolled() {
        let hitting = StatLine {
            games_played: 10,
            at_bats: 15,
            hits: 6,
            ..StatLine::default()
        };
        let sure_hands = vec![FieldingRecord {
            games: 10,
            putouts: 5,
            assists: 20,
            ..FieldingRecord::default()
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let profile = pitcher_batting(
            Some(&hitting),
            &sure_hands,
            PlayerProfile::default(),
            1975,
            &EraRules::default(),
            &mut rng,
        );
        assert!(profile.synthetic);
        assert_eq!(profile.plate_appearances, 15);
        assert_eq!(
            profile.traits,
            [Trait::PowerMinusMinus, Trait::ContactMinus, Trait::GlovePlus]
                .into_iter()
                .collect::<TraitSet>()
        );

        let (average, on_base) = profile
            .batting_line
            .split_once('/')
            .map(|(a, o)| (a.parse::<u32>().unwrap(), o.parse::<u32>().unwrap()))
            .unwrap();
        assert!((2..=16).contains(&average));
        assert_eq!(on_base, average + 4);
    }

    #[test]
    fn synthetic_line_is_reproducible_with_seed() {
        let rules = PitcherBatting::default();
        let first = synthetic_batting_line(&rules, &mut ChaCha8Rng::seed_from_u64(42));
        let second = synthetic_batting_line(&rules, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn no_hitting_line_rolls_without_glove() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let profile = pitcher_batting(
            None,
            &[],
            PlayerProfile::default(),
            2010,
            &EraRules::default(),
            &mut rng,
        );
        assert!(profile.synthetic);
        assert_eq!(profile.plate_appearances, 0);
        assert_eq!(profile.traits.len(), 2);
    }

    #[test]
    fn dice_and_bonus_are_configurable() {
        let rules = PitcherBatting {
            dice: 1,
            die_sides: 1,
            on_base_bonus: 10,
            ..PitcherBatting::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(synthetic_batting_line(&rules, &mut rng), "1/11");
    }

    // -- Staff --

    #[test]
    fn rotation_is_top_five_by_innings() {
        let pitchers: Vec<RatedPitcher> = (1..=7)
            .map(|id| card(id, PitcherRole::Starter, 100 + id * 10, 0))
            .collect();
        let (rotation, bullpen) = build_staff(pitchers, None);
        assert_eq!(ids(&rotation), vec![7, 6, 5, 4, 3]);
        // Overflow keeps innings order, so with no saves anywhere the sixth
        // starter closes.
        let closer = bullpen.closer.expect("closer");
        assert_eq!(closer.id, 2);
        assert_eq!(closer.role, PitcherRole::Closer);
        assert_eq!(ids(&bullpen.relievers), vec![1]);
        assert_eq!(bullpen.relievers[0].role, PitcherRole::Reliever);
    }

    #[test]
    fn forced_starter_leads_rotation() {
        let pitchers = vec![
            card(1, PitcherRole::Starter, 200, 0),
            card(2, PitcherRole::Starter, 180, 0),
            card(3, PitcherRole::Reliever, 60, 30),
            card(4, PitcherRole::Reliever, 70, 2),
        ];
        let (rotation, bullpen) = build_staff(pitchers, Some(4));
        assert_eq!(ids(&rotation), vec![4, 1, 2]);
        assert_eq!(rotation[0].role, PitcherRole::Starter);
        assert_eq!(bullpen.closer.map(|p| p.id), Some(3));
        assert!(bullpen.relievers.is_empty());
    }

    #[test]
    fn closer_ties_go_to_roster_order() {
        let pitchers = vec![
            card(1, PitcherRole::Reliever, 50, 10),
            card(2, PitcherRole::Reliever, 80, 10),
        ];
        let (_, bullpen) = build_staff(pitchers, None);
        assert_eq!(bullpen.closer.map(|p| p.id), Some(1));
    }

    #[test]
    fn bullpen_capped_at_seven_by_innings() {
        let pitchers: Vec<RatedPitcher> = (1..=10)
            .map(|id| card(id, PitcherRole::Reliever, id * 5, if id == 1 { 25 } else { 0 }))
            .collect();
        let (rotation, bullpen) = build_staff(pitchers, None);
        assert!(rotation.is_empty());
        assert_eq!(bullpen.closer.map(|p| p.id), Some(1));
        assert_eq!(ids(&bullpen.relievers), vec![10, 9, 8, 7, 6, 5, 4]);
    }

    #[test]
    fn empty_staff() {
        let (rotation, bullpen) = build_staff(Vec::new(), Some(9));
        assert!(rotation.is_empty());
        assert_eq!(bullpen, Bullpen::default());
    }
}
