// Integration tests for the card generator.
//
// These drive the same path as the binary: game file in, season CSVs loaded
// from fixture directories, both teams assembled with a seeded generator.
// The fixture clubs are small but complete: the home club carries activity
// and roster-stint files so the dated postseason game exercises both
// eligibility filters, and the away club has a player traded mid-season.

use std::path::{Path, PathBuf};

use deadball_cli::config::{load_game_config, GameConfig};
use deadball_cli::game::{build_cards, GameCards, TeamCard};
use deadball_cli::season::SeasonDataError;
use deadball_core::{PitcherRole, PlayerId, Position};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ===========================================================================
// Test helpers
// ===========================================================================

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

fn load(name: &str) -> GameConfig {
    load_game_config(&fixture(name)).expect("fixture game should load")
}

fn cards(name: &str, seed: u64) -> GameCards {
    let config = load(name);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    build_cards(&config, &mut rng).expect("fixture cards should build")
}

/// Ids of every filled batting slot, in order.
fn order_ids(card: &TeamCard) -> Vec<PlayerId> {
    card.roster.lineup().map(|b| b.id).collect()
}

fn bench_ids(card: &TeamCard) -> Vec<PlayerId> {
    card.roster.bench.iter().map(|b| b.id).collect()
}

fn rotation_ids(card: &TeamCard) -> Vec<PlayerId> {
    card.roster.rotation.iter().map(|p| p.id).collect()
}

// ===========================================================================
// Postseason game: auto lineup with eligibility filters (home)
// ===========================================================================

#[test]
fn home_auto_lineup_with_pitcher_ninth() {
    let cards = cards("game.toml", 1);
    let home = &cards.home;

    assert_eq!(home.name, "New York");
    assert_eq!(home.roster.batting_order.len(), 9);
    // Heart of the order by OPS, top two by OBP, rest by OPS, pitcher last.
    assert_eq!(order_ids(home), vec![1, 6, 8, 2, 7, 3, 5, 4, 20]);

    let ninth = home.roster.batting_order[8]
        .batter
        .as_ref()
        .expect("pitcher bats ninth");
    assert!(ninth.is_pitcher);
    assert_eq!(ninth.position, Position::Pitcher);
    assert_eq!(ninth.batting_line, "22/26");
}

#[test]
fn home_lineup_covers_the_field() {
    let cards = cards("game.toml", 1);
    let mut positions: Vec<&str> = cards
        .home
        .roster
        .lineup()
        .filter(|b| !b.is_pitcher)
        .map(|b| b.position.display_str())
        .collect();
    positions.sort_unstable();
    assert_eq!(
        positions,
        vec!["1B", "2B", "3B", "C", "CF", "LF", "RF", "SS"]
    );
}

#[test]
fn home_eligibility_filters_apply_to_postseason_game() {
    let cards = cards("game.toml", 1);
    let home = &cards.home;

    // 12 left the roster in July; 26 had no late-season activity.
    assert_eq!(bench_ids(home), vec![10, 11, 9]);
    assert_eq!(rotation_ids(home), vec![20, 21, 22, 24, 23]);
    let closer = home.roster.bullpen.closer.as_ref().expect("home closer");
    assert_eq!(closer.id, 25);
    assert_eq!(closer.role, PitcherRole::Closer);
    assert!(home.roster.bullpen.relievers.is_empty());
}

// ===========================================================================
// Postseason game: explicit order and forced starter (away)
// ===========================================================================

#[test]
fn away_explicit_order_is_kept() {
    let cards = cards("game.toml", 1);
    let away = &cards.away;

    assert_eq!(away.name, "Pittsburgh");
    assert_eq!(order_ids(away), vec![31, 32, 33, 35, 36, 37, 41, 38, 53]);
    let slots: Vec<u8> = away.roster.batting_order.iter().map(|s| s.order).collect();
    assert_eq!(slots, (1..=9).collect::<Vec<u8>>());

    let left_fielder = away.roster.batting_order[7].batter.as_ref().unwrap();
    assert_eq!(left_fielder.id, 38);
    assert_eq!(left_fielder.position, Position::LeftField);
}

#[test]
fn away_traded_player_counts_only_club_split() {
    let cards = cards("game.toml", 1);
    let rhyne = cards
        .away
        .roster
        .lineup()
        .find(|b| b.id == 41)
        .expect("traded player in lineup");
    // 60-for-200 with 20 walks for this club; the other club's split is ignored.
    assert_eq!(rhyne.batting_line, "30/36");
    assert_eq!(rhyne.position, Position::ThirdBase);
}

#[test]
fn away_forced_starter_and_bullpen() {
    let cards = cards("game.toml", 1);
    let away = &cards.away;

    assert_eq!(rotation_ids(away), vec![53, 50, 51, 52]);
    let closer = away.roster.bullpen.closer.as_ref().expect("away closer");
    assert_eq!(closer.id, 55);
    let relievers: Vec<PlayerId> = away.roster.bullpen.relievers.iter().map(|p| p.id).collect();
    assert_eq!(relievers, vec![54]);
    assert_eq!(bench_ids(away), vec![34, 39, 40]);

    // The forced starter never batted, so the line is rolled.
    let starter = &away.roster.rotation[0];
    assert!(starter.batting.synthetic);
    assert!(starter.batting.traits.len() >= 2);
}

// ===========================================================================
// Projected, undated game
// ===========================================================================

#[test]
fn projected_game_leaves_ninth_slot_empty() {
    let cards = cards("projected.toml", 2);
    for card in [&cards.home, &cards.away] {
        assert_eq!(card.roster.batting_order.len(), 9);
        assert!(card.roster.batting_order[8].batter.is_none());
        assert_eq!(card.roster.lineup().count(), 8);
        assert!(card.roster.lineup().all(|b| !b.is_pitcher));
    }
}

#[test]
fn undated_game_skips_eligibility_filters() {
    let cards = cards("projected.toml", 2);

    assert_eq!(bench_ids(&cards.home), vec![10, 11, 12, 9]);
    let relievers: Vec<PlayerId> = cards
        .home
        .roster
        .bullpen
        .relievers
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(relievers, vec![26]);

    assert_eq!(bench_ids(&cards.away), vec![39, 41, 40]);
}

// ===========================================================================
// Output and reproducibility
// ===========================================================================

#[test]
fn same_seed_same_cards() {
    let first = serde_json::to_value(cards("game.toml", 7)).unwrap();
    let second = serde_json::to_value(cards("game.toml", 7)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn json_shape() {
    let value = serde_json::to_value(cards("game.toml", 3)).unwrap();

    assert_eq!(value["year"], 1927);
    assert_eq!(value["home"]["name"], "New York");
    assert_eq!(value["home"]["batting_order"].as_array().unwrap().len(), 9);
    assert_eq!(value["home"]["batting_order"][8]["batter"]["position"], "P");
    assert_eq!(value["away"]["rotation"][0]["role"], "SP");
    assert_eq!(value["away"]["bullpen"]["closer"]["id"], 55);
    assert_eq!(value["away"]["bullpen"]["closer"]["role"], "CP");
    assert!(value["away"]["bench"].is_array());
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn missing_data_dir_is_reported() {
    let mut config = load("game.toml");
    config.home.data_dir = fixture("no_such_team");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    match build_cards(&config, &mut rng) {
        Err(SeasonDataError::Io { path, .. }) => assert!(path.contains("no_such_team")),
        Err(other) => panic!("expected Io error, got: {other}"),
        Ok(_) => panic!("expected an error for a missing data directory"),
    }
}
