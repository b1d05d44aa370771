// Deadball card generator entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the cards)
// 2. Load and validate the game file
// 3. Load both teams' season data and assemble their cards
// 4. Print the cards as JSON

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use deadball_cli::config::load_game_config;
use deadball_cli::game::build_cards;

#[derive(Debug, Parser)]
#[clap(name = "deadball", about = "Build Deadball game cards from season stats")]
struct Cli {
    /// Game description (TOML).
    game: PathBuf,

    /// Seed for rolled pitcher batting lines; omit for a random roll.
    #[clap(long)]
    seed: Option<u64>,

    /// Pretty-print the JSON output.
    #[clap(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config = load_game_config(&cli.game)
        .with_context(|| format!("failed to load game file {}", cli.game.display()))?;
    info!(
        "{} at {}, {} season",
        config.away.name, config.home.name, config.year
    );

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let cards = build_cards(&config, &mut rng).context("failed to build game cards")?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&cards)?
    } else {
        serde_json::to_string(&cards)?
    };
    println!("{json}");

    Ok(())
}

/// Initialize tracing to stderr.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deadball_core=info,deadball_cli=info,warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
