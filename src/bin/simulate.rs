//! Simulate CLI: headless self-play of the race game through a host session.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --games 100 --players 4 --seed 7
//!   RUST_LOG=rust_board=debug cargo run --bin simulate -- --games 1

use std::path::PathBuf;

use clap::Parser;
use rustc_hash::FxHashMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rust_board::core::{GameRng, GameSettings, Player, PlayerId};
use rust_board::host::{HostSession, IntentMessage};
use rust_board::{Board, GameResult, RulesEngine, TroubleGameBuilder};

#[derive(Parser)]
#[command(name = "simulate", about = "Run headless self-play games of the race variant")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "10", env = "SIMULATE_GAMES")]
    games: usize,

    /// Players per game
    #[arg(long, default_value = "4", env = "SIMULATE_PLAYERS")]
    players: usize,

    /// Random seed
    #[arg(long, default_value = "42", env = "SIMULATE_SEED")]
    seed: u64,

    /// Abandon a game after this many turns
    #[arg(long, default_value = "2000")]
    max_turns: u32,

    /// Board definition (JSON) to play on instead of the default ring
    #[arg(long)]
    board: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let board = match &cli.board {
        Some(path) => Some(Board::from_json(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let settings = GameSettings::default().with_player_range(2, cli.players.max(2));

    let mut wins: FxHashMap<PlayerId, usize> = FxHashMap::default();
    let mut abandoned = 0;
    let mut total_turns = 0u64;

    for game_index in 0..cli.games {
        let seed = cli.seed.wrapping_add(game_index as u64);
        let mut builder = TroubleGameBuilder::new().settings(settings.clone());
        if let Some(board) = &board {
            builder = builder.board(board.clone());
        }
        let mut session = HostSession::new(builder.build(seed));
        for i in 0..cli.players {
            let id = format!("p{}", i);
            session.join(Player::new(id.as_str(), id.as_str(), id.as_str()), 0)?;
        }
        session.start(0)?;

        let (result, turns) = play(&mut session, seed, cli.max_turns);
        total_turns += u64::from(turns);
        match result {
            Some(GameResult::Winner(player)) => *wins.entry(player).or_default() += 1,
            Some(other) => info!(game = game_index, ?other, "game ended without a single winner"),
            None => {
                warn!(game = game_index, turns, "game abandoned");
                abandoned += 1;
            }
        }
    }

    let mut standings: Vec<_> = wins.into_iter().collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("games: {}  abandoned: {}", cli.games, abandoned);
    println!("average turns: {:.1}", total_turns as f64 / cli.games.max(1) as f64);
    for (player, count) in standings {
        println!("  {:<6} {:>5} wins", player.as_str(), count);
    }
    Ok(())
}

/// Play one game, picking uniformly among the current player's legal
/// intents. Returns the result and the number of turns played.
fn play<E: RulesEngine>(session: &mut HostSession<E>, seed: u64, max_turns: u32) -> (Option<GameResult>, u32) {
    let mut rng = GameRng::new(seed ^ 0x5eed);
    let mut clock = 0u64;

    while session.state().turn_number <= max_turns {
        if let Some(result) = session.engine().is_terminal() {
            return (Some(result), session.state().turn_number);
        }
        let Some(player) = session.state().current_player_id().cloned() else {
            break;
        };
        let intents = session.engine().legal_intents();
        let Some(intent) = rng.choose(&intents) else {
            warn!(player = %player, phase = ?session.state().turn_phase, "no legal intent");
            break;
        };

        let message = IntentMessage::new(player, &intent.kind, intent.data.clone());
        let result = session.handle(&message, clock);
        if !result.success {
            warn!(error = ?result.error, "self-play intent rejected");
            break;
        }
        clock += 1;
        session.drain_due(clock);
    }
    (session.engine().is_terminal(), session.state().turn_number)
}
