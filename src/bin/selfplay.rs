use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use chess_rules::config::GameConfig;
use chess_rules::error::ChessResult;
use chess_rules::game::Game;
use chess_rules::status::Status;

/// Play random legal moves until the game ends.
#[derive(Parser, Debug)]
#[command(name = "selfplay", version)]
struct Args {
    /// JSON file with the board geometry, e.g. {"rows": 8, "columns": 8}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible games; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Give up on a game after this many plies.
    #[arg(long, default_value_t = 300)]
    max_plies: u32,

    /// Print the final board of each game as JSON.
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Debug)]
enum Outcome {
    Checkmate { winner: String },
    Stalemate,
    Stuck,
    PlyLimit,
}

#[derive(Debug, Default)]
struct Tally {
    player1_wins: u32,
    player2_wins: u32,
    stalemates: u32,
    unfinished: u32,
}

fn play_game(
    config: &GameConfig,
    rng: &mut StdRng,
    max_plies: u32,
    json: bool,
) -> ChessResult<(Outcome, u32)> {
    let mut game = Game::with_config(config.clone());
    game.start("player1", "player2")?;

    let mut plies = 0;
    let outcome = loop {
        match game.status() {
            Status::EndedCheckmate => {
                // The turn already passed to the mated side.
                let loser = game.current_player()?.name().to_string();
                let winner = if loser == game.player1()?.name() {
                    game.player2()?.name().to_string()
                } else {
                    game.player1()?.name().to_string()
                };
                break Outcome::Checkmate { winner };
            }
            Status::EndedStalemate => break Outcome::Stalemate,
            _ => {}
        }
        if plies >= max_plies {
            break Outcome::PlyLimit;
        }

        let moves = game.legal_moves()?;
        let Some(mv) = moves.choose(rng) else {
            break Outcome::Stuck;
        };
        let (Some(action), Some(to)) = (mv.actions().first(), mv.destination()) else {
            break Outcome::Stuck;
        };
        let player = game.current_player()?.name().to_string();
        debug!(ply = plies, %player, %mv, "playing");
        game.make_move(action.from(), to)?;
        plies += 1;
    };

    if json {
        println!("{}", game.board()?.to_json()?);
    }
    Ok((outcome, plies))
}

fn main() -> ChessResult<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        built = env!("SELFPLAY_BUILT_AT"),
        games = args.games,
        rows = config.rows,
        columns = config.columns,
        "selfplay starting"
    );

    let mut tally = Tally::default();
    for index in 0..args.games {
        let (outcome, plies) = play_game(&config, &mut rng, args.max_plies, args.json)?;
        match &outcome {
            Outcome::Checkmate { winner } if winner == "player1" => tally.player1_wins += 1,
            Outcome::Checkmate { .. } => tally.player2_wins += 1,
            Outcome::Stalemate => tally.stalemates += 1,
            Outcome::Stuck | Outcome::PlyLimit => tally.unfinished += 1,
        }
        info!(game = index + 1, plies, outcome = ?outcome, "game finished");
    }

    println!(
        "player1 wins {}, player2 wins {}, stalemates {}, unfinished {} (out of {})",
        tally.player1_wins, tally.player2_wins, tally.stalemates, tally.unfinished, args.games
    );
    Ok(())
}
