//! Space Cat Pong entry point
//!
//! Native: runs one headless match on a virtual clock with idle paddles and
//! logs the outcome. Usage: `space-cat-pong [--speed slow|normal|fast]
//! [store.json]`.
//! Web: the library's `WebGame` is the entry point; this binary does nothing.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use space_cat_pong::persistence::{FileStore, KvStore, MemoryStore};
    use space_cat_pong::sim::{CourtSize, GamePhase, TickInput};
    use space_cat_pong::{Game, SpeedSetting, Tuning, VirtualClock};
    use thiserror::Error;

    /// Give up after this many clock steps (~27 minutes of virtual time)
    const MAX_STEPS: u64 = 100_000;
    /// Virtual time per frame
    const FRAME_MS: u64 = 16;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum ArgsError {
        #[error("--speed needs a value")]
        MissingSpeed,
        #[error("unknown speed {0:?} (expected slow, normal or fast)")]
        UnknownSpeed(String),
        #[error("unexpected argument {0:?}")]
        Unexpected(String),
    }

    /// Parsed command line
    #[derive(Debug, Default, PartialEq, Eq)]
    pub struct Args {
        /// Speed preset to switch to (and persist) before the match
        pub speed: Option<SpeedSetting>,
        /// JSON file holding settings and the high score
        pub store: Option<String>,
    }

    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, ArgsError> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--speed" {
                let name = args.next().ok_or(ArgsError::MissingSpeed)?;
                let speed = SpeedSetting::from_str(&name).ok_or(ArgsError::UnknownSpeed(name))?;
                parsed.speed = Some(speed);
            } else if parsed.store.is_none() && !arg.starts_with('-') {
                parsed.store = Some(arg);
            } else {
                return Err(ArgsError::Unexpected(arg));
            }
        }
        Ok(parsed)
    }

    pub fn run() {
        let args = match parse_args(std::env::args().skip(1)) {
            Ok(args) => args,
            Err(e) => {
                log::error!("{e}");
                eprintln!("usage: space-cat-pong [--speed slow|normal|fast] [store.json]");
                return;
            }
        };

        let store: Box<dyn KvStore> = match args.store {
            Some(path) => match FileStore::open(&path) {
                Ok(store) => {
                    log::info!("Using store {}", store.path().display());
                    Box::new(store)
                }
                Err(e) => {
                    log::warn!("Could not open store {path}: {e}; using memory");
                    Box::new(MemoryStore::new())
                }
            },
            None => Box::new(MemoryStore::new()),
        };

        let seed: u64 = rand::random();
        let mut game = match Game::new(
            Tuning::default(),
            CourtSize::default(),
            store,
            VirtualClock::new(),
            seed,
        ) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid tuning: {e}");
                return;
            }
        };

        if let Some(speed) = args.speed {
            game.set_speed(speed);
        }
        game.start();
        let input = TickInput::default();
        let mut frames = 0u64;
        for _ in 0..MAX_STEPS {
            if game.phase() == GamePhase::Finished {
                break;
            }
            if game.clock_mut().take_frame() {
                game.on_frame(&input);
                frames += 1;
            }
            for id in game.clock_mut().advance(FRAME_MS) {
                game.on_timer(id);
            }
        }

        let snapshot = game.snapshot();
        match snapshot.score.winner {
            Some(winner) => log::info!(
                "{} cat wins {} - {} after {} frames (high score {})",
                winner.as_str(),
                snapshot.score.left_score,
                snapshot.score.right_score,
                frames,
                snapshot.high_score
            ),
            None => log::warn!(
                "No winner after {} frames ({} - {})",
                frames,
                snapshot.score.left_score,
                snapshot.score.right_score
            ),
        }
        match serde_json::to_string(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize snapshot: {e}"),
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Cat Pong (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is space_cat_pong::web::start via wasm_bindgen(start)
}
