use space_cat_pong::persistence::{KvStore, MemoryStore};
use space_cat_pong::sim::{CourtSize, GameEvent, GamePhase, Side, TickInput};
use space_cat_pong::{
    Game, HighScore, KeyAction, KeyboardState, Settings, SpeedSetting, Tuning, VirtualClock,
};

const FRAME_MS: u64 = 16;

fn new_game(store: MemoryStore, seed: u64) -> Game<MemoryStore, VirtualClock> {
    Game::new(
        Tuning::default(),
        CourtSize::new(800.0, 600.0),
        store,
        VirtualClock::new(),
        seed,
    )
    .unwrap()
}

/// Drive the game like a browser would until it finishes or `max_steps` elapse
fn play_out(
    game: &mut Game<MemoryStore, VirtualClock>,
    input: TickInput,
    max_steps: u64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_steps {
        if game.phase() == GamePhase::Finished {
            break;
        }
        if game.clock_mut().take_frame() {
            if let Some(event) = game.on_frame(&input) {
                events.push(event);
            }
        }
        for id in game.clock_mut().advance(FRAME_MS) {
            game.on_timer(id);
        }
    }
    events
}

#[test]
fn test_full_match_reaches_winner() {
    let mut store = MemoryStore::new();
    store.set(HighScore::STORAGE_KEY, "3").unwrap();
    let mut game = new_game(store, 2024);

    let mut keys = KeyboardState::new();
    assert_eq!(keys.key_down(" "), KeyAction::TogglePause);
    game.toggle_pause();
    assert_eq!(game.phase(), GamePhase::Running);
    keys.key_down("w");

    let events = play_out(&mut game, keys.tick_input(), 1_000_000);
    let snapshot = game.snapshot();
    assert_eq!(snapshot.score.phase, GamePhase::Finished);

    let winner = snapshot.score.winner.expect("match should have a winner");
    let winning = snapshot.score.left_score.max(snapshot.score.right_score);
    assert_eq!(winning, 10);
    let winner_score = match winner {
        Side::Left => snapshot.score.left_score,
        Side::Right => snapshot.score.right_score,
    };
    assert_eq!(winner_score, 10);

    // Every point was reported, the last one as the win
    let total = snapshot.score.left_score + snapshot.score.right_score;
    assert_eq!(events.len() as u32, total);
    assert_eq!(events.last(), Some(&GameEvent::MatchWon { winner }));

    // At least 10 points were played, so the old record of 3 is beaten
    assert_eq!(game.high_score(), total);
    assert_eq!(
        game.store()
            .get(HighScore::STORAGE_KEY)
            .unwrap()
            .map(|s| s.parse::<u32>().unwrap()),
        Some(total)
    );

    // Nothing left scheduled once the match is over
    assert!(!game.clock().frame_pending());
    assert_eq!(game.clock().pending_timers(), 0);
}

#[test]
fn test_scores_never_decrease_during_play() {
    let mut game = new_game(MemoryStore::new(), 7);
    game.start();
    let mut last = (0, 0);
    for _ in 0..20_000 {
        if game.phase() == GamePhase::Finished {
            break;
        }
        if game.clock_mut().take_frame() {
            game.on_frame(&TickInput::default());
        }
        for id in game.clock_mut().advance(FRAME_MS) {
            game.on_timer(id);
        }
        let score = game.snapshot().score;
        assert!(score.left_score >= last.0 && score.right_score >= last.1);
        assert!(score.left_score + score.right_score <= last.0 + last.1 + 1);
        if score.phase != GamePhase::Finished {
            assert_eq!(score.winner, None);
        }
        last = (score.left_score, score.right_score);
    }
}

#[test]
fn test_ball_speed_never_exceeds_cap() {
    let mut game = new_game(MemoryStore::new(), 99);
    game.set_speed(SpeedSetting::Fast);
    game.start();
    let cap = game.tuning().max_ball_speed;
    for _ in 0..20_000 {
        if game.phase() == GamePhase::Finished {
            break;
        }
        if game.clock_mut().take_frame() {
            game.on_frame(&TickInput::default());
        }
        for id in game.clock_mut().advance(FRAME_MS) {
            game.on_timer(id);
        }
        assert!(game.ball_velocity().length() <= cap + 1e-4);
    }
}

#[test]
fn test_settings_persist_across_games() {
    let mut game = new_game(MemoryStore::new(), 1);
    game.set_speed(SpeedSetting::Normal);
    let store = game.store().clone();

    let game = new_game(store, 2);
    assert_eq!(game.settings().speed, SpeedSetting::Normal);
    assert_eq!(Settings::load(game.store()).speed, SpeedSetting::Normal);
}

#[test]
fn test_snapshot_serializes_for_host() {
    let game = new_game(MemoryStore::new(), 5);
    let json = serde_json::to_value(game.snapshot()).unwrap();
    assert_eq!(json["score"]["phase"], "Idle");
    assert_eq!(json["speed"], "slow");
    assert_eq!(json["left"]["offset"], 250.0);
    assert!(json["score"]["winner"].is_null());
}
