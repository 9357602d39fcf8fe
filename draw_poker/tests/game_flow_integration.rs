//! Integration tests for full hands played through the engine.
//!
//! These follow a game from the deal through betting and drawing to the
//! finished state, checking chip accounting and phase rules along the way.

use std::collections::HashSet;
use std::sync::Arc;

use draw_poker::{
    Action, GameEngine, GameError, GameSettings, Phase, Winner,
    entities::{Card, OpponentStatus},
    game::{FixedResolver, resolver::HAND_LABELS},
};

fn unique_cards(cards: &[Card]) -> usize {
    cards.iter().collect::<HashSet<_>>().len()
}

#[test]
fn test_new_games_start_in_betting() {
    let mut engine = GameEngine::with_rng_seed(2024);
    for _ in 0..25 {
        let game = engine.create_game().unwrap();
        assert_eq!(game.phase, Phase::Betting);
        assert_eq!(game.pot, 0);
        assert_eq!(game.seat.chips, 1000);
        assert_eq!(unique_cards(&game.seat.cards()), 5);
        assert_eq!(game.opponents.len(), 3);
        for opponent in &game.opponents {
            assert!((800..=1200).contains(&opponent.chips));
            assert_eq!(opponent.status, OpponentStatus::Active);
        }
    }
}

#[test]
fn test_ten_games_have_distinct_ids() {
    let mut engine = GameEngine::default();
    let ids: HashSet<_> = (0..10)
        .map(|_| engine.create_game().unwrap().id)
        .collect();
    assert_eq!(ids.len(), 10);
}

#[test]
fn test_call_then_draw_full_hand() {
    let mut engine = GameEngine::with_rng_seed(7);
    let mut game = engine.create_game().unwrap();

    engine.apply_bet(&mut game, Action::Call).unwrap();
    assert_eq!(game.phase, Phase::Drawing);
    assert_eq!(game.pot, 10);
    assert_eq!(game.seat.chips, 990);

    let before = game.seat.cards();
    engine.apply_draw(&mut game, &[0, 2, 4]).unwrap();
    let after = game.seat.cards();

    assert_eq!(game.phase, Phase::Finished);
    assert_eq!(after.len(), 5);
    assert_eq!(unique_cards(&after), 5);
    assert_eq!((after[1], after[3]), (before[1], before[3]));
    for position in [0, 2, 4] {
        assert!(!before.contains(&after[position]));
    }

    let winner = game.winner.clone().unwrap();
    let label = game.winning_hand.clone().unwrap();
    assert!(HAND_LABELS.contains(&label.as_str()));
    if let Winner::Opponent(name) = winner {
        assert!(game.opponents.iter().any(|o| o.name == name));
    }
}

#[test]
fn test_raise_then_call() {
    let mut engine = GameEngine::with_rng_seed(99);
    let mut game = engine.create_game().unwrap();

    engine.apply_bet(&mut game, Action::Raise(Some(50))).unwrap();
    assert_eq!(game.phase, Phase::Betting);
    assert!(game.current_bet >= 50);
    assert!(game.pot >= 50);

    // Calling now matches the raised table bet.
    engine.apply_bet(&mut game, Action::Call).unwrap();
    assert_eq!(game.phase, Phase::Drawing);
    assert_eq!(game.pot, 100);
    assert_eq!(game.seat.chips, 900);
}

#[test]
fn test_fold_never_lets_the_seat_win() {
    let mut engine = GameEngine::with_rng_seed(3);
    for _ in 0..100 {
        let mut game = engine.create_game().unwrap();
        engine.apply_bet(&mut game, Action::Fold).unwrap();
        assert_eq!(game.phase, Phase::Finished);
        assert!(game.seat.has_folded);
        match game.winner {
            Some(Winner::Opponent(ref name)) => {
                assert!(game.opponents.iter().any(|o| &o.name == name));
            }
            other => panic!("unexpected winner {other:?}"),
        }
    }
}

#[test]
fn test_insufficient_funds_leaves_game_unchanged() {
    let mut engine = GameEngine::with_rng_seed(1).with_settings(GameSettings::new(5, 10));
    let mut game = engine.create_game().unwrap();
    let before = game.clone();

    assert!(matches!(
        engine.apply_bet(&mut game, Action::Call),
        Err(GameError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        engine.apply_bet(&mut game, Action::Raise(Some(6))),
        Err(GameError::InsufficientFunds { .. })
    ));
    assert_eq!(game, before);

    // Folding is still allowed.
    engine.apply_bet(&mut game, Action::Fold).unwrap();
    assert_eq!(game.phase, Phase::Finished);
}

#[test]
fn test_finished_games_reject_everything() {
    let mut engine = GameEngine::with_rng_seed(11);
    let mut game = engine.create_game().unwrap();
    engine.apply_bet(&mut game, Action::Fold).unwrap();
    let finished = game.clone();

    assert!(matches!(
        engine.apply_bet(&mut game, Action::Call),
        Err(GameError::InvalidPhase { .. })
    ));
    assert!(matches!(
        engine.apply_draw(&mut game, &[0]),
        Err(GameError::InvalidPhase { .. })
    ));
    assert_eq!(game, finished);
}

#[test]
fn test_view_flags_track_phase() {
    let mut engine = GameEngine::with_rng_seed(5);
    let mut game = engine.create_game().unwrap();
    let view = game.view();
    assert!(view.can_call && view.can_raise && view.can_fold);

    engine.apply_bet(&mut game, Action::Call).unwrap();
    let view = game.view();
    assert!(!view.can_call && !view.can_raise && !view.can_fold);
    assert_eq!(view.phase, Phase::Drawing);
    assert_eq!(view.player_chips, 990);
}

#[test]
fn test_seat_win_reported_as_player() {
    let mut engine = GameEngine::with_rng_seed(5)
        .with_resolver(Arc::new(FixedResolver::new(Winner::Seat, "Four of a Kind")));
    let mut game = engine.create_game().unwrap();
    engine.apply_bet(&mut game, Action::Call).unwrap();
    engine.apply_draw(&mut game, &[]).unwrap();

    let json = serde_json::to_value(game.view()).unwrap();
    assert_eq!(json["winner"], "player");
    assert_eq!(json["winningHand"], "Four of a Kind");
    assert_eq!(json["phase"], "finished");
}

#[test]
fn test_updated_at_moves_forward() {
    let mut engine = GameEngine::with_rng_seed(6);
    let mut game = engine.create_game().unwrap();
    let created = game.created_at;
    engine.apply_bet(&mut game, Action::Call).unwrap();
    assert_eq!(game.created_at, created);
    assert!(game.updated_at >= created);
}
