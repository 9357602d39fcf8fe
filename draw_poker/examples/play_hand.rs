//! Play Hand Example
//!
//! Deals a game, calls the ante, throws away everything below a ten and
//! prints the result.

use draw_poker::entities::Rank;
use draw_poker::{Action, GameEngine, GameError};

fn main() -> Result<(), GameError> {
    println!("=== Five-Card Draw Example ===\n");

    let mut engine = GameEngine::default();
    let mut game = engine.create_game()?;

    println!("Game {}", game.id);
    for opponent in &game.opponents {
        println!("  {} sits down with {} chips", opponent.name, opponent.chips);
    }

    println!("\nDealt:");
    for slot in &game.seat.hand {
        println!("  [{}] {}", slot.position, slot.card);
    }

    engine.apply_bet(&mut game, Action::Call)?;
    println!(
        "\nCalled {}: pot {}, {} chips left",
        game.current_bet, game.pot, game.seat.chips
    );

    let discard: Vec<i64> = game
        .seat
        .hand
        .iter()
        .filter(|slot| slot.card.rank < Rank::Ten)
        .map(|slot| slot.position as i64)
        .collect();
    println!("Discarding positions {discard:?}");
    engine.apply_draw(&mut game, &discard)?;

    println!("\nFinal hand:");
    for slot in &game.seat.hand {
        println!("  [{}] {}", slot.position, slot.card);
    }

    if let (Some(winner), Some(hand)) = (&game.winner, &game.winning_hand) {
        println!("\n{winner} wins with {hand}");
    }

    Ok(())
}
