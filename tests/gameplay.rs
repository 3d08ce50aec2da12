use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use uno_console::uno_game::{
    standard_deck, Card, CardType, Color, Deck, Effect, GameConfig, GameError, Player,
    RandomStrategy, Table, TurnState, UnoGame,
};

fn num(color: Color, n: u8) -> Card {
    Card::new(color, CardType::Number(n))
}

fn card_counts<'a>(cards: impl IntoIterator<Item = &'a Card>) -> HashMap<&'a Card, usize> {
    let mut counts = HashMap::new();
    for card in cards {
        *counts.entry(card).or_insert(0) += 1;
    }
    counts
}

fn table_cards(game: &UnoGame) -> Vec<&Card> {
    let mut cards: Vec<&Card> = game.deck().draw_pile().iter().collect();
    cards.extend(game.deck().discard_pile());
    for hand in game.player_hands() {
        cards.extend(hand);
    }
    cards
}

#[test]
fn single_card_play_wins_the_game() -> Result<(), GameError> {
    let players = vec![
        Player::human(0, "A").with_hand(vec![num(Color::Red, 5)]),
        Player::computer(1).with_hand(vec![num(Color::Blue, 1), num(Color::Blue, 2)]),
    ];
    let deck = Deck::from_piles(vec![num(Color::Green, 1); 5], vec![num(Color::Red, 9)]);
    let mut game = UnoGame::from_table(Table::new(players, deck), 1)?;

    let outcome = game.play(0, 0)?;

    assert_eq!(outcome.winner, Some(0));
    assert_eq!(game.state(), TurnState::Won { player: 0 });
    assert!(game.players()[0].hand.is_empty());
    assert_eq!(game.play(1, 0), Err(GameError::GameOver));
    Ok(())
}

#[test]
fn wild_draw_four_top_card_follows_declared_color() -> Result<(), GameError> {
    let players = vec![
        Player::human(0, "A").with_hand(vec![num(Color::Green, 5), num(Color::Blue, 3)]),
        Player::computer(1).with_hand(vec![num(Color::Red, 1)]),
    ];
    let deck = Deck::from_piles(vec![num(Color::Green, 1); 5], vec![Card::wild_draw_four()]);
    let mut table = Table::new(players, deck);
    table.active_wild_color = Some(Color::Blue);
    let mut game = UnoGame::from_table(table, 1)?;

    assert_eq!(game.legal_play_indices(0)?, vec![1]);
    assert_eq!(game.play(0, 0), Err(GameError::IllegalCard { index: 0 }));

    game.play(0, 1)?;
    assert_eq!(game.top_card()?, &num(Color::Blue, 3));
    assert_eq!(game.active_wild_color(), None);
    Ok(())
}

#[test]
fn empty_draw_pile_reshuffles_all_but_top_discard() -> Result<(), GameError> {
    let discards = vec![
        num(Color::Red, 1),
        num(Color::Green, 6),
        Card::new(Color::Blue, CardType::Skip),
        num(Color::Red, 7),
        num(Color::Yellow, 2),
    ];
    let mut deck = Deck::from_piles(Vec::new(), discards);
    let mut rng = StdRng::seed_from_u64(8);

    let drawn = deck.draw(&mut rng)?;

    assert_eq!(deck.discard_pile(), &[num(Color::Yellow, 2)]);
    // Four cards went back under, one of them was drawn.
    assert_eq!(deck.draw_pile().len(), 3);
    assert_ne!(drawn, num(Color::Yellow, 2));
    Ok(())
}

#[test]
fn reshuffle_during_penalty_keeps_the_top_card() -> Result<(), GameError> {
    let players = vec![
        Player::human(0, "A").with_hand(vec![
            Card::new(Color::Yellow, CardType::DrawTwo),
            num(Color::Blue, 4),
        ]),
        Player::computer(1).with_hand(vec![num(Color::Red, 1)]),
        Player::computer(2).with_hand(vec![num(Color::Red, 2)]),
    ];
    let deck = Deck::from_piles(
        Vec::new(),
        vec![num(Color::Green, 3), num(Color::Red, 8), num(Color::Yellow, 2)],
    );
    let mut game = UnoGame::from_table(Table::new(players, deck), 4)?;

    let outcome = game.play(0, 0)?;

    assert_eq!(outcome.effect, Effect::DrawTwo { target: 1, drawn: 2 });
    assert_eq!(
        game.deck().discard_pile(),
        &[Card::new(Color::Yellow, CardType::DrawTwo)]
    );
    // Three discards went back, two were drawn.
    assert_eq!(game.deck().draw_pile().len(), 1);
    assert_eq!(game.current_player(), 2);
    Ok(())
}

#[test]
fn penalised_player_loses_their_turn() -> Result<(), GameError> {
    let players = vec![
        Player::human(0, "A").with_hand(vec![Card::wild_draw_four(), num(Color::Red, 1)]),
        Player::computer(1).with_hand(vec![num(Color::Red, 2)]),
        Player::computer(2).with_hand(vec![num(Color::Red, 3)]),
        Player::computer(3).with_hand(vec![num(Color::Red, 4)]),
    ];
    let deck = Deck::from_piles(vec![num(Color::Green, 1); 10], vec![num(Color::Blue, 9)]);
    let mut game = UnoGame::from_table(Table::new(players, deck), 2)?;

    assert_eq!(game.play(0, 0)?.effect, Effect::ColorChoicePending);
    let outcome = game.choose_color(0, Color::Red)?;

    assert_eq!(game.players()[1].hand.len(), 5);
    assert_eq!(outcome.next_player, 2);
    assert_eq!(game.state(), TurnState::AwaitingPlay { player: 2 });
    assert_eq!(game.legal_play_indices(2)?, vec![0]);
    Ok(())
}

#[test]
fn cards_are_neither_created_nor_destroyed() -> Result<(), GameError> {
    let catalog = standard_deck();
    let expected = card_counts(&catalog);

    for seed in [3, 17, 256] {
        let mut game = UnoGame::new(GameConfig::new(5)?.with_seed(seed))?;
        let mut strategy = RandomStrategy;
        let mut turns = 0;
        while !game.is_over() && turns < 3_000 {
            game.play_computer_turn(&mut strategy)?;
            assert_eq!(card_counts(table_cards(&game)), expected);
            turns += 1;
        }
    }
    Ok(())
}

#[test]
fn same_seed_same_game() -> Result<(), GameError> {
    let play_out = |seed: u64| -> Result<Vec<Effect>, GameError> {
        let mut game = UnoGame::new(GameConfig::new(3)?.with_seed(seed))?;
        let mut strategy = RandomStrategy;
        let mut effects = Vec::new();
        for _ in 0..50 {
            if game.is_over() {
                break;
            }
            effects.push(game.play_computer_turn(&mut strategy)?.effect);
        }
        Ok(effects)
    };

    assert_eq!(play_out(31)?, play_out(31)?);
    Ok(())
}
