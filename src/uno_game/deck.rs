use super::card::{standard_deck, Card};
use super::game::GameError;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Draw pile and discard pile.
///
/// The top of the draw pile is the last element of `draw_pile`; the top card
/// of the table is the last element of `discard_pile`.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl Deck {
    /// Creates a deck whose draw pile is `cards` as given, with an empty discard pile.
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
        }
    }

    /// Creates a freshly shuffled 108-card deck.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::new(standard_deck());
        deck.shuffle(rng);
        deck
    }

    pub fn from_piles(draw_pile: Vec<Card>, discard_pile: Vec<Card>) -> Self {
        Self {
            draw_pile,
            discard_pile,
        }
    }

    /// Shuffles the draw pile in place (Fisher-Yates).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.draw_pile.shuffle(rng);
    }

    /// Draws the top card of the draw pile.
    ///
    /// An empty draw pile is refilled from every discard except the top card,
    /// then shuffled. Fails with `DeckExhausted` when the discard pile has
    /// nothing to give back.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Card, GameError> {
        if self.draw_pile.is_empty() {
            self.reshuffle_discards(rng)?;
        }
        self.draw_pile.pop().ok_or(GameError::DeckExhausted)
    }

    fn reshuffle_discards<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.discard_pile.len() <= 1 {
            return Err(GameError::DeckExhausted);
        }

        let top_card = self.discard_pile.pop().ok_or(GameError::EmptyDiscardPile)?;
        self.draw_pile.append(&mut self.discard_pile);
        self.shuffle(rng);
        self.discard_pile.push(top_card);

        debug!(
            "Reshuffled {} discarded cards into the draw pile",
            self.draw_pile.len()
        );
        Ok(())
    }

    /// Puts a card back on the draw pile (used when a wild card turns up as the
    /// opening card).
    pub fn return_to_draw_pile(&mut self, card: Card) {
        self.draw_pile.push(card);
    }

    pub fn top_card(&self) -> Result<&Card, GameError> {
        self.discard_pile.last().ok_or(GameError::EmptyDiscardPile)
    }

    /// Places a played card on top of the discard pile.
    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn cards_remaining(&self) -> usize {
        self.draw_pile.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uno_game::card::{CardType, Color};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn number(color: Color, n: u8) -> Card {
        Card::new(color, CardType::Number(n))
    }

    #[test]
    fn test_shuffled_deck_keeps_all_cards() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::shuffled(&mut rng);

        let mut drawn = deck.draw_pile().to_vec();
        let mut expected = standard_deck();
        let key = |c: &Card| format!("{:?}", c);
        drawn.sort_by_key(key);
        expected.sort_by_key(key);
        assert_eq!(drawn, expected);
        assert!(deck.discard_pile().is_empty());
    }

    #[test]
    fn test_shuffle_is_reproducible_per_seed() {
        let a = Deck::shuffled(&mut StdRng::seed_from_u64(42));
        let b = Deck::shuffled(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_takes_top_card() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = Deck::new(vec![number(Color::Red, 1), number(Color::Blue, 2)]);

        let card = deck.draw(&mut rng).unwrap();
        assert_eq!(card, number(Color::Blue, 2));
        assert_eq!(deck.cards_remaining(), 1);
    }

    #[test]
    fn test_draw_reshuffles_discard_pile_when_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        let discards = vec![
            number(Color::Red, 1),
            number(Color::Green, 4),
            number(Color::Blue, 8),
            number(Color::Red, 6),
            number(Color::Yellow, 2),
        ];
        let mut deck = Deck::from_piles(Vec::new(), discards);

        let card = deck.draw(&mut rng).unwrap();

        assert_ne!(card, number(Color::Yellow, 2));
        assert_eq!(deck.cards_remaining(), 3);
        assert_eq!(deck.discard_pile(), &[number(Color::Yellow, 2)]);
    }

    #[test]
    fn test_draw_fails_when_nothing_to_reshuffle() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::from_piles(Vec::new(), vec![number(Color::Red, 3)]);

        assert!(matches!(deck.draw(&mut rng), Err(GameError::DeckExhausted)));
        // The lone discard stays where it was.
        assert_eq!(deck.discard_pile(), &[number(Color::Red, 3)]);

        let mut empty = Deck::new(Vec::new());
        assert!(matches!(empty.draw(&mut rng), Err(GameError::DeckExhausted)));
    }

    #[test]
    fn test_top_card() {
        let mut deck = Deck::new(Vec::new());
        assert!(matches!(deck.top_card(), Err(GameError::EmptyDiscardPile)));

        deck.discard(number(Color::Green, 9));
        deck.discard(Card::wild());
        assert_eq!(deck.top_card().unwrap(), &Card::wild());
    }
}
