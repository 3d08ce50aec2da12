use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// The four colors a player can declare, in tie-break order.
    pub const PLAYABLE: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn is_playable(&self) -> bool {
        !matches!(self, Color::Wild)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Wild => "Wild",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl CardType {
    pub fn is_wild(&self) -> bool {
        matches!(self, CardType::Wild | CardType::WildDrawFour)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Number(n) => write!(f, "{}", n),
            CardType::Skip => f.write_str("Skip"),
            CardType::Reverse => f.write_str("Reverse"),
            CardType::DrawTwo => f.write_str("Draw Two"),
            CardType::Wild => f.write_str("Wild"),
            CardType::WildDrawFour => f.write_str("Wild Draw Four"),
        }
    }
}

/// A single card. Wild and Wild Draw Four always carry `Color::Wild`; every
/// other card type carries one of the four playable colors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub card_type: CardType,
}

impl Card {
    pub fn new(color: Color, card_type: CardType) -> Self {
        debug_assert_eq!(
            card_type.is_wild(),
            color == Color::Wild,
            "wild card types pair with the wild color only"
        );
        Self { color, card_type }
    }

    pub fn wild() -> Self {
        Self::new(Color::Wild, CardType::Wild)
    }

    pub fn wild_draw_four() -> Self {
        Self::new(Color::Wild, CardType::WildDrawFour)
    }

    pub fn is_wild(&self) -> bool {
        self.card_type.is_wild()
    }

    /// Whether the color and type pair up: wild types with the wild color,
    /// everything else with one of the four playable colors.
    pub fn is_well_formed(&self) -> bool {
        self.card_type.is_wild() == (self.color == Color::Wild)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wild() {
            write!(f, "{}", self.card_type)
        } else {
            write!(f, "{} {}", self.color, self.card_type)
        }
    }
}

/// Builds the 108-card catalog, unshuffled.
///
/// Per color: one 0, two of each 1-9, then two each of Skip, Reverse and
/// Draw Two. Four Wild and four Wild Draw Four close the deck.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(108);

    for &color in &Color::PLAYABLE {
        deck.push(Card::new(color, CardType::Number(0)));

        for number in 1..=9 {
            deck.push(Card::new(color, CardType::Number(number)));
            deck.push(Card::new(color, CardType::Number(number)));
        }

        for card_type in [CardType::Skip, CardType::Reverse, CardType::DrawTwo] {
            deck.push(Card::new(color, card_type));
            deck.push(Card::new(color, card_type));
        }
    }

    for _ in 0..4 {
        deck.push(Card::wild());
        deck.push(Card::wild_draw_four());
    }

    deck
}

/// Checks if `card` can be played on `top_card`.
///
/// Wild cards are always playable. A wild top card only accepts the declared
/// `active_color`; without one, nothing but another wild matches.
pub fn can_play_card(card: &Card, top_card: &Card, active_color: Option<Color>) -> bool {
    if card.is_wild() {
        return true;
    }

    if top_card.is_wild() {
        return active_color == Some(card.color);
    }

    card.color == top_card.color || card.card_type == top_card.card_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_standard_deck_composition() {
        let deck = standard_deck();
        assert_eq!(deck.len(), 108);

        let mut counts: HashMap<&Card, usize> = HashMap::new();
        for card in &deck {
            *counts.entry(card).or_default() += 1;
        }

        for color in Color::PLAYABLE {
            assert_eq!(counts[&Card::new(color, CardType::Number(0))], 1);
            for number in 1..=9 {
                assert_eq!(counts[&Card::new(color, CardType::Number(number))], 2);
            }
            assert_eq!(counts[&Card::new(color, CardType::Skip)], 2);
            assert_eq!(counts[&Card::new(color, CardType::Reverse)], 2);
            assert_eq!(counts[&Card::new(color, CardType::DrawTwo)], 2);
        }
        assert_eq!(counts[&Card::wild()], 4);
        assert_eq!(counts[&Card::wild_draw_four()], 4);
    }

    #[test]
    fn test_standard_deck_order_is_color_major() {
        let deck = standard_deck();
        assert_eq!(deck[0], Card::new(Color::Red, CardType::Number(0)));
        assert_eq!(deck[25], Card::new(Color::Yellow, CardType::Number(0)));
        assert_eq!(deck[100], Card::wild());
        assert_eq!(deck[107], Card::wild_draw_four());
    }

    #[test]
    fn test_wild_color_pairing() {
        for card in standard_deck() {
            assert_eq!(card.is_wild(), card.color == Color::Wild);
            assert!(card.is_well_formed());
        }

        let wild_three = Card {
            color: Color::Wild,
            card_type: CardType::Number(3),
        };
        let red_wild = Card {
            color: Color::Red,
            card_type: CardType::Wild,
        };
        assert!(!wild_three.is_well_formed());
        assert!(!red_wild.is_well_formed());
    }

    #[test]
    fn test_can_play_card() {
        let red_one = Card::new(Color::Red, CardType::Number(1));
        let blue_one = Card::new(Color::Blue, CardType::Number(1));
        let blue_skip = Card::new(Color::Blue, CardType::Skip);
        let green_skip = Card::new(Color::Green, CardType::Skip);
        let wild = Card::wild();

        // Same color
        assert!(can_play_card(&red_one, &red_one, None));
        // Same number, different color
        assert!(can_play_card(&red_one, &blue_one, None));
        // Same action, different color
        assert!(can_play_card(&blue_skip, &green_skip, None));
        // Nothing in common
        assert!(!can_play_card(&red_one, &green_skip, None));
        // Wild cards can be played on anything
        assert!(can_play_card(&wild, &red_one, None));
        assert!(can_play_card(&Card::wild_draw_four(), &green_skip, None));
    }

    #[test]
    fn test_wild_top_card_uses_active_color() {
        let top = Card::wild_draw_four();
        let green_five = Card::new(Color::Green, CardType::Number(5));
        let blue_three = Card::new(Color::Blue, CardType::Number(3));

        assert!(!can_play_card(&green_five, &top, Some(Color::Blue)));
        assert!(can_play_card(&blue_three, &top, Some(Color::Blue)));
        assert!(can_play_card(&Card::wild(), &top, Some(Color::Blue)));
        assert!(!can_play_card(&blue_three, &top, None));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Card::new(Color::Red, CardType::Number(7)).to_string(),
            "Red 7"
        );
        assert_eq!(
            Card::new(Color::Green, CardType::DrawTwo).to_string(),
            "Green Draw Two"
        );
        assert_eq!(Card::wild_draw_four().to_string(), "Wild Draw Four");
    }
}
