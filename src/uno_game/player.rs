use super::card::Card;
use super::game::GameError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub hand: Vec<Card>,
    pub is_computer: bool,
}

impl Player {
    pub fn new(id: usize, name: String, is_computer: bool) -> Self {
        Self {
            id,
            name,
            hand: Vec::new(),
            is_computer,
        }
    }

    pub fn human(id: usize, name: impl Into<String>) -> Self {
        Self::new(id, name.into(), false)
    }

    pub fn computer(id: usize) -> Self {
        Self::new(id, format!("Computer {}", id), true)
    }

    /// Replaces the hand; handy for laying out a table by hand.
    pub fn with_hand(mut self, hand: Vec<Card>) -> Self {
        self.hand = hand;
        self
    }

    /// Adds a card to the player's hand.
    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Removes a card from the player's hand at the specified index.
    /// Returns `Err(GameError::IndexOutOfRange)` if the index is out of bounds.
    pub fn remove_card(&mut self, card_index: usize) -> Result<Card, GameError> {
        if card_index < self.hand.len() {
            Ok(self.hand.remove(card_index))
        } else {
            Err(GameError::IndexOutOfRange { index: card_index })
        }
    }

    /// Checks if the player has won (i.e., their hand is empty).
    pub fn has_won(&self) -> bool {
        self.hand.is_empty()
    }
}
