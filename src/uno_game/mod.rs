pub mod card;
pub mod controller;
pub mod deck;
pub mod game;
pub mod player;
pub mod strategy;
pub mod ui;

pub use card::{can_play_card, standard_deck, Card, CardType, Color};
pub use controller::{ControllerOptions, GameController};
pub use deck::Deck;
pub use game::{
    Direction, Effect, GameConfig, GameError, GameSnapshot, PlayerSnapshot, Table, TurnOutcome,
    TurnState, UnoGame,
};
pub use player::Player;
pub use strategy::{majority_color, FirstLegalStrategy, RandomStrategy, Strategy, TurnChoice};
pub use ui::{ConsoleUI, OutputFormat, UiError};
