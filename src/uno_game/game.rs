use super::card::{can_play_card, Card, CardType, Color};
use super::deck::Deck;
use super::player::Player;
use super::strategy::{Strategy, TurnChoice};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HAND_SIZE: usize = 8;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Errors returned by game commands. None of them is fatal: the game state is
/// left untouched and the caller can simply ask again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("card {index} cannot be played on the current top card")]
    IllegalCard { index: usize },
    #[error("card index {index} is out of range")]
    IndexOutOfRange { index: usize },
    #[error("player index {0} is out of range")]
    InvalidPlayer(usize),
    #[error("{0} cannot be declared as the active color")]
    InvalidColor(Color),
    #[error("no color choice is pending")]
    NoColorChoicePending,
    #[error("waiting for a color to be chosen")]
    ColorChoicePending,
    #[error("it is player {expected}'s turn, not player {actual}'s")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("no cards left to draw")]
    DeckExhausted,
    #[error("the discard pile is empty")]
    EmptyDiscardPile,
    #[error("game is already over")]
    GameOver,
    #[error("a game needs 2 to 6 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("invalid table: {0}")]
    InvalidTable(&'static str),
}

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub num_players: usize,
    pub human_name: String,
    /// Seeds the game's random source; `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidPlayerCount(num_players));
        }
        Ok(Self {
            num_players,
            ..Self::default()
        })
    }

    pub fn with_human_name(mut self, name: impl Into<String>) -> Self {
        self.human_name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            human_name: "You".to_string(),
            seed: None,
        }
    }
}

/// Represents the direction of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn reverse(&self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// The decision the game is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    AwaitingPlay { player: usize },
    /// `player` just played a wild card and must declare a color before its
    /// effect is resolved.
    AwaitingColor { player: usize, card_type: CardType },
    Won { player: usize },
}

/// What a command did to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    None,
    Skip {
        skipped: usize,
    },
    Reverse {
        direction: Direction,
    },
    DrawTwo {
        target: usize,
        drawn: usize,
    },
    /// `color` is `None` only when the wild card ended the game.
    Wild {
        color: Option<Color>,
    },
    WildDrawFour {
        target: usize,
        color: Option<Color>,
        drawn: usize,
    },
    ColorChoicePending,
    DrewAndPassed {
        drawn: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub effect: Effect,
    pub next_player: usize,
    pub winner: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: usize,
    pub name: String,
    pub hand_size: usize,
    pub is_computer: bool,
}

/// Read-only view of the public table, for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: TurnState,
    pub current_player: usize,
    pub next_player: usize,
    pub direction: Direction,
    pub top_card: Card,
    pub active_wild_color: Option<Color>,
    pub draw_pile_count: usize,
    pub discard_pile_count: usize,
    pub players: Vec<PlayerSnapshot>,
}

/// An explicit table layout to start a game from, instead of dealing.
#[derive(Debug, Clone)]
pub struct Table {
    pub players: Vec<Player>,
    pub deck: Deck,
    pub current_player: usize,
    pub direction: Direction,
    pub active_wild_color: Option<Color>,
}

impl Table {
    pub fn new(players: Vec<Player>, deck: Deck) -> Self {
        Self {
            players,
            deck,
            current_player: 0,
            direction: Direction::Clockwise,
            active_wild_color: None,
        }
    }
}

#[derive(Debug)]
pub struct UnoGame {
    players: Vec<Player>,
    deck: Deck,
    current_turn: usize,
    direction: Direction,
    active_color: Option<Color>,
    state: TurnState,
    opening_effect: Option<Effect>,
    rng: StdRng,
}

impl UnoGame {
    /// Shuffles a fresh deck, seats one human and `num_players - 1` computer
    /// players, deals and turns over the opening card.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut rng = Self::rng_for(&config);
        let deck = Deck::shuffled(&mut rng);
        Self::deal(Self::seat_players(&config)?, deck, rng)
    }

    /// Like [`UnoGame::new`] but deals from `cards` as given, top of the pile
    /// last, without shuffling first.
    pub fn with_deck(config: GameConfig, cards: Vec<Card>) -> Result<Self, GameError> {
        if !cards.iter().all(Card::is_well_formed) {
            return Err(GameError::InvalidTable("a card pairs the wrong color and type"));
        }
        let rng = Self::rng_for(&config);
        Self::deal(Self::seat_players(&config)?, Deck::new(cards), rng)
    }

    /// Resumes play from an explicit table layout.
    pub fn from_table(table: Table, seed: u64) -> Result<Self, GameError> {
        let Table {
            players,
            deck,
            current_player,
            direction,
            active_wild_color,
        } = table;

        Self::check_player_count(players.len())?;
        if players.iter().enumerate().any(|(index, p)| p.id != index) {
            return Err(GameError::InvalidTable("player ids must match seat order"));
        }
        if players.iter().any(Player::has_won) {
            return Err(GameError::InvalidTable("every player needs at least one card"));
        }
        if current_player >= players.len() {
            return Err(GameError::InvalidPlayer(current_player));
        }
        let well_formed = players
            .iter()
            .flat_map(|p| p.hand.iter())
            .chain(deck.draw_pile())
            .chain(deck.discard_pile())
            .all(Card::is_well_formed);
        if !well_formed {
            return Err(GameError::InvalidTable("a card pairs the wrong color and type"));
        }

        let top_card = deck.top_card()?;
        match active_wild_color {
            Some(color) if !color.is_playable() => return Err(GameError::InvalidColor(color)),
            Some(_) if !top_card.is_wild() => {
                return Err(GameError::InvalidTable(
                    "an active color needs a wild top card",
                ))
            }
            None if top_card.is_wild() => {
                return Err(GameError::InvalidTable("a wild top card needs an active color"))
            }
            _ => {}
        }

        Ok(Self {
            players,
            deck,
            current_turn: current_player,
            direction,
            active_color: active_wild_color,
            state: TurnState::AwaitingPlay {
                player: current_player,
            },
            opening_effect: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn rng_for(config: &GameConfig) -> StdRng {
        match config.seed {
            Some(seed) => {
                debug!("Seeding game with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        }
    }

    fn check_player_count(count: usize) -> Result<(), GameError> {
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            Ok(())
        } else {
            Err(GameError::InvalidPlayerCount(count))
        }
    }

    fn seat_players(config: &GameConfig) -> Result<Vec<Player>, GameError> {
        Self::check_player_count(config.num_players)?;
        let mut players = vec![Player::human(0, config.human_name.clone())];
        players.extend((1..config.num_players).map(Player::computer));
        Ok(players)
    }

    fn deal(mut players: Vec<Player>, mut deck: Deck, mut rng: StdRng) -> Result<Self, GameError> {
        // Each player takes their whole hand before the next one is served.
        for player in players.iter_mut() {
            for _ in 0..HAND_SIZE {
                player.add_card(deck.draw(&mut rng)?);
            }
        }

        let mut opening = deck.draw(&mut rng)?;
        while opening.is_wild() {
            if deck.draw_pile().iter().all(Card::is_wild) {
                return Err(GameError::InvalidTable("no non-wild card left to open with"));
            }
            deck.return_to_draw_pile(opening);
            deck.shuffle(&mut rng);
            opening = deck.draw(&mut rng)?;
        }

        info!(
            "Dealt {} cards to {} players, opening card is {}",
            HAND_SIZE,
            players.len(),
            opening
        );

        let opening_type = opening.card_type;
        deck.discard(opening);

        let mut game = Self {
            players,
            deck,
            current_turn: 0,
            direction: Direction::Clockwise,
            active_color: None,
            state: TurnState::AwaitingPlay { player: 0 },
            opening_effect: None,
            rng,
        };

        game.opening_effect = game.resolve_opening(opening_type);
        game.state = TurnState::AwaitingPlay {
            player: game.current_turn,
        };

        Ok(game)
    }

    /// Applies an opening action card as if the first player had played it.
    ///
    /// Nobody actually played it, so the turn does not pass afterwards: a
    /// Reverse leaves the first player to start against the new direction.
    fn resolve_opening(&mut self, card_type: CardType) -> Option<Effect> {
        let effect = match card_type {
            CardType::Skip => {
                self.advance();
                let skipped = self.current_turn;
                self.advance();
                Effect::Skip { skipped }
            }
            CardType::Reverse => {
                self.direction = self.direction.reverse();
                if self.players.len() == 2 {
                    self.advance();
                }
                Effect::Reverse {
                    direction: self.direction,
                }
            }
            CardType::DrawTwo => {
                self.advance();
                let target = self.current_turn;
                let drawn = self.draw_cards(target, 2);
                self.advance();
                Effect::DrawTwo { target, drawn }
            }
            _ => return None,
        };
        Some(effect)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_hands(&self) -> Vec<&[Card]> {
        self.players.iter().map(|p| p.hand.as_slice()).collect()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn top_card(&self) -> Result<&Card, GameError> {
        self.deck.top_card()
    }

    /// The declared color; set exactly while the top card is wild and play
    /// is awaiting a card. A wild card that ends the game declares nothing.
    pub fn active_wild_color(&self) -> Option<Color> {
        self.active_color
    }

    pub fn current_player(&self) -> usize {
        self.current_turn
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn opening_effect(&self) -> Option<&Effect> {
        self.opening_effect.as_ref()
    }

    pub fn winner(&self) -> Option<usize> {
        match self.state {
            TurnState::Won { player } => Some(player),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// The seat that would act after the current one.
    pub fn next_player(&self) -> usize {
        self.seat_after(self.current_turn)
    }

    fn seat_after(&self, seat: usize) -> usize {
        let num_players = self.players.len();
        match self.direction {
            Direction::Clockwise => (seat + 1) % num_players,
            Direction::CounterClockwise => (seat + num_players - 1) % num_players,
        }
    }

    /// Player ids ordered by cards left, fewest first.
    pub fn standings(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by_key(|&id| self.players[id].hand.len());
        order
    }

    /// Indices into `player_id`'s hand that may be played on the current top card.
    pub fn legal_play_indices(&self, player_id: usize) -> Result<Vec<usize>, GameError> {
        let player = self
            .players
            .get(player_id)
            .ok_or(GameError::InvalidPlayer(player_id))?;
        // Nothing is playable until the game resumes.
        if !matches!(self.state, TurnState::AwaitingPlay { .. }) {
            return Ok(Vec::new());
        }

        let top_card = self.deck.top_card()?;
        Ok(player
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| can_play_card(card, top_card, self.active_color))
            .map(|(index, _)| index)
            .collect())
    }

    pub fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        Ok(GameSnapshot {
            state: self.state,
            current_player: self.current_turn,
            next_player: self.next_player(),
            direction: self.direction,
            top_card: self.deck.top_card()?.clone(),
            active_wild_color: self.active_color,
            draw_pile_count: self.deck.draw_pile().len(),
            discard_pile_count: self.deck.discard_pile().len(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    hand_size: p.hand.len(),
                    is_computer: p.is_computer,
                })
                .collect(),
        })
    }

    /// Plays card `card_index` from `player_id`'s hand.
    ///
    /// Wild cards stop in [`TurnState::AwaitingColor`] until
    /// [`UnoGame::choose_color`] is called; everything else is resolved at once.
    pub fn play(&mut self, player_id: usize, card_index: usize) -> Result<TurnOutcome, GameError> {
        self.ensure_turn(player_id)?;

        let card = self.players[player_id]
            .hand
            .get(card_index)
            .ok_or(GameError::IndexOutOfRange { index: card_index })?;
        if !can_play_card(card, self.deck.top_card()?, self.active_color) {
            return Err(GameError::IllegalCard { index: card_index });
        }

        let card = self.players[player_id].remove_card(card_index)?;
        debug!("{} played {}", self.players[player_id].name, card);
        let card_type = card.card_type;
        self.deck.discard(card);
        self.active_color = None;

        let hand_emptied = self.players[player_id].has_won();
        if card_type.is_wild() && !hand_emptied {
            self.state = TurnState::AwaitingColor {
                player: player_id,
                card_type,
            };
            return Ok(TurnOutcome {
                effect: Effect::ColorChoicePending,
                next_player: player_id,
                winner: None,
            });
        }

        let effect = self.resolve_effect(card_type, None);
        if hand_emptied {
            return Ok(self.declare_winner(player_id, effect));
        }
        self.state = TurnState::AwaitingPlay {
            player: self.current_turn,
        };
        Ok(self.outcome(effect))
    }

    /// Declares the color for a wild card just played by `player_id`, then
    /// resolves the card.
    pub fn choose_color(
        &mut self,
        player_id: usize,
        color: Color,
    ) -> Result<TurnOutcome, GameError> {
        if player_id >= self.players.len() {
            return Err(GameError::InvalidPlayer(player_id));
        }
        let card_type = match self.state {
            TurnState::AwaitingColor { player, card_type } if player == player_id => card_type,
            TurnState::AwaitingColor { player, .. } => {
                return Err(GameError::NotPlayersTurn {
                    expected: player,
                    actual: player_id,
                })
            }
            TurnState::AwaitingPlay { .. } => return Err(GameError::NoColorChoicePending),
            TurnState::Won { .. } => return Err(GameError::GameOver),
        };
        if !color.is_playable() {
            return Err(GameError::InvalidColor(color));
        }

        debug!("{} chose {}", self.players[player_id].name, color);
        self.active_color = Some(color);
        let effect = self.resolve_effect(card_type, Some(color));
        self.state = TurnState::AwaitingPlay {
            player: self.current_turn,
        };
        Ok(self.outcome(effect))
    }

    /// Draws two cards for `player_id` and passes the turn. Allowed whether or
    /// not the player holds a legal card.
    pub fn draw_and_skip(&mut self, player_id: usize) -> Result<TurnOutcome, GameError> {
        self.ensure_turn(player_id)?;

        let drawn = self.draw_cards(player_id, 2);
        self.advance();
        self.state = TurnState::AwaitingPlay {
            player: self.current_turn,
        };
        Ok(self.outcome(Effect::DrewAndPassed { drawn }))
    }

    /// Lets `strategy` take the pending decision for whoever is to act,
    /// including the color choice after a wild card.
    pub fn play_computer_turn(
        &mut self,
        strategy: &mut dyn Strategy,
    ) -> Result<TurnOutcome, GameError> {
        let player_id = match self.state {
            TurnState::AwaitingPlay { player } => player,
            TurnState::AwaitingColor { player, .. } => {
                let color = strategy.choose_color(&self.players[player].hand, &mut self.rng);
                return self.choose_color(player, color);
            }
            TurnState::Won { .. } => return Err(GameError::GameOver),
        };

        let legal = self.legal_play_indices(player_id)?;
        let choice = strategy.choose_play(&self.players[player_id].hand, &legal, &mut self.rng);
        let outcome = match choice {
            TurnChoice::Play(index) => self.play(player_id, index)?,
            TurnChoice::Draw => self.draw_and_skip(player_id)?,
        };

        if let TurnState::AwaitingColor { player, .. } = self.state {
            let color = strategy.choose_color(&self.players[player].hand, &mut self.rng);
            return self.choose_color(player, color);
        }
        Ok(outcome)
    }

    fn ensure_turn(&self, player_id: usize) -> Result<(), GameError> {
        if player_id >= self.players.len() {
            return Err(GameError::InvalidPlayer(player_id));
        }
        match self.state {
            TurnState::Won { .. } => Err(GameError::GameOver),
            TurnState::AwaitingColor { .. } => Err(GameError::ColorChoicePending),
            TurnState::AwaitingPlay { player } if player != player_id => {
                Err(GameError::NotPlayersTurn {
                    expected: player,
                    actual: player_id,
                })
            }
            TurnState::AwaitingPlay { .. } => Ok(()),
        }
    }

    /// Updates the current turn based on the direction of play.
    fn advance(&mut self) {
        self.current_turn = self.seat_after(self.current_turn);
    }

    /// Applies the card's effect for the player at `current_turn` and moves
    /// the turn on, past any player whose turn the card forfeits.
    fn resolve_effect(&mut self, card_type: CardType, color: Option<Color>) -> Effect {
        match card_type {
            CardType::Number(_) => {
                self.advance();
                Effect::None
            }
            CardType::Skip => {
                self.advance();
                let skipped = self.current_turn;
                self.advance();
                Effect::Skip { skipped }
            }
            CardType::Reverse => {
                self.direction = self.direction.reverse();
                // Heads-up, reversing hands the turn straight back.
                if self.players.len() == 2 {
                    self.advance();
                }
                self.advance();
                Effect::Reverse {
                    direction: self.direction,
                }
            }
            CardType::DrawTwo => {
                self.advance();
                let target = self.current_turn;
                let drawn = self.draw_cards(target, 2);
                self.advance();
                Effect::DrawTwo { target, drawn }
            }
            CardType::Wild => {
                self.advance();
                Effect::Wild { color }
            }
            CardType::WildDrawFour => {
                self.advance();
                let target = self.current_turn;
                let drawn = self.draw_cards(target, 4);
                self.advance();
                Effect::WildDrawFour {
                    target,
                    color,
                    drawn,
                }
            }
        }
    }

    /// Draws up to `count` cards into a hand and returns how many arrived.
    fn draw_cards(&mut self, player_id: usize, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            match self.deck.draw(&mut self.rng) {
                Ok(card) => {
                    self.players[player_id].add_card(card);
                    drawn += 1;
                }
                Err(e) => {
                    warn!(
                        "{} drew only {} of {} cards: {}",
                        self.players[player_id].name, drawn, count, e
                    );
                    break;
                }
            }
        }
        debug!("{} drew {} cards", self.players[player_id].name, drawn);
        drawn
    }

    fn declare_winner(&mut self, player_id: usize, effect: Effect) -> TurnOutcome {
        info!("{} has won the game", self.players[player_id].name);
        self.current_turn = player_id;
        self.state = TurnState::Won { player: player_id };
        TurnOutcome {
            effect,
            next_player: player_id,
            winner: Some(player_id),
        }
    }

    fn outcome(&self, effect: Effect) -> TurnOutcome {
        TurnOutcome {
            effect,
            next_player: self.current_turn,
            winner: None,
        }
    }
}
