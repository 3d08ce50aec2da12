use super::game::{Effect, TurnOutcome, UnoGame};
use super::strategy::{RandomStrategy, Strategy, TurnChoice};
use super::ui::{ConsoleUI, UiError};
use log::{info, warn};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Let the strategy play the human seat too.
    pub autoplay: bool,
    /// Pause before each computer move, for the humans watching.
    pub think_delay: Duration,
    pub max_turns: Option<usize>,
}

pub struct GameController {
    game: UnoGame,
    ui: ConsoleUI,
    strategy: Box<dyn Strategy>,
    options: ControllerOptions,
}

impl GameController {
    pub fn new(game: UnoGame, ui: ConsoleUI, options: ControllerOptions) -> Self {
        Self {
            game,
            ui,
            strategy: Box::new(RandomStrategy),
            options,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn game(&self) -> &UnoGame {
        &self.game
    }

    /// Runs the game to the end and returns the winner, or `None` when the
    /// turn limit ran out first.
    pub fn run(&mut self) -> Result<Option<usize>, UiError> {
        self.ui.display_opening(&self.game)?;

        let mut turns = 0;
        while !self.game.is_over() {
            if self.options.max_turns.is_some_and(|limit| turns >= limit) {
                warn!("Stopping after {} turns without a winner", turns);
                break;
            }

            self.ui.display_game_state(&self.game)?;
            let actor = self.game.current_player();
            let outcome = if self.game.players()[actor].is_computer || self.options.autoplay {
                if !self.options.think_delay.is_zero() {
                    thread::sleep(self.options.think_delay);
                }
                self.game.play_computer_turn(self.strategy.as_mut())?
            } else {
                self.human_turn(actor)?
            };
            self.ui.handle_outcome(actor, &outcome, &self.game)?;
            turns += 1;
        }

        if let Some(winner) = self.game.winner() {
            info!(
                "Game finished after {} turns, won by {}",
                turns,
                self.game.players()[winner].name
            );
            self.ui.display_standings(&self.game)?;
        }
        Ok(self.game.winner())
    }

    /// Prompts until the human makes an accepted move.
    fn human_turn(&mut self, actor: usize) -> Result<TurnOutcome, UiError> {
        loop {
            let legal = self.game.legal_play_indices(actor)?;
            let player = &self.game.players()[actor];
            self.ui.display_player_hand(player, &legal)?;

            let result = match self.ui.get_turn_choice(player.hand.len())? {
                TurnChoice::Play(index) => self.game.play(actor, index),
                TurnChoice::Draw => self.game.draw_and_skip(actor),
            };

            match result {
                Ok(outcome) if outcome.effect == Effect::ColorChoicePending => {
                    return self.human_color_choice(actor)
                }
                Ok(outcome) => return Ok(outcome),
                Err(e) => self.ui.display_error(&e)?,
            }
        }
    }

    fn human_color_choice(&mut self, actor: usize) -> Result<TurnOutcome, UiError> {
        loop {
            let color = self.ui.choose_color()?;
            match self.game.choose_color(actor, color) {
                Ok(outcome) => return Ok(outcome),
                Err(e) => self.ui.display_error(&e)?,
            }
        }
    }
}
