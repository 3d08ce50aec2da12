use super::card::{Card, Color};
use super::game::{Effect, GameError, TurnOutcome, UnoGame};
use super::player::Player;
use super::strategy::TurnChoice;
use serde::Serialize;
use std::io::{self, BufRead, BufReader, Write};
use thiserror::Error;

pub const RULES: &str = "\
UNO rules
  - Match the top card by color or by number/symbol.
  - Wild cards can be played on anything; the player then declares a color.
  - Skip: the next player loses their turn.
  - Reverse: play changes direction (with two players it works like Skip).
  - Draw Two: the next player draws 2 cards and loses their turn.
  - Wild Draw Four: declare a color; the next player draws 4 cards and loses their turn.
  - Instead of playing you may draw 2 cards and pass; with no playable card you must.
  - The first player to empty their hand wins.";

#[derive(Debug, Error)]
pub enum UiError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("input closed")]
    InputClosed,
    #[error("could not encode event: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per turn outcome.
    Json,
}

#[derive(Serialize)]
struct OutcomeLine<'a> {
    player: usize,
    top_card: &'a Card,
    #[serde(flatten)]
    outcome: &'a TurnOutcome,
}

#[derive(Serialize)]
struct OpeningLine<'a> {
    opening_card: &'a Card,
    effect: Option<&'a Effect>,
    next_player: usize,
}

pub struct ConsoleUI {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    format: OutputFormat,
}

impl ConsoleUI {
    pub fn new() -> Self {
        Self::with_streams(Box::new(BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    pub fn with_streams(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            input,
            output,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn read_line(&mut self) -> Result<String, UiError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(UiError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    pub fn display_rules(&mut self) -> Result<(), UiError> {
        writeln!(self.output, "{}", RULES)?;
        Ok(())
    }

    pub fn display_opening(&mut self, game: &UnoGame) -> Result<(), UiError> {
        if self.format == OutputFormat::Json {
            let line = OpeningLine {
                opening_card: game.top_card()?,
                effect: game.opening_effect(),
                next_player: game.current_player(),
            };
            writeln!(self.output, "{}", serde_json::to_string(&line)?)?;
            return Ok(());
        }
        writeln!(self.output, "Opening card: {}", game.top_card()?)?;
        if let Some(effect) = game.opening_effect() {
            let line = describe_effect(effect, game);
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    pub fn display_game_state(&mut self, game: &UnoGame) -> Result<(), UiError> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(self.output, "\n--- Game State ---")?;
        let current = game.current_player();
        let next = game.next_player();
        for player in game.players() {
            let marker = if player.id == current {
                ">"
            } else if player.id == next {
                "-"
            } else {
                " "
            };
            writeln!(
                self.output,
                "{} {:<12} {} cards",
                marker,
                player.name,
                player.hand.len()
            )?;
        }
        writeln!(self.output, "Direction: {:?}", game.direction())?;
        write!(self.output, "Top card: {}", game.top_card()?)?;
        match game.active_wild_color() {
            Some(color) => writeln!(self.output, " (color: {})", color)?,
            None => writeln!(self.output)?,
        }
        writeln!(
            self.output,
            "Deck cards remaining: {}",
            game.deck().cards_remaining()
        )?;
        Ok(())
    }

    /// Lists the hand numbered from 1, ticking the playable cards.
    pub fn display_player_hand(&mut self, player: &Player, legal: &[usize]) -> Result<(), UiError> {
        writeln!(self.output, "\n{}'s hand:", player.name)?;
        for (i, card) in player.hand.iter().enumerate() {
            let mark = if legal.contains(&i) { " *" } else { "" };
            writeln!(self.output, "{:>3}. {}{}", i + 1, card, mark)?;
        }
        Ok(())
    }

    /// Reads a play: a card number from 1 to `hand_len`, or 0 / `d` to draw two
    /// and pass. Re-prompts until the line parses.
    pub fn get_turn_choice(&mut self, hand_len: usize) -> Result<TurnChoice, UiError> {
        loop {
            write!(
                self.output,
                "Card to play (1-{}), or 0 to draw 2 and pass: ",
                hand_len
            )?;
            let line = self.read_line()?;
            if line.eq_ignore_ascii_case("d") {
                return Ok(TurnChoice::Draw);
            }
            match line.parse::<usize>() {
                Ok(0) => return Ok(TurnChoice::Draw),
                Ok(n) if n <= hand_len => return Ok(TurnChoice::Play(n - 1)),
                _ => writeln!(
                    self.output,
                    "Invalid input. Please enter a number from 0 to {}.",
                    hand_len
                )?,
            }
        }
    }

    pub fn choose_color(&mut self) -> Result<Color, UiError> {
        loop {
            writeln!(self.output, "Choose a color:")?;
            writeln!(self.output, "1. Red")?;
            writeln!(self.output, "2. Yellow")?;
            writeln!(self.output, "3. Green")?;
            writeln!(self.output, "4. Blue")?;
            write!(self.output, "Enter your choice: ")?;

            match self.read_line()?.as_str() {
                "1" => return Ok(Color::Red),
                "2" => return Ok(Color::Yellow),
                "3" => return Ok(Color::Green),
                "4" => return Ok(Color::Blue),
                _ => writeln!(self.output, "Invalid choice. Please enter 1, 2, 3, or 4.")?,
            }
        }
    }

    pub fn display_error(&mut self, error: &GameError) -> Result<(), UiError> {
        writeln!(self.output, "Error: {}. Please try again.", error)?;
        Ok(())
    }

    pub fn handle_outcome(
        &mut self,
        actor: usize,
        outcome: &TurnOutcome,
        game: &UnoGame,
    ) -> Result<(), UiError> {
        let top_card = game.top_card()?;
        if self.format == OutputFormat::Json {
            let line = OutcomeLine {
                player: actor,
                top_card,
                outcome,
            };
            writeln!(self.output, "{}", serde_json::to_string(&line)?)?;
            return Ok(());
        }

        let name = &game.players()[actor].name;
        match outcome.effect {
            Effect::DrewAndPassed { drawn } => {
                writeln!(self.output, "{} drew {} cards and passed.", name, drawn)?
            }
            _ => writeln!(self.output, "{} played {}.", name, top_card)?,
        }
        if !matches!(
            outcome.effect,
            Effect::None | Effect::DrewAndPassed { .. }
        ) {
            let line = describe_effect(&outcome.effect, game);
            writeln!(self.output, "{}", line)?;
        }

        if let Some(winner) = outcome.winner {
            writeln!(
                self.output,
                "\n{} has won the game!",
                game.players()[winner].name
            )?;
        }
        Ok(())
    }

    /// Final table, fewest cards first.
    pub fn display_standings(&mut self, game: &UnoGame) -> Result<(), UiError> {
        if self.format == OutputFormat::Json {
            let standings: Vec<_> = game
                .standings()
                .into_iter()
                .map(|id| (id, game.players()[id].hand.len()))
                .collect();
            writeln!(self.output, "{}", serde_json::to_string(&standings)?)?;
            return Ok(());
        }
        writeln!(self.output, "\n--- Final Standings ---")?;
        for (place, id) in game.standings().into_iter().enumerate() {
            let player = &game.players()[id];
            writeln!(
                self.output,
                "{}. {:<20} {:>3} cards",
                place + 1,
                player.name,
                player.hand.len()
            )?;
        }
        Ok(())
    }
}

impl Default for ConsoleUI {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_effect(effect: &Effect, game: &UnoGame) -> String {
    let name = |id: usize| game.players()[id].name.as_str();
    match effect {
        Effect::None => String::new(),
        Effect::Skip { skipped } => format!("{} is skipped!", name(*skipped)),
        Effect::Reverse { direction } => format!("Direction reversed, now {:?}.", direction),
        Effect::DrawTwo { target, drawn } => {
            format!("{} draws {} cards and loses their turn.", name(*target), drawn)
        }
        Effect::Wild { color: Some(color) } => format!("The color is now {}.", color),
        Effect::Wild { color: None } => String::new(),
        Effect::WildDrawFour {
            target,
            color,
            drawn,
        } => {
            let mut line = format!("{} draws {} cards and loses their turn.", name(*target), drawn);
            if let Some(color) = color {
                line.push_str(&format!(" The color is now {}.", color));
            }
            line
        }
        Effect::ColorChoicePending => "Waiting for a color.".to_string(),
        Effect::DrewAndPassed { drawn } => format!("Drew {} cards.", drawn),
    }
}
