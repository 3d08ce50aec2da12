use super::card::{Card, Color};
use rand::seq::IndexedRandom;
use rand::RngCore;

/// What a player decides to do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnChoice {
    Play(usize),
    Draw,
}

/// Decision policy for computer-controlled seats.
///
/// `legal` holds the indices into `hand` that may be played right now. The
/// game's own random source is passed in so a seeded game stays reproducible.
pub trait Strategy {
    fn choose_play(&mut self, hand: &[Card], legal: &[usize], rng: &mut dyn RngCore) -> TurnChoice;

    fn choose_color(&mut self, hand: &[Card], rng: &mut dyn RngCore) -> Color;
}

/// The color held most often in `hand`; ties go to the earlier of
/// Red, Yellow, Green, Blue.
pub fn majority_color(hand: &[Card]) -> Color {
    let mut best = Color::Red;
    let mut best_count = 0;
    for color in Color::PLAYABLE {
        let count = hand.iter().filter(|card| card.color == color).count();
        if count > best_count {
            best = color;
            best_count = count;
        }
    }
    best
}

/// Plays a uniformly random legal card and draws when nothing fits.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn choose_play(
        &mut self,
        _hand: &[Card],
        legal: &[usize],
        rng: &mut dyn RngCore,
    ) -> TurnChoice {
        match legal.choose(rng) {
            Some(&index) => TurnChoice::Play(index),
            None => TurnChoice::Draw,
        }
    }

    fn choose_color(&mut self, hand: &[Card], _rng: &mut dyn RngCore) -> Color {
        majority_color(hand)
    }
}

/// Always plays the first legal card. Deterministic; used for replays and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalStrategy;

impl Strategy for FirstLegalStrategy {
    fn choose_play(
        &mut self,
        _hand: &[Card],
        legal: &[usize],
        _rng: &mut dyn RngCore,
    ) -> TurnChoice {
        legal
            .first()
            .map_or(TurnChoice::Draw, |&index| TurnChoice::Play(index))
    }

    fn choose_color(&mut self, hand: &[Card], _rng: &mut dyn RngCore) -> Color {
        majority_color(hand)
    }
}
