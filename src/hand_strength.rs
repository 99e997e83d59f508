use std::collections::HashMap;
use std::iter::FromIterator;

use crate::card_set::CardSet;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::standing::{Standing, StandingTally};

/// Relative likelihood of specific opponent hole cards
///
/// Hole cards missing from the table weigh 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable(HashMap<CardSet, f64>);

impl WeightTable {
    pub fn new() -> Self {
        WeightTable::default()
    }

    pub fn insert(&mut self, hole_cards: CardSet, weight: f64) {
        self.0.insert(hole_cards, weight);
    }

    pub fn get(&self, hole_cards: CardSet) -> f64 {
        self.0.get(&hole_cards).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(CardSet, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (CardSet, f64)>>(iter: I) -> Self {
        WeightTable(iter.into_iter().collect())
    }
}

/// Ahead/tied/behind weights of our hand against every live two card
/// opponent hand on this board
pub fn strength_tally<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    weights: &WeightTable,
) -> Result<StandingTally> {
    if pocket.any_overlap(board) {
        return Err(Error::Precondition(
            "pocket and board share a card".to_string(),
        ));
    }
    let ours = pocket | board;
    let our_score = evaluator.score(ours, ours.count())?;
    let opponent_n = board.count() + 2;

    let live_cards: Vec<u8> = ours.complement().iter().collect();
    let mut tally = StandingTally::default();
    for (i, &c1) in live_cards.iter().enumerate() {
        for &c2 in &live_cards[i + 1..] {
            let hole_cards = CardSet::from_card(c1) | CardSet::from_card(c2);
            let their_score = evaluator.score(hole_cards | board, opponent_n)?;
            let weight = if weights.is_empty() {
                1.0
            } else {
                weights.get(hole_cards)
            };
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::Precondition(format!(
                    "weight of {} must be finite and not negative, got {}",
                    hole_cards, weight
                )));
            }
            tally.add(Standing::compare(our_score, their_score), weight);
        }
    }
    Ok(tally)
}

/// Probability our hand is best against `opponents` random hands
///
/// Exact against one opponent: every live two card hand is enumerated,
/// weighted by `weights`. For several opponents the one opponent
/// strength is raised to the power `opponents`, which treats the
/// opponents as independent.
pub fn hand_strength<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    opponents: u32,
    weights: &WeightTable,
) -> Result<f64> {
    if opponents == 0 {
        return Err(Error::Precondition(
            "hand strength needs at least one opponent".to_string(),
        ));
    }
    let tally = strength_tally(evaluator, pocket, board, weights)?;
    let strength = tally
        .strength()
        .ok_or(Error::DegenerateInput("no opponent hand carries any weight"))?;
    let strength = strength.powf(f64::from(opponents));
    log::debug!(
        "hand strength of {} on {} against {} opponents: {:.4}",
        pocket,
        board,
        opponents,
        strength
    );
    Ok(strength)
}
