use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card_set::CardSet;
use crate::constants::{MAX_EVAL_CARDS, MIN_EVAL_CARDS};
use crate::error::{Error, Result};

/// Totally ordered hand score, higher is stronger, equal is a split
pub type Score = u16;

/// The nine hand classes, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    NoPair,
    OnePair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
}

impl HandCategory {
    pub const ALL: [HandCategory; 9] = [
        HandCategory::NoPair,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::Trips,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::Quads,
        HandCategory::StraightFlush,
    ];

    pub fn get_table_index(self) -> usize {
        self as usize
    }

    pub fn from_table_index(index: usize) -> Option<HandCategory> {
        HandCategory::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            HandCategory::NoPair => "NoPair",
            HandCategory::OnePair => "OnePair",
            HandCategory::TwoPair => "TwoPair",
            HandCategory::Trips => "Trips",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "FullHouse",
            HandCategory::Quads => "Quads",
            HandCategory::StraightFlush => "StraightFlush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of ranking a set of cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandRank {
    pub score: Score,
    pub category: HandCategory,
}

/// Ranks 5 to 7 card hands
///
/// Implementors only provide `evaluate`; callers go through `rank`,
/// `score` and `category`, which reject card counts the evaluator can't
/// handle before it is ever called.
pub trait Evaluator: Send + Sync {
    /// Rank the best five card hand among `cards`
    ///
    /// Only called with 5 to 7 cards.
    fn evaluate(&self, cards: CardSet) -> HandRank;

    /// Rank the best `n` card hand, `cards` must hold between `n` and 7 cards
    fn rank(&self, cards: CardSet, n: usize) -> Result<HandRank> {
        check_card_count(cards, n)?;
        Ok(self.evaluate(cards))
    }

    fn score(&self, cards: CardSet, n: usize) -> Result<Score> {
        Ok(self.rank(cards, n)?.score)
    }

    fn category(&self, cards: CardSet, n: usize) -> Result<HandCategory> {
        Ok(self.rank(cards, n)?.category)
    }
}

impl<'a, E: Evaluator + ?Sized> Evaluator for &'a E {
    fn evaluate(&self, cards: CardSet) -> HandRank {
        (**self).evaluate(cards)
    }
}

/// n must be 5, 6 or 7 and `cards` must have at least n and at most 7 cards
pub fn check_card_count(cards: CardSet, n: usize) -> Result<()> {
    if n < MIN_EVAL_CARDS || n > MAX_EVAL_CARDS {
        return Err(Error::Precondition(format!(
            "can only evaluate {} to {} cards, asked for {}",
            MIN_EVAL_CARDS, MAX_EVAL_CARDS, n
        )));
    }
    let count = cards.count();
    if count < n || count > MAX_EVAL_CARDS {
        return Err(Error::Precondition(format!(
            "asked for the best {} card hand of {} cards",
            n, count
        )));
    }
    Ok(())
}

/// Evaluator backed by the `hand_evaluator` lookup tables
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupEvaluator;

impl Evaluator for LookupEvaluator {
    fn evaluate(&self, cards: CardSet) -> HandRank {
        let hand = hand_evaluator::Hand::from_bit_mask(cards.mask());
        let score = hand_evaluator::evaluate(&hand);
        // table categories start at 1 for high card, 0 is a table miss
        let table_category = usize::from(hand_evaluator::category(score));
        debug_assert!(
            (1..=HandCategory::ALL.len()).contains(&table_category),
            "no table entry for {}",
            cards
        );
        let category = table_category
            .checked_sub(1)
            .and_then(HandCategory::from_table_index)
            .unwrap_or(HandCategory::NoPair);
        HandRank { score, category }
    }
}
