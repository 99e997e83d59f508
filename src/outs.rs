use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card_set::{binomial, CardSet};
use crate::constants::BOARD_CARDS;
use crate::error::{Error, Result};
use crate::evaluator::{Evaluator, HandCategory};
use crate::simulation::{master_rng, run_trials_with_rng, CancelToken, SimulationConfig, Tally};

/// A board stage still to come
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Street {
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 3] = [Street::Flop, Street::Turn, Street::River];

    /// board size once this street is dealt
    pub const fn board_size(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutsConfig {
    /// enumerate every completion up to this many, sample above it
    pub max_enumerated: u64,
    pub samples: u64,
    pub seed: Option<u64>,
}

impl Default for OutsConfig {
    fn default() -> Self {
        OutsConfig {
            max_enumerated: 250_000,
            samples: 100_000,
            seed: None,
        }
    }
}

/// Percentage, 0 to 100, of completions ending in each category
pub type CategoryDistribution = BTreeMap<HandCategory, f64>;

pub type OutsReport = BTreeMap<Street, CategoryDistribution>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CategoryCounts([u64; 9]);

impl CategoryCounts {
    fn add(&mut self, category: HandCategory) {
        self.0[category.get_table_index()] += 1;
    }

    fn distribution(&self) -> Result<CategoryDistribution> {
        let total: u64 = self.0.iter().sum();
        if total == 0 {
            return Err(Error::DegenerateInput("no board completion was counted"));
        }
        Ok(HandCategory::ALL
            .iter()
            .map(|&c| (c, self.0[c.get_table_index()] as f64 * 100.0 / total as f64))
            .collect())
    }
}

impl Tally for CategoryCounts {
    fn merge(&mut self, other: Self) {
        for (count, other) in self.0.iter_mut().zip(other.0.iter()) {
            *count += other;
        }
    }
}

/// Distribution of our final hand category on every street still to come
///
/// A street is enumerated exhaustively when it has at most
/// `config.max_enumerated` completions, otherwise `config.samples`
/// random completions are dealt. A complete board yields an empty report.
pub fn outs<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    config: &OutsConfig,
    cancel: &CancelToken,
) -> Result<OutsReport> {
    outs_with_rng(&mut master_rng(config.seed), evaluator, pocket, board, config, cancel)
}

/// `outs` with sampled streets dealt from a caller supplied rng
pub fn outs_with_rng<R: Rng, E: Evaluator + ?Sized>(
    rng: &mut R,
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    config: &OutsConfig,
    cancel: &CancelToken,
) -> Result<OutsReport> {
    if pocket.any_overlap(board) {
        return Err(Error::Precondition(
            "pocket and board share a card".to_string(),
        ));
    }
    if board.count() > BOARD_CARDS {
        return Err(Error::Precondition(format!(
            "a board has at most {} cards, got {}",
            BOARD_CARDS,
            board.count()
        )));
    }
    let dead = pocket | board;
    let live_cards = dead.complement();

    let mut report = OutsReport::new();
    for &street in Street::ALL.iter().filter(|s| s.board_size() > board.count()) {
        let to_come = street.board_size() - board.count();
        let n = dead.count() + to_come;
        let completions = binomial(live_cards.count(), to_come);

        let counts = if completions <= config.max_enumerated {
            let mut counts = CategoryCounts::default();
            for runout in live_cards.combinations(to_come) {
                counts.add(evaluator.category(dead | runout, n)?);
            }
            counts
        } else {
            let simulation = SimulationConfig::default().with_iterations(config.samples);
            run_trials_with_rng(&mut *rng, &simulation, cancel, |dealer, counts: &mut CategoryCounts| {
                let runout = dealer.draw_set(dead, to_come)?;
                counts.add(evaluator.category(dead | runout, n)?);
                Ok(())
            })?
        };
        log::debug!(
            "{} outs of {} on {}: {:?}",
            street,
            pocket,
            board,
            counts
        );
        report.insert(street, counts.distribution()?);
    }
    Ok(report)
}
