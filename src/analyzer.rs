use std::cmp::Ordering;

use crate::card_set::CardSet;
use crate::dealer;
use crate::equity_calculator::calc_equity;
use crate::error::{ParseError, Result};
use crate::evaluator::{Evaluator, HandCategory, LookupEvaluator, Score};
use crate::hand_potential::{
    effective_hand_strength, hand_potential, EffectiveHandStrength, Potential, PotentialConfig,
};
use crate::hand_strength::{hand_strength, WeightTable};
use crate::outs::{outs, OutsConfig, OutsReport};
use crate::preflop;
use crate::simulation::{master_rng, CancelToken, SimulationConfig};
use crate::standing::Standing;

/// Hand analysis over card text
///
/// Wraps an evaluator and the engine configs. Every card argument is
/// text like `"AsAd"`; a card appearing twice across the arguments of
/// one call is a `ParseError::DuplicateCard`.
///
/// # Example
///
/// ```
/// use poker_odds::HandAnalyzer;
/// let analyzer = HandAnalyzer::new();
/// assert!(analyzer.hand_strength("AsAd", "5s7d8c", 1).unwrap() > 0.9);
/// assert_eq!(analyzer.abbreviate("TcJh").unwrap(), "JTo");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HandAnalyzer<E = LookupEvaluator> {
    evaluator: E,
    simulation: SimulationConfig,
    potential: PotentialConfig,
    outs: OutsConfig,
    cancel: CancelToken,
}

impl HandAnalyzer<LookupEvaluator> {
    pub fn new() -> Self {
        HandAnalyzer::default()
    }
}

impl<E: Evaluator> HandAnalyzer<E> {
    pub fn with_evaluator(evaluator: E) -> Self {
        HandAnalyzer {
            evaluator,
            simulation: SimulationConfig::default(),
            potential: PotentialConfig::default(),
            outs: OutsConfig::default(),
            cancel: CancelToken::default(),
        }
    }

    pub fn simulation(mut self, config: SimulationConfig) -> Self {
        self.simulation = config;
        self
    }

    pub fn potential(mut self, config: PotentialConfig) -> Self {
        self.potential = config;
        self
    }

    pub fn outs_config(mut self, config: OutsConfig) -> Self {
        self.outs = config;
        self
    }

    /// token checked by every sampled call made through this analyzer
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Chance of being ahead of `opponents` random hands right now
    pub fn hand_strength(&self, pocket: &str, board: &str, opponents: u32) -> Result<f64> {
        self.weighted_hand_strength(pocket, board, opponents, &WeightTable::new())
    }

    pub fn weighted_hand_strength(
        &self,
        pocket: &str,
        board: &str,
        opponents: u32,
        weights: &WeightTable,
    ) -> Result<f64> {
        let (pocket, board) = parse_hand(pocket, board)?;
        hand_strength(&self.evaluator, pocket, board, opponents, weights)
    }

    /// Positive and negative potential with a `lookahead` of 1 or 2 cards
    pub fn hand_potential(&self, pocket: &str, board: &str, lookahead: usize) -> Result<Potential> {
        let (pocket, board) = parse_hand(pocket, board)?;
        let config = PotentialConfig {
            lookahead,
            ..self.potential
        };
        hand_potential(&self.evaluator, pocket, board, &config, &self.cancel)
    }

    pub fn effective_hand_strength(
        &self,
        pocket: &str,
        board: &str,
        use_negative_potential: bool,
    ) -> Result<EffectiveHandStrength> {
        let (pocket, board) = parse_hand(pocket, board)?;
        effective_hand_strength(
            &self.evaluator,
            pocket,
            board,
            use_negative_potential,
            &self.potential,
            &self.cancel,
        )
    }

    /// Monte Carlo showdown equity against `opponents` random hands
    pub fn equity(&self, pocket: &str, board: &str, iterations: u64, opponents: usize) -> Result<f64> {
        let (pocket, board) = parse_hand(pocket, board)?;
        let config = self.simulation.with_iterations(iterations);
        calc_equity(&self.evaluator, pocket, board, opponents, &config, &self.cancel)
    }

    pub fn outs(&self, pocket: &str, board: &str) -> Result<OutsReport> {
        let (pocket, board) = parse_hand(pocket, board)?;
        outs(&self.evaluator, pocket, board, &self.outs, &self.cancel)
    }

    pub fn score_hand(&self, pocket: &str, board: &str) -> Result<Score> {
        let (pocket, board) = parse_hand(pocket, board)?;
        let cards = pocket | board;
        self.evaluator.score(cards, cards.count())
    }

    pub fn type_hand(&self, pocket: &str, board: &str) -> Result<HandCategory> {
        let (pocket, board) = parse_hand(pocket, board)?;
        let cards = pocket | board;
        self.evaluator.category(cards, cards.count())
    }

    /// `Greater` when the first hand wins on this board
    pub fn compare_hands(&self, first: &str, second: &str, board: &str) -> Result<Ordering> {
        let (first, board) = parse_hand(first, board)?;
        let second = CardSet::from_text(second)?;
        if let Some(card) = (second & (first | board)).iter().next() {
            return Err(ParseError::DuplicateCard(crate::card_set::card_to_text(card)).into());
        }
        let first = first | board;
        let second = second | board;
        let standing = Standing::compare(
            self.evaluator.score(first, first.count())?,
            self.evaluator.score(second, second.count())?,
        );
        Ok(standing.into())
    }

    /// Text of `n` random cards not among the dead cards
    pub fn random_cards_not_in(&self, dead: &str, n: usize) -> Result<String> {
        dealer::random_cards_not_in(&mut master_rng(self.simulation.seed), dead, n)
    }

    pub fn abbreviate(&self, pocket: &str) -> Result<String> {
        preflop::abbreviate(CardSet::from_text(pocket)?)
    }

    pub fn sklansky_group(&self, pocket: &str) -> Result<u8> {
        preflop::sklansky_group(CardSet::from_text(pocket)?)
    }
}

/// Parse pocket and board text, rejecting a card shared between them
pub fn parse_hand(pocket: &str, board: &str) -> Result<(CardSet, CardSet)> {
    let pocket = CardSet::from_text(pocket)?;
    let board = CardSet::from_text(board)?;
    if let Some(card) = (pocket & board).iter().next() {
        return Err(ParseError::DuplicateCard(crate::card_set::card_to_text(card)).into());
    }
    Ok((pocket, board))
}
