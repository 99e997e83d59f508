use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card_set::CardSet;
use crate::constants::BOARD_CARDS;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::hand_strength::{hand_strength, WeightTable};
use crate::simulation::{master_rng, run_trials_with_rng, CancelToken, SimulationConfig, Tally};
use crate::standing::Standing;

const MAX_LOOKAHEAD: usize = 2;
const FLOP_CARDS: usize = 3;

/// What positive and negative potential are divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// by the trials that started in the matching state
    Conditional,
    /// by every trial
    TotalTrials,
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::Conditional
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotentialConfig {
    /// board cards to look ahead, 1 or 2
    pub lookahead: usize,
    pub normalization: Normalization,
    pub simulation: SimulationConfig,
}

impl Default for PotentialConfig {
    fn default() -> Self {
        PotentialConfig {
            lookahead: 1,
            normalization: Normalization::default(),
            simulation: SimulationConfig::default().with_iterations(1000),
        }
    }
}

/// Counts of current standing by standing once more board cards are out
///
/// Indexed `[current][next]` with `Standing::index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionMatrix([[u64; 3]; 3]);

impl TransitionMatrix {
    pub fn record(&mut self, current: Standing, next: Standing) {
        self.0[current.index()][next.index()] += 1;
    }

    pub fn get(&self, current: Standing, next: Standing) -> u64 {
        self.0[current.index()][next.index()]
    }

    pub fn row_total(&self, current: Standing) -> u64 {
        self.0[current.index()].iter().sum()
    }

    pub fn total(&self) -> u64 {
        Standing::ALL.iter().map(|&s| self.row_total(s)).sum()
    }

    pub fn potentials(&self, normalization: Normalization) -> Potential {
        let (behind, ahead) = match normalization {
            Normalization::Conditional => (
                self.row_total(Standing::Behind),
                self.row_total(Standing::Ahead),
            ),
            Normalization::TotalTrials => (self.total(), self.total()),
        };
        Potential {
            positive: ratio(self.get(Standing::Behind, Standing::Ahead), behind),
            negative: ratio(self.get(Standing::Ahead, Standing::Behind), ahead),
        }
    }
}

impl Tally for TransitionMatrix {
    fn merge(&mut self, other: Self) {
        for (row, other_row) in self.0.iter_mut().zip(other.0.iter()) {
            for (cell, other_cell) in row.iter_mut().zip(other_row.iter()) {
                *cell += other_cell;
            }
        }
    }
}

fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Potential {
    /// chance of moving from behind to ahead
    pub positive: f64,
    /// chance of moving from ahead to behind
    pub negative: f64,
}

/// Monte Carlo transition matrix against one random opponent
///
/// Each trial deals the opponent two cards and `lookahead` more board
/// cards, then records how the standing on the current board moves once
/// the new cards are out. A complete board has nothing left to deal and
/// yields an empty matrix.
pub fn transition_matrix<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    config: &PotentialConfig,
    cancel: &CancelToken,
) -> Result<TransitionMatrix> {
    let mut rng = master_rng(config.simulation.seed);
    transition_matrix_with_rng(&mut rng, evaluator, pocket, board, config, cancel)
}

/// `transition_matrix` dealt from a caller supplied rng
pub fn transition_matrix_with_rng<R: Rng, E: Evaluator + ?Sized>(
    rng: &mut R,
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    config: &PotentialConfig,
    cancel: &CancelToken,
) -> Result<TransitionMatrix> {
    if pocket.any_overlap(board) {
        return Err(Error::Precondition(
            "pocket and board share a card".to_string(),
        ));
    }
    if config.lookahead == 0 || config.lookahead > MAX_LOOKAHEAD {
        return Err(Error::Precondition(format!(
            "lookahead must be 1 or 2, got {}",
            config.lookahead
        )));
    }
    let board_count = board.count();
    if board_count < FLOP_CARDS || board_count > BOARD_CARDS {
        return Err(Error::Precondition(format!(
            "potential needs a board of 3 to 5 cards, got {}",
            board_count
        )));
    }
    let to_come = config.lookahead.min(BOARD_CARDS - board_count);
    if to_come == 0 {
        return Ok(TransitionMatrix::default());
    }

    let ours = pocket | board;
    let our_score = evaluator.score(ours, ours.count())?;
    let dead = ours;
    let sizes = [2, to_come];

    run_trials_with_rng(rng, &config.simulation, cancel, |dealer, matrix: &mut TransitionMatrix| {
        let sets = dealer.draw_disjoint_sets(dead, &sizes)?;
        let (opponent, runout) = (sets[0], sets[1]);

        let theirs = opponent | board;
        let current = Standing::compare(our_score, evaluator.score(theirs, theirs.count())?);

        let our_next = ours | runout;
        let their_next = theirs | runout;
        let next = Standing::compare(
            evaluator.score(our_next, our_next.count())?,
            evaluator.score(their_next, their_next.count())?,
        );
        matrix.record(current, next);
        Ok(())
    })
}

/// Positive and negative potential of our hand, `(0, 0)` on the river
pub fn hand_potential<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    config: &PotentialConfig,
    cancel: &CancelToken,
) -> Result<Potential> {
    let mut rng = master_rng(config.simulation.seed);
    hand_potential_with_rng(&mut rng, evaluator, pocket, board, config, cancel)
}

pub fn hand_potential_with_rng<R: Rng, E: Evaluator + ?Sized>(
    rng: &mut R,
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    config: &PotentialConfig,
    cancel: &CancelToken,
) -> Result<Potential> {
    let matrix = transition_matrix_with_rng(rng, evaluator, pocket, board, config, cancel)?;
    let potential = matrix.potentials(config.normalization);
    log::debug!(
        "potential of {} on {} over {} trials: {:?}",
        pocket,
        board,
        matrix.total(),
        potential
    );
    Ok(potential)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveHandStrength {
    pub ehs: f64,
    pub ppot: f64,
    /// zero unless negative potential was asked for
    pub npot: f64,
}

/// `hs * (1 - npot) + (1 - hs) * ppot` against one opponent
pub fn effective_hand_strength<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    use_negative_potential: bool,
    config: &PotentialConfig,
    cancel: &CancelToken,
) -> Result<EffectiveHandStrength> {
    let hs = hand_strength(evaluator, pocket, board, 1, &WeightTable::new())?;
    let potential = hand_potential(evaluator, pocket, board, config, cancel)?;
    let ppot = potential.positive;
    let npot = if use_negative_potential {
        potential.negative
    } else {
        0.0
    };
    Ok(EffectiveHandStrength {
        ehs: hs * (1.0 - npot) + (1.0 - hs) * ppot,
        ppot,
        npot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{HandCategory, HandRank, LookupEvaluator, Score};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn cards(text: &str) -> CardSet {
        CardSet::from_text(text).unwrap()
    }

    fn seeded(iterations: u64) -> PotentialConfig {
        PotentialConfig {
            simulation: SimulationConfig::default()
                .with_iterations(iterations)
                .with_seed(1234),
            ..PotentialConfig::default()
        }
    }

    /// scores every hand the same
    struct Constant;

    impl Evaluator for Constant {
        fn evaluate(&self, _cards: CardSet) -> HandRank {
            HandRank {
                score: 7,
                category: HandCategory::NoPair,
            }
        }
    }

    /// scores a hand 1 when it holds the given card, 0 otherwise
    struct Holds(u8);

    impl Evaluator for Holds {
        fn evaluate(&self, cards: CardSet) -> HandRank {
            HandRank {
                score: Score::from(cards.contains(self.0)),
                category: HandCategory::NoPair,
            }
        }
    }

    #[test]
    fn test_river_has_no_potential() {
        let potential = hand_potential(
            &LookupEvaluator,
            cards("2h3h"),
            cards("4h5h9cKsQd"),
            &PotentialConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(potential, Potential::default());
    }

    #[test]
    fn test_drawing_hand_has_positive_potential() {
        let potential = hand_potential(
            &LookupEvaluator,
            cards("2h3h"),
            cards("4h5h9c"),
            &seeded(4000),
            &CancelToken::new(),
        )
        .unwrap();
        assert!(potential.positive > 0.3, "{:?}", potential);
    }

    #[test]
    fn test_weak_pair_has_negative_potential() {
        let potential = hand_potential(
            &LookupEvaluator,
            cards("Td5s"),
            cards("4h5h9c"),
            &seeded(4000),
            &CancelToken::new(),
        )
        .unwrap();
        assert!(potential.negative > 0.08, "{:?}", potential);
    }

    #[test]
    fn test_matrix_counts_every_trial() {
        for &lookahead in &[1, 2] {
            let config = PotentialConfig {
                lookahead,
                ..seeded(777)
            };
            let matrix = transition_matrix(
                &LookupEvaluator,
                cards("AsKs"),
                cards("2s7d9h"),
                &config,
                &CancelToken::new(),
            )
            .unwrap();
            assert_eq!(matrix.total(), 777);
        }
    }

    #[test]
    fn test_constant_evaluator_always_ties() {
        let matrix = transition_matrix(
            &Constant,
            cards("AsKs"),
            cards("2s7d9h"),
            &seeded(300),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(matrix.get(Standing::Tied, Standing::Tied), 300);
        assert_eq!(matrix.total(), 300);
        assert_eq!(
            matrix.potentials(Normalization::Conditional),
            Potential::default()
        );
    }

    #[test]
    fn test_holding_key_card_always_ahead() {
        let pocket = cards("AsKs");
        let matrix = transition_matrix(
            &Holds(pocket.iter().next().unwrap()),
            pocket,
            cards("2s7d9h"),
            &seeded(300),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(matrix.get(Standing::Ahead, Standing::Ahead), 300);
    }

    /// scores a hand holding the key card 1 on the flop and 3 once more
    /// cards are out, every other hand 2
    struct Improves(u8);

    impl Evaluator for Improves {
        fn evaluate(&self, cards: CardSet) -> HandRank {
            let score = match (cards.contains(self.0), cards.count()) {
                (false, _) => 2,
                (true, n) if n <= 5 => 1,
                (true, _) => 3,
            };
            HandRank {
                score,
                category: HandCategory::NoPair,
            }
        }
    }

    #[test]
    fn test_behind_to_ahead_with_supplied_rng() {
        let pocket = cards("AsKs");
        let evaluator = Improves(pocket.iter().next().unwrap());
        let config = PotentialConfig::default();
        let mut rng = SmallRng::seed_from_u64(21);
        let matrix = transition_matrix_with_rng(
            &mut rng,
            &evaluator,
            pocket,
            cards("2s7d9h"),
            &config,
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(matrix.get(Standing::Behind, Standing::Ahead), 1000);
        assert_eq!(matrix.total(), 1000);

        let potential = hand_potential_with_rng(
            &mut rng,
            &evaluator,
            pocket,
            cards("2s7d9h"),
            &config,
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(potential, Potential { positive: 1.0, negative: 0.0 });
    }

    #[test]
    fn test_supplied_rng_matches_seed() {
        let config = seeded(500);
        let seeded = transition_matrix(
            &LookupEvaluator,
            cards("Td5s"),
            cards("4h5h9c"),
            &config,
            &CancelToken::new(),
        )
        .unwrap();
        let supplied = transition_matrix_with_rng(
            &mut SmallRng::seed_from_u64(1234),
            &LookupEvaluator,
            cards("Td5s"),
            cards("4h5h9c"),
            &config,
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(seeded, supplied);
    }

    #[test]
    fn test_normalization() {
        let mut matrix = TransitionMatrix::default();
        for _ in 0..3 {
            matrix.record(Standing::Behind, Standing::Ahead);
        }
        matrix.record(Standing::Behind, Standing::Behind);
        matrix.record(Standing::Ahead, Standing::Behind);
        for _ in 0..5 {
            matrix.record(Standing::Ahead, Standing::Ahead);
        }
        assert_eq!(matrix.total(), 10);

        let conditional = matrix.potentials(Normalization::Conditional);
        assert_eq!(conditional.positive, 0.75);
        assert!((conditional.negative - 1.0 / 6.0).abs() < 1e-12);

        let total = matrix.potentials(Normalization::TotalTrials);
        assert_eq!(total.positive, 0.3);
        assert_eq!(total.negative, 0.1);

        let mut merged = matrix;
        merged.merge(matrix);
        assert_eq!(merged.get(Standing::Behind, Standing::Ahead), 6);
        assert_eq!(merged.potentials(Normalization::Conditional), conditional);
    }

    #[test]
    fn test_rejects_bad_input() {
        let config = PotentialConfig::default();
        let cancel = CancelToken::new();
        assert!(hand_potential(&LookupEvaluator, cards("AsKs"), cards("As7d9h"), &config, &cancel).is_err());
        assert!(hand_potential(&LookupEvaluator, cards("AsKs"), CardSet::empty(), &config, &cancel).is_err());
        let config = PotentialConfig {
            lookahead: 3,
            ..config
        };
        assert!(hand_potential(&LookupEvaluator, cards("AsKs"), cards("2s7d9h"), &config, &cancel).is_err());
    }

    #[test]
    fn test_effective_hand_strength() {
        let config = seeded(2000);
        let cancel = CancelToken::new();
        let without = effective_hand_strength(
            &LookupEvaluator,
            cards("2h3h"),
            cards("4h5h9c"),
            false,
            &config,
            &cancel,
        )
        .unwrap();
        assert_eq!(without.npot, 0.0);
        let hs = hand_strength(
            &LookupEvaluator,
            cards("2h3h"),
            cards("4h5h9c"),
            1,
            &WeightTable::new(),
        )
        .unwrap();
        assert!((without.ehs - (hs + (1.0 - hs) * without.ppot)).abs() < 1e-12);

        let with = effective_hand_strength(
            &LookupEvaluator,
            cards("2h3h"),
            cards("4h5h9c"),
            true,
            &config,
            &cancel,
        )
        .unwrap();
        // same seed, same draws
        assert_eq!(with.ppot, without.ppot);
        assert!(with.ehs <= without.ehs);

        // on the river ehs is plain hand strength
        let river = effective_hand_strength(
            &LookupEvaluator,
            cards("AsAd"),
            cards("5s7d8c2h3c"),
            true,
            &config,
            &cancel,
        )
        .unwrap();
        let hs = hand_strength(
            &LookupEvaluator,
            cards("AsAd"),
            cards("5s7d8c2h3c"),
            1,
            &WeightTable::new(),
        )
        .unwrap();
        assert_eq!(river.ehs, hs);
    }

    #[test]
    fn test_config_from_json() {
        let config: PotentialConfig = serde_json::from_str(
            r#"{"lookahead": 2, "normalization": "TotalTrials", "simulation": {"iterations": 50}}"#,
        )
        .unwrap();
        assert_eq!(config.lookahead, 2);
        assert_eq!(config.normalization, Normalization::TotalTrials);
        assert_eq!(config.simulation.iterations, 50);
        assert_eq!(config.simulation.batch_size, 256);
    }
}
