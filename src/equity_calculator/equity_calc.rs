use rand::Rng;

use crate::card_set::CardSet;
use crate::constants::BOARD_CARDS;
use crate::error::{Error, Result};
use crate::evaluator::{Evaluator, Score};
use crate::simulation::{master_rng, run_trials_with_rng, CancelToken, SimulationConfig};
use crate::standing::{Standing, StandingTally};

const FLOP_CARDS: usize = 3;

/// Runs a monte carlo simulation to estimate our showdown equity
///
/// Every trial deals each opponent two cards and completes the board,
/// then compares our best hand with the best opponent hand. Ties count
/// as half a win.
///
/// # Arguments
///
/// * `pocket` Our hole cards
/// * `board` Public cards, 0 to 5 of them
/// * `opponents` Number of random opponent hands
/// * `config` Trial count, threads and seed
///
/// # Example
/// ```
/// use poker_odds::{CardSet, LookupEvaluator};
/// use poker_odds::equity_calculator::calc_equity;
/// use poker_odds::simulation::{CancelToken, SimulationConfig};
/// let pocket = CardSet::from_text("AsAd").unwrap();
/// let config = SimulationConfig::default().with_iterations(1000).with_threads(2);
/// let equity = calc_equity(&LookupEvaluator, pocket, CardSet::empty(), 1, &config, &CancelToken::new()).unwrap();
/// assert!(equity > 0.7);
/// ```
pub fn calc_equity<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    opponents: usize,
    config: &SimulationConfig,
    cancel: &CancelToken,
) -> Result<f64> {
    let mut rng = master_rng(config.seed);
    calc_equity_with_rng(&mut rng, evaluator, pocket, board, opponents, config, cancel)
}

/// `calc_equity` dealt from a caller supplied rng, `config.seed` is ignored
pub fn calc_equity_with_rng<R: Rng, E: Evaluator + ?Sized>(
    rng: &mut R,
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
    opponents: usize,
    config: &SimulationConfig,
    cancel: &CancelToken,
) -> Result<f64> {
    check_input(pocket, board)?;
    if opponents == 0 {
        return Err(Error::Precondition(
            "equity needs at least one opponent".to_string(),
        ));
    }
    let dead = pocket | board;
    let mut sizes = vec![2; opponents];
    sizes.push(BOARD_CARDS - board.count());
    // fail before spawning anything when the deck can't cover a deal
    let remaining = dead.complement().count();
    let requested: usize = sizes.iter().sum();
    if requested > remaining {
        return Err(Error::ExhaustedDeck {
            requested,
            remaining,
        });
    }

    let tally: StandingTally = run_trials_with_rng(rng, config, cancel, |dealer, tally: &mut StandingTally| {
        let sets = dealer.draw_disjoint_sets(dead, &sizes)?;
        let (hole_cards, runout) = sets.split_at(opponents);
        let full_board = board | runout[0];
        let ours = best_score(evaluator, pocket | full_board)?;
        let mut best_opponent: Score = 0;
        for &cards in hole_cards {
            best_opponent = best_opponent.max(best_score(evaluator, cards | full_board)?);
        }
        tally.add(Standing::compare(ours, best_opponent), 1.0);
        Ok(())
    })?;

    let equity = tally
        .strength()
        .ok_or(Error::DegenerateInput("no trials were run"))?;
    log::debug!(
        "equity of {} on {} against {} opponents over {} trials: {:.4}",
        pocket,
        board,
        opponents,
        tally.total(),
        equity
    );
    Ok(equity)
}

/// Calculates exact equity against one random opponent
///
/// Enumerates every opponent hand and every board completion, so it
/// needs at least the flop to finish in reasonable time.
pub fn exact_equity<E: Evaluator + ?Sized>(
    evaluator: &E,
    pocket: CardSet,
    board: CardSet,
) -> Result<f64> {
    check_input(pocket, board)?;
    if board.count() < FLOP_CARDS {
        return Err(Error::Precondition(format!(
            "exact equity needs at least the flop, got {} board cards",
            board.count()
        )));
    }
    let live_cards = (pocket | board).complement();
    let to_come = BOARD_CARDS - board.count();

    let mut tally = StandingTally::default();
    for hole_cards in live_cards.combinations(2) {
        for runout in (live_cards - hole_cards).combinations(to_come) {
            let full_board = board | runout;
            let standing = Standing::compare(
                best_score(evaluator, pocket | full_board)?,
                best_score(evaluator, hole_cards | full_board)?,
            );
            tally.add(standing, 1.0);
        }
    }
    tally
        .strength()
        .ok_or(Error::DegenerateInput("no opponent hand is possible"))
}

fn check_input(pocket: CardSet, board: CardSet) -> Result<()> {
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
    Ok(())
}

fn best_score<E: Evaluator + ?Sized>(evaluator: &E, cards: CardSet) -> Result<Score> {
    evaluator.score(cards, cards.count())
}
