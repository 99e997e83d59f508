use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::atomic::AtomicCell;
use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dealer::Dealer;
use crate::error::{Error, Result};

/// Per worker accumulator, merged by summation once every worker is done
pub trait Tally: Default + Send {
    fn merge(&mut self, other: Self);
}

/// How a Monte Carlo call is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// number of trials, split evenly across threads
    pub iterations: u64,
    pub threads: usize,
    /// trials between two cancellation checks
    pub batch_size: u64,
    /// fixed seed for reproducible runs, otherwise seeded from `thread_rng`
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            iterations: 500,
            threads: 1,
            batch_size: 256,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Stops a running simulation between trial batches
///
/// Clones share the same flag. A token built with a deadline also counts
/// as cancelled once the deadline has passed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    stopped: Arc<AtomicCell<bool>>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn with_deadline(timeout: Duration) -> Self {
        CancelToken {
            stopped: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.stopped.store(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load() || self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}

/// Rng seeded from `seed`, or from `thread_rng` when there is none
pub fn master_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::seed_from_u64(thread_rng().gen()),
    }
}

/// Runs `config.iterations` independent trials and sums their tallies
///
/// Each worker gets its own dealer seeded from the master rng and its own
/// tally. The first failing trial stops every worker and its error is
/// returned; a cancelled run returns `Error::Cancelled`, never a partial
/// tally.
pub fn run_trials<T, F>(config: &SimulationConfig, cancel: &CancelToken, trial: F) -> Result<T>
where
    T: Tally,
    F: Fn(&mut Dealer<SmallRng>, &mut T) -> Result<()> + Sync,
{
    run_trials_with_rng(&mut master_rng(config.seed), config, cancel, trial)
}

/// `run_trials` with worker dealers seeded from a caller supplied rng
///
/// `config.seed` is ignored.
pub fn run_trials_with_rng<R, T, F>(
    rng: &mut R,
    config: &SimulationConfig,
    cancel: &CancelToken,
    trial: F,
) -> Result<T>
where
    R: Rng,
    T: Tally,
    F: Fn(&mut Dealer<SmallRng>, &mut T) -> Result<()> + Sync,
{
    let n_threads = config.threads.max(1).min(config.iterations.max(1) as usize);
    let shares = split_iterations(config.iterations, n_threads);
    let batch_size = config.batch_size.max(1);
    let stopped = AtomicCell::new(false);
    let mut dealers: Vec<Dealer<SmallRng>> = shares
        .iter()
        .map(|_| Dealer::new(SmallRng::seed_from_u64(rng.gen())))
        .collect();

    log::debug!(
        "running {} trials on {} threads",
        config.iterations,
        n_threads
    );

    if n_threads == 1 {
        if let Some(dealer) = dealers.pop() {
            return run_worker(dealer, shares[0], batch_size, cancel, &stopped, &trial);
        }
    }

    let trial = &trial;
    let stopped = &stopped;
    let results: Vec<Result<T>> = crossbeam::scope(|scope| {
        let handles: Vec<_> = dealers
            .into_iter()
            .zip(shares)
            .map(|(dealer, share)| {
                scope.spawn(move |_| run_worker(dealer, share, batch_size, cancel, stopped, trial))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|_| Err(worker_panicked())))
            .collect()
    })
    .map_err(|_| worker_panicked())?;

    combine(results)
}

fn worker_panicked() -> Error {
    Error::Precondition("worker thread panicked".to_string())
}

fn run_worker<T, F>(
    mut dealer: Dealer<SmallRng>,
    share: u64,
    batch_size: u64,
    cancel: &CancelToken,
    stopped: &AtomicCell<bool>,
    trial: &F,
) -> Result<T>
where
    T: Tally,
    F: Fn(&mut Dealer<SmallRng>, &mut T) -> Result<()>,
{
    let mut tally = T::default();
    let mut done = 0u64;
    while done < share {
        if stopped.load() || cancel.is_cancelled() {
            stopped.store(true);
            return Err(Error::Cancelled);
        }
        let end = std::cmp::min(share, done + batch_size);
        for _ in done..end {
            if let Err(e) = trial(&mut dealer, &mut tally) {
                stopped.store(true);
                return Err(e);
            }
        }
        log::trace!("worker finished trials {}..{} of {}", done, end, share);
        done = end;
    }
    Ok(tally)
}

fn combine<T: Tally>(results: Vec<Result<T>>) -> Result<T> {
    let mut total = T::default();
    let mut cancelled = false;
    for result in results {
        match result {
            Ok(tally) => total.merge(tally),
            Err(Error::Cancelled) => cancelled = true,
            Err(e) => return Err(e),
        }
    }
    if cancelled {
        return Err(Error::Cancelled);
    }
    Ok(total)
}

/// split `total` into `n` shares differing by at most one
fn split_iterations(total: u64, n: usize) -> Vec<u64> {
    let n = n.max(1) as u64;
    let base = total / n;
    let extra = total % n;
    (0..n).map(|i| base + u64::from(i < extra)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_set::CardSet;

    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        trials: u64,
        card_sum: u64,
    }

    impl Tally for Counter {
        fn merge(&mut self, other: Self) {
            self.trials += other.trials;
            self.card_sum += other.card_sum;
        }
    }

    fn count_cards(dealer: &mut Dealer<SmallRng>, tally: &mut Counter) -> Result<()> {
        tally.trials += 1;
        tally.card_sum += u64::from(dealer.draw_one(CardSet::empty())?);
        Ok(())
    }

    #[test]
    fn test_split_iterations() {
        assert_eq!(split_iterations(10, 3), vec![4, 3, 3]);
        assert_eq!(split_iterations(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(split_iterations(0, 1), vec![0]);
    }

    #[test]
    fn test_every_trial_runs_once() {
        for threads in 1..5 {
            let config = SimulationConfig::default()
                .with_iterations(1001)
                .with_threads(threads);
            let tally: Counter = run_trials(&config, &CancelToken::new(), count_cards).unwrap();
            assert_eq!(tally.trials, 1001);
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let config = SimulationConfig::default()
            .with_iterations(5000)
            .with_threads(3)
            .with_seed(42);
        let a: Counter = run_trials(&config, &CancelToken::new(), count_cards).unwrap();
        let b: Counter = run_trials(&config, &CancelToken::new(), count_cards).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_supplied_rng_matches_seed() {
        let config = SimulationConfig::default()
            .with_iterations(2000)
            .with_threads(2)
            .with_seed(8);
        let seeded: Counter = run_trials(&config, &CancelToken::new(), count_cards).unwrap();
        let mut rng = SmallRng::seed_from_u64(8);
        let supplied: Counter = run_trials_with_rng(&mut rng, &config, &CancelToken::new(), count_cards).unwrap();
        assert_eq!(seeded, supplied);

        // the supplied rng advances, so a second run draws other cards
        let again: Counter = run_trials_with_rng(&mut rng, &config, &CancelToken::new(), count_cards).unwrap();
        assert_eq!(again.trials, 2000);
        assert_ne!(again, supplied);
    }

    #[test]
    fn test_cancelled_run() {
        let config = SimulationConfig::default().with_threads(2);
        let cancel = CancelToken::new();
        cancel.cancel();
        let result: Result<Counter> = run_trials(&config, &cancel, count_cards);
        assert_eq!(result, Err(Error::Cancelled));

        let expired = CancelToken::with_deadline(Duration::from_secs(0));
        let result: Result<Counter> = run_trials(&config, &expired, count_cards);
        assert_eq!(result, Err(Error::Cancelled));
    }

    #[test]
    fn test_trial_error_fails_whole_run() {
        let config = SimulationConfig::default().with_threads(4);
        let result: Result<Counter> = run_trials(&config, &CancelToken::new(), |dealer, _| {
            dealer.draw_set(CardSet::empty(), 53).map(|_| ())
        });
        assert_eq!(
            result,
            Err(Error::ExhaustedDeck {
                requested: 53,
                remaining: 52
            })
        );
    }

    #[test]
    fn test_config_from_json() {
        let config: SimulationConfig = serde_json::from_str(r#"{"iterations": 50000, "seed": 7}"#).unwrap();
        assert_eq!(config.iterations, 50000);
        assert_eq!(config.threads, 1);
        assert_eq!(config.seed, Some(7));
    }
}
