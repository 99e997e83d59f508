use rand::distributions::Uniform;
use rand::Rng;

use crate::card_set::CardSet;
use crate::constants::CARD_COUNT;
use crate::error::{Error, Result};

/// Deals random cards that avoid a set of dead cards
///
/// Sampling is uniform without replacement, done by rejection: draw any
/// of the 52 cards and retry while it is excluded.
#[derive(Debug, Clone)]
pub struct Dealer<R> {
    rng: R,
    card_dist: Uniform<u8>,
}

impl<R: Rng> Dealer<R> {
    pub fn new(rng: R) -> Self {
        Dealer {
            rng,
            card_dist: Uniform::from(0..CARD_COUNT),
        }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draw one card not in `excluded`
    pub fn draw_one(&mut self, excluded: CardSet) -> Result<u8> {
        if excluded.count() >= usize::from(CARD_COUNT) {
            return Err(Error::ExhaustedDeck {
                requested: 1,
                remaining: 0,
            });
        }
        Ok(self.draw_unchecked(excluded))
    }

    /// Draw `n` distinct cards not in `excluded`
    pub fn draw_set(&mut self, excluded: CardSet, n: usize) -> Result<CardSet> {
        check_remaining(excluded, n)?;
        Ok(self.draw_set_unchecked(excluded, n))
    }

    /// Draw one set per entry of `sizes`, in order
    ///
    /// Each set avoids `excluded` and every set drawn before it, so the
    /// sets are pairwise disjoint.
    pub fn draw_disjoint_sets(&mut self, excluded: CardSet, sizes: &[usize]) -> Result<Vec<CardSet>> {
        check_remaining(excluded, sizes.iter().sum())?;
        let mut used_cards = excluded;
        let sets = sizes
            .iter()
            .map(|&size| {
                let set = self.draw_set_unchecked(used_cards, size);
                used_cards.merge(set);
                set
            })
            .collect();
        Ok(sets)
    }

    /// Run `f` over `iterations` independent deals of `sizes`
    pub fn deal_trials<F>(
        &mut self,
        excluded: CardSet,
        sizes: &[usize],
        iterations: u64,
        mut f: F,
    ) -> Result<()>
    where
        F: FnMut(Vec<CardSet>) -> Result<()>,
    {
        check_remaining(excluded, sizes.iter().sum())?;
        for _ in 0..iterations {
            f(self.draw_disjoint_sets(excluded, sizes)?)?;
        }
        Ok(())
    }

    fn draw_set_unchecked(&mut self, excluded: CardSet, n: usize) -> CardSet {
        let mut used_cards = excluded;
        let mut cards = CardSet::empty();
        for _ in 0..n {
            let card = self.draw_unchecked(used_cards);
            used_cards.set(card);
            cards.set(card);
        }
        cards
    }

    // terminates as long as one live card remains
    fn draw_unchecked(&mut self, excluded: CardSet) -> u8 {
        loop {
            let card = self.rng.sample(&self.card_dist);
            if !excluded.contains(card) {
                return card;
            }
        }
    }
}

fn check_remaining(excluded: CardSet, requested: usize) -> Result<()> {
    let remaining = usize::from(CARD_COUNT) - excluded.count();
    if requested > remaining {
        return Err(Error::ExhaustedDeck {
            requested,
            remaining,
        });
    }
    Ok(())
}

/// Text of `n` random cards that are not in the dead card text
///
/// # Example
///
/// ```
/// use poker_odds::dealer::random_cards_not_in;
/// let hand = random_cards_not_in(&mut rand::thread_rng(), "AsAd5s7d8c", 2).unwrap();
/// assert_eq!(hand.len(), 4);
/// ```
pub fn random_cards_not_in<R: Rng>(rng: &mut R, dead: &str, n: usize) -> Result<String> {
    let dead = CardSet::from_text(dead)?;
    let mut dealer = Dealer::new(rng);
    Ok(dealer.draw_set(dead, n)?.to_text())
}

/// Two random cards not in the dead card text
pub fn random_hand_not_in<R: Rng>(rng: &mut R, dead: &str) -> Result<String> {
    random_cards_not_in(rng, dead, 2)
}

/// One random card not in the dead card text
pub fn random_card_not_in<R: Rng>(rng: &mut R, dead: &str) -> Result<String> {
    random_cards_not_in(rng, dead, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn dealer(seed: u64) -> Dealer<SmallRng> {
        Dealer::new(SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn test_draw_one_avoids_excluded() {
        let mut d = dealer(1);
        // only the ace of clubs is live
        let excluded = CardSet::full_deck() - CardSet::from_text("Ac").unwrap();
        for _ in 0..20 {
            assert_eq!(d.draw_one(excluded), Ok(51));
        }
        assert_eq!(
            d.draw_one(CardSet::full_deck()),
            Err(Error::ExhaustedDeck {
                requested: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_draw_set_size() {
        let mut d = dealer(2);
        let excluded = CardSet::from_text("AsAd5s7d8c").unwrap();
        for n in 0..=10 {
            let cards = d.draw_set(excluded, n).unwrap();
            assert_eq!(cards.count(), n);
            assert!(!cards.any_overlap(excluded));
        }
        // the whole live deck
        assert_eq!(d.draw_set(excluded, 47).unwrap(), excluded.complement());
        assert_eq!(
            d.draw_set(excluded, 48),
            Err(Error::ExhaustedDeck {
                requested: 48,
                remaining: 47
            })
        );
    }

    #[test]
    fn test_draw_disjoint_sets() {
        let mut d = dealer(3);
        let excluded = CardSet::from_text("2h3h4h5h9c").unwrap();
        for _ in 0..200 {
            let sets = d.draw_disjoint_sets(excluded, &[2, 2, 2, 1]).unwrap();
            assert_eq!(sets.len(), 4);
            let sizes: Vec<usize> = sets.iter().map(|s| s.count()).collect();
            assert_eq!(sizes, vec![2, 2, 2, 1]);
            let mut used = excluded;
            for s in &sets {
                assert!(!s.any_overlap(used));
                used.merge(*s);
            }
        }
        assert!(d.draw_disjoint_sets(excluded, &[20, 20, 8]).is_err());
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        const TRIALS: usize = 47_000;
        let mut d = dealer(4);
        let excluded = CardSet::from_text("AsAd5s7d8c").unwrap();
        let mut counts = [0usize; 52];
        for _ in 0..TRIALS {
            counts[usize::from(d.draw_one(excluded).unwrap())] += 1;
        }
        for card in 0..52u8 {
            let n = counts[usize::from(card)];
            if excluded.contains(card) {
                assert_eq!(n, 0);
            } else {
                // expected 1000 per card
                assert!(n > 850 && n < 1150, "card {} drawn {} times", card, n);
            }
        }
    }

    #[test]
    fn test_same_seed_same_cards() {
        let excluded = CardSet::from_text("AsAd").unwrap();
        let a = dealer(9).draw_disjoint_sets(excluded, &[2, 3]).unwrap();
        let b = dealer(9).draw_disjoint_sets(excluded, &[2, 3]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deal_trials() {
        let mut d = dealer(5);
        let mut n = 0;
        d.deal_trials(CardSet::empty(), &[2, 5], 100, |sets| {
            assert!(!sets[0].any_overlap(sets[1]));
            n += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 100);
    }

    #[test]
    fn test_random_cards_not_in() {
        let mut rng = SmallRng::seed_from_u64(6);
        let text = random_hand_not_in(&mut rng, "AsAd").unwrap();
        let cards = CardSet::from_text(&text).unwrap();
        assert_eq!(cards.count(), 2);
        assert!(!cards.any_overlap(CardSet::from_text("AsAd").unwrap()));
        assert_eq!(random_card_not_in(&mut rng, "").unwrap().len(), 2);
        assert!(random_cards_not_in(&mut rng, "Zz", 1).is_err());
    }
}
