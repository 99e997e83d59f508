use std::collections::HashMap;

use crate::constants::*;
use crate::hand::Hand;

// Hand Categories
const HIGH_CARD: u16 = HAND_CATEGORY_OFFSET;
const PAIR: u16 = 2 * HAND_CATEGORY_OFFSET;
const TWO_PAIR: u16 = 3 * HAND_CATEGORY_OFFSET;
const THREE_OF_A_KIND: u16 = 4 * HAND_CATEGORY_OFFSET;
const STRAIGHT: u16 = 5 * HAND_CATEGORY_OFFSET;
const FLUSH: u16 = 6 * HAND_CATEGORY_OFFSET;
const FULL_HOUSE: u16 = 7 * HAND_CATEGORY_OFFSET;
const FOUR_OF_A_KIND: u16 = 8 * HAND_CATEGORY_OFFSET;
const STRAIGHT_FLUSH: u16 = 9 * HAND_CATEGORY_OFFSET;

// minimum number of cards to populate table with
const MIN_CARDS: u8 = 2;
const MAX_CARDS: u8 = 7;

const FLUSH_TABLE_SIZE: usize = 8192;

/// returns key for a 64-bit group of rank counters (4 bits per rank)
fn get_key(ranks: u64, flush: bool) -> u32 {
    let mut key: u64 = 0;
    for r in 0..RANK_COUNT {
        key += ((ranks >> (r * 4)) & 0xf)
            * (if flush {
                FLUSH_RANKS[usize::from(r)]
            } else {
                RANKS[usize::from(r)]
            });
    }
    key as u32
}

// return index of highest straight card or 0 when no straight
fn get_biggest_straight(ranks: u64) -> u8 {
    let rank_mask: u64 =
        (0x1111111111111 & ranks) | (0x2222222222222 & ranks) >> 1 | (0x4444444444444 & ranks) >> 2;
    for i in (0..9).rev() {
        if ((rank_mask >> (4 * i)) & 0x11111u64) == 0x11111u64 {
            return i + 4;
        }
    }
    if (rank_mask & 0x1000000001111) == 0x1000000001111 {
        return 3;
    }
    0
}

/// Score a hand of 5 to 7 cards
///
/// Higher is better, equal scores are split pots. The upper 4 bits hold the
/// category (1 = high card ... 9 = straight flush).
///
/// Hands of fewer than 5 cards only score their pairs/trips/quads,
/// straights and flushes need five cards.
pub fn evaluate(hand: &Hand) -> u16 {
    LOOKUP_TABLE.evaluate(hand)
}

/// Category of a score, 1 (high card) to 9 (straight flush)
pub fn category(score: u16) -> u8 {
    (score >> HAND_CATEGORY_SHIFT) as u8
}

// create global static evaluator
lazy_static! {
    static ref LOOKUP_TABLE: Evaluator = Evaluator::init();
}

struct Evaluator {
    rank_table: HashMap<u32, u16>,
    flush_table: Vec<u16>,
}

impl Evaluator {
    fn init() -> Self {
        let mut eval = Evaluator {
            rank_table: HashMap::new(),
            flush_table: vec![0; FLUSH_TABLE_SIZE],
        };
        eval.static_init();
        eval
    }

    fn evaluate(&self, hand: &Hand) -> u16 {
        if hand.has_flush() {
            self.flush_table[hand.get_flush_key()]
        } else {
            self.rank_table
                .get(&hand.get_rank_key())
                .copied()
                .unwrap_or(0)
        }
    }

    fn static_init(&mut self) {
        let rc = RANK_COUNT;

        let mut hand_value: u16 = HIGH_CARD;
        self.populate(0, 0, &mut hand_value, rc, 0, 0, 0, false);

        hand_value = PAIR;
        for r in 0..rc {
            // 2u64 << 4 * rank, means pair for each rank
            self.populate(2u64 << (4 * r), 2, &mut hand_value, rc, 0, 0, 0, false);
        }

        hand_value = TWO_PAIR;
        for r1 in 0..rc {
            for r2 in 0..r1 {
                // each two pair combination
                self.populate(
                    (2u64 << (4 * r1)) + (2u64 << (4 * r2)),
                    4,
                    &mut hand_value,
                    rc,
                    r2,
                    0,
                    0,
                    false,
                );
            }
        }

        hand_value = THREE_OF_A_KIND;
        for r in 0..rc {
            self.populate(3u64 << (4 * r), 3, &mut hand_value, rc, 0, r, 0, false);
        }

        hand_value = STRAIGHT;
        // A-5
        self.populate(0x1000000001111u64, 5, &mut hand_value, rc, rc, rc, 3, false);
        for r in 4..rc {
            // every other straight
            self.populate(0x11111u64 << (4 * (r - 4)), 5, &mut hand_value, rc, rc, rc, r, false);
        }

        hand_value = FLUSH;
        self.populate(0, 0, &mut hand_value, rc, 0, 0, 0, true);

        hand_value = FULL_HOUSE;
        for r1 in 0..rc {
            for r2 in 0..rc {
                if r2 != r1 {
                    // r1's full of r2
                    self.populate(
                        (3u64 << (4 * r1)) + (2u64 << (4 * r2)),
                        5,
                        &mut hand_value,
                        rc,
                        r2,
                        r1,
                        rc,
                        false,
                    );
                }
            }
        }

        hand_value = FOUR_OF_A_KIND;
        for r in 0..rc {
            self.populate(4u64 << (4 * r), 4, &mut hand_value, rc, rc, rc, rc, false);
        }

        hand_value = STRAIGHT_FLUSH;
        // A-5
        self.populate(0x1000000001111u64, 5, &mut hand_value, rc, 0, 0, 3, true);
        for r in 4..rc {
            self.populate(0x11111u64 << (4 * (r - 4)), 5, &mut hand_value, rc, 0, 0, r, true);
        }
    }

    /// walks every rank multiset that does not improve on the starting
    /// category, adding ranks in non-increasing order
    #[allow(clippy::too_many_arguments)]
    fn populate(
        &mut self,
        ranks: u64,
        n_cards: u8,
        hand_value: &mut u16,
        end_rank: u8,
        max_pair: u8,
        max_trips: u8,
        max_straight: u8,
        flush: bool,
    ) {
        // only increment counter for 0-5 card combos
        if (n_cards <= 5) && (n_cards >= MIN_CARDS) {
            *hand_value += 1;
        }

        if (n_cards >= MIN_CARDS) || (flush && n_cards >= 5) {
            let key = get_key(ranks, flush);

            if flush {
                self.flush_table[key as usize] = *hand_value;
            } else {
                self.rank_table.insert(key, *hand_value);
            }

            if n_cards == MAX_CARDS {
                return;
            }
        }

        // iterate next card rank
        for r in 0..end_rank {
            let new_ranks = ranks + (1u64 << (4 * r));
            // check that hand doesn't improve
            let rank_count = (new_ranks >> (r * 4)) & 0xf;

            if (rank_count == 2) && (r >= max_pair) {
                continue;
            }
            if (rank_count == 3) && (r >= max_trips) {
                continue;
            }
            if rank_count >= 4 {
                // cant be more than 1 pair of quads for each rank
                continue;
            }
            if get_biggest_straight(new_ranks) > max_straight {
                continue;
            }

            self.populate(
                new_ranks,
                n_cards + 1,
                hand_value,
                r + 1,
                max_pair,
                max_trips,
                max_straight,
                flush,
            );
        }
    }
}
