use std::ops::Add;
use std::ops::AddAssign;

use crate::constants::*;

const CARD_COUNT_SHIFT: u8 = 32;
const SUITS_SHIFT: u8 = 48;
const FLUSH_CHECK_MASK64: u64 = 0x8888u64 << SUITS_SHIFT;
const FLUSH_CHECK_MASK32: u32 = 0x8888u32 << (SUITS_SHIFT - 32) as u32;

/// 128 bit representation of a poker hand for use in the evaluator
///
/// Bits 0-31: key to non flush lookup table
/// Bits 32-35: card counter
/// Bits 48-63: suit counters, each starting at 3 so a fifth card sets the high bit
/// Bits 64-127: bit mask for all cards (suits in 16 bit groups)
#[derive(Debug, Copy, Clone)]
pub struct Hand {
    key: u64,
    mask: u64,
}

lazy_static! {
    /// Table for card index (4 * rank + suit) to hand representation
    pub static ref CARDS: [Hand; 52] = init_card_constants();
}

impl Hand {
    /// construct the empty hand
    ///
    /// initializes the suit counters, so always start from here
    pub fn empty() -> Hand {
        Hand {
            key: 0x3333u64 << SUITS_SHIFT,
            mask: 0,
        }
    }

    /// construct a Hand from a 52 bit card mask (bit `4 * rank + suit`)
    pub fn from_bit_mask(mask: u64) -> Hand {
        let mut hand = Hand::empty();
        for c in 0..usize::from(CARD_COUNT) {
            if (mask & (1u64 << c)) != 0 {
                hand += CARDS[c];
            }
        }
        hand
    }

    /// get rank key of hand for the non flush table
    pub const fn get_rank_key(self) -> u32 {
        self.key as u32
    }

    /// Return counter bits
    const fn get_counters(self) -> u32 {
        (self.key >> 32) as u32
    }

    /// Get flush key of hand for the flush table
    ///
    /// Returns 0 if there is no flush
    pub fn get_flush_key(self) -> usize {
        if self.has_flush() {
            // only one suit can reach five cards in a 7 card hand
            let flush_check_bits = self.get_counters() & FLUSH_CHECK_MASK32;
            let shift = flush_check_bits.leading_zeros() << 2;
            let key = (self.mask >> shift) as u16;
            usize::from(key)
        } else {
            0
        }
    }

    pub fn has_flush(self) -> bool {
        (self.key & FLUSH_CHECK_MASK64) != 0
    }

    /// Return number of cards in hand
    pub fn count(self) -> u32 {
        (self.get_counters() >> (CARD_COUNT_SHIFT - 32)) & 0xf
    }

    /// Get the number of cards for a suit
    pub fn suit_count(self, suit: u8) -> i32 {
        let shift = 4 * suit + (SUITS_SHIFT - 32);
        (((self.get_counters() >> shift) & 0xf) as i32) - 3
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand::empty()
    }
}

impl Add for Hand {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            key: self.key + other.key,
            mask: self.mask | other.mask,
        }
    }
}

impl AddAssign for Hand {
    fn add_assign(&mut self, rhs: Hand) {
        self.key += rhs.key;
        self.mask |= rhs.mask;
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask && self.key == other.key
    }
}

impl Eq for Hand {}

fn init_card_constants() -> [Hand; 52] {
    // single cards carry no suit counter offset, only the increment
    let mut hands = [Hand { key: 0, mask: 0 }; 52];

    for c in 0..CARD_COUNT {
        let rank = c / SUIT_COUNT;
        let suit = c % SUIT_COUNT;
        let suit_counter: u64 = 1u64 << (4 * suit + SUITS_SHIFT);
        let card_counter: u64 = 1u64 << CARD_COUNT_SHIFT;
        let rank_key: u64 = RANKS[usize::from(rank)];
        // suits are in 16 bit groups, spades highest
        let mask: u64 = 1u64 << ((3 - suit) * 16 + rank);

        hands[usize::from(c)] = Hand {
            key: suit_counter + card_counter + rank_key,
            mask,
        };
    }

    hands
}
