/*
 * 52 bit card sets and their text form
 *
 * A card is a u8 index, 4 * rank + suit, and a set keeps bit `index`
 * of a u64 for each member
 */

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};
use std::str::FromStr;

use crate::constants::*;
use crate::error::ParseError;

/// A set of cards from one standard deck
///
/// Copy value type, every operation returns a new set unless it takes
/// `&mut self` (`set`, `merge`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardSet(u64);

impl CardSet {
    /// The set with no cards
    pub const fn empty() -> CardSet {
        CardSet(0)
    }

    /// All 52 cards
    pub const fn full_deck() -> CardSet {
        CardSet(DECK_MASK)
    }

    /// construct from a bit mask, bits above 51 are dropped
    pub const fn from_mask(mask: u64) -> CardSet {
        CardSet(mask & DECK_MASK)
    }

    /// construct a set holding one card
    pub fn from_card(card: u8) -> CardSet {
        let mut cards = CardSet::empty();
        cards.set(card);
        cards
    }

    /// Parse a string of two character card tokens
    ///
    /// Whitespace between tokens is ignored, ranks and suits are case
    /// insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// use poker_odds::CardSet;
    /// let cards = CardSet::from_text("As2hQd").unwrap();
    /// assert_eq!(cards.count(), 3);
    /// ```
    pub fn from_text(text: &str) -> Result<CardSet, ParseError> {
        let char_vec: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if char_vec.len() % 2 != 0 {
            return Err(ParseError::OddLength(text.to_string()));
        }
        let mut cards = CardSet::empty();
        for token in char_vec.chunks(2) {
            let card = card_from_chars(token[0], token[1])?;
            if cards.contains(card) {
                return Err(ParseError::DuplicateCard(card_to_text(card)));
            }
            cards.set(card);
        }
        Ok(cards)
    }

    /// Writes the set as card tokens in ascending index order
    pub fn to_text(self) -> String {
        self.iter().map(card_to_text).collect()
    }

    pub const fn mask(self) -> u64 {
        self.0
    }

    /// add a single card, indexes past the deck are ignored
    pub fn set(&mut self, card: u8) {
        if card < CARD_COUNT {
            self.0 |= 1u64 << card;
        }
    }

    /// add every card of `other`
    pub fn merge(&mut self, other: CardSet) {
        self.0 |= other.0;
    }

    pub const fn union(self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: CardSet) -> CardSet {
        CardSet(self.0 & other.0)
    }

    /// cards of `self` not in `other`
    pub const fn difference(self, other: CardSet) -> CardSet {
        CardSet(self.0 & !other.0)
    }

    /// cards of the deck not in `self`
    pub const fn complement(self) -> CardSet {
        CardSet(!self.0 & DECK_MASK)
    }

    pub fn contains(self, card: u8) -> bool {
        card < CARD_COUNT && (self.0 & (1u64 << card)) != 0
    }

    /// true if the sets share at least one card
    pub const fn any_overlap(self, other: CardSet) -> bool {
        (self.0 & other.0) != 0
    }

    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// iterate member cards in ascending index order
    pub fn iter(self) -> Cards {
        Cards(self.0)
    }

    /// every `k` card subset, in lexicographic order of card index
    pub fn combinations(self, k: usize) -> Combinations {
        let cards: Vec<u8> = self.iter().collect();
        Combinations {
            done: k > cards.len(),
            indices: (0..k).collect(),
            cards,
        }
    }
}

/// Number of `k` card subsets of `n` cards
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

/// Iterator over the fixed size subsets of a `CardSet`
#[derive(Debug, Clone)]
pub struct Combinations {
    cards: Vec<u8>,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Combinations {
    type Item = CardSet;

    fn next(&mut self) -> Option<CardSet> {
        if self.done {
            return None;
        }
        let subset = self.indices.iter().map(|&i| self.cards[i]).collect();

        // advance the rightmost index that still has room
        let n = self.cards.len();
        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] != i + n - k {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }
        Some(subset)
    }
}

/// Iterator over the cards of a `CardSet`
#[derive(Debug, Clone)]
pub struct Cards(u64);

impl Iterator for Cards {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let card = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(card)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Cards {}

impl IntoIterator for CardSet {
    type Item = u8;
    type IntoIter = Cards;

    fn into_iter(self) -> Cards {
        self.iter()
    }
}

impl std::iter::FromIterator<u8> for CardSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut cards = CardSet::empty();
        for card in iter {
            cards.set(card);
        }
        cards
    }
}

impl BitOr for CardSet {
    type Output = CardSet;

    fn bitor(self, rhs: CardSet) -> CardSet {
        self.union(rhs)
    }
}

impl BitAnd for CardSet {
    type Output = CardSet;

    fn bitand(self, rhs: CardSet) -> CardSet {
        self.intersection(rhs)
    }
}

impl BitOrAssign for CardSet {
    fn bitor_assign(&mut self, rhs: CardSet) {
        self.merge(rhs);
    }
}

impl Sub for CardSet {
    type Output = CardSet;

    fn sub(self, rhs: CardSet) -> CardSet {
        self.difference(rhs)
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in self.iter() {
            write!(
                f,
                "{}{}",
                RANK_TO_CHAR[usize::from(card_rank(card))],
                SUIT_TO_CHAR[usize::from(card_suit(card))]
            )?;
        }
        Ok(())
    }
}

impl FromStr for CardSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardSet::from_text(s)
    }
}

/// Convert rank char to u8, 0 for a deuce through 12 for an ace
///
/// # Example
///
/// ```
/// use poker_odds::card_set::char_to_rank;
/// assert_eq!(char_to_rank('a'), Some(12));
/// ```
pub fn char_to_rank(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        'a' => Some(12),
        'k' => Some(11),
        'q' => Some(10),
        'j' => Some(9),
        't' => Some(8),
        '9' => Some(7),
        '8' => Some(6),
        '7' => Some(5),
        '6' => Some(4),
        '5' => Some(3),
        '4' => Some(2),
        '3' => Some(1),
        '2' => Some(0),
        _ => None,
    }
}

/// Convert suit char to u8
pub fn char_to_suit(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        's' => Some(0),
        'h' => Some(1),
        'd' => Some(2),
        'c' => Some(3),
        _ => None,
    }
}

/// rank of a card index, 0 (deuce) to 12 (ace)
pub const fn card_rank(card: u8) -> u8 {
    card >> 2
}

/// suit of a card index, 0 (s) to 3 (c)
pub const fn card_suit(card: u8) -> u8 {
    card & 3
}

/// Parse a single two character card token such as `As`
pub fn card_from_text(token: &str) -> Result<u8, ParseError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(r), Some(s), None) => card_from_chars(r, s),
        _ => Err(ParseError::MalformedToken(token.to_string())),
    }
}

fn card_from_chars(r: char, s: char) -> Result<u8, ParseError> {
    match (char_to_rank(r), char_to_suit(s)) {
        (Some(rank), Some(suit)) => Ok(4 * rank + suit),
        _ => Err(ParseError::MalformedToken([r, s].iter().collect())),
    }
}

/// Text form of a single card index
pub fn card_to_text(card: u8) -> String {
    let mut text = String::with_capacity(2);
    text.push(RANK_TO_CHAR[usize::from(card_rank(card))]);
    text.push(SUIT_TO_CHAR[usize::from(card_suit(card))]);
    text
}
