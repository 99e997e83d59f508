use std::collections::HashMap;

use crate::card_set::{card_rank, card_suit, CardSet};
use crate::constants::RANK_TO_CHAR;
use crate::error::{Error, Result};

/// Group given to every hand missing from the table
pub const WORST_GROUP: u8 = 8;

lazy_static! {
    /// Sklansky's starting hand groups, 1 is best
    static ref SKLANSKY_GROUPS: HashMap<&'static str, u8> = {
        let groups: [(u8, &[&str]); 7] = [
            (1, &["AA", "KK", "QQ", "JJ", "AKs"]),
            (2, &["TT", "AQs", "AJs", "KQs", "AKo"]),
            (3, &["99", "ATs", "KJs", "QJs", "JTs", "AQo"]),
            (4, &["88", "KTs", "QTs", "J9s", "T9s", "98s", "AJo", "KQo"]),
            (5, &[
                "77", "A9s", "A8s", "A7s", "A6s", "A5s", "A4s", "A3s", "A2s", "Q9s", "T8s", "97s",
                "87s", "76s", "KJo", "QJo", "JTo",
            ]),
            (6, &["66", "55", "K9s", "J8s", "86s", "75s", "54s", "ATo", "KTo", "QTo"]),
            (7, &[
                "44", "33", "22", "K8s", "K7s", "K6s", "K5s", "K4s", "K3s", "K2s", "Q8s", "T7s",
                "64s", "53s", "43s", "J9o", "T9o", "98o",
            ]),
        ];
        let mut m = HashMap::new();
        for &(group, hands) in groups.iter() {
            for &hand in hands {
                m.insert(hand, group);
            }
        }
        m
    };
}

/// Shorthand for two hole cards, higher rank first
///
/// Pairs get no suffix, other hands `s` when suited and `o` otherwise.
///
/// # Example
///
/// ```
/// use poker_odds::CardSet;
/// use poker_odds::preflop::abbreviate;
/// assert_eq!(abbreviate(CardSet::from_text("TcJc").unwrap()).unwrap(), "JTs");
/// assert_eq!(abbreviate(CardSet::from_text("TcTh").unwrap()).unwrap(), "TT");
/// ```
pub fn abbreviate(pocket: CardSet) -> Result<String> {
    if pocket.count() != 2 {
        return Err(Error::Precondition(format!(
            "starting hands have two cards, got {}",
            pocket.count()
        )));
    }
    // ascending index order puts the higher rank last
    let cards: Vec<u8> = pocket.iter().collect();
    let (low, high) = (cards[0], cards[1]);

    let mut abbr = String::with_capacity(3);
    abbr.push(RANK_TO_CHAR[usize::from(card_rank(high))]);
    abbr.push(RANK_TO_CHAR[usize::from(card_rank(low))]);
    if card_suit(low) == card_suit(high) {
        abbr.push('s');
    } else if card_rank(low) != card_rank(high) {
        abbr.push('o');
    }
    Ok(abbr)
}

/// Sklansky group of two hole cards, 1 to 7, or 8 for the rest
pub fn sklansky_group(pocket: CardSet) -> Result<u8> {
    let abbr = abbreviate(pocket)?;
    Ok(SKLANSKY_GROUPS
        .get(abbr.as_str())
        .copied()
        .unwrap_or(WORST_GROUP))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abbr(text: &str) -> String {
        abbreviate(CardSet::from_text(text).unwrap()).unwrap()
    }

    fn group(text: &str) -> u8 {
        sklansky_group(CardSet::from_text(text).unwrap()).unwrap()
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbr("TcJc"), "JTs");
        assert_eq!(abbr("TcJh"), "JTo");
        assert_eq!(abbr("TcTh"), "TT");
        assert_eq!(abbr("2hAh"), "A2s");
        assert_eq!(abbr("Ah2h"), "A2s");
        assert!(abbreviate(CardSet::from_text("AhKhQh").unwrap()).is_err());
        assert!(abbreviate(CardSet::empty()).is_err());
    }

    #[test]
    fn test_sklansky_group() {
        assert_eq!(group("AsAd"), 1);
        assert_eq!(group("KhAh"), 1);
        assert_eq!(group("KhAd"), 2);
        assert_eq!(group("JcTc"), 3);
        assert_eq!(group("5d4d"), 6);
        assert_eq!(group("9c8h"), 7);
        assert_eq!(group("7s2d"), WORST_GROUP);
    }

    #[test]
    fn test_every_group_is_populated() {
        for g in 1..=7 {
            assert!(SKLANSKY_GROUPS.values().any(|&v| v == g));
        }
        assert_eq!(SKLANSKY_GROUPS.len(), 5 + 5 + 6 + 8 + 17 + 10 + 18);
    }
}
