/// Number of cards in standard deck
pub const CARD_COUNT: u8 = 52;

/// Number of ranks in a standard deck
/// (2 -> A)
pub const RANK_COUNT: u8 = 13;

/// Number of suits
pub const SUIT_COUNT: u8 = 4;

/// Mask of the 52 meaningful bits of a card mask
pub const DECK_MASK: u64 = (1u64 << CARD_COUNT) - 1;

/// u8 rank to char table
pub const RANK_TO_CHAR: &[char; 13] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// u8 suit to char table
pub static SUIT_TO_CHAR: &[char; 4] = &['s', 'h', 'd', 'c'];

/// Board size once the river is dealt
pub const BOARD_CARDS: usize = 5;

/// Fewest and most cards the evaluator ranks
pub const MIN_EVAL_CARDS: usize = 5;
pub const MAX_EVAL_CARDS: usize = 7;
