//! Lookup table poker hand evaluator
//!
//! Cards are indexed 0->51 where index is 4 * rank + suit
//! (suits ordered s, h, d, c).
//!
//! ```
//! use hand_evaluator::{evaluate, category, Hand, CARDS};
//! let hand = Hand::empty() + CARDS[0] + CARDS[1] + CARDS[2] + CARDS[3] + CARDS[51];
//! assert_eq!(category(evaluate(&hand)), 8);
//! ```

#[macro_use]
extern crate lazy_static;

mod constants;
mod evaluator;
mod hand;

pub use constants::{CARD_COUNT, HAND_CATEGORY_SHIFT, RANK_COUNT, SUIT_COUNT};
pub use evaluator::{category, evaluate};
pub use hand::{Hand, CARDS};
