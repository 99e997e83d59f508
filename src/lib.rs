//! # Poker Odds
//! Hand strength and odds for texas holdem
//!
//! Currently supports
//!  - exact hand strength against every live opponent hand
//!  - monte carlo hand potential and effective hand strength
//!  - monte carlo showdown equity against several opponents
//!  - category odds for every street still to come
//!
//! ## Hand Analyzer
//!
//! ```
//! use poker_odds::HandAnalyzer;
//! let analyzer = HandAnalyzer::new();
//! let hs = analyzer.hand_strength("AsAd", "5s7d8c", 1).unwrap();
//! let potential = analyzer.hand_potential("2h3h", "4h5h9c", 1).unwrap();
//! let equity = analyzer.equity("AsAd", "", 500, 1).unwrap();
//! let outs = analyzer.outs("7s7c", "8h9dJs").unwrap();
//! ```
//!
//! ## Engines
//!
//! Every engine also runs on card sets with any `Evaluator`
//!
//! ```
//! use poker_odds::{CardSet, Evaluator, HandCategory, LookupEvaluator};
//! use poker_odds::hand_strength::{hand_strength, WeightTable};
//! // cards are indexed 0->51 where index is 4 * rank + suit
//! let pocket = CardSet::from_text("2h3h").unwrap();
//! let board = CardSet::from_text("4h5h6h").unwrap();
//! assert_eq!(LookupEvaluator.category(pocket | board, 5).unwrap(), HandCategory::StraightFlush);
//! let hs = hand_strength(&LookupEvaluator, pocket, board, 1, &WeightTable::new()).unwrap();
//! assert!(hs > 0.9);
//! ```

#[macro_use]
extern crate lazy_static;

pub mod analyzer;
pub mod card_set;
pub mod constants;
pub mod dealer;
pub mod equity_calculator;
pub mod error;
pub mod evaluator;
pub mod hand_potential;
pub mod hand_strength;
pub mod outs;
pub mod preflop;
pub mod simulation;
pub mod standing;

pub use analyzer::HandAnalyzer;
pub use card_set::CardSet;
pub use error::{Error, ParseError, Result};
pub use evaluator::{Evaluator, HandCategory, HandRank, LookupEvaluator, Score};
pub use outs::{OutsReport, Street};
pub use standing::Standing;
