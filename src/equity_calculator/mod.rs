mod equity_calc;

pub use equity_calc::{calc_equity, calc_equity_with_rng, exact_equity};
