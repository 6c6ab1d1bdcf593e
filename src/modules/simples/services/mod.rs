pub mod bracket_calculator;

pub use bracket_calculator::{BracketCalculator, BracketMatch};
