pub mod bracket_table;

pub use bracket_table::{Anexo, Bracket, BracketTable};
