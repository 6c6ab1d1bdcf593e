// Simples Nacional module: statutory bracket tables and the
// progressive-bracket calculator

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Anexo, Bracket, BracketTable};
pub use services::{BracketCalculator, BracketMatch};
