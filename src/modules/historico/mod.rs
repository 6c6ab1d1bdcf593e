// Fiscal history module: monthly records per company, derived
// statistics and comparisons

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{HistoryFilter, HistoryView, SaveMonthRequest, Statistics, TaxRecord};
pub use repositories::{HistoryRepository, InMemoryHistoryRepository};
pub use services::HistoryService;
