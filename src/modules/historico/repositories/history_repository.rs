use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::modules::historico::models::TaxRecord;

/// Minimal keyed record store the history service depends on
///
/// The store gives no ordering, indexing or transactional guarantees;
/// sorting, filtering and aggregation are the service's job. `add`
/// appends blindly; uniqueness of (company, month, year) is enforced
/// one layer up.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Store a record under its company key
    async fn add(&self, record: TaxRecord) -> Result<TaxRecord>;

    /// All records for a company, in insertion order. An unknown
    /// company yields an empty list, never an error.
    async fn list(&self, company_id: &str) -> Result<Vec<TaxRecord>>;

    /// Remove the record for (company, month, year); `false` on miss
    async fn remove(&self, company_id: &str, month: u32, year: i32) -> Result<bool>;

    /// Drop every record of every company (test/teardown utility)
    async fn clear(&self) -> Result<()>;
}

/// Process-memory store keyed by company id
pub struct InMemoryHistoryRepository {
    records: RwLock<HashMap<String, Vec<TaxRecord>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn add(&self, record: TaxRecord) -> Result<TaxRecord> {
        let mut records = self.records.write().await;
        records
            .entry(record.company_id.clone())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn list(&self, company_id: &str) -> Result<Vec<TaxRecord>> {
        let records = self.records.read().await;

        Ok(records.get(company_id).cloned().unwrap_or_default())
    }

    async fn remove(&self, company_id: &str, month: u32, year: i32) -> Result<bool> {
        let mut records = self.records.write().await;

        let Some(company_records) = records.get_mut(company_id) else {
            return Ok(false);
        };

        let before = company_records.len();
        company_records.retain(|record| !(record.month == month && record.year == year));

        Ok(company_records.len() < before)
    }

    async fn clear(&self) -> Result<()> {
        self.records.write().await.clear();

        Ok(())
    }
}
