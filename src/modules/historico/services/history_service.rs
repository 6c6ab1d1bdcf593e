use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::clock::{Clock, IdGenerator};
use crate::core::error::{AppError, Result};
use crate::core::Regime;
use crate::modules::historico::models::{
    AnnotatedRecord, ChartPoint, HistoryFilter, HistoryView, PeriodComparison, PeriodRange,
    SaveMonthRequest, Statistics, TaxRecord, Variation,
};
use crate::modules::historico::repositories::HistoryRepository;

/// Earliest year accepted in a save-month request
const MIN_YEAR: i32 = 2000;

/// Service for one company's monthly fiscal history
///
/// Validates inputs, persists records through the injected store and
/// recomputes every derived view (statistics, variation, comparison,
/// chart series) fresh on each read. Uniqueness of (company, month,
/// year) lives here; the store appends blindly.
pub struct HistoryService {
    repository: Arc<dyn HistoryRepository>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    // Saving is remove-then-add against a store with no transactions;
    // writes for the same company take this lock so two concurrent
    // saves cannot interleave into a duplicated period.
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl HistoryService {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repository,
            clock,
            ids,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and persist one month of fiscal data
    ///
    /// Re-saving an existing (company, month, year) replaces the prior
    /// record. The returned record carries the computed effective rate
    /// plus the id and timestamp assigned here.
    pub async fn save_month(&self, request: SaveMonthRequest) -> Result<TaxRecord> {
        let (month, regime) = Self::validate(&request)?;

        let record = TaxRecord {
            id: self.ids.next_id(),
            company_id: request.company_id,
            month,
            year: request.year,
            revenue: request.revenue,
            regime,
            taxes_paid: request.taxes_paid,
            effective_rate: Self::monthly_effective_rate(request.revenue, request.taxes_paid),
            created_at: self.clock.now(),
        };

        let lock = self.company_lock(&record.company_id).await;
        let _guard = lock.lock().await;

        let replaced = self
            .repository
            .remove(&record.company_id, record.month, record.year)
            .await?;
        if replaced {
            debug!(
                company_id = %record.company_id,
                month = record.month,
                year = record.year,
                "Replacing existing record for period"
            );
        }

        let stored = self.repository.add(record).await?;

        info!(
            company_id = %stored.company_id,
            month = stored.month,
            year = stored.year,
            regime = %stored.regime,
            "Saved fiscal month"
        );

        Ok(stored)
    }

    /// One company's history, optionally narrowed, ordered by
    /// (year, month), annotated with period-over-period variation and
    /// topped with freshly computed statistics
    pub async fn get_history(&self, company_id: &str, filter: &HistoryFilter) -> Result<HistoryView> {
        let mut records: Vec<TaxRecord> = self
            .repository
            .list(company_id)
            .await?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by_key(TaxRecord::period_key);

        let statistics = Self::statistics_of(&records);

        let records: Vec<AnnotatedRecord> = records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                let variation = (position > 0).then(|| {
                    let previous = &records[position - 1];
                    Variation {
                        revenue: Self::pct_change(record.revenue, previous.revenue),
                        taxes: Self::pct_change(record.taxes_paid, previous.taxes_paid),
                    }
                });

                AnnotatedRecord {
                    record: record.clone(),
                    variation,
                }
            })
            .collect();

        Ok(HistoryView {
            total_records: records.len(),
            records,
            statistics,
        })
    }

    /// Remove the record for (company, month, year)
    ///
    /// Idempotent: a miss returns `false`, never an error.
    pub async fn remove_month(&self, company_id: &str, month: u32, year: i32) -> Result<bool> {
        let lock = self.company_lock(company_id).await;
        let _guard = lock.lock().await;

        let removed = self.repository.remove(company_id, month, year).await?;
        if removed {
            info!(company_id = %company_id, month, year, "Removed fiscal month");
        }

        Ok(removed)
    }

    /// Compare two inclusive year ranges of the same company
    ///
    /// Fails with `InsufficientData` when the baseline period holds no
    /// records; a baseline total of zero with records present yields a
    /// null variation for that metric instead.
    pub async fn compare_periods(
        &self,
        company_id: &str,
        period1: PeriodRange,
        period2: PeriodRange,
    ) -> Result<PeriodComparison> {
        let records = self.repository.list(company_id).await?;

        let in_range = |range: &PeriodRange| -> Vec<TaxRecord> {
            records
                .iter()
                .filter(|record| range.contains(record.year))
                .cloned()
                .collect()
        };

        let baseline = in_range(&period1);
        if baseline.is_empty() {
            return Err(AppError::InsufficientData(format!(
                "no records for baseline period {}-{}",
                period1.year_from, period1.year_to
            )));
        }

        let period1_stats = Self::statistics_of(&baseline);
        let period2_stats = Self::statistics_of(&in_range(&period2));

        let variation = Variation {
            revenue: Self::pct_change(period2_stats.total_revenue, period1_stats.total_revenue),
            taxes: Self::pct_change(period2_stats.total_taxes, period1_stats.total_taxes),
        };

        Ok(PeriodComparison {
            period1: period1_stats,
            period2: period2_stats,
            variation,
        })
    }

    /// Chronological series of one point per stored month, labelled
    /// "MM/YYYY" for the frontend's charts
    pub async fn chart_series(&self, company_id: &str) -> Result<Vec<ChartPoint>> {
        let mut records = self.repository.list(company_id).await?;
        records.sort_by_key(TaxRecord::period_key);

        Ok(records
            .into_iter()
            .map(|record| ChartPoint {
                label: format!("{:02}/{}", record.month, record.year),
                month: record.month,
                year: record.year,
                revenue: record.revenue,
                taxes: record.taxes_paid,
                effective_rate: record.effective_rate,
                regime: record.regime,
            })
            .collect())
    }

    /// Field-by-field validation, each failure naming the offending
    /// value. Checked in request-field order: month, year, revenue,
    /// regime, taxes.
    fn validate(request: &SaveMonthRequest) -> Result<(u32, Regime)> {
        if !(1..=12).contains(&request.month) {
            return Err(AppError::InvalidMonth(format!(
                "expected 1-12, got {}",
                request.month
            )));
        }

        if request.year < MIN_YEAR {
            return Err(AppError::InvalidYear(format!(
                "expected {} or later, got {}",
                MIN_YEAR, request.year
            )));
        }

        if request.revenue < Decimal::ZERO {
            return Err(AppError::InvalidRevenue(format!(
                "must not be negative, got {}",
                request.revenue
            )));
        }

        let regime = request.regime.parse::<Regime>().map_err(|_| {
            AppError::InvalidRegime(format!(
                "expected one of simples, presumido, real, mei; got '{}'",
                request.regime
            ))
        })?;

        if request.taxes_paid < Decimal::ZERO {
            return Err(AppError::InvalidTaxes(format!(
                "must not be negative, got {}",
                request.taxes_paid
            )));
        }

        Ok((request.month as u32, regime))
    }

    /// taxes / revenue × 100, rounded to 2 decimals; zero revenue is a
    /// zero rate, never NaN or infinity
    fn monthly_effective_rate(revenue: Decimal, taxes: Decimal) -> Decimal {
        if revenue.is_zero() {
            return Decimal::ZERO;
        }

        (taxes / revenue * Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Percentage change against a baseline; undefined (None) when the
    /// baseline is zero
    fn pct_change(current: Decimal, baseline: Decimal) -> Option<Decimal> {
        if baseline.is_zero() {
            return None;
        }

        Some(((current - baseline) / baseline * Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Aggregate statistics over an already-filtered record set
    ///
    /// The average is the mean of per-record effective rates, not
    /// total taxes over total revenue, so a high-revenue month does not
    /// outweigh the others.
    fn statistics_of(records: &[TaxRecord]) -> Statistics {
        if records.is_empty() {
            return Statistics::empty();
        }

        let rate_sum: Decimal = records.iter().map(|record| record.effective_rate).sum();

        Statistics {
            count: records.len(),
            total_revenue: records.iter().map(|record| record.revenue).sum(),
            total_taxes: records.iter().map(|record| record.taxes_paid).sum(),
            average_effective_rate: Some((rate_sum / Decimal::from(records.len())).round_dp(2)),
        }
    }

    async fn company_lock(&self, company_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().await;
        locks.entry(company_id.to_string()).or_default().clone()
    }
}
