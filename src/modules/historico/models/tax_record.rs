//! Fiscal history records and the derived views computed from them
//!
//! Wire field names are the Portuguese ones the frontend consumes
//! (`empresaId`, `faturamento`, `estatisticas`, ...); the Rust side
//! keeps English identifiers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Regime;

/// One company's fiscal data for one calendar month
///
/// At most one record exists per (company, month, year); the history
/// service enforces that, not the store. Records are never mutated in
/// place, only replaced or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRecord {
    /// Surrogate id, assigned by the service on save
    pub id: String,

    #[serde(rename = "empresaId")]
    pub company_id: String,

    /// Calendar month, 1-12
    #[serde(rename = "mes")]
    pub month: u32,

    #[serde(rename = "ano")]
    pub year: i32,

    /// Gross revenue for the month (BRL)
    #[serde(rename = "faturamento")]
    pub revenue: Decimal,

    pub regime: Regime,

    /// Taxes paid in the month (BRL)
    #[serde(rename = "impostos")]
    pub taxes_paid: Decimal,

    /// taxes_paid / revenue × 100, zero when revenue is zero
    #[serde(rename = "aliquotaEfetiva")]
    pub effective_rate: Decimal,

    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
}

impl TaxRecord {
    /// Chronological sort key
    pub fn period_key(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

/// Input for saving one month of fiscal data
///
/// `month` and `regime` stay loosely typed here so out-of-range values
/// reach the service's validation and come back as field-specific
/// errors instead of opaque deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMonthRequest {
    #[serde(rename = "empresaId")]
    pub company_id: String,

    #[serde(rename = "mes")]
    pub month: i32,

    #[serde(rename = "ano")]
    pub year: i32,

    #[serde(rename = "faturamento")]
    pub revenue: Decimal,

    pub regime: String,

    #[serde(rename = "impostos")]
    pub taxes_paid: Decimal,
}

/// Optional narrowing applied by `get_history`
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub regime: Option<Regime>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &TaxRecord) -> bool {
        if let Some(from) = self.year_from {
            if record.year < from {
                return false;
            }
        }
        if let Some(to) = self.year_to {
            if record.year > to {
                return false;
            }
        }
        if let Some(regime) = self.regime {
            if record.regime != regime {
                return false;
            }
        }
        true
    }
}

/// Period-over-period percentage change
///
/// A field is null when its baseline value is zero; a change against a
/// zero base is undefined and must never surface as NaN or infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(rename = "faturamento")]
    pub revenue: Option<Decimal>,

    #[serde(rename = "impostos")]
    pub taxes: Option<Decimal>,
}

/// A record annotated with its variation against the immediately
/// preceding record of the (filtered, ordered) sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: TaxRecord,

    /// Null for the first record of the sequence
    #[serde(rename = "variacao")]
    pub variation: Option<Variation>,
}

/// Aggregate statistics over a set of records, recomputed per query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "totalRegistros")]
    pub count: usize,

    #[serde(rename = "faturamentoTotal")]
    pub total_revenue: Decimal,

    #[serde(rename = "tributosTotal")]
    pub total_taxes: Decimal,

    /// Mean of per-record effective rates, not re-derived from totals.
    /// Absent when there are no records.
    #[serde(
        rename = "aliquotaMediaEfetiva",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub average_effective_rate: Option<Decimal>,
}

impl Statistics {
    pub fn empty() -> Self {
        Self {
            count: 0,
            total_revenue: Decimal::ZERO,
            total_taxes: Decimal::ZERO,
            average_effective_rate: None,
        }
    }
}

/// Read-only derived view of one company's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryView {
    #[serde(rename = "registros")]
    pub records: Vec<AnnotatedRecord>,

    #[serde(rename = "totalRegistros")]
    pub total_records: usize,

    #[serde(rename = "estatisticas")]
    pub statistics: Statistics,
}

/// Inclusive year range for period comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    #[serde(rename = "anoInicio")]
    pub year_from: i32,

    #[serde(rename = "anoFim")]
    pub year_to: i32,
}

impl PeriodRange {
    pub fn contains(&self, year: i32) -> bool {
        self.year_from <= year && year <= self.year_to
    }
}

/// Result of comparing two year ranges of the same company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparison {
    #[serde(rename = "periodo1")]
    pub period1: Statistics,

    #[serde(rename = "periodo2")]
    pub period2: Statistics,

    #[serde(rename = "variacao")]
    pub variation: Variation,
}

/// One point of the chronological chart series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    /// "MM/YYYY", e.g. "01/2024"
    pub label: String,

    #[serde(rename = "mes")]
    pub month: u32,

    #[serde(rename = "ano")]
    pub year: i32,

    #[serde(rename = "faturamento")]
    pub revenue: Decimal,

    #[serde(rename = "impostos")]
    pub taxes: Decimal,

    #[serde(rename = "aliquotaEfetiva")]
    pub effective_rate: Decimal,

    pub regime: Regime,
}
