use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};
use crate::modules::simples::models::{Anexo, BracketTable};

/// Metadata of the bracket matched for a given RBT12, for UI and
/// explanatory output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    #[serde(rename = "indice")]
    pub index: usize,
    /// Lower bound of the band, exclusive (0 for the first band)
    #[serde(rename = "limiteInferior")]
    pub lower_bound: Decimal,
    /// Upper bound of the band, inclusive
    #[serde(rename = "limiteSuperior")]
    pub upper_bound: Decimal,
    #[serde(rename = "aliquotaNominal")]
    pub nominal_rate: Decimal,
    #[serde(rename = "parcelaDeduzir")]
    pub deduction: Decimal,
}

/// BracketCalculator evaluates the progressive-bracket-with-deduction
/// formula of the Simples Nacional tables
///
/// All operations are pure; the calculator holds no state.
pub struct BracketCalculator;

impl BracketCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Locate the band whose limit is >= `rbt12` (first-fit ascending)
    ///
    /// A boundary value (`rbt12 == limit`) resolves to that band, not
    /// the next one. Revenue above the final limit is an explicit
    /// out-of-ceiling error, never clamped to the last band.
    pub fn locate_bracket(&self, rbt12: Decimal, table: &BracketTable) -> Result<BracketMatch> {
        let index = table
            .brackets
            .iter()
            .position(|bracket| bracket.limit >= rbt12)
            .ok_or_else(|| {
                AppError::OutOfRegimeCeiling(format!(
                    "RBT12 {} exceeds the Anexo {} ceiling of {}",
                    rbt12,
                    table.anexo,
                    table.ceiling()
                ))
            })?;

        let bracket = &table.brackets[index];
        let lower_bound = if index == 0 {
            Decimal::ZERO
        } else {
            table.brackets[index - 1].limit
        };

        Ok(BracketMatch {
            index,
            lower_bound,
            upper_bound: bracket.limit,
            nominal_rate: bracket.nominal_rate,
            deduction: bracket.deduction,
        })
    }

    /// Effective rate (%) for an RBT12 under `table`
    ///
    /// Formula: (rbt12 × nominal/100 − deduction) / rbt12 × 100, floored
    /// at zero and rounded to 4 decimal places. The deduction keeps the
    /// effective rate continuous and non-decreasing across band
    /// transitions up to the fifth band; the statutory sixth band steps
    /// down because ICMS/ISS leave the unified payment there.
    pub fn effective_rate(&self, rbt12: Decimal, table: &BracketTable) -> Result<Decimal> {
        if rbt12 <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let matched = self.locate_bracket(rbt12, table)?;

        let nominal_tax = rbt12 * matched.nominal_rate / Decimal::ONE_HUNDRED;
        let tax_due = (nominal_tax - matched.deduction).max(Decimal::ZERO);

        Ok((tax_due / rbt12 * Decimal::ONE_HUNDRED).round_dp(4))
    }

    /// Monthly DAS amount: monthly revenue × effective rate / 100,
    /// rounded to centavos
    pub fn das_amount(&self, monthly_revenue: Decimal, effective_rate: Decimal) -> Decimal {
        (monthly_revenue * effective_rate / Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Fator R (%): trailing-12-month payroll over trailing-12-month
    /// gross revenue
    pub fn fator_r(&self, payroll_12m: Decimal, revenue_12m: Decimal) -> Result<Decimal> {
        if revenue_12m <= Decimal::ZERO {
            return Err(AppError::InsufficientData(
                "Fator R requires a positive trailing-12-month revenue".to_string(),
            ));
        }

        Ok((payroll_12m / revenue_12m * Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Annex selection for service businesses: Fator R of 28% or more
    /// qualifies for Anexo III, below stays in Anexo V
    pub fn anexo_for_services(&self, fator_r: Decimal) -> Anexo {
        if fator_r >= Decimal::from(28) {
            Anexo::III
        } else {
            Anexo::V
        }
    }
}

impl Default for BracketCalculator {
    fn default() -> Self {
        Self::new()
    }
}
