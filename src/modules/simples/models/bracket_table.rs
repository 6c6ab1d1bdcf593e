//! Statutory Simples Nacional bracket tables (LC 123/2006, as amended
//! by LC 155/2016)
//!
//! Each table maps trailing-12-month gross revenue (RBT12) to a nominal
//! rate and a deduction constant. The values below are statutory data
//! and must match the published tables digit for digit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// One revenue band of a bracket table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Upper RBT12 limit of this band, inclusive (BRL)
    #[serde(rename = "limite")]
    pub limit: Decimal,

    /// Headline rate for the band (%)
    #[serde(rename = "aliquotaNominal")]
    pub nominal_rate: Decimal,

    /// Deduction constant that smooths the transition from the band
    /// below (BRL)
    #[serde(rename = "parcelaDeduzir")]
    pub deduction: Decimal,
}

/// Annex of the Simples Nacional regime, selected by business activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anexo {
    /// Comércio
    I,
    /// Indústria
    II,
    /// Serviços (Fator R >= 28%)
    III,
    /// Serviços do §5º-C (construção, vigilância, advocacia)
    IV,
    /// Serviços (Fator R < 28%)
    V,
}

impl Anexo {
    pub fn all() -> [Anexo; 5] {
        [Anexo::I, Anexo::II, Anexo::III, Anexo::IV, Anexo::V]
    }

    /// The statutory bracket table for this annex
    pub fn table(&self) -> &'static BracketTable {
        match self {
            Anexo::I => &ANEXO_I,
            Anexo::II => &ANEXO_II,
            Anexo::III => &ANEXO_III,
            Anexo::IV => &ANEXO_IV,
            Anexo::V => &ANEXO_V,
        }
    }
}

impl fmt::Display for Anexo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anexo::I => write!(f, "I"),
            Anexo::II => write!(f, "II"),
            Anexo::III => write!(f, "III"),
            Anexo::IV => write!(f, "IV"),
            Anexo::V => write!(f, "V"),
        }
    }
}

impl std::str::FromStr for Anexo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "I" | "1" => Ok(Anexo::I),
            "II" | "2" => Ok(Anexo::II),
            "III" | "3" => Ok(Anexo::III),
            "IV" | "4" => Ok(Anexo::IV),
            "V" | "5" => Ok(Anexo::V),
            _ => Err(format!("Invalid anexo: {}", s)),
        }
    }
}

/// Ordered, immutable bracket table for one annex
///
/// Invariant: limits strictly increase; the last limit is the regime
/// ceiling (R$ 4.800.000,00 for every annex).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketTable {
    pub anexo: Anexo,
    #[serde(rename = "faixas")]
    pub brackets: Vec<Bracket>,
}

impl BracketTable {
    /// The regime ceiling (last bracket's limit)
    pub fn ceiling(&self) -> Decimal {
        self.brackets
            .last()
            .map(|b| b.limit)
            .unwrap_or(Decimal::ZERO)
    }
}

// Table rows are (limit, nominal rate in tenths of a percent, deduction).
fn row(limit: i64, rate_tenths: i64, deduction: i64) -> Bracket {
    Bracket {
        limit: Decimal::from(limit),
        nominal_rate: Decimal::new(rate_tenths, 1),
        deduction: Decimal::from(deduction),
    }
}

static ANEXO_I: LazyLock<BracketTable> = LazyLock::new(|| BracketTable {
    anexo: Anexo::I,
    brackets: vec![
        row(180_000, 40, 0),           // 4.0%
        row(360_000, 73, 5_940),       // 7.3%
        row(720_000, 95, 13_860),      // 9.5%
        row(1_800_000, 107, 22_500),   // 10.7%
        row(3_600_000, 143, 87_300),   // 14.3%
        row(4_800_000, 190, 378_000),  // 19.0%
    ],
});

static ANEXO_II: LazyLock<BracketTable> = LazyLock::new(|| BracketTable {
    anexo: Anexo::II,
    brackets: vec![
        row(180_000, 45, 0),           // 4.5%
        row(360_000, 78, 5_940),       // 7.8%
        row(720_000, 100, 13_860),     // 10.0%
        row(1_800_000, 112, 22_500),   // 11.2%
        row(3_600_000, 147, 85_500),   // 14.7%
        row(4_800_000, 300, 720_000),  // 30.0%
    ],
});

static ANEXO_III: LazyLock<BracketTable> = LazyLock::new(|| BracketTable {
    anexo: Anexo::III,
    brackets: vec![
        row(180_000, 60, 0),           // 6.0%
        row(360_000, 112, 9_360),      // 11.2%
        row(720_000, 135, 17_640),     // 13.5%
        row(1_800_000, 160, 35_640),   // 16.0%
        row(3_600_000, 210, 125_640),  // 21.0%
        row(4_800_000, 330, 648_000),  // 33.0%
    ],
});

static ANEXO_IV: LazyLock<BracketTable> = LazyLock::new(|| BracketTable {
    anexo: Anexo::IV,
    brackets: vec![
        row(180_000, 45, 0),           // 4.5%
        row(360_000, 90, 8_100),       // 9.0%
        row(720_000, 102, 12_420),     // 10.2%
        row(1_800_000, 140, 39_780),   // 14.0%
        row(3_600_000, 220, 183_780),  // 22.0%
        row(4_800_000, 330, 828_000),  // 33.0%
    ],
});

static ANEXO_V: LazyLock<BracketTable> = LazyLock::new(|| BracketTable {
    anexo: Anexo::V,
    brackets: vec![
        row(180_000, 155, 0),          // 15.5%
        row(360_000, 180, 4_500),      // 18.0%
        row(720_000, 195, 9_900),      // 19.5%
        row(1_800_000, 205, 17_100),   // 20.5%
        row(3_600_000, 230, 62_100),   // 23.0%
        row(4_800_000, 305, 540_000),  // 30.5%
    ],
});
