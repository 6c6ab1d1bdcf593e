use serde::{Deserialize, Serialize};
use std::fmt;

/// Tax regimes accepted in fiscal history records
///
/// This is a closed set: anything else is rejected at the validation
/// boundary with an `INVALID_REGIME` error, never deeper in the
/// calculation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Simples Nacional (unified bracket tables, Anexos I-V)
    Simples,
    /// Lucro Presumido
    Presumido,
    /// Lucro Real
    Real,
    /// Microempreendedor Individual
    Mei,
}

impl Regime {
    /// All known variants, in wire order
    pub fn all() -> [Regime; 4] {
        [Regime::Simples, Regime::Presumido, Regime::Real, Regime::Mei]
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Simples => write!(f, "simples"),
            Regime::Presumido => write!(f, "presumido"),
            Regime::Real => write!(f, "real"),
            Regime::Mei => write!(f, "mei"),
        }
    }
}

impl std::str::FromStr for Regime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simples" => Ok(Regime::Simples),
            "presumido" => Ok(Regime::Presumido),
            "real" => Ok(Regime::Real),
            "mei" => Ok(Regime::Mei),
            _ => Err(format!("Invalid regime: {}", s)),
        }
    }
}

impl TryFrom<&str> for Regime {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
