use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse state income tax bucket. Each bucket is a single flat rate applied
/// to gross income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateCategory {
    #[default]
    #[serde(rename = "none")]
    NoIncomeTax,
    Low,
    Medium,
    High,
}

impl StateCategory {
    pub const ALL: [StateCategory; 4] = [Self::NoIncomeTax, Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoIncomeTax => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Flat rate for the category: 0%, 3%, 6% or 10%.
    pub fn rate(&self) -> Decimal {
        match self {
            Self::NoIncomeTax => Decimal::ZERO,
            Self::Low => Decimal::new(3, 2),
            Self::Medium => Decimal::new(6, 2),
            Self::High => Decimal::new(10, 2),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "none" => Some(Self::NoIncomeTax),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Unknown categories carry no state tax.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(code = s, "unrecognized state category, using none");
            Self::default()
        })
    }
}

impl fmt::Display for StateCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
