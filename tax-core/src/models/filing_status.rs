use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJointly,
    MarriedSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedJointly,
        Self::MarriedSeparately,
        Self::HeadOfHousehold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJointly => "marriedJointly",
            Self::MarriedSeparately => "marriedSeparately",
            Self::HeadOfHousehold => "headOfHousehold",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJointly => "Married Filing Jointly",
            Self::MarriedSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// Strict parse of a status code. Returns `None` for anything unknown.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "single" => Some(Self::Single),
            "marriedJointly" => Some(Self::MarriedJointly),
            "marriedSeparately" => Some(Self::MarriedSeparately),
            "headOfHousehold" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Lenient parse used at the user-input boundary: unknown codes become
    /// [`FilingStatus::Single`].
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(code = s, "unrecognized filing status, using single");
            Self::default()
        })
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
