use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string is not a recognised payer category code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised payer category '{0}' (expected EMPLOYEE, SOLE_PROPRIETOR or CORPORATION)")]
pub struct ParsePayerCategoryError(pub String);

/// Who the tax is being computed for.
///
/// Individuals are taxed on the progressive schedule, corporations at a flat rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayerCategory {
    #[default]
    Employee,
    SoleProprietor,
    Corporation,
}

impl PayerCategory {
    pub const ALL: [PayerCategory; 3] = [
        PayerCategory::Employee,
        PayerCategory::SoleProprietor,
        PayerCategory::Corporation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::SoleProprietor => "SOLE_PROPRIETOR",
            Self::Corporation => "CORPORATION",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::SoleProprietor => "Sole Proprietor",
            Self::Corporation => "Corporation",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMPLOYEE" => Some(Self::Employee),
            "SOLE_PROPRIETOR" => Some(Self::SoleProprietor),
            "CORPORATION" => Some(Self::Corporation),
            _ => None,
        }
    }

    pub fn is_progressive(&self) -> bool {
        !matches!(self, Self::Corporation)
    }
}

impl FromStr for PayerCategory {
    type Err = ParsePayerCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParsePayerCategoryError(s.to_string()))
    }
}

impl fmt::Display for PayerCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_code() {
        for category in PayerCategory::ALL {
            assert_eq!(PayerCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(
            PayerCategory::parse("  sole_proprietor "),
            Some(PayerCategory::SoleProprietor)
        );
    }

    #[test]
    fn from_str_reports_unknown_code() {
        let result = "PARTNERSHIP".parse::<PayerCategory>();

        assert_eq!(
            result,
            Err(ParsePayerCategoryError("PARTNERSHIP".to_string()))
        );
    }

    #[test]
    fn only_corporation_is_flat_rate() {
        assert!(PayerCategory::Employee.is_progressive());
        assert!(PayerCategory::SoleProprietor.is_progressive());
        assert!(!PayerCategory::Corporation.is_progressive());
    }
}
