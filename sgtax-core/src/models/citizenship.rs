use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string is not a recognised citizenship code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised citizenship '{0}' (expected RESIDENT, CITIZEN_PR or FOREIGNER)")]
pub struct ParseCitizenshipError(pub String);

/// Residency status of an individual taxpayer. Determines relief caps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CitizenshipCategory {
    /// Citizens and permanent residents.
    #[default]
    #[serde(alias = "CITIZEN_PR")]
    Resident,
    Foreigner,
}

impl CitizenshipCategory {
    pub const ALL: [CitizenshipCategory; 2] =
        [CitizenshipCategory::Resident, CitizenshipCategory::Foreigner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "RESIDENT",
            Self::Foreigner => "FOREIGNER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Resident => "Citizens & PR",
            Self::Foreigner => "Foreigners",
        }
    }

    /// Accepts `CITIZEN_PR` as a synonym for `RESIDENT`. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RESIDENT" | "CITIZEN_PR" => Some(Self::Resident),
            "FOREIGNER" => Some(Self::Foreigner),
            _ => None,
        }
    }

    /// Maximum CPF cash top-up relief. Foreigners cannot top up.
    pub fn cpf_cap(&self) -> Decimal {
        match self {
            Self::Resident => dec!(16000),
            Self::Foreigner => Decimal::ZERO,
        }
    }

    /// Maximum SRS contribution relief.
    pub fn srs_cap(&self) -> Decimal {
        match self {
            Self::Resident => dec!(15300),
            Self::Foreigner => dec!(35700),
        }
    }

    pub fn total_relief_cap(&self) -> Decimal {
        self.cpf_cap() + self.srs_cap()
    }
}

impl FromStr for CitizenshipCategory {
    type Err = ParseCitizenshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseCitizenshipError(s.to_string()))
    }
}

impl fmt::Display for CitizenshipCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
