use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgtax_core::{CitizenshipCategory, PayerCategory, ReliefInputs};

/// One set of form inputs, already validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSubmission {
    pub gross_income: Decimal,
    pub payer: PayerCategory,
    pub citizenship: CitizenshipCategory,
    pub relief: ReliefInputs,
}

impl TaxSubmission {
    /// A submission with no relief claimed.
    pub fn new(
        gross_income: Decimal,
        payer: PayerCategory,
        citizenship: CitizenshipCategory,
    ) -> Self {
        Self {
            gross_income,
            payer,
            citizenship,
            relief: ReliefInputs::default(),
        }
    }

    pub fn with_relief(
        mut self,
        relief: ReliefInputs,
    ) -> Self {
        self.relief = relief;
        self
    }
}

/// Values used when an input omits the payer or citizenship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionDefaults {
    pub payer: PayerCategory,
    pub citizenship: CitizenshipCategory,
}
