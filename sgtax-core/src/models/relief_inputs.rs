use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Relief amounts claimed on a single submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefInputs {
    /// CPF cash top-up (own and family accounts combined).
    pub cpf_top_up: Decimal,
    /// Supplementary Retirement Scheme contribution.
    pub srs_contribution: Decimal,
}

impl ReliefInputs {
    pub fn new(
        cpf_top_up: Decimal,
        srs_contribution: Decimal,
    ) -> Self {
        Self {
            cpf_top_up,
            srs_contribution,
        }
    }

    pub fn total(&self) -> Decimal {
        self.cpf_top_up + self.srs_contribution
    }
}
