//! Everything a front end shows for one submission, computed in one place.

use rust_decimal::Decimal;
use serde::Serialize;
use sgtax_core::calculations::common::non_negative;
use sgtax_core::{
    NoSuggestionReason, ReliefAnalysis, ReliefOptimizer, ReliefOutcome, TaxComputationResult,
    TaxEngine,
};
use tracing::debug;

use crate::submission::TaxSubmission;

/// Results for a single submission.
///
/// CPF and SRS relief only apply to individuals: corporations are taxed on
/// their full income and carry no relief analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub submission: TaxSubmission,
    pub total_relief: Decimal,
    pub taxable_income: Decimal,
    pub tax: TaxComputationResult,
    pub marginal_rate: Decimal,
    pub effective_rate: Decimal,
    pub relief: Option<ReliefAnalysis>,
}

impl SubmissionReport {
    /// Builds the report using the standard schedule.
    pub fn build(submission: TaxSubmission) -> Self {
        Self::build_with(TaxEngine::standard(), submission)
    }

    pub fn build_with(
        engine: TaxEngine<'_>,
        submission: TaxSubmission,
    ) -> Self {
        let (total_relief, taxable_income, relief) = if submission.payer.is_progressive() {
            let analysis = ReliefOptimizer::new(engine).analyze(
                submission.gross_income,
                submission.relief,
                submission.citizenship,
            );
            (analysis.total_relief, analysis.taxable_income, Some(analysis))
        } else {
            (
                Decimal::ZERO,
                non_negative(submission.gross_income),
                None,
            )
        };

        let tax = engine.compute(taxable_income, submission.payer);
        let marginal_rate = engine.marginal_rate(taxable_income, submission.payer);
        let effective_rate = engine.effective_rate(taxable_income, submission.payer);

        debug!(
            payer = %submission.payer,
            %taxable_income,
            total_tax = %tax.total_tax,
            "submission computed"
        );

        Self {
            submission,
            total_relief,
            taxable_income,
            tax,
            marginal_rate,
            effective_rate,
            relief,
        }
    }

    pub fn total_tax(&self) -> Decimal {
        self.tax.total_tax
    }

    /// Gross income left after tax.
    pub fn net_income(&self) -> Decimal {
        self.submission.gross_income - self.tax.total_tax
    }

    /// Short label for the relief outcome, used in tabular output.
    pub fn advice_label(&self) -> &'static str {
        match self.relief.map(|analysis| analysis.outcome) {
            None => "not applicable",
            Some(ReliefOutcome::NoSuggestion(NoSuggestionReason::ZeroRateBand)) => "zero-rate band",
            Some(ReliefOutcome::NoSuggestion(NoSuggestionReason::AlreadyMaximized)) => {
                "relief maximised"
            }
            Some(ReliefOutcome::Opportunity(opportunity)) if opportunity.reaches_lower_bracket => {
                "lower bracket reachable"
            }
            Some(ReliefOutcome::Opportunity(_)) => "savings available",
        }
    }

    /// Savings still achievable through relief, zero when there are none.
    pub fn additional_savings(&self) -> Decimal {
        self.relief
            .and_then(|analysis| analysis.suggestion().map(|_| analysis.additional_savings))
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sgtax_core::{CitizenshipCategory, PayerCategory, ReliefInputs};

    use super::*;

    #[test]
    fn individual_report_applies_relief() {
        let submission = TaxSubmission::new(
            dec!(165000),
            PayerCategory::Employee,
            CitizenshipCategory::Resident,
        )
        .with_relief(ReliefInputs::new(dec!(0), dec!(4000)));

        let report = SubmissionReport::build(submission);

        assert_eq!(report.total_relief, dec!(4000));
        assert_eq!(report.taxable_income, dec!(161000));
        assert_eq!(report.total_tax(), dec!(14130));
        assert_eq!(report.marginal_rate, dec!(0.18));
        assert_eq!(report.net_income(), dec!(150870));
        assert!(report.relief.unwrap().suggestion().is_some());
        assert_eq!(report.advice_label(), "lower bracket reachable");
        assert_eq!(report.additional_savings(), dec!(4125));
    }

    #[test]
    fn sole_proprietor_uses_progressive_schedule() {
        let submission = TaxSubmission::new(
            dec!(40000),
            PayerCategory::SoleProprietor,
            CitizenshipCategory::Resident,
        );

        let report = SubmissionReport::build(submission);

        assert_eq!(report.total_tax(), dec!(550));
        assert_eq!(report.tax.breakdown.len(), 3);
    }

    #[test]
    fn corporation_ignores_personal_relief() {
        let submission = TaxSubmission::new(
            dec!(100000),
            PayerCategory::Corporation,
            CitizenshipCategory::Resident,
        )
        .with_relief(ReliefInputs::new(dec!(5000), dec!(5000)));

        let report = SubmissionReport::build(submission);

        assert_eq!(report.taxable_income, dec!(100000));
        assert_eq!(report.total_relief, dec!(0));
        assert_eq!(report.total_tax(), dec!(17000));
        assert_eq!(report.effective_rate, dec!(0.17));
        assert!(report.relief.is_none());
        assert_eq!(report.advice_label(), "not applicable");
        assert_eq!(report.additional_savings(), dec!(0));
    }

    #[test]
    fn maximised_relief_has_no_savings() {
        let submission = TaxSubmission::new(
            dec!(200000),
            PayerCategory::Employee,
            CitizenshipCategory::Foreigner,
        )
        .with_relief(ReliefInputs::new(dec!(0), dec!(35700)));

        let report = SubmissionReport::build(submission);

        assert_eq!(report.advice_label(), "relief maximised");
        assert_eq!(report.additional_savings(), dec!(0));
    }

    #[test]
    fn breakdown_matches_total() {
        let submission = TaxSubmission::new(
            dec!(777777.77),
            PayerCategory::Employee,
            CitizenshipCategory::Foreigner,
        );

        let report = SubmissionReport::build(submission);

        assert_eq!(report.tax.breakdown_total(), report.total_tax());
    }
}
