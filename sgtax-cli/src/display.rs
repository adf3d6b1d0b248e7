//! Plain-text rendering for the terminal.

use std::fmt;

use rust_decimal::Decimal;
use sgtax_core::{NoSuggestionReason, ReliefAnalysis, ReliefOutcome, TaxBracket};
use sgtax_data::SubmissionReport;
use sgtax_data::format::{format_currency, format_range, format_rate};

const RULE: &str = "------------------------------------------------------------------------";

/// Summary, breakdown and relief advice for one submission.
pub struct ReportView<'a>(pub &'a SubmissionReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let report = self.0;
        let submission = &report.submission;

        writeln!(f, "Singapore Tax Calculation")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Payer:            {}", submission.payer.label())?;
        if submission.payer.is_progressive() {
            writeln!(f, "Citizenship:      {}", submission.citizenship.label())?;
        }
        amount_line(f, "Gross income:", submission.gross_income)?;
        amount_line(f, "Total relief:", report.total_relief)?;
        amount_line(f, "Taxable income:", report.taxable_income)?;
        amount_line(f, "Total tax:", report.total_tax())?;
        amount_line(f, "Net income:", report.net_income())?;
        writeln!(f, "Marginal rate:    {:>18}", format_rate(report.marginal_rate))?;
        writeln!(f, "Effective rate:   {:>18}", format_rate(report.effective_rate))?;

        writeln!(f)?;
        writeln!(f, "Tax Breakdown by Rate")?;
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "{:>6}  {:<30} {:>16} {:>14}",
            "Rate", "Income range", "Taxable amount", "Tax"
        )?;
        for contribution in &report.tax.breakdown {
            writeln!(
                f,
                "{:>6}  {:<30} {:>16} {:>14}",
                format_rate(contribution.bracket.tax_rate),
                format_range(&contribution.bracket),
                format_currency(contribution.taxable_amount),
                format_currency(contribution.tax_for_bracket),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Tax Relief")?;
        writeln!(f, "{RULE}")?;
        match &report.relief {
            Some(analysis) => write!(f, "{}", ReliefAdvice(analysis)),
            None => writeln!(f, "CPF and SRS relief do not apply to corporations."),
        }
    }
}

fn amount_line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    writeln!(f, "{label:<17} {:>18}", format_currency(amount))
}

/// Advice text for a relief analysis.
pub struct ReliefAdvice<'a>(pub &'a ReliefAnalysis);

impl fmt::Display for ReliefAdvice<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let analysis = self.0;
        let citizenship = analysis.citizenship;

        if analysis.over_limit.cpf {
            writeln!(
                f,
                "CPF cash top-up exceeds the {} limit of {}.",
                citizenship.label(),
                format_currency(citizenship.cpf_cap())
            )?;
        }
        if analysis.over_limit.srs {
            writeln!(
                f,
                "SRS contribution exceeds the {} limit of {}.",
                citizenship.label(),
                format_currency(citizenship.srs_cap())
            )?;
        }
        if analysis.over_limit.combined {
            writeln!(
                f,
                "Total relief of {} exceeds the combined limit of {}.",
                format_currency(analysis.total_relief),
                format_currency(citizenship.total_relief_cap())
            )?;
        }

        match analysis.outcome {
            ReliefOutcome::NoSuggestion(NoSuggestionReason::ZeroRateBand) => {
                writeln!(f, "Taxable income is within the 0% band. No tax is payable.")?;
                return Ok(());
            }
            ReliefOutcome::NoSuggestion(NoSuggestionReason::AlreadyMaximized) => {
                writeln!(f, "Maximum relief achieved.")?;
            }
            ReliefOutcome::Opportunity(opportunity) => {
                writeln!(
                    f,
                    "You are currently in the {} tax bracket.",
                    format_rate(opportunity.current_bracket.tax_rate)
                )?;
                if opportunity.reaches_lower_bracket {
                    writeln!(
                        f,
                        "An additional {} of relief takes you out of this bracket. \
                         Using all remaining relief puts you in the {} bracket.",
                        format_currency(opportunity.relief_to_lower_bracket),
                        format_rate(opportunity.potential_bracket.tax_rate)
                    )?;
                } else {
                    writeln!(
                        f,
                        "Even with the maximum additional relief of {} you would remain in this bracket.",
                        format_currency(analysis.remaining_total_capacity())
                    )?;
                }
                writeln!(
                    f,
                    "Potential tax savings: {}",
                    format_currency(analysis.additional_savings)
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Available relief capacity")?;
        amount_line(f, "  CPF cash top-up:", analysis.remaining_cpf_capacity)?;
        amount_line(f, "  SRS:", analysis.remaining_srs_capacity)?;
        amount_line(f, "  Total:", analysis.remaining_total_capacity())
    }
}

/// The progressive schedule and the corporate rate.
pub struct BracketTable<'a> {
    pub brackets: &'a [TaxBracket],
    pub corporate_rate: Decimal,
}

impl fmt::Display for BracketTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Individual income tax rates")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:<32} {:>8}", "Chargeable income", "Rate")?;
        for bracket in self.brackets {
            writeln!(
                f,
                "{:<32} {:>8}",
                format_range(bracket),
                format_rate(bracket.tax_rate)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Corporate tax rate: {}", format_rate(self.corporate_rate))
    }
}

/// One line per batch row.
pub struct BatchLine<'a> {
    pub row: usize,
    pub report: &'a SubmissionReport,
}

impl fmt::Display for BatchLine<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let report = self.report;
        write!(
            f,
            "#{:<4} {:<16} {:>16} taxable {:>16} tax {:>14} ({})",
            self.row,
            report.submission.payer.as_str(),
            format_currency(report.submission.gross_income),
            format_currency(report.taxable_income),
            format_currency(report.total_tax()),
            report.advice_label()
        )
    }
}
