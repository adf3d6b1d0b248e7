//! Spreadsheet-style CSV export.
//!
//! A single-submission report is a summary block followed by the bracket
//! breakdown table:
//!
//! ```text
//! Singapore Tax Calculation Summary,
//! ,
//! Income Details,
//! Gross Income,"165,000.00"
//! Total Relief,"4,000.00"
//!   CPF Cash Top-up,0.00
//!   SRS Contribution,"4,000.00"
//! Taxable Income,"161,000.00"
//! Total Tax,"14,130.00"
//! ,
//! Tax Breakdown by Rate,
//! Tax Rate,Income Range,Taxable Amount,Tax
//! 0.0%,"0.00 - 20,000.00","20,000.00",0.00
//! ...
//! ```
//!
//! A batch export is one row per submission with a header row.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::format::{format_currency, format_range, format_rate};
use crate::report::SubmissionReport;

/// File name used when only an export directory is configured.
pub const DEFAULT_REPORT_FILE_NAME: &str = "singapore-tax-calculation.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    #[serde(rename = "Gross Income")]
    gross_income: String,
    #[serde(rename = "Payer")]
    payer: &'a str,
    #[serde(rename = "Citizenship")]
    citizenship: &'a str,
    #[serde(rename = "CPF Cash Top-up")]
    cpf_top_up: String,
    #[serde(rename = "SRS Contribution")]
    srs_contribution: String,
    #[serde(rename = "Taxable Income")]
    taxable_income: String,
    #[serde(rename = "Total Tax")]
    total_tax: String,
    #[serde(rename = "Effective Rate")]
    effective_rate: String,
    #[serde(rename = "Additional Savings")]
    additional_savings: String,
    #[serde(rename = "Relief Advice")]
    advice: &'a str,
}

impl<'a> BatchRow<'a> {
    fn from_report(report: &'a SubmissionReport) -> Self {
        let submission = &report.submission;
        Self {
            gross_income: format_currency(submission.gross_income),
            payer: submission.payer.as_str(),
            citizenship: submission.citizenship.as_str(),
            cpf_top_up: format_currency(submission.relief.cpf_top_up),
            srs_contribution: format_currency(submission.relief.srs_contribution),
            taxable_income: format_currency(report.taxable_income),
            total_tax: format_currency(report.total_tax()),
            effective_rate: format_rate(report.effective_rate),
            additional_savings: format_currency(report.additional_savings()),
            advice: report.advice_label(),
        }
    }
}

/// Writes reports as CSV.
pub struct ReportExporter;

impl ReportExporter {
    /// Writes the summary block and breakdown table for one submission.
    pub fn write_report<W: Write>(
        writer: W,
        report: &SubmissionReport,
    ) -> Result<(), ExportError> {
        let mut csv = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        let relief = &report.submission.relief;

        csv.write_record(["Singapore Tax Calculation Summary", ""])?;
        csv.write_record(["", ""])?;
        csv.write_record(["Income Details", ""])?;
        amount_row(&mut csv, "Gross Income", report.submission.gross_income)?;
        amount_row(&mut csv, "Total Relief", report.total_relief)?;
        amount_row(&mut csv, "  CPF Cash Top-up", relief.cpf_top_up)?;
        amount_row(&mut csv, "  SRS Contribution", relief.srs_contribution)?;
        amount_row(&mut csv, "Taxable Income", report.taxable_income)?;
        amount_row(&mut csv, "Total Tax", report.total_tax())?;
        csv.write_record(["", ""])?;
        csv.write_record(["Tax Breakdown by Rate", ""])?;
        csv.write_record(["Tax Rate", "Income Range", "Taxable Amount", "Tax"])?;

        for contribution in &report.tax.breakdown {
            csv.write_record([
                format_rate(contribution.bracket.tax_rate),
                format_range(&contribution.bracket),
                format_currency(contribution.taxable_amount),
                format_currency(contribution.tax_for_bracket),
            ])?;
        }

        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes one row per report, with a header row.
    pub fn write_batch<W: Write>(
        writer: W,
        reports: &[SubmissionReport],
    ) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);

        for report in reports {
            csv.serialize(BatchRow::from_report(report))?;
        }

        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn export_report_to_file(
        path: &Path,
        report: &SubmissionReport,
    ) -> Result<(), ExportError> {
        Self::write_report(create(path)?, report)?;
        info!(path = %path.display(), "report written");
        Ok(())
    }

    pub fn export_batch_to_file(
        path: &Path,
        reports: &[SubmissionReport],
    ) -> Result<(), ExportError> {
        Self::write_batch(create(path)?, reports)?;
        info!(path = %path.display(), rows = reports.len(), "batch report written");
        Ok(())
    }
}

fn amount_row<W: Write>(
    csv: &mut csv::Writer<W>,
    label: &str,
    amount: Decimal,
) -> Result<(), csv::Error> {
    csv.write_record([label, format_currency(amount).as_str()])
}

fn create(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sgtax_core::{CitizenshipCategory, PayerCategory, ReliefInputs};

    use super::*;
    use crate::submission::TaxSubmission;

    fn sample_report() -> SubmissionReport {
        SubmissionReport::build(
            TaxSubmission::new(
                dec!(165000),
                PayerCategory::Employee,
                CitizenshipCategory::Resident,
            )
            .with_relief(ReliefInputs::new(dec!(0), dec!(4000))),
        )
    }

    fn render(report: &SubmissionReport) -> String {
        let mut buffer = Vec::new();
        ReportExporter::write_report(&mut buffer, report).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn report_summary_block() {
        let output = render(&sample_report());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Singapore Tax Calculation Summary,");
        assert_eq!(lines[3], "Gross Income,\"165,000.00\"");
        assert_eq!(lines[4], "Total Relief,\"4,000.00\"");
        assert_eq!(lines[5], "  CPF Cash Top-up,0.00");
        assert_eq!(lines[7], "Taxable Income,\"161,000.00\"");
        assert_eq!(lines[8], "Total Tax,\"14,130.00\"");
        assert_eq!(lines[11], "Tax Rate,Income Range,Taxable Amount,Tax");
    }

    #[test]
    fn report_breakdown_rows() {
        let output = render(&sample_report());
        let rows: Vec<&str> = output.lines().skip(12).collect();

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], "0.0%,\"0.00 - 20,000.00\",\"20,000.00\",0.00");
        assert_eq!(rows[2], "3.5%,\"30,001.00 - 40,000.00\",\"10,000.00\",350.00");
        assert_eq!(rows[6], "18.0%,\"160,001.00 - 200,000.00\",\"1,000.00\",180.00");
    }

    #[test]
    fn report_top_bracket_range() {
        let report = SubmissionReport::build(TaxSubmission::new(
            dec!(400000),
            PayerCategory::Employee,
            CitizenshipCategory::Resident,
        ));

        let output = render(&report);
        let last = output.lines().last().unwrap();

        assert_eq!(last, "22.0%,\"Above 320,001.00\",\"80,000.00\",\"17,600.00\"");
    }

    #[test]
    fn batch_has_header_and_row_per_report() {
        let corporate = SubmissionReport::build(TaxSubmission::new(
            dec!(100000),
            PayerCategory::Corporation,
            CitizenshipCategory::Resident,
        ));
        let mut buffer = Vec::new();

        ReportExporter::write_batch(&mut buffer, &[sample_report(), corporate]).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Gross Income,Payer,Citizenship,"));
        assert!(lines[1].ends_with(",lower bracket reachable"));
        assert!(lines[2].contains(",CORPORATION,"));
        assert!(lines[2].ends_with(",not applicable"));
    }

    #[test]
    fn export_to_missing_directory_is_io_error() {
        let path = Path::new("/this/path/does/not/exist/report.csv");

        let result = ReportExporter::export_report_to_file(path, &sample_report());

        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
