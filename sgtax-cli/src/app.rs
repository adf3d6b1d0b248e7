//! Command implementations. `main` parses arguments and delegates here.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sgtax_core::TaxEngine;
use sgtax_data::export::DEFAULT_REPORT_FILE_NAME;
use sgtax_data::{ReportExporter, SubmissionDefaults, SubmissionLoader, SubmissionReport};
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_CONFIG_FILE, ExportConfig, LoggingConfig};
use crate::display::{BatchLine, BracketTable, ReportView};
use crate::logging;
use crate::validation::{TaxForm, validate_submission};

/// Loads the given config file, or `sgtax.toml` if present.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path).context("loading configuration"),
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))
            .context("loading configuration"),
    }
}

/// Level to apply after startup, or `None` to keep `RUST_LOG`.
///
/// `--log-level` wins, then `RUST_LOG`, then the config file.
pub fn effective_log_level<'a>(
    cli_level: Option<&'a str>,
    env_filter_set: bool,
    config: &'a LoggingConfig,
) -> Option<&'a str> {
    match cli_level {
        Some(level) => Some(level),
        None if env_filter_set => None,
        None => Some(config.level.as_str()),
    }
}

/// Applies the level and log file chosen on the command line or in config.
pub fn configure_logging(
    cli_level: Option<&str>,
    cli_log_file: Option<&Path>,
    config: &LoggingConfig,
) -> Result<()> {
    let env_filter_set = std::env::var_os("RUST_LOG").is_some();
    if let Some(level) = effective_log_level(cli_level, env_filter_set, config) {
        logging::set_log_level(level)?;
    }

    if let Some(path) = cli_log_file.or(config.file.as_deref()) {
        logging::enable_file_logging(path)?;
        debug!(path = %path.display(), "file logging enabled");
    }
    Ok(())
}

/// Where `--export` writes.
///
/// An explicit path is used as given. A bare `--export` writes the default
/// file name into the configured directory, or the working directory.
pub fn resolve_export_path(
    flag: Option<Option<&Path>>,
    config: &ExportConfig,
) -> Option<PathBuf> {
    match flag? {
        Some(path) => Some(path.to_path_buf()),
        None => Some(
            config
                .directory
                .as_deref()
                .unwrap_or(Path::new("."))
                .join(DEFAULT_REPORT_FILE_NAME),
        ),
    }
}

/// Validates the form, prints the report and optionally exports it.
pub fn calculate<W: Write>(
    form: &TaxForm,
    export_path: Option<&Path>,
    out: &mut W,
) -> Result<SubmissionReport> {
    let submission = form.validate_for_submit().context("invalid input")?;
    let report = SubmissionReport::build(submission);
    info!(
        payer = %submission.payer,
        gross_income = %submission.gross_income,
        total_tax = %report.total_tax(),
        "tax calculated"
    );

    write!(out, "{}", ReportView(&report))?;

    if let Some(path) = export_path {
        ReportExporter::export_report_to_file(path, &report)
            .with_context(|| format!("exporting report to '{}'", path.display()))?;
        writeln!(out)?;
        writeln!(out, "Report written to {}", path.display())?;
    }
    Ok(report)
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchResult {
    pub reports: Vec<SubmissionReport>,
    /// 1-based rows that failed validation.
    pub rejected: Vec<usize>,
}

/// Loads, validates and computes every row of a submission CSV.
///
/// Invalid rows are reported and skipped; the rest are still computed.
pub fn run_batch<W: Write>(
    file: &Path,
    defaults: SubmissionDefaults,
    output: Option<&Path>,
    out: &mut W,
) -> Result<BatchResult> {
    let submissions = SubmissionLoader::new(defaults)
        .load_from_file(file)
        .with_context(|| format!("loading submissions from '{}'", file.display()))?;
    info!(path = %file.display(), rows = submissions.len(), "submissions loaded");

    let mut result = BatchResult {
        reports: Vec::with_capacity(submissions.len()),
        rejected: Vec::new(),
    };

    for (idx, submission) in submissions.into_iter().enumerate() {
        let row = idx + 1;
        match validate_submission(&submission) {
            Ok(()) => {
                let report = SubmissionReport::build(submission);
                writeln!(out, "{}", BatchLine { row, report: &report })?;
                result.reports.push(report);
            }
            Err(errors) => {
                warn!(row, %errors, "submission rejected");
                writeln!(out, "#{row:<4} invalid: {errors}")?;
                result.rejected.push(row);
            }
        }
    }

    writeln!(
        out,
        "{} computed, {} rejected",
        result.reports.len(),
        result.rejected.len()
    )?;

    if let Some(path) = output {
        ReportExporter::export_batch_to_file(path, &result.reports)
            .with_context(|| format!("writing batch results to '{}'", path.display()))?;
        writeln!(out, "Results written to {}", path.display())?;
    }
    Ok(result)
}

/// Prints the standard schedule.
pub fn print_brackets<W: Write>(out: &mut W) -> Result<()> {
    let engine = TaxEngine::standard();
    write!(
        out,
        "{}",
        BracketTable {
            brackets: engine.brackets(),
            corporate_rate: engine.corporate_rate(),
        }
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sgtax_core::{CitizenshipCategory, PayerCategory};

    use super::*;

    fn temp_file(
        name: &str,
        content: &str,
    ) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sgtax-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    // =========================================================================
    // Option resolution
    // =========================================================================

    #[test]
    fn cli_level_beats_env_and_config() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            file: None,
        };

        assert_eq!(effective_log_level(Some("debug"), true, &config), Some("debug"));
        assert_eq!(effective_log_level(None, true, &config), None);
        assert_eq!(effective_log_level(None, false, &config), Some("warn"));
    }

    #[test]
    fn export_path_resolution() {
        let config = ExportConfig {
            directory: Some(PathBuf::from("reports")),
        };

        assert_eq!(resolve_export_path(None, &config), None);
        assert_eq!(
            resolve_export_path(Some(Some(Path::new("out.csv"))), &config),
            Some(PathBuf::from("out.csv"))
        );
        assert_eq!(
            resolve_export_path(Some(None), &config),
            Some(Path::new("reports").join(DEFAULT_REPORT_FILE_NAME))
        );
        assert_eq!(
            resolve_export_path(Some(None), &ExportConfig::default()),
            Some(Path::new(".").join(DEFAULT_REPORT_FILE_NAME))
        );
    }

    // =========================================================================
    // Commands
    // =========================================================================

    #[test]
    fn calculate_prints_report() {
        let form = TaxForm {
            income: Some(dec!(165000)),
            srs_contribution: dec!(4000),
            ..TaxForm::default()
        };
        let mut out = Vec::new();

        let report = calculate(&form, None, &mut out).unwrap();

        assert_eq!(report.total_tax(), dec!(14130));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Singapore Tax Calculation\n"));
        assert!(text.contains("Tax Breakdown by Rate"));
    }

    #[test]
    fn calculate_rejects_invalid_form() {
        let form = TaxForm {
            income: Some(dec!(100000)),
            citizenship: CitizenshipCategory::Foreigner,
            cpf_top_up: dec!(500),
            ..TaxForm::default()
        };
        let mut out = Vec::new();

        let err = calculate(&form, None, &mut out).unwrap_err();

        assert!(format!("{err:#}").contains("foreigners are not eligible"));
        assert!(out.is_empty());
    }

    #[test]
    fn calculate_exports_report() {
        let path = std::env::temp_dir().join(format!("sgtax-{}-report.csv", std::process::id()));
        let form = TaxForm {
            income: Some(dec!(50000)),
            ..TaxForm::default()
        };
        let mut out = Vec::new();

        calculate(&form, Some(path.as_path()), &mut out).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(written.starts_with("Singapore Tax Calculation Summary,"));
        assert!(String::from_utf8(out).unwrap().contains("Report written to"));
    }

    #[test]
    fn batch_skips_invalid_rows() {
        let input = temp_file(
            "batch.csv",
            "income,payer,citizenship,cpf_top_up,srs_contribution\n\
             165000,EMPLOYEE,RESIDENT,,4000\n\
             100000,EMPLOYEE,FOREIGNER,1000,\n\
             500000,CORPORATION,,,\n",
        );
        let mut out = Vec::new();

        let result = run_batch(&input, SubmissionDefaults::default(), None, &mut out).unwrap();
        fs::remove_file(&input).unwrap();

        assert_eq!(result.reports.len(), 2);
        assert_eq!(result.rejected, vec![2]);
        assert_eq!(result.reports[1].submission.payer, PayerCategory::Corporation);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("#2    invalid: foreigners are not eligible"));
        assert!(text.ends_with("2 computed, 1 rejected\n"));
    }

    #[test]
    fn batch_missing_file_is_error() {
        let mut out = Vec::new();

        let result = run_batch(
            Path::new("/no/such/input.csv"),
            SubmissionDefaults::default(),
            None,
            &mut out,
        );

        assert!(result.is_err());
    }

    #[test]
    fn brackets_table() {
        let mut out = Vec::new();

        print_brackets(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Individual income tax rates\n"));
        assert!(text.contains("22.0%"));
    }
}
