//! CSV loader for batches of tax submissions.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header
//! names are case-sensitive.
//!
//! | Column             | Required | Type    | Notes                                          |
//! |--------------------|----------|---------|------------------------------------------------|
//! | `income`           | yes      | decimal | Gross annual income, e.g. `165000.00`          |
//! | `payer`            | no       | string  | `EMPLOYEE`, `SOLE_PROPRIETOR`, `CORPORATION`   |
//! | `citizenship`      | no       | string  | `RESIDENT` (or `CITIZEN_PR`), `FOREIGNER`      |
//! | `cpf_top_up`       | no       | decimal | Empty cell means `0`                           |
//! | `srs_contribution` | no       | decimal | Empty cell means `0`                           |
//!
//! Missing `payer` / `citizenship` cells take the loader's
//! [`SubmissionDefaults`].
//!
//! ### Example
//!
//! ```csv
//! income,payer,citizenship,cpf_top_up,srs_contribution
//! 165000,EMPLOYEE,RESIDENT,,4000
//! 200000,EMPLOYEE,FOREIGNER,,35700
//! 500000,CORPORATION,,,
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use sgtax_core::{CitizenshipCategory, PayerCategory, ReliefInputs};
use thiserror::Error;
use tracing::debug;

use crate::submission::{SubmissionDefaults, TaxSubmission};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    income: Decimal,
    payer: Option<String>,
    citizenship: Option<String>,
    cpf_top_up: Option<Decimal>,
    srs_contribution: Option<Decimal>,
}

/// Errors that can occur while loading submission CSV data.
#[derive(Debug, Error)]
pub enum SubmissionLoadError {
    /// The CSV is structurally invalid, a required column is missing, or a
    /// cell has the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based; the header is row 0.
    #[error("unrecognised payer category '{value}' on row {row}")]
    InvalidPayer { value: String, row: usize },

    #[error("unrecognised citizenship '{value}' on row {row}")]
    InvalidCitizenship { value: String, row: usize },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads [`TaxSubmission`]s from CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionLoader {
    defaults: SubmissionDefaults,
}

impl SubmissionLoader {
    pub fn new(defaults: SubmissionDefaults) -> Self {
        Self { defaults }
    }

    /// Parse CSV text and return submissions in file order.
    ///
    /// # Errors
    ///
    /// * [`SubmissionLoadError::Parse`] if the CSV is invalid.
    /// * [`SubmissionLoadError::InvalidPayer`] /
    ///   [`SubmissionLoadError::InvalidCitizenship`] for unknown codes.
    pub fn load_from_str(
        &self,
        input: &str,
    ) -> Result<Vec<TaxSubmission>, SubmissionLoadError> {
        self.load_from_reader(input.as_bytes())
    }

    pub fn load_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<TaxSubmission>, SubmissionLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let submissions = reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row = result?;
                self.convert_row(row, idx + 1)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = submissions.len(), "loaded submissions");
        Ok(submissions)
    }

    /// Read a file from disk and delegate to [`Self::load_from_reader`].
    pub fn load_from_file(
        &self,
        path: &Path,
    ) -> Result<Vec<TaxSubmission>, SubmissionLoadError> {
        let file = std::fs::File::open(path).map_err(|source| SubmissionLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_from_reader(file)
    }

    fn convert_row(
        &self,
        row: CsvRow,
        row_number: usize,
    ) -> Result<TaxSubmission, SubmissionLoadError> {
        let payer = match non_empty(row.payer) {
            Some(value) => PayerCategory::parse(&value).ok_or(
                SubmissionLoadError::InvalidPayer {
                    value,
                    row: row_number,
                },
            )?,
            None => self.defaults.payer,
        };

        let citizenship = match non_empty(row.citizenship) {
            Some(value) => CitizenshipCategory::parse(&value).ok_or(
                SubmissionLoadError::InvalidCitizenship {
                    value,
                    row: row_number,
                },
            )?,
            None => self.defaults.citizenship,
        };

        let relief = ReliefInputs::new(
            row.cpf_top_up.unwrap_or(Decimal::ZERO),
            row.srs_contribution.unwrap_or(Decimal::ZERO),
        );

        Ok(TaxSubmission::new(row.income, payer, citizenship).with_relief(relief))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
