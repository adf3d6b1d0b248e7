//! Input and output plumbing around the tax core: CSV submission loading,
//! per-submission report assembly and spreadsheet-style CSV export.

pub mod export;
pub mod format;
pub mod loader;
pub mod report;
pub mod submission;

pub use export::{ExportError, ReportExporter};
pub use loader::{SubmissionLoadError, SubmissionLoader};
pub use report::SubmissionReport;
pub use submission::{SubmissionDefaults, TaxSubmission};
