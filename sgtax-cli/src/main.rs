use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use sgtax_cli::utils::parse_decimal;
use sgtax_cli::validation::TaxForm;
use sgtax_cli::{app, logging};
use sgtax_core::{CitizenshipCategory, PayerCategory};
use sgtax_data::SubmissionDefaults;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Singapore income tax estimator.
///
/// Computes progressive personal tax or flat corporate tax, shows the
/// per-bracket breakdown and suggests how much more CPF/SRS relief could save.
#[derive(Debug, Parser)]
#[command(name = "sgtax", version)]
struct Cli {
    /// TOML configuration file. Defaults to `sgtax.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (e.g. `debug`, `sgtax_core=trace`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax for a single income.
    Calculate(CalculateArgs),

    /// Calculate tax for every row of a submission CSV.
    Batch {
        /// CSV with headers `income,payer,citizenship,cpf_top_up,srs_contribution`.
        #[arg(long)]
        file: PathBuf,

        /// Write the results as CSV.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the tax brackets.
    Brackets,
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Gross annual income. Commas are accepted (`165,000`).
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true)]
    income: Option<Decimal>,

    /// EMPLOYEE, SOLE_PROPRIETOR or CORPORATION.
    #[arg(long)]
    payer: Option<PayerCategory>,

    /// RESIDENT (or CITIZEN_PR) or FOREIGNER.
    #[arg(long)]
    citizenship: Option<CitizenshipCategory>,

    /// CPF cash top-up claimed.
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    cpf_top_up: Decimal,

    /// SRS contribution claimed.
    #[arg(long = "srs", value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    srs_contribution: Decimal,

    /// Write the CSV report. Without a path, writes into the configured
    /// export directory.
    #[arg(long, num_args = 0..=1)]
    export: Option<Option<PathBuf>>,
}

impl CalculateArgs {
    fn to_form(
        &self,
        defaults: SubmissionDefaults,
    ) -> TaxForm {
        TaxForm {
            income: self.income,
            payer: self.payer.unwrap_or(defaults.payer),
            citizenship: self.citizenship.unwrap_or(defaults.citizenship),
            cpf_top_up: self.cpf_top_up,
            srs_contribution: self.srs_contribution,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging("info");

    let config = app::load_config(cli.config.as_deref())?;
    app::configure_logging(
        cli.log_level.as_deref(),
        cli.log_file.as_deref(),
        &config.logging,
    )
    .context("configuring logging")?;
    debug!(?cli, "starting");

    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Calculate(args) => {
            let form = args.to_form(config.defaults);
            let export = app::resolve_export_path(
                args.export.as_ref().map(|path| path.as_deref()),
                &config.export,
            );
            app::calculate(&form, export.as_deref(), &mut out)?;
        }
        Command::Batch { file, output } => {
            let result = app::run_batch(file, config.defaults, output.as_deref(), &mut out)?;
            if !result.rejected.is_empty() {
                anyhow::bail!("{} row(s) failed validation", result.rejected.len());
            }
        }
        Command::Brackets => app::print_brackets(&mut out)?,
    }

    Ok(())
}
