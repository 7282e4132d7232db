//! TVM Calculator CLI
//!
//! One subcommand per formula, plus `batch` for CSV files

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use tvm_calculator::batch;
use tvm_calculator::tvm::{self, PaymentTiming, RateSolver};

#[derive(Parser)]
#[command(name = "tvm", version, about = "Time-value-of-money calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Rates are in percent; payments and values follow the annuity sign
/// convention (money paid out is negative)
#[derive(Subcommand)]
enum Command {
    /// Future value
    Fv {
        #[arg(long, allow_hyphen_values = true)]
        rate: f64,
        #[arg(long, allow_hyphen_values = true)]
        nper: i32,
        #[arg(long, allow_hyphen_values = true)]
        pmt: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        pv: f64,
        #[command(flatten)]
        timing: TimingArg,
    },
    /// Present value
    Pv {
        #[arg(long, allow_hyphen_values = true)]
        rate: f64,
        #[arg(long, allow_hyphen_values = true)]
        nper: i32,
        #[arg(long, allow_hyphen_values = true)]
        pmt: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        fv: f64,
        #[command(flatten)]
        timing: TimingArg,
    },
    /// Payment per period
    Pmt {
        #[arg(long, allow_hyphen_values = true)]
        rate: f64,
        #[arg(long, allow_hyphen_values = true)]
        nper: i32,
        #[arg(long, allow_hyphen_values = true)]
        pv: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        fv: f64,
        #[command(flatten)]
        timing: TimingArg,
    },
    /// Number of periods
    Nper {
        #[arg(long, allow_hyphen_values = true)]
        rate: f64,
        #[arg(long, allow_hyphen_values = true)]
        pmt: f64,
        #[arg(long, allow_hyphen_values = true)]
        pv: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        fv: f64,
        #[command(flatten)]
        timing: TimingArg,
    },
    /// Periodic rate, solved iteratively
    Rate {
        #[arg(long, allow_hyphen_values = true)]
        nper: i32,
        #[arg(long, allow_hyphen_values = true)]
        pmt: f64,
        #[arg(long, allow_hyphen_values = true)]
        pv: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        fv: f64,
        /// Starting rate in percent
        #[arg(long, allow_hyphen_values = true, default_value_t = 10.0)]
        guess: f64,
        /// Use the unscaled finite-difference step of the first release
        #[arg(long)]
        legacy_step: bool,
        #[command(flatten)]
        timing: TimingArg,
    },
    /// Effective annual rate from a nominal rate
    Ear {
        #[arg(long, allow_hyphen_values = true)]
        apr: f64,
        /// Compounding periods per year
        #[arg(short, long)]
        n: u32,
    },
    /// Nominal annual rate from an effective rate
    Apr {
        #[arg(long, allow_hyphen_values = true)]
        ear: f64,
        /// Compounding periods per year
        #[arg(short, long)]
        n: u32,
    },
    /// Evaluate a CSV of requests (calcType,rate,nper,pmt,pv,fv,type)
    Batch {
        input: PathBuf,
        /// Output CSV; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TimingArg {
    /// Payments at the beginning of each period
    #[arg(long)]
    due: bool,
}

impl TimingArg {
    fn timing(&self) -> PaymentTiming {
        if self.due {
            PaymentTiming::Due
        } else {
            PaymentTiming::Ordinary
        }
    }
}

fn run_batch(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();

    let rows = batch::read_requests_from_path(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    info!("loaded {} rows from {}", rows.len(), input.display());

    let outcomes = batch::evaluate_rows(&rows);
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            batch::write_outcomes(file, &outcomes)?;
            eprintln!("Output written to {}", path.display());
        }
        None => batch::write_outcomes(io::stdout().lock(), &outcomes)?,
    }

    eprintln!(
        "{} rows, {} failed, in {:?}",
        outcomes.len(),
        failed,
        start.elapsed()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let value = match cli.command {
        Command::Fv { rate, nper, pmt, pv, timing } => {
            tvm::future_value(rate, nper, pmt, pv, timing.timing())
        }
        Command::Pv { rate, nper, pmt, fv, timing } => {
            tvm::present_value(rate, nper, pmt, fv, timing.timing())
        }
        Command::Pmt { rate, nper, pv, fv, timing } => {
            tvm::payment(rate, nper, pv, fv, timing.timing())?
        }
        Command::Nper { rate, pmt, pv, fv, timing } => {
            tvm::number_of_periods(rate, pmt, pv, fv, timing.timing())?
        }
        Command::Rate { nper, pmt, pv, fv, guess, legacy_step, timing } => {
            let solver = if legacy_step {
                RateSolver::legacy()
            } else {
                RateSolver::default()
            };
            solver.solve(nper, pmt, pv, fv, timing.timing(), guess)?
        }
        Command::Ear { apr, n } => tvm::effective_annual_rate(apr, n)?,
        Command::Apr { ear, n } => tvm::annual_percentage_rate(ear, n)?,
        Command::Batch { input, output } => return run_batch(input, output),
    };

    println!("{}", value);
    Ok(())
}
