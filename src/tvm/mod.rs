//! Time-value-of-money formulas
//!
//! Pure functions over scalar inputs:
//! - Closed-form annuity formulas (FV, PV, PMT, NPER)
//! - Newton-Raphson rate solver (RATE)
//! - Nominal/effective annual rate conversion (EAR, APR)
//!
//! All rates are passed in percentage units (5.0 means 5%).

mod annuity;
mod error;
mod rates;
mod solver;

pub use annuity::{future_value, number_of_periods, payment, present_value};
pub use error::TvmError;
pub use rates::{annual_percentage_rate, effective_annual_rate, percent_to_decimal, PaymentTiming};
pub use solver::{rate, RateSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_STEP, DEFAULT_TOLERANCE};
