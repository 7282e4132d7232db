//! Rate conventions: percent handling, payment timing, EAR/APR conversion

use serde::{Deserialize, Serialize};

use super::TvmError;

/// When payments fall within each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// End of period (annuity immediate)
    #[default]
    Ordinary,
    /// Beginning of period (annuity due)
    Due,
}

impl PaymentTiming {
    /// Map the wire flag used by clients: `1` is due, anything else is ordinary
    pub fn from_flag(flag: i32) -> Self {
        if flag == 1 {
            PaymentTiming::Due
        } else {
            PaymentTiming::Ordinary
        }
    }

    /// Multiplier applied to `rate` in the payment growth factor (1 + rate * t)
    pub fn type_multiplier(self) -> f64 {
        match self {
            PaymentTiming::Ordinary => 0.0,
            PaymentTiming::Due => 1.0,
        }
    }
}

/// Convert a percentage (5.0) to a decimal fraction (0.05)
pub fn percent_to_decimal(percent: f64) -> f64 {
    percent / 100.0
}

/// Round a decimal rate to four places in percentage units.
///
/// Scales by 1e6, rounds half away from zero, then divides by 1e4. This is
/// not the same as rounding `rate * 100` to four places: the rounding happens
/// on the larger intermediate.
fn round_rate_percent(decimal_rate: f64) -> f64 {
    (decimal_rate * 1_000_000.0).round() / 10_000.0
}

fn check_compounding(n: u32) -> Result<f64, TvmError> {
    if n == 0 {
        return Err(TvmError::invalid("compounding periods per year must be at least 1"));
    }
    Ok(n as f64)
}

/// Effective annual rate from a nominal annual rate.
///
/// # Arguments
/// * `apr` - Nominal annual rate in percent
/// * `n` - Compounding periods per year
///
/// # Returns
/// EAR in percent, rounded to four decimal places
pub fn effective_annual_rate(apr: f64, n: u32) -> Result<f64, TvmError> {
    let periods = check_compounding(n)?;
    let periodic_rate = percent_to_decimal(apr) / periods;
    let ear = (1.0 + periodic_rate).powf(periods) - 1.0;
    Ok(round_rate_percent(ear))
}

/// Nominal annual rate from an effective annual rate.
///
/// # Arguments
/// * `ear` - Effective annual rate in percent
/// * `n` - Compounding periods per year
///
/// # Returns
/// APR in percent, rounded to four decimal places
pub fn annual_percentage_rate(ear: f64, n: u32) -> Result<f64, TvmError> {
    let periods = check_compounding(n)?;
    let apr = periods * ((1.0 + percent_to_decimal(ear)).powf(1.0 / periods) - 1.0);
    Ok(round_rate_percent(apr))
}
