//! Closed-form annuity formulas
//!
//! Sign convention: cash paid out is negative, cash received is positive, so
//! a positive present value grows into a negative future value.

use super::{percent_to_decimal, PaymentTiming, TvmError};

/// Growth factor (1 + r)^n and the annuity factor (1 + r*t)(g - 1)/r
/// for a non-zero decimal rate
fn factors(decimal_rate: f64, periods: i32, timing: PaymentTiming) -> (f64, f64) {
    let growth = (1.0 + decimal_rate).powf(periods as f64);
    let annuity =
        (1.0 + decimal_rate * timing.type_multiplier()) * (growth - 1.0) / decimal_rate;
    (growth, annuity)
}

/// Future value of a present amount plus a level payment stream.
///
/// # Arguments
/// * `rate` - Periodic interest rate in percent
/// * `periods` - Number of compounding periods
/// * `payment` - Level payment per period
/// * `present_value` - Amount at time zero
/// * `timing` - End or beginning of period payments
pub fn future_value(
    rate: f64,
    periods: i32,
    payment: f64,
    present_value: f64,
    timing: PaymentTiming,
) -> f64 {
    if rate == 0.0 {
        return -(present_value + periods as f64 * payment);
    }

    let rate = percent_to_decimal(rate);
    let (growth, annuity) = factors(rate, periods, timing);
    -(present_value * growth + payment * annuity)
}

/// Present value of a future amount plus a level payment stream.
pub fn present_value(
    rate: f64,
    periods: i32,
    payment: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    if rate == 0.0 {
        return -(payment * periods as f64 + future_value);
    }

    let rate = percent_to_decimal(rate);
    let (growth, annuity) = factors(rate, periods, timing);
    -(payment * annuity + future_value) / growth
}

/// Level payment that moves `present_value` to `future_value` over `periods`.
///
/// Zero periods leave nothing to amortise over and are rejected.
pub fn payment(
    rate: f64,
    periods: i32,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> Result<f64, TvmError> {
    if periods == 0 {
        return Err(TvmError::invalid("number of periods must be non-zero"));
    }

    if rate == 0.0 {
        return Ok(-(future_value + present_value) / periods as f64);
    }

    let rate = percent_to_decimal(rate);
    let (growth, annuity) = factors(rate, periods, timing);
    Ok(-(future_value + present_value * growth) / annuity)
}

/// Number of periods for the given payment, present and future values.
///
/// Solved in closed form with logarithms. The non-zero rate branch keeps the
/// expression served to existing clients:
///
/// ```text
/// ln( a / (a - fv*r) / pv ) / ln(1 + r),   a = pmt * (1 + r*t)
/// ```
///
/// which is not the textbook NPER (that would be
/// `ln((a - fv*r) / (a + pv*r)) / ln(1 + r)`). Results that are not finite
/// are reported as `InvalidArgument`.
pub fn number_of_periods(
    rate: f64,
    payment: f64,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> Result<f64, TvmError> {
    if rate == 0.0 {
        if payment == 0.0 {
            return Err(TvmError::invalid("payment must be non-zero when rate is zero"));
        }
        return Ok(-(future_value + present_value) / payment);
    }

    let rate = percent_to_decimal(rate);
    let due_payment = payment + timing.type_multiplier() * payment * rate;
    let ratio = due_payment / (due_payment - future_value * rate) / present_value;
    let periods = ratio.ln() / (1.0 + rate).ln();

    if !periods.is_finite() {
        return Err(TvmError::invalid(format!(
            "no finite number of periods (log argument {})",
            ratio
        )));
    }

    Ok(periods)
}
