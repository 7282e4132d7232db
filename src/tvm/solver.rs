//! Periodic rate solver
//!
//! Finds the rate at which `future_value` hits a target using Newton-Raphson
//! with a forward-difference derivative.

use super::{future_value, PaymentTiming, TvmError};

/// Maximum Newton iterations before giving up
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Residual |FV(rate) - target| accepted as converged
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Forward-difference step, in percentage points
pub const DEFAULT_STEP: f64 = 0.00001;

/// Newton-Raphson settings for the rate solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSolver {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub step: f64,

    /// Use f(r+h) - f(r) as the slope without dividing by h.
    ///
    /// Matches the first deployed version of the service, which overshoots
    /// every update by a factor of 1/h. That version also tested the
    /// residual after stepping and returned the stepped rate. Off by default.
    pub legacy_unscaled_step: bool,
}

impl Default for RateSolver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            step: DEFAULT_STEP,
            legacy_unscaled_step: false,
        }
    }
}

impl RateSolver {
    /// Solver reproducing the original unscaled update
    pub fn legacy() -> Self {
        Self {
            legacy_unscaled_step: true,
            ..Self::default()
        }
    }

    /// Solve for the periodic rate (percent) that grows `present_value` and
    /// `payment` into `future_value` over `periods`.
    ///
    /// # Returns
    /// * `Ok(rate)` - first iterate whose residual is within tolerance; in
    ///   legacy mode, the iterate one step past it
    /// * `Err(TvmError::ConvergenceError)` - iterations exhausted, or the
    ///   slope vanished / the iterate stopped being finite
    pub fn solve(
        &self,
        periods: i32,
        payment: f64,
        present_value: f64,
        future_value_target: f64,
        timing: PaymentTiming,
        guess: f64,
    ) -> Result<f64, TvmError> {
        let objective =
            |r: f64| future_value(r, periods, payment, present_value, timing) - future_value_target;

        let mut rate = guess;

        for iteration in 0..self.max_iterations {
            let f = objective(rate);

            if !self.legacy_unscaled_step && f.abs() < self.tolerance {
                return Ok(rate);
            }

            let mut slope = objective(rate + self.step) - f;
            if !self.legacy_unscaled_step {
                slope /= self.step;
            }

            // Flat or blown-up objective: Newton cannot make progress
            if slope == 0.0 || !slope.is_finite() {
                return Err(TvmError::ConvergenceError {
                    iterations: iteration + 1,
                });
            }

            rate -= f / slope;

            if !rate.is_finite() {
                return Err(TvmError::ConvergenceError {
                    iterations: iteration + 1,
                });
            }

            if self.legacy_unscaled_step && f.abs() < self.tolerance {
                return Ok(rate);
            }
        }

        Err(TvmError::ConvergenceError {
            iterations: self.max_iterations,
        })
    }
}

/// Solve for the periodic rate with the default solver settings.
///
/// # Arguments
/// * `periods` - Number of periods
/// * `payment` - Level payment per period
/// * `present_value` - Amount at time zero
/// * `future_value` - Target amount after `periods`
/// * `timing` - End or beginning of period payments
/// * `guess` - Starting rate in percent
pub fn rate(
    periods: i32,
    payment: f64,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
    guess: f64,
) -> Result<f64, TvmError> {
    RateSolver::default().solve(periods, payment, present_value, future_value, timing, guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_recovers_known_rates() {
        for &known in &[1.0, 5.0, 10.0, 20.0] {
            let fv = future_value(known, 12, -100.0, 1000.0, PaymentTiming::Ordinary);

            for &guess in &[known - 2.0, known + 2.0] {
                let solved = rate(12, -100.0, 1000.0, fv, PaymentTiming::Ordinary, guess)
                    .unwrap_or_else(|e| panic!("rate {} from guess {}: {}", known, guess, e));
                assert_abs_diff_eq!(solved, known, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_recovers_rate_for_annuity_due() {
        let fv = future_value(0.75, 48, -250.0, 0.0, PaymentTiming::Due);
        let solved = rate(48, -250.0, 0.0, fv, PaymentTiming::Due, 2.0).unwrap();
        assert_abs_diff_eq!(solved, 0.75, epsilon = 1e-4);
    }

    #[test]
    fn test_exact_guess_returns_immediately() {
        let fv = future_value(4.0, 24, -10.0, 500.0, PaymentTiming::Ordinary);

        let solver = RateSolver {
            max_iterations: 1,
            ..RateSolver::default()
        };
        let solved = solver
            .solve(24, -10.0, 500.0, fv, PaymentTiming::Ordinary, 4.0)
            .unwrap();
        assert_eq!(solved, 4.0);

        let legacy = RateSolver::legacy()
            .solve(24, -10.0, 500.0, fv, PaymentTiming::Ordinary, 4.0)
            .unwrap();
        assert_eq!(legacy, 4.0);
    }

    #[test]
    fn test_flat_objective_fails() {
        // No payment and no principal: FV is zero at every rate
        let result = rate(12, 0.0, 0.0, 100.0, PaymentTiming::Ordinary, 5.0);
        assert_eq!(result, Err(TvmError::ConvergenceError { iterations: 1 }));
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let fv = future_value(10.0, 12, -100.0, 1000.0, PaymentTiming::Ordinary);
        let solver = RateSolver {
            max_iterations: 1,
            ..RateSolver::default()
        };

        let result = solver.solve(12, -100.0, 1000.0, fv, PaymentTiming::Ordinary, 30.0);
        assert_eq!(result, Err(TvmError::ConvergenceError { iterations: 1 }));
    }

    /// The first release's loop, step for step
    fn first_release_rate(
        periods: i32,
        payment: f64,
        present_value: f64,
        target: f64,
        timing: PaymentTiming,
        guess: f64,
    ) -> Option<f64> {
        let mut rate = guess;
        for _ in 0..100 {
            let f = future_value(rate, periods, payment, present_value, timing) - target;
            let df = future_value(rate + 0.00001, periods, payment, present_value, timing)
                - target
                - f;
            rate -= f / df;
            if f.abs() < 1e-6 {
                return Some(rate);
            }
        }
        None
    }

    #[test]
    fn test_legacy_matches_first_release() {
        // Residual inside tolerance but not zero: the first release still
        // takes one unscaled step before returning
        let target = future_value(5.0, 12, -100.0, 1000.0, PaymentTiming::Ordinary) + 5e-7;

        let expected = first_release_rate(12, -100.0, 1000.0, target, PaymentTiming::Ordinary, 5.0)
            .unwrap();
        assert!(expected != 5.0);

        let legacy = RateSolver::legacy()
            .solve(12, -100.0, 1000.0, target, PaymentTiming::Ordinary, 5.0)
            .unwrap();
        assert_eq!(legacy, expected);

        // The corrected solver accepts the guess as it stands
        let corrected = rate(12, -100.0, 1000.0, target, PaymentTiming::Ordinary, 5.0).unwrap();
        assert_eq!(corrected, 5.0);
    }

    #[test]
    fn test_legacy_flag() {
        assert!(!RateSolver::default().legacy_unscaled_step);
        assert!(RateSolver::legacy().legacy_unscaled_step);
        assert_eq!(RateSolver::legacy().max_iterations, DEFAULT_MAX_ITERATIONS);
    }
}
