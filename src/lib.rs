//! TVM Calculator - time-value-of-money formulas behind an HTTP API
//!
//! This library provides:
//! - Annuity formulas: future value, present value, payment, number of periods
//! - Newton-Raphson solver for the periodic rate
//! - Effective/nominal annual rate conversion (EAR, APR)
//! - A request boundary shared by the HTTP server, the Lambda handler and
//!   the CSV batch runner

pub mod tvm;
pub mod api;
pub mod batch;
pub mod server;

// Re-export commonly used types
pub use tvm::{PaymentTiming, RateSolver, TvmError};
pub use api::{ApiError, CalcType, TimeValueRequest, TimeValueResponse};
pub use server::ServerConfig;
