//! Request boundary shared by the HTTP server, the Lambda handler and the
//! batch runner
//!
//! Everything here is parameter marshalling: parse raw inputs, reject bad
//! ones before touching the formulas, dispatch on the calculation type and
//! shape the response. Transports only move bytes in and out.

mod annual_rate;
mod error;
mod table;
mod time_value;

pub use annual_rate::{apr_lookup, ear_lookup, AprResponse, EarResponse};
pub use error::ApiError;
pub use table::{receive_table, TableReceipt};
pub use time_value::{
    evaluate, parse_time_value_request, CalcType, TimeValueRequest, TimeValueResponse,
};
