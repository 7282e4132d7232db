//! FV / PV / RATE / NPER / PMT requests

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::finite_result;
use super::ApiError;
use crate::tvm::{self, PaymentTiming};

/// Calculation selected by the `calcType` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcType {
    FutureValue,
    PresentValue,
    Rate,
    NumberOfPeriods,
    Payment,
}

impl CalcType {
    /// Wire code for this calculation
    pub fn code(self) -> &'static str {
        match self {
            CalcType::FutureValue => "FV",
            CalcType::PresentValue => "PV",
            CalcType::Rate => "RATE",
            CalcType::NumberOfPeriods => "NPER",
            CalcType::Payment => "PMT",
        }
    }
}

impl FromStr for CalcType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FV" => Ok(CalcType::FutureValue),
            "PV" => Ok(CalcType::PresentValue),
            "RATE" => Ok(CalcType::Rate),
            "NPER" => Ok(CalcType::NumberOfPeriods),
            "PMT" => Ok(CalcType::Payment),
            other => Err(ApiError::UnknownCalculation(other.to_string())),
        }
    }
}

impl fmt::Display for CalcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Inputs for a single time-value calculation.
///
/// Missing numeric fields default to zero. For `RATE`, `rate` is the
/// solver's starting guess.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeValueRequest {
    /// Periodic rate in percent
    #[serde(default)]
    pub rate: f64,

    /// Number of periods
    #[serde(default)]
    pub nper: i32,

    /// Payment per period
    #[serde(default)]
    pub pmt: f64,

    /// Present value
    #[serde(default)]
    pub pv: f64,

    /// Future value
    #[serde(default)]
    pub fv: f64,

    /// Payment timing flag: 1 = beginning of period, otherwise end
    #[serde(default, rename = "type")]
    pub payment_type: i32,

    /// FV, PV, RATE, NPER or PMT
    #[serde(default, rename = "calcType")]
    pub calc_type: String,
}

/// Echo of the request inputs with the computed result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeValueResponse {
    pub rate: f64,
    pub nper: i32,
    pub pmt: f64,
    pub pv: f64,
    pub fv: f64,
    #[serde(rename = "type")]
    pub payment_type: i32,
    #[serde(rename = "calcType")]
    pub calc_type: String,
    pub result: f64,
}

impl TimeValueResponse {
    fn echo(request: &TimeValueRequest, result: f64) -> Self {
        Self {
            rate: request.rate,
            nper: request.nper,
            pmt: request.pmt,
            pv: request.pv,
            fv: request.fv,
            payment_type: request.payment_type,
            calc_type: request.calc_type.clone(),
            result,
        }
    }
}

/// Parse a JSON request body
pub fn parse_time_value_request(body: &str) -> Result<TimeValueRequest, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("time value body rejected: {}", e);
        ApiError::InvalidRequest("Invalid request".to_string())
    })
}

/// Dispatch a request to the matching formula
pub fn evaluate(request: &TimeValueRequest) -> Result<TimeValueResponse, ApiError> {
    let calc_type: CalcType = request.calc_type.parse()?;
    let timing = PaymentTiming::from_flag(request.payment_type);

    debug!("dispatching {} ({:?})", calc_type, timing);

    let result = match calc_type {
        CalcType::FutureValue => {
            tvm::future_value(request.rate, request.nper, request.pmt, request.pv, timing)
        }
        CalcType::PresentValue => {
            tvm::present_value(request.rate, request.nper, request.pmt, request.fv, timing)
        }
        CalcType::Rate => tvm::rate(
            request.nper,
            request.pmt,
            request.pv,
            request.fv,
            timing,
            request.rate,
        )?,
        CalcType::NumberOfPeriods => {
            tvm::number_of_periods(request.rate, request.pmt, request.pv, request.fv, timing)?
        }
        CalcType::Payment => {
            tvm::payment(request.rate, request.nper, request.pv, request.fv, timing)?
        }
    };

    let result = finite_result(calc_type.code(), result)?;
    Ok(TimeValueResponse::echo(request, result))
}
