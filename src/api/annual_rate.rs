//! EAR / APR lookups keyed by (rate, compounding periods)

use std::collections::HashMap;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::finite_result;
use super::ApiError;
use crate::tvm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarResponse {
    #[serde(rename = "EAR")]
    pub ear: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprResponse {
    #[serde(rename = "APR")]
    pub apr: f64,
}

/// Read and parse a query parameter; missing or unparsable values both
/// produce `message`
fn query_param<T: FromStr>(
    params: &HashMap<String, String>,
    key: &str,
    message: &str,
) -> Result<T, ApiError> {
    params
        .get(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .ok_or_else(|| ApiError::InvalidRequest(message.to_string()))
}

fn finite_param(
    params: &HashMap<String, String>,
    key: &str,
    message: &str,
) -> Result<f64, ApiError> {
    let value: f64 = query_param(params, key, message)?;
    if !value.is_finite() {
        return Err(ApiError::InvalidRequest(message.to_string()));
    }
    Ok(value)
}

/// `?apr=<percent>&n=<periods>` to the effective annual rate
pub fn ear_lookup(params: &HashMap<String, String>) -> Result<EarResponse, ApiError> {
    let apr = finite_param(params, "apr", "Invalid APR format")?;
    let n: u32 = query_param(params, "n", "Invalid number of periods format")?;

    debug!("EAR lookup apr={} n={}", apr, n);
    let ear = finite_result("EAR", tvm::effective_annual_rate(apr, n)?)?;
    Ok(EarResponse { ear })
}

/// `?ear=<percent>&n=<periods>` to the nominal annual rate
pub fn apr_lookup(params: &HashMap<String, String>) -> Result<AprResponse, ApiError> {
    let ear = finite_param(params, "ear", "Invalid EAR format")?;
    let n: u32 = query_param(params, "n", "Invalid number of periods format")?;

    debug!("APR lookup ear={} n={}", ear, n);
    let apr = finite_result("APR", tvm::annual_percentage_rate(ear, n)?)?;
    Ok(AprResponse { apr })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_ear_lookup() {
        let resp = ear_lookup(&params(&[("apr", "12"), ("n", "12")])).unwrap();
        assert_eq!(resp.ear, 12.6825);
        assert_eq!(serde_json::to_string(&resp).unwrap(), r#"{"EAR":12.6825}"#);
    }

    #[test]
    fn test_apr_lookup() {
        let resp = apr_lookup(&params(&[("ear", "12.6825"), ("n", "12")])).unwrap();
        assert_abs_diff_eq!(resp.apr, 12.0, epsilon = 1e-2);
    }

    #[test]
    fn test_bad_rate_format() {
        for raw in ["", "abc", "NaN", "inf"] {
            assert_eq!(
                ear_lookup(&params(&[("apr", raw), ("n", "12")])),
                Err(ApiError::InvalidRequest("Invalid APR format".to_string()))
            );
        }
        assert_eq!(
            apr_lookup(&params(&[("n", "12")])),
            Err(ApiError::InvalidRequest("Invalid EAR format".to_string()))
        );
    }

    #[test]
    fn test_bad_period_format() {
        for raw in ["", "1.5", "-3", "twelve"] {
            assert_eq!(
                ear_lookup(&params(&[("apr", "12"), ("n", raw)])),
                Err(ApiError::InvalidRequest(
                    "Invalid number of periods format".to_string()
                ))
            );
        }
    }

    #[test]
    fn test_zero_periods_is_invalid_argument() {
        let err = apr_lookup(&params(&[("ear", "5"), ("n", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Calculation(tvm::TvmError::InvalidArgument(_))
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_non_finite_results_rejected() {
        // (1 - 2)^(1/12) has no real value
        let err = apr_lookup(&params(&[("ear", "-200"), ("n", "12")])).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Calculation(tvm::TvmError::InvalidArgument(_))
        ));
        assert_eq!(err.status_code(), 400);

        // Finite input, but scaling for rounding overflows
        let err = ear_lookup(&params(&[("apr", "1e308"), ("n", "1")])).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Calculation(tvm::TvmError::InvalidArgument(_))
        ));
        assert_eq!(
            err.body(),
            serde_json::json!({ "error": "Invalid argument: EAR result is not a finite number" })
        );
    }
}
