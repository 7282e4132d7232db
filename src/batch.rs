//! Batch evaluation of time-value requests from CSV
//!
//! Input columns match the JSON request fields:
//! `calcType,rate,nper,pmt,pv,fv,type`. Columns left out of the header
//! default to zero. Each row is evaluated independently on the rayon pool;
//! a bad row is reported in the output and does not stop the run.

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, Writer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::api::{self, TimeValueRequest};

/// One input row, parsed or not
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// Line in the source file (header is line 1)
    pub line: u64,
    pub request: Result<TimeValueRequest, String>,
}

/// Output row: the echoed inputs plus a result or an error message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub line: u64,
    #[serde(rename = "calcType")]
    pub calc_type: String,
    pub rate: f64,
    pub nper: i32,
    pub pmt: f64,
    pub pv: f64,
    pub fv: f64,
    #[serde(rename = "type")]
    pub payment_type: i32,
    pub result: Option<f64>,
    pub error: Option<String>,
}

impl BatchOutcome {
    fn new(line: u64, request: &TimeValueRequest) -> Self {
        Self {
            line,
            calc_type: request.calc_type.clone(),
            rate: request.rate,
            nper: request.nper,
            pmt: request.pmt,
            pv: request.pv,
            fv: request.fv,
            payment_type: request.payment_type,
            result: None,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Read requests from any CSV source (file, string buffer, stdin)
pub fn read_requests<R: Read>(reader: R) -> Result<Vec<BatchRow>, csv::Error> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let request = record
            .deserialize::<TimeValueRequest>(Some(&headers))
            .map_err(|e| e.to_string());
        rows.push(BatchRow { line, request });
    }

    Ok(rows)
}

/// Read requests from a CSV file
pub fn read_requests_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BatchRow>, csv::Error> {
    let file = std::fs::File::open(path)?;
    read_requests(file)
}

/// Evaluate every row in parallel, keeping input order
pub fn evaluate_rows(rows: &[BatchRow]) -> Vec<BatchOutcome> {
    rows.par_iter()
        .map(|row| match &row.request {
            Ok(request) => {
                let mut outcome = BatchOutcome::new(row.line, request);
                match api::evaluate(request) {
                    Ok(response) => outcome.result = Some(response.result),
                    Err(e) => outcome.error = Some(e.to_string()),
                }
                outcome
            }
            Err(message) => BatchOutcome {
                error: Some(message.clone()),
                ..BatchOutcome::new(row.line, &TimeValueRequest::default())
            },
        })
        .collect()
}

/// Write outcomes as CSV with a header row
pub fn write_outcomes<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), csv::Error> {
    let mut csv_writer = Writer::from_writer(writer);
    for outcome in outcomes {
        csv_writer.serialize(outcome)?;
    }
    csv_writer.flush()?;
    Ok(())
}
