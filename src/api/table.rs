//! Table upload from the browser grid

use log::info;
use serde::{Deserialize, Serialize};

use super::ApiError;

/// Acknowledgement for an uploaded table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReceipt {
    pub status: String,
    pub rows: usize,
}

/// Accept a JSON array of string rows.
///
/// The grid is only acknowledged; nothing is stored.
pub fn receive_table(body: &str) -> Result<TableReceipt, ApiError> {
    let table: Vec<Vec<String>> =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let columns = table.iter().map(Vec::len).max().unwrap_or(0);
    info!("received table: {} rows x {} columns", table.len(), columns);

    Ok(TableReceipt {
        status: "Data received".to_string(),
        rows: table.len(),
    })
}
