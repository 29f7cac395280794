//! Fixed-schema encoding of cached records.
//!
//! Rows hold a small JSON object with exactly the seven record fields. The
//! epoch is stored as its canonical key string, so records read back carry
//! the truncated epoch.

use orbit_core::{EpochKey, Error, Result, StateVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredRecord {
    epoch: String,
    x: f64,
    y: f64,
    z: f64,
    x_dot: f64,
    y_dot: f64,
    z_dot: f64,
}

/// Encode a record for storage under its truncated key.
pub fn encode(sv: &StateVector) -> Result<String> {
    if !sv.is_finite() {
        return Err(Error::database(format!(
            "refusing to store non-finite record at {}",
            sv.key()
        )));
    }
    let record = StoredRecord {
        epoch: sv.key().to_string(),
        x: sv.x,
        y: sv.y,
        z: sv.z,
        x_dot: sv.x_dot,
        y_dot: sv.y_dot,
        z_dot: sv.z_dot,
    };
    Ok(serde_json::to_string(&record)?)
}

/// Decode a stored row back into a record.
pub fn decode(raw: &str) -> Result<StateVector> {
    let record: StoredRecord = serde_json::from_str(raw)
        .map_err(|e| Error::database(format!("corrupt cached record: {e}")))?;
    let key: EpochKey = record
        .epoch
        .parse()
        .map_err(|e| Error::database(format!("corrupt cached epoch: {e}")))?;

    let sv = StateVector {
        epoch: key.epoch(),
        x: record.x,
        y: record.y,
        z: record.z,
        x_dot: record.x_dot,
        y_dot: record.y_dot,
        z_dot: record.z_dot,
    };
    if !sv.is_finite() {
        return Err(Error::database(format!("non-finite cached record at {key}")));
    }
    Ok(sv)
}
