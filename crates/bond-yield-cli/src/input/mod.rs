//! Bond request sources for the CLI: a JSON file or a JSON body on stdin.

pub mod file;
pub mod stdin;

use bond_yield_core::BondCalculationRequest;
use serde_json::Value;

/// Parse one bond request body. `origin` names the source in error messages.
///
/// Only a JSON object is accepted; field types and ranges are left to
/// request validation so every input path reports the same messages.
pub fn parse_request(body: &str, origin: &str) -> Result<BondCalculationRequest, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("{origin}: invalid JSON: {e}"))?;

    if !value.is_object() {
        return Err(format!(
            "{origin}: expected a JSON object with faceValue, couponRate, marketPrice, \
             yearsToMaturity and couponFrequency"
        ));
    }

    serde_json::from_value(value).map_err(|e| format!("{origin}: {e}"))
}
