use std::fs;
use std::path::Path;

use bond_yield_core::BondCalculationRequest;

use super::parse_request;

/// Load a bond request from a JSON file given with `--input`.
pub fn read_request_file(path: &str) -> Result<BondCalculationRequest, String> {
    let path = Path::new(path);
    if !path.is_file() {
        return Err(format!("Bond request file not found: {}", path.display()));
    }

    let body = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    parse_request(&body, &path.display().to_string())
}
