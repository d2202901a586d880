use std::io::{self, Read};

use bond_yield_core::BondCalculationRequest;

use super::parse_request;

/// Bond request piped on stdin, if any. An interactive terminal or an empty
/// pipe yields `None` so the command falls back to flags.
pub fn read_request_stdin() -> Result<Option<BondCalculationRequest>, String> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut body = String::new();
    io::stdin()
        .read_to_string(&mut body)
        .map_err(|e| format!("Failed to read stdin: {e}"))?;

    if body.trim().is_empty() {
        return Ok(None);
    }
    parse_request(&body, "stdin").map(Some)
}
