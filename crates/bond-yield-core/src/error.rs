use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum BondYieldError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for BondYieldError {
    fn from(errors: ValidationErrors) -> Self {
        BondYieldError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_bond_request, BondCalculationRequest, FACE_VALUE_MESSAGE};

    #[test]
    fn test_validation_error_lists_field_messages() {
        let request: BondCalculationRequest = serde_json::from_value(serde_json::json!({
            "faceValue": -1,
            "couponRate": 5,
            "marketPrice": 950,
            "yearsToMaturity": 10,
            "couponFrequency": 2
        }))
        .unwrap();
        let err = BondYieldError::from(validate_bond_request(&request).unwrap_err());
        assert_eq!(err.to_string(), format!("Validation failed: {FACE_VALUE_MESSAGE}"));
    }
}
