//! Field-level validation of raw bond calculation requests.
//!
//! Requests arrive as loosely typed JSON. Every field is checked and every
//! failure is collected, so callers can report all problems at once instead
//! of stopping at the first.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::fixed_income::bonds::{BondParameters, CouponFrequency};

pub const FACE_VALUE_MESSAGE: &str = "Face value must be a positive number";
pub const COUPON_RATE_MESSAGE: &str = "Coupon rate must be between 0 and 100";
pub const MARKET_PRICE_MESSAGE: &str = "Market price must be a positive number";
pub const YEARS_TO_MATURITY_MESSAGE: &str = "Years to maturity must be a positive integer";
pub const COUPON_FREQUENCY_MESSAGE: &str =
    "Coupon frequency must be 1 (annual), 2 (semi-annual), or 4 (quarterly)";

pub const FACE_VALUE_LIMIT_MESSAGE: &str = "Face value must not exceed 1000000000000000";
pub const MARKET_PRICE_LIMIT_MESSAGE: &str =
    "Market price must be between 0.000001 and 1000000000000000";

const MIN_COUPON_RATE: Decimal = Decimal::ZERO;
const MAX_COUPON_RATE: Decimal = Decimal::ONE_HUNDRED;

// Keeps coupon totals, yields in percent and the YTM root inside the decimal
// range for every accepted combination of the other fields.
const MAX_FACE_VALUE: Decimal = dec!(1000000000000000);
const MIN_MARKET_PRICE: Decimal = dec!(0.000001);
const MAX_MARKET_PRICE: Decimal = dec!(1000000000000000);

/// Unvalidated request body. Known fields are kept as raw JSON so that a
/// wrong type becomes a field error rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BondCalculationRequest {
    /// Principal repaid at maturity. Positive.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, required = true, example = 1000))]
    pub face_value: Option<Value>,
    /// Annual coupon rate in percent, 0 to 100.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, required = true, example = 5))]
    pub coupon_rate: Option<Value>,
    /// Current market price. Positive.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, required = true, example = 950))]
    pub market_price: Option<Value>,
    /// Whole years until maturity.
    #[cfg_attr(feature = "openapi", schema(value_type = u32, required = true, example = 10))]
    pub years_to_maturity: Option<Value>,
    /// Coupon payments per year: 1, 2 or 4.
    #[cfg_attr(feature = "openapi", schema(value_type = u32, required = true, example = 2))]
    pub coupon_frequency: Option<Value>,
    /// Anything else the client sent. Always rejected.
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(ignore))]
    pub unknown_fields: BTreeMap<String, Value>,
}

impl BondCalculationRequest {
    pub fn validate(&self) -> Result<BondParameters, ValidationErrors> {
        validate_bond_request(self)
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field error found in one request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

/// Check every field of `request` and build the core's input on success.
pub fn validate_bond_request(
    request: &BondCalculationRequest,
) -> Result<BondParameters, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let face_value = match json_decimal(request.face_value.as_ref()) {
        Some(v) if v > MAX_FACE_VALUE => {
            errors.push("faceValue", FACE_VALUE_LIMIT_MESSAGE);
            None
        }
        Some(v) if v > Decimal::ZERO => Some(v),
        _ => {
            errors.push("faceValue", FACE_VALUE_MESSAGE);
            None
        }
    };

    let coupon_rate = json_decimal(request.coupon_rate.as_ref())
        .filter(|v| *v >= MIN_COUPON_RATE && *v <= MAX_COUPON_RATE);
    if coupon_rate.is_none() {
        errors.push("couponRate", COUPON_RATE_MESSAGE);
    }

    let market_price = match json_decimal(request.market_price.as_ref()) {
        Some(v) if v <= Decimal::ZERO => {
            errors.push("marketPrice", MARKET_PRICE_MESSAGE);
            None
        }
        Some(v) if !(MIN_MARKET_PRICE..=MAX_MARKET_PRICE).contains(&v) => {
            errors.push("marketPrice", MARKET_PRICE_LIMIT_MESSAGE);
            None
        }
        Some(v) => Some(v),
        None => {
            errors.push("marketPrice", MARKET_PRICE_MESSAGE);
            None
        }
    };

    let years_to_maturity = json_decimal(request.years_to_maturity.as_ref())
        .and_then(whole_number)
        .filter(|v| *v > 0);
    if years_to_maturity.is_none() {
        errors.push("yearsToMaturity", YEARS_TO_MATURITY_MESSAGE);
    }

    let coupon_frequency = json_decimal(request.coupon_frequency.as_ref())
        .and_then(whole_number)
        .and_then(|v| CouponFrequency::try_from(v).ok());
    if coupon_frequency.is_none() {
        errors.push("couponFrequency", COUPON_FREQUENCY_MESSAGE);
    }

    // Period count must stay addressable as a u32 schedule index.
    if let (Some(years), Some(frequency)) = (years_to_maturity, coupon_frequency) {
        if years.checked_mul(frequency.payments_per_year()).is_none() {
            errors.push("yearsToMaturity", YEARS_TO_MATURITY_MESSAGE);
        }
    }

    for name in request.unknown_fields.keys() {
        errors.push(name, format!("property {name} should not exist"));
    }

    match (
        face_value,
        coupon_rate,
        market_price,
        years_to_maturity,
        coupon_frequency,
    ) {
        (
            Some(face_value),
            Some(coupon_rate),
            Some(market_price),
            Some(years_to_maturity),
            Some(coupon_frequency),
        ) if errors.is_empty() => Ok(BondParameters {
            face_value,
            coupon_rate,
            market_price,
            years_to_maturity,
            coupon_frequency,
        }),
        _ => Err(errors),
    }
}

/// JSON numbers only; strings, booleans and nulls are rejected.
fn json_decimal(value: Option<&Value>) -> Option<Decimal> {
    let Value::Number(number) = value? else {
        return None;
    };
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn whole_number(value: Decimal) -> Option<u32> {
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(body: Value) -> BondCalculationRequest {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "faceValue": 1000,
            "couponRate": 5,
            "marketPrice": 950,
            "yearsToMaturity": 10,
            "couponFrequency": 2
        })
    }

    #[test]
    fn test_valid_request_builds_parameters() {
        let params = validate_bond_request(&request(valid_body())).unwrap();
        assert_eq!(
            params,
            BondParameters {
                face_value: dec!(1000),
                coupon_rate: dec!(5),
                market_price: dec!(950),
                years_to_maturity: 10,
                coupon_frequency: CouponFrequency::SemiAnnual,
            }
        );
    }

    #[test]
    fn test_fractional_values_kept_exact() {
        let mut body = valid_body();
        body["couponRate"] = json!(4.375);
        body["marketPrice"] = json!(987.65);
        let params = validate_bond_request(&request(body)).unwrap();
        assert_eq!(params.coupon_rate, dec!(4.375));
        assert_eq!(params.market_price, dec!(987.65));
    }

    #[test]
    fn test_zero_coupon_allowed() {
        let mut body = valid_body();
        body["couponRate"] = json!(0);
        assert!(validate_bond_request(&request(body)).is_ok());
    }

    #[test]
    fn test_negative_face_value() {
        let mut body = valid_body();
        body["faceValue"] = json!(-100);
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert_eq!(errors.messages(), vec![FACE_VALUE_MESSAGE.to_string()]);
    }

    #[test]
    fn test_coupon_rate_out_of_range() {
        let mut body = valid_body();
        body["couponRate"] = json!(150);
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert!(errors.has_field("couponRate"));

        let mut body = valid_body();
        body["couponRate"] = json!(-0.5);
        assert!(validate_bond_request(&request(body)).is_err());
    }

    #[test]
    fn test_fractional_years_rejected() {
        let mut body = valid_body();
        body["yearsToMaturity"] = json!(10.5);
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert_eq!(errors.messages(), vec![YEARS_TO_MATURITY_MESSAGE.to_string()]);
    }

    #[test]
    fn test_unsupported_frequency_rejected() {
        for freq in [json!(3), json!(0), json!(12), json!(2.5)] {
            let mut body = valid_body();
            body["couponFrequency"] = freq;
            let errors = validate_bond_request(&request(body)).unwrap_err();
            assert_eq!(errors.messages(), vec![COUPON_FREQUENCY_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = validate_bond_request(&request(json!({ "faceValue": 1000 }))).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                COUPON_RATE_MESSAGE.to_string(),
                MARKET_PRICE_MESSAGE.to_string(),
                YEARS_TO_MATURITY_MESSAGE.to_string(),
                COUPON_FREQUENCY_MESSAGE.to_string(),
            ]
        );
    }

    #[test]
    fn test_string_numbers_rejected() {
        let mut body = valid_body();
        body["marketPrice"] = json!("950");
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert!(errors.has_field("marketPrice"));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let mut body = valid_body();
        body["issuer"] = json!("ACME");
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec!["property issuer should not exist".to_string()]
        );
    }

    #[test]
    fn test_face_value_above_limit_rejected() {
        let mut body = valid_body();
        body["faceValue"] = json!(1e28);
        body["couponRate"] = json!(100);
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert_eq!(errors.messages(), vec![FACE_VALUE_LIMIT_MESSAGE.to_string()]);

        let mut body = valid_body();
        body["faceValue"] = json!(1_000_000_000_000_000_u64);
        assert!(validate_bond_request(&request(body)).is_ok());
    }

    #[test]
    fn test_market_price_outside_limits_rejected() {
        for price in [json!(1e-12), json!(1e16)] {
            let mut body = valid_body();
            body["marketPrice"] = price;
            let errors = validate_bond_request(&request(body)).unwrap_err();
            assert_eq!(errors.messages(), vec![MARKET_PRICE_LIMIT_MESSAGE.to_string()]);
        }

        let mut body = valid_body();
        body["marketPrice"] = json!(0.000001);
        assert!(validate_bond_request(&request(body)).is_ok());
    }

    #[test]
    fn test_period_overflow_rejected() {
        let mut body = valid_body();
        body["yearsToMaturity"] = json!(u32::MAX);
        body["couponFrequency"] = json!(4);
        let errors = validate_bond_request(&request(body)).unwrap_err();
        assert!(errors.has_field("yearsToMaturity"));
    }

    #[test]
    fn test_display_joins_messages() {
        let errors = validate_bond_request(&request(json!({}))).unwrap_err();
        assert!(errors.to_string().starts_with(FACE_VALUE_MESSAGE));
        assert_eq!(errors.errors.len(), 5);
    }
}
