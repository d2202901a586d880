use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fixed_income::bonds::CouponFrequency;
use crate::types::Money;

/// One coupon date in a bullet bond's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEntry {
    /// 1-based coupon period.
    pub period: u32,
    /// Relative label from issue, e.g. "Month 6".
    #[cfg_attr(feature = "openapi", schema(example = "Month 6"))]
    pub payment_date: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 25))]
    pub coupon_payment: Money,
    /// Coupons received up to and including this period.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 25))]
    pub cumulative_interest: Money,
    /// Face value still owed: the full amount until the final period, then 0.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 1000))]
    pub remaining_principal: Money,
}

/// Build the period-by-period schedule of a bullet (non-amortizing) bond.
///
/// Principal stays at face value until it is repaid in one piece at the
/// final period. Zero periods produce an empty schedule.
pub fn build_cash_flow_schedule(
    face_value: Money,
    periodic_coupon: Money,
    total_periods: u32,
    frequency: CouponFrequency,
) -> Vec<CashFlowEntry> {
    let months_between_payments = frequency.months_between_payments();

    (1..=total_periods)
        .map(|period| CashFlowEntry {
            period,
            payment_date: payment_date_label(period, months_between_payments),
            coupon_payment: periodic_coupon,
            cumulative_interest: periodic_coupon.saturating_mul(Decimal::from(period)),
            remaining_principal: if period == total_periods {
                Decimal::ZERO
            } else {
                face_value
            },
        })
        .collect()
}

fn payment_date_label(period: u32, months_between_payments: u32) -> String {
    format!("Month {}", u64::from(period) * u64::from(months_between_payments))
}
