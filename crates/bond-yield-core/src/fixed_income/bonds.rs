use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::BondYieldError;
use crate::fixed_income::cash_flows::{build_cash_flow_schedule, CashFlowEntry};
use crate::fixed_income::yields::{
    self, to_percent, SolverConfig, YieldSolution,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::validation::BondCalculationRequest;
use crate::BondYieldResult;

/// Months in a year; schedule labels are month offsets from issue.
pub const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Coupon payments per year. Serialized as the bare integer (1, 2 or 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CouponFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
}

impl CouponFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            CouponFrequency::Annual => 1,
            CouponFrequency::SemiAnnual => 2,
            CouponFrequency::Quarterly => 4,
        }
    }

    /// 12, 6 or 3. Every supported frequency divides the year evenly.
    pub fn months_between_payments(self) -> u32 {
        MONTHS_PER_YEAR / self.payments_per_year()
    }
}

impl TryFrom<u32> for CouponFrequency {
    type Error = BondYieldError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CouponFrequency::Annual),
            2 => Ok(CouponFrequency::SemiAnnual),
            4 => Ok(CouponFrequency::Quarterly),
            other => Err(BondYieldError::InvalidInput {
                field: "coupon_frequency".into(),
                reason: format!("Coupon frequency must be 1, 2, or 4 (got {other})"),
            }),
        }
    }
}

impl From<CouponFrequency> for u32 {
    fn from(frequency: CouponFrequency) -> Self {
        frequency.payments_per_year()
    }
}

impl fmt::Display for CouponFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CouponFrequency::Annual => "annual",
            CouponFrequency::SemiAnnual => "semi-annual",
            CouponFrequency::Quarterly => "quarterly",
        };
        f.write_str(label)
    }
}

/// Validated bond inputs. Build through `validate_bond_request` for
/// untrusted input; the calculations below assume these ranges hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondParameters {
    /// Principal repaid at maturity. Positive.
    pub face_value: Money,
    /// Annual coupon as a percentage of face value, 0..=100.
    pub coupon_rate: Decimal,
    /// Current trading price. Positive.
    pub market_price: Money,
    /// Whole years remaining. Positive.
    pub years_to_maturity: u32,
    pub coupon_frequency: CouponFrequency,
}

impl BondParameters {
    pub fn annual_coupon(&self) -> Money {
        yields::annual_coupon_payment(self.face_value, self.coupon_rate)
    }

    pub fn periodic_coupon(&self) -> Money {
        self.annual_coupon() / Decimal::from(self.coupon_frequency.payments_per_year())
    }

    pub fn total_periods(&self) -> u32 {
        self.years_to_maturity
            .saturating_mul(self.coupon_frequency.payments_per_year())
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Where the bond trades relative to its face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BondStatus {
    Premium,
    Discount,
    Par,
}

impl fmt::Display for BondStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BondStatus::Premium => "premium",
            BondStatus::Discount => "discount",
            BondStatus::Par => "par",
        };
        f.write_str(label)
    }
}

/// Yield metrics and schedule for one bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BondCalculationResult {
    /// Annual coupon / market price, in percent.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 5.26))]
    pub current_yield: Percent,
    /// Annualized yield to maturity, in percent.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 5.66))]
    pub yield_to_maturity: Percent,
    /// All coupons over the bond's life.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 500))]
    pub total_interest: Money,
    pub bond_status: BondStatus,
    pub cash_flow_schedule: Vec<CashFlowEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Premium above face, discount below, par only on exact equality.
pub fn classify_bond_status(market_price: Money, face_value: Money) -> BondStatus {
    if market_price > face_value {
        BondStatus::Premium
    } else if market_price < face_value {
        BondStatus::Discount
    } else {
        BondStatus::Par
    }
}

/// Compute every bond metric with the default solver settings.
pub fn calculate_bond_metrics(params: &BondParameters) -> BondCalculationResult {
    calculate_bond_metrics_with(params, &SolverConfig::default()).0
}

/// Compute every bond metric, returning the solver diagnostics alongside.
///
/// The YTM solve and the schedule build are independent of each other; both
/// only share the derived coupon and period count.
pub fn calculate_bond_metrics_with(
    params: &BondParameters,
    config: &SolverConfig,
) -> (BondCalculationResult, YieldSolution) {
    let annual_coupon = params.annual_coupon();
    let periodic_coupon = params.periodic_coupon();
    let total_periods = params.total_periods();

    let current_yield = yields::current_yield(annual_coupon, params.market_price);

    let solution = yields::solve_yield_to_maturity(
        params.face_value,
        params.market_price,
        periodic_coupon,
        total_periods,
        params.coupon_frequency,
        config,
    );

    let total_interest = yields::total_interest(annual_coupon, params.years_to_maturity);
    let bond_status = classify_bond_status(params.market_price, params.face_value);

    let cash_flow_schedule = build_cash_flow_schedule(
        params.face_value,
        periodic_coupon,
        total_periods,
        params.coupon_frequency,
    );

    let result = BondCalculationResult {
        current_yield: to_percent(current_yield),
        yield_to_maturity: to_percent(solution.annual_yield),
        total_interest,
        bond_status,
        cash_flow_schedule,
    };

    (result, solution)
}

/// Full bond analysis wrapped in the computation envelope. A YTM solve that
/// ran out of iterations is reported as a warning, not an error.
pub fn analyze_bond(
    params: &BondParameters,
    config: &SolverConfig,
) -> ComputationOutput<BondCalculationResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (result, solution) = calculate_bond_metrics_with(params, config);

    if !solution.converged {
        warnings.push(format!(
            "YTM did not converge within {} iterations; returning last estimate",
            solution.iterations
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ytm_method": "Newton-Raphson",
        "initial_annual_guess": config.initial_annual_guess.to_string(),
        "convergence_threshold": config.convergence_threshold.to_string(),
        "max_iterations": config.max_iterations,
        "iterations_used": solution.iterations,
        "schedule": "bullet, month offsets (no day count)",
        "coupon_frequency": params.coupon_frequency.to_string(),
    });

    with_metadata(
        "Bond Yield Analysis (current yield, Newton-Raphson YTM, bullet cash flows)",
        &assumptions,
        warnings,
        elapsed,
        result,
    )
}

/// Validate a raw request, then run `analyze_bond` on it.
pub fn analyze_bond_request(
    request: &BondCalculationRequest,
    config: &SolverConfig,
) -> BondYieldResult<ComputationOutput<BondCalculationResult>> {
    let params = request.validate()?;
    Ok(analyze_bond(&params, config))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
