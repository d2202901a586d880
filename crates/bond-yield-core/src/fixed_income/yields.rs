use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::fixed_income::bonds::CouponFrequency;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Coupon rates arrive as percentages (5 = 5%).
pub const PERCENTAGE_DIVISOR: Decimal = dec!(100);

/// Starting annual yield for the Newton-Raphson solve.
pub const INITIAL_YIELD_ESTIMATE: Rate = dec!(0.05);

/// Convergence tolerance on the periodic yield (1e-6).
pub const CONVERGENCE_THRESHOLD: Decimal = dec!(0.000001);

/// Maximum Newton-Raphson iterations for YTM solve.
pub const MAX_YTM_ITERATIONS: u32 = 100;

// ---------------------------------------------------------------------------
// Solver configuration / output
// ---------------------------------------------------------------------------

/// Tuning knobs for the YTM solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Annual yield the iteration starts from (0.05 = 5%).
    pub initial_annual_guess: Rate,
    /// Stop once successive periodic estimates differ by less than this.
    pub convergence_threshold: Decimal,
    /// Hard cap on iterations; the last estimate is returned when reached.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_annual_guess: INITIAL_YIELD_ESTIMATE,
            convergence_threshold: CONVERGENCE_THRESHOLD,
            max_iterations: MAX_YTM_ITERATIONS,
        }
    }
}

/// Result of a YTM solve, including iteration diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSolution {
    /// Annualized yield to maturity as a decimal.
    pub annual_yield: Rate,
    /// Per-period yield the iteration settled on.
    pub periodic_yield: Rate,
    /// Newton-Raphson steps taken.
    pub iterations: u32,
    /// False when the iteration budget ran out or a step could not be taken.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Public API: coupon arithmetic
// ---------------------------------------------------------------------------

/// Annual coupon amount: `face_value * coupon_rate_percent / 100`.
/// Saturates at the decimal range.
pub fn annual_coupon_payment(face_value: Money, coupon_rate_percent: Decimal) -> Money {
    face_value.saturating_mul(coupon_rate_percent / PERCENTAGE_DIVISOR)
}

/// Current yield = annual coupon / market price.
///
/// A quotient beyond the decimal range saturates to `Decimal::MAX`, as does
/// a zero price. Validated inputs never reach either case.
pub fn current_yield(annual_coupon: Money, market_price: Money) -> Rate {
    annual_coupon
        .checked_div(market_price)
        .unwrap_or(Decimal::MAX)
}

/// Sum of all coupons paid over the life of the bond. Saturates.
pub fn total_interest(annual_coupon: Money, years_to_maturity: u32) -> Money {
    annual_coupon.saturating_mul(Decimal::from(years_to_maturity))
}

/// Decimal rate to percent (0.05 -> 5). Saturates.
pub fn to_percent(rate: Rate) -> Decimal {
    rate.saturating_mul(PERCENTAGE_DIVISOR)
}

// ---------------------------------------------------------------------------
// Public API: pricing function and its derivative
// ---------------------------------------------------------------------------

/// Price of the bond at a periodic yield:
///   P(y) = sum_{i=1}^{N} C / (1+y)^i + F / (1+y)^N
///
/// Returns `None` when `periodic_yield <= -1`, where the price is undefined.
pub fn bond_price_at_yield(
    periodic_coupon: Money,
    face_value: Money,
    total_periods: u32,
    periodic_yield: Rate,
) -> Option<Money> {
    discounted_sums(periodic_coupon, face_value, total_periods, periodic_yield)
        .map(|sums| sums.price)
}

/// Magnitude of dP/dy:
///   sum_{i=1}^{N} i*C / (1+y)^{i+1} + N*F / (1+y)^{N+1}
///
/// The true derivative is the negation of this; the solver adds
/// `(P - market) / P'` rather than subtracting, which is the same step.
pub fn bond_price_derivative(
    periodic_coupon: Money,
    face_value: Money,
    total_periods: u32,
    periodic_yield: Rate,
) -> Option<Decimal> {
    discounted_sums(periodic_coupon, face_value, total_periods, periodic_yield)
        .map(|sums| sums.derivative)
}

/// True when two successive estimates are closer than `threshold`.
pub fn has_converged(previous_yield: Rate, current_yield: Rate, threshold: Decimal) -> bool {
    current_yield
        .checked_sub(previous_yield)
        .is_some_and(|delta| delta.abs() < threshold)
}

// ---------------------------------------------------------------------------
// Public API: Yield to maturity
// ---------------------------------------------------------------------------

/// Annualized yield to maturity with the default solver settings.
pub fn yield_to_maturity(
    face_value: Money,
    market_price: Money,
    periodic_coupon: Money,
    total_periods: u32,
    frequency: CouponFrequency,
) -> Rate {
    solve_yield_to_maturity(
        face_value,
        market_price,
        periodic_coupon,
        total_periods,
        frequency,
        &SolverConfig::default(),
    )
    .annual_yield
}

/// Solve P(y) = market price for the periodic yield y with Newton-Raphson,
/// then annualize by the payment frequency.
///
/// The price function is strictly decreasing and convex for y > -1, so a
/// single root exists whenever the market price is positive. Running out of
/// iterations is not an error: the last estimate is returned with
/// `converged = false`.
pub fn solve_yield_to_maturity(
    face_value: Money,
    market_price: Money,
    periodic_coupon: Money,
    total_periods: u32,
    frequency: CouponFrequency,
    config: &SolverConfig,
) -> YieldSolution {
    let payments_per_year = Decimal::from(frequency.payments_per_year());
    let mut periodic_yield = config.initial_annual_guess / payments_per_year;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        let Some(sums) =
            discounted_sums(periodic_coupon, face_value, total_periods, periodic_yield)
        else {
            break;
        };
        iterations += 1;

        let price_difference = sums.price - market_price;
        if sums.derivative.is_zero() {
            break;
        }
        let Some(step) = price_difference.checked_div(sums.derivative) else {
            break;
        };
        let Some(mut next_yield) = periodic_yield.checked_add(step) else {
            break;
        };

        // Overshooting past -100% leaves the pricing domain; go halfway
        // towards -1 instead.
        if next_yield <= Decimal::NEGATIVE_ONE {
            next_yield = (periodic_yield - Decimal::ONE) / dec!(2);
        }

        let previous_yield = periodic_yield;
        periodic_yield = next_yield;

        if has_converged(previous_yield, periodic_yield, config.convergence_threshold) {
            converged = true;
            break;
        }
    }

    YieldSolution {
        annual_yield: periodic_yield.saturating_mul(payments_per_year),
        periodic_yield,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct DiscountedSums {
    price: Money,
    derivative: Decimal,
}

/// Price and derivative magnitude in a single pass. Discount factors are
/// built by repeated multiplication (no powd) and saturate at the decimal
/// range, so far-out terms collapse to zero instead of overflowing.
fn discounted_sums(
    periodic_coupon: Money,
    face_value: Money,
    total_periods: u32,
    periodic_yield: Rate,
) -> Option<DiscountedSums> {
    let one_plus_y = Decimal::ONE.checked_add(periodic_yield)?;
    if one_plus_y <= Decimal::ZERO {
        return None;
    }

    let mut price = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for i in 1..=total_periods {
        discount = discount.saturating_mul(one_plus_y);
        let next_discount = discount.saturating_mul(one_plus_y);
        let weighted_coupon = Decimal::from(i).saturating_mul(periodic_coupon);

        price = price.saturating_add(saturating_div(periodic_coupon, discount));
        derivative = derivative.saturating_add(saturating_div(weighted_coupon, next_discount));
    }

    let weighted_face = Decimal::from(total_periods).saturating_mul(face_value);
    price = price.saturating_add(saturating_div(face_value, discount));
    derivative = derivative.saturating_add(saturating_div(
        weighted_face,
        discount.saturating_mul(one_plus_y),
    ));

    Some(DiscountedSums { price, derivative })
}

/// Non-negative division that saturates instead of panicking when the
/// discount factor has underflowed to zero.
fn saturating_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if numerator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
