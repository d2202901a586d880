use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use bond_yield_core::fixed_income::bonds::analyze_bond_request;
use bond_yield_core::{
    build_cash_flow_schedule, BondCalculationRequest, BondYieldError, SolverConfig,
};

use crate::input;

/// Bond parameters shared by every bond command
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BondArgs {
    /// Face (par) value repaid at maturity
    #[arg(long)]
    pub face_value: Option<Decimal>,

    /// Annual coupon rate in percent (e.g. 5 for 5%)
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Current market price
    #[arg(long)]
    pub market_price: Option<Decimal>,

    /// Whole years until maturity
    #[arg(long, alias = "years")]
    pub years_to_maturity: Option<u32>,

    /// Coupon payments per year: 1, 2 or 4
    #[arg(long, alias = "frequency", default_value = "2")]
    pub coupon_frequency: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Newton-Raphson overrides
#[derive(Args)]
pub struct SolverArgs {
    /// Starting annual yield for the YTM solve (e.g. 0.05)
    #[arg(long)]
    pub initial_guess: Option<Decimal>,

    /// Convergence threshold on the periodic yield
    #[arg(long)]
    pub tolerance: Option<Decimal>,

    /// Maximum Newton-Raphson iterations
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

/// Arguments for the full bond calculation
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub bond: BondArgs,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Arguments for the cash flow schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub bond: BondArgs,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args.bond)?;
    let config = solver_config(&args.solver);
    let result = analyze_bond_request(&request, &config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args.bond)?;
    let params = request.validate().map_err(BondYieldError::from)?;
    let schedule = build_cash_flow_schedule(
        params.face_value,
        params.periodic_coupon(),
        params.total_periods(),
        params.coupon_frequency,
    );
    Ok(serde_json::to_value(schedule)?)
}

fn read_request(args: &BondArgs) -> Result<BondCalculationRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        Ok(input::file::read_request_file(path)?)
    } else if let Some(request) = input::stdin::read_request_stdin()? {
        Ok(request)
    } else {
        request_from_flags(args)
    }
}

fn request_from_flags(
    args: &BondArgs,
) -> Result<BondCalculationRequest, Box<dyn std::error::Error>> {
    let face_value = args
        .face_value
        .ok_or("--face-value is required (or provide --input)")?;
    let coupon_rate = args
        .coupon_rate
        .ok_or("--coupon-rate is required (or provide --input)")?;
    let market_price = args
        .market_price
        .ok_or("--market-price is required (or provide --input)")?;
    let years_to_maturity = args
        .years_to_maturity
        .ok_or("--years-to-maturity is required (or provide --input)")?;

    // Range checks happen in validation, same as for JSON input.
    Ok(BondCalculationRequest {
        face_value: Some(json!(face_value)),
        coupon_rate: Some(json!(coupon_rate)),
        market_price: Some(json!(market_price)),
        years_to_maturity: Some(json!(years_to_maturity)),
        coupon_frequency: Some(json!(args.coupon_frequency)),
        unknown_fields: Default::default(),
    })
}

fn solver_config(args: &SolverArgs) -> SolverConfig {
    let defaults = SolverConfig::default();
    SolverConfig {
        initial_annual_guess: args.initial_guess.unwrap_or(defaults.initial_annual_guess),
        convergence_threshold: args.tolerance.unwrap_or(defaults.convergence_threshold),
        max_iterations: args.max_iterations.unwrap_or(defaults.max_iterations),
    }
}
