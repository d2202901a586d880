pub mod error;
pub mod fixed_income;
pub mod types;
pub mod validation;

pub use error::BondYieldError;
pub use fixed_income::bonds::{
    analyze_bond, analyze_bond_request, calculate_bond_metrics, calculate_bond_metrics_with,
    classify_bond_status, BondCalculationResult, BondParameters, BondStatus, CouponFrequency,
};
pub use fixed_income::cash_flows::{build_cash_flow_schedule, CashFlowEntry};
pub use fixed_income::yields::{SolverConfig, YieldSolution};
pub use types::*;
pub use validation::{
    validate_bond_request, BondCalculationRequest, FieldError, ValidationErrors,
};

pub type BondYieldResult<T> = Result<T, BondYieldError>;
