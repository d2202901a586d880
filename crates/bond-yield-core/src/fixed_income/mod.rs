pub mod bonds;
pub mod cash_flows;
pub mod yields;
