pub mod capex;
pub mod costs;
pub mod date_util;
pub mod error;
pub mod funding;
pub mod headcount;
pub mod orchestrator;
pub mod results;
pub mod revenue;
pub mod sample;
pub mod schedule;
pub mod scenario;
pub mod taxes;
pub mod types;
pub mod valuation;
pub mod working_capital;

pub use error::ScenarioError;
pub use orchestrator::run;
pub use scenario::ScenarioInput;
pub use types::*;

/// Standard result type for every scenario operation.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
