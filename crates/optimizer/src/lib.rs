//! Budget optimizer — allocation weightings, what-if scenarios, and the
//! budget sensitivity sweep.

pub mod allocation;
pub mod scenarios;
pub mod sensitivity;

pub use allocation::{
    allocate, optimized_projection, AllocationStrategy, ProgramAllocation, ProgramEconomics,
    ProgramProjection,
};
pub use scenarios::{run_scenarios, scenario_budgets, ScenarioBudget, ScenarioOutcome};
pub use sensitivity::{budget_sensitivity, SensitivityPoint};
