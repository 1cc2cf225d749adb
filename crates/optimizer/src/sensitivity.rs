//! Budget sensitivity sweep — scales the balanced allocation across fixed
//! multipliers to show how lead volume and ROI move with total budget.

use crate::allocation::{allocate, AllocationStrategy, ProgramEconomics};
use campaign_core::config::OptimizerConfig;
use serde::Serialize;

/// Projected totals at one budget level.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityPoint {
    pub multiplier: f64,
    pub total_budget: f64,
    pub total_leads: f64,
    pub avg_cpl: Option<f64>,
    /// Leads per dollar at this level.
    pub roi: f64,
}

/// Scale the balanced allocation by each configured multiplier. With CPL
/// held constant the lead response is linear in budget by construction.
pub fn budget_sensitivity(
    programs: &[ProgramEconomics],
    config: &OptimizerConfig,
) -> Vec<SensitivityPoint> {
    let balanced = allocate(programs, AllocationStrategy::Balanced, config);
    if balanced.is_empty() {
        return Vec::new();
    }

    config
        .budget_multipliers
        .iter()
        .map(|&multiplier| {
            let mut total_budget = 0.0;
            let mut total_leads = 0.0;
            for (program, allocation) in programs.iter().zip(&balanced) {
                let budget = allocation.allocated_budget * multiplier;
                total_budget += budget;
                total_leads += budget / program.cpl;
            }
            SensitivityPoint {
                multiplier,
                total_budget,
                total_leads,
                avg_cpl: (total_leads > 0.0).then(|| total_budget / total_leads),
                roi: if total_budget > 0.0 {
                    total_leads / total_budget
                } else {
                    0.0
                },
            }
        })
        .collect()
}
