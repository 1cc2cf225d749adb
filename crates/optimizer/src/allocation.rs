//! Program economics and proportional budget allocation.
//!
//! Every strategy redistributes the observed total spend in proportion to a
//! per-program score; CPL is held constant, so allocation changes project
//! volume changes only.

use campaign_analytics::ProgramPerformance;
use campaign_core::config::OptimizerConfig;
use serde::Serialize;
use tracing::warn;

/// The economics of one program eligible for reallocation: at least one
/// lead, a defined CPL and conversion rate, and positive spend.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramEconomics {
    pub program: String,
    pub spend: f64,
    pub results: u64,
    pub cpl: f64,
    /// Click-to-result conversion rate, percent.
    pub conversion_rate: f64,
    pub leads_per_dollar: f64,
    /// (rate / 100) x (scale / CPL); the composite ranking metric.
    pub efficiency_score: f64,
}

impl ProgramEconomics {
    pub fn from_performance(row: &ProgramPerformance, config: &OptimizerConfig) -> Option<Self> {
        if row.results == 0 || row.spend <= 0.0 {
            return None;
        }
        let cpl = row.mean_cpl?;
        let conversion_rate = row.click_to_result_rate?;
        Some(Self {
            program: row.program.clone(),
            spend: row.spend,
            results: row.results,
            cpl,
            conversion_rate,
            leads_per_dollar: row.results as f64 / row.spend,
            efficiency_score: conversion_rate / 100.0 * (config.efficiency_scale / cpl),
        })
    }

    /// The optimizable population of a performance table.
    pub fn collect(rows: &[ProgramPerformance], config: &OptimizerConfig) -> Vec<Self> {
        rows.iter()
            .filter_map(|row| Self::from_performance(row, config))
            .collect()
    }
}

/// How the per-program allocation score is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Maximize lead volume: score by efficiency.
    Volume,
    /// Minimize average CPL: score by 1 / CPL.
    CostInverse,
    /// Weighted blend of efficiency and conversion rate.
    Balanced,
}

impl AllocationStrategy {
    fn score(&self, program: &ProgramEconomics, config: &OptimizerConfig) -> f64 {
        match self {
            AllocationStrategy::Volume => program.efficiency_score,
            AllocationStrategy::CostInverse => 1.0 / program.cpl,
            AllocationStrategy::Balanced => {
                config.balanced_efficiency_weight * program.efficiency_score
                    + config.balanced_conversion_weight * (program.conversion_rate / 100.0)
            }
        }
    }
}

/// One program's share of a redistributed budget.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramAllocation {
    pub program: String,
    pub current_budget: f64,
    /// score / sum(scores); weights sum to 1.
    pub weight: f64,
    pub allocated_budget: f64,
    /// allocated budget / CPL, with CPL held constant.
    pub projected_leads: f64,
}

/// Redistribute the observed total spend proportionally to each program's
/// score under the given strategy.
pub fn allocate(
    programs: &[ProgramEconomics],
    strategy: AllocationStrategy,
    config: &OptimizerConfig,
) -> Vec<ProgramAllocation> {
    let total_budget: f64 = programs.iter().map(|p| p.spend).sum();
    let scores: Vec<f64> = programs
        .iter()
        .map(|p| strategy.score(p, config))
        .collect();
    let total_score: f64 = scores.iter().sum();
    if total_score <= 0.0 {
        warn!(?strategy, "No positive allocation scores; nothing to allocate");
        return Vec::new();
    }

    programs
        .iter()
        .zip(scores)
        .map(|(program, score)| {
            let weight = score / total_score;
            let allocated_budget = weight * total_budget;
            ProgramAllocation {
                program: program.program.clone(),
                current_budget: program.spend,
                weight,
                allocated_budget,
                projected_leads: allocated_budget / program.cpl,
            }
        })
        .collect()
}

/// Expected program performance at current spend if optimization lands the
/// assumed CPL improvement.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramProjection {
    pub program: String,
    pub historical_cpl: f64,
    pub predicted_cpl: f64,
    pub predicted_leads: f64,
    /// Leads per dollar at observed performance.
    pub current_roi: f64,
    pub predicted_roi: f64,
}

pub fn optimized_projection(
    programs: &[ProgramEconomics],
    config: &OptimizerConfig,
) -> Vec<ProgramProjection> {
    programs
        .iter()
        .map(|program| {
            let predicted_leads = program.spend / program.cpl;
            ProgramProjection {
                program: program.program.clone(),
                historical_cpl: program.cpl,
                predicted_cpl: program.cpl * config.optimized_cpl_factor,
                predicted_leads,
                current_roi: program.results as f64 / program.spend,
                predicted_roi: predicted_leads / program.spend,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economics(
        program: &str,
        spend: f64,
        results: u64,
        conversion_rate: f64,
    ) -> ProgramEconomics {
        let cpl = spend / results as f64;
        let config = OptimizerConfig::default();
        ProgramEconomics {
            program: program.to_string(),
            spend,
            results,
            cpl,
            conversion_rate,
            leads_per_dollar: results as f64 / spend,
            efficiency_score: conversion_rate / 100.0 * (config.efficiency_scale / cpl),
        }
    }

    fn performance(program: &str, spend: f64, results: u64, clicks: u64) -> ProgramPerformance {
        ProgramPerformance {
            program: program.to_string(),
            spend,
            results,
            mean_cpl: (results > 0).then(|| spend / results as f64),
            link_clicks: clicks,
            landing_page_views: clicks,
            impressions: clicks * 100,
            click_to_result_rate: (clicks > 0)
                .then(|| results as f64 / clicks as f64 * 100.0),
            view_to_result_rate: None,
            ctr: Some(1.0),
        }
    }

    // 1. Population selection ----------------------------------------------

    #[test]
    fn test_collect_excludes_programs_without_leads() {
        let config = OptimizerConfig::default();
        let rows = vec![
            performance("live", 1000.0, 10, 100),
            performance("dead", 2000.0, 0, 100),
        ];
        let programs = ProgramEconomics::collect(&rows, &config);
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].program, "live");
    }

    #[test]
    fn test_efficiency_score_formula() {
        let config = OptimizerConfig::default();
        let rows = vec![performance("a", 1000.0, 10, 100)];
        let p = &ProgramEconomics::collect(&rows, &config)[0];
        // rate 10%, CPL 100: 0.10 * (1000 / 100) = 1.0
        assert!((p.efficiency_score - 1.0).abs() < 1e-12);
        assert!((p.leads_per_dollar - 0.01).abs() < 1e-12);
    }

    // 2. Allocation invariants ----------------------------------------------

    #[test]
    fn test_weights_sum_to_one_and_budget_is_conserved() {
        let config = OptimizerConfig::default();
        let programs = vec![
            economics("a", 1000.0, 10, 8.0),
            economics("b", 500.0, 20, 4.0),
            economics("c", 2000.0, 5, 1.0),
        ];
        for strategy in [
            AllocationStrategy::Volume,
            AllocationStrategy::CostInverse,
            AllocationStrategy::Balanced,
        ] {
            let allocations = allocate(&programs, strategy, &config);
            let weight_sum: f64 = allocations.iter().map(|a| a.weight).sum();
            let budget_sum: f64 = allocations.iter().map(|a| a.allocated_budget).sum();
            assert!((weight_sum - 1.0).abs() < 1e-9, "{strategy:?}");
            assert!((budget_sum - 3500.0).abs() < 1e-6, "{strategy:?}");
        }
    }

    #[test]
    fn test_cost_inverse_favors_cheaper_leads() {
        let config = OptimizerConfig::default();
        // CPLs 100 and 25: weights 1/100 : 1/25 = 0.2 : 0.8.
        let programs = vec![
            economics("pricey", 1000.0, 10, 10.0),
            economics("cheap", 500.0, 20, 10.0),
        ];
        let allocations = allocate(&programs, AllocationStrategy::CostInverse, &config);
        assert!((allocations[0].weight - 0.2).abs() < 1e-9);
        assert!((allocations[1].weight - 0.8).abs() < 1e-9);
        assert!((allocations[1].allocated_budget - 1200.0).abs() < 1e-9);
        // Projected at constant CPL 25: 1200 / 25 = 48 leads.
        assert!((allocations[1].projected_leads - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_balanced_weights_hand_computed() {
        let config = OptimizerConfig::default();
        // A: CPL 100, rate 10% -> efficiency 1.0, balanced 0.6*1.0 + 0.4*0.1 = 0.64
        // C: CPL 25, rate 20% -> efficiency 8.0, balanced 0.6*8.0 + 0.4*0.2 = 4.88
        let programs = vec![
            economics("a", 1000.0, 10, 10.0),
            economics("c", 500.0, 20, 20.0),
        ];
        let allocations = allocate(&programs, AllocationStrategy::Balanced, &config);
        let total = 0.64 + 4.88;
        assert!((allocations[0].weight - 0.64 / total).abs() < 1e-9);
        assert!((allocations[1].weight - 4.88 / total).abs() < 1e-9);
    }

    // 3. Optimized projection ----------------------------------------------

    #[test]
    fn test_optimized_projection_assumes_cpl_improvement() {
        let config = OptimizerConfig::default();
        let programs = vec![economics("a", 1000.0, 10, 10.0)];
        let projections = optimized_projection(&programs, &config);
        let p = &projections[0];
        assert!((p.predicted_cpl - 90.0).abs() < 1e-9);
        assert!((p.predicted_leads - 10.0).abs() < 1e-9);
        assert!((p.current_roi - 0.01).abs() < 1e-12);
    }
}
