//! What-if scenarios — named budget adjustments over ranked program
//! subsets, with paused budget redistributed to the strongest remaining
//! programs.

use crate::allocation::ProgramEconomics;
use campaign_core::config::{OptimizerConfig, ScenarioRule, ScenarioSelection};
use serde::Serialize;
use tracing::info;

/// One program's budget under a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioBudget {
    pub program: String,
    pub budget: f64,
}

/// Summary of one scenario against the observed totals.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub total_budget: f64,
    pub total_leads: f64,
    /// total budget / total leads, recomputed; `None` when the scenario
    /// projects no leads.
    pub avg_cpl: Option<f64>,
    pub lead_improvement_pct: f64,
    pub cpl_improvement_pct: f64,
}

fn ranked_indices(programs: &[ProgramEconomics], selection: ScenarioSelection) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..programs.len()).collect();
    match selection {
        ScenarioSelection::TopEfficiency => indices.sort_by(|&a, &b| {
            programs[b]
                .efficiency_score
                .partial_cmp(&programs[a].efficiency_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        ScenarioSelection::TopCpl => indices.sort_by(|&a, &b| {
            programs[b]
                .cpl
                .partial_cmp(&programs[a].cpl)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        ScenarioSelection::BottomEfficiency => indices.sort_by(|&a, &b| {
            programs[a]
                .efficiency_score
                .partial_cmp(&programs[b].efficiency_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
    indices
}

/// Per-program budgets under one scenario rule. A zero multiplier pauses
/// the selection; the freed budget is split equally (not proportionally)
/// across the top remaining programs by efficiency score, added on top of
/// their current spend — total budget is conserved.
pub fn scenario_budgets(
    programs: &[ProgramEconomics],
    rule: &ScenarioRule,
    config: &OptimizerConfig,
) -> Vec<ScenarioBudget> {
    let mut budgets: Vec<f64> = programs.iter().map(|p| p.spend).collect();
    let selected: Vec<usize> = ranked_indices(programs, rule.selection)
        .into_iter()
        .take(rule.count)
        .collect();

    for &i in &selected {
        budgets[i] = programs[i].spend * rule.multiplier;
    }

    if rule.multiplier == 0.0 {
        let paused: f64 = selected.iter().map(|&i| programs[i].spend).sum();
        let mut remaining: Vec<usize> = ranked_indices(programs, ScenarioSelection::TopEfficiency)
            .into_iter()
            .filter(|i| !selected.contains(i))
            .collect();
        remaining.truncate(config.reallocation_targets);
        if !remaining.is_empty() {
            let share = paused / remaining.len() as f64;
            for &i in &remaining {
                budgets[i] = programs[i].spend + share;
            }
        }
    }

    programs
        .iter()
        .zip(budgets)
        .map(|(program, budget)| ScenarioBudget {
            program: program.program.clone(),
            budget,
        })
        .collect()
}

/// Evaluate every configured scenario. Projected leads hold each program's
/// CPL constant; improvements are measured against the observed totals.
pub fn run_scenarios(
    programs: &[ProgramEconomics],
    config: &OptimizerConfig,
) -> Vec<ScenarioOutcome> {
    let current_leads: f64 = programs.iter().map(|p| p.results as f64).sum();
    let current_mean_cpl = if programs.is_empty() {
        None
    } else {
        Some(programs.iter().map(|p| p.cpl).sum::<f64>() / programs.len() as f64)
    };

    config
        .scenarios
        .iter()
        .map(|rule| {
            let budgets = scenario_budgets(programs, rule, config);
            let total_budget: f64 = budgets.iter().map(|b| b.budget).sum();
            let total_leads: f64 = programs
                .iter()
                .zip(&budgets)
                .map(|(program, b)| b.budget / program.cpl)
                .sum();
            let avg_cpl = (total_leads > 0.0).then(|| total_budget / total_leads);

            let lead_improvement_pct = if current_leads > 0.0 {
                (total_leads / current_leads - 1.0) * 100.0
            } else {
                0.0
            };
            let cpl_improvement_pct = match (current_mean_cpl, avg_cpl) {
                (Some(current), Some(scenario)) => (current / scenario - 1.0) * 100.0,
                _ => 0.0,
            };

            let outcome = ScenarioOutcome {
                scenario: rule.name.clone(),
                total_budget,
                total_leads,
                avg_cpl,
                lead_improvement_pct,
                cpl_improvement_pct,
            };
            info!(
                scenario = %outcome.scenario,
                total_budget = outcome.total_budget,
                total_leads = outcome.total_leads,
                avg_cpl = ?outcome.avg_cpl,
                lead_improvement_pct = outcome.lead_improvement_pct,
                "Scenario evaluated"
            );
            outcome
        })
        .collect()
}
