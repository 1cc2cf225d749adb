//! Assembles every output table for one batch run as explicit function
//! calls passing immutable tables between stages.

use campaign_analytics::{
    assign_categories, conversion_by_program, lag_correlations, monthly_stats, monthly_trends,
    program_performance, weekly_trends, CategorizedProgram, Denominator, LagCorrelations,
    MonthlyStats, MonthlyTrend, ProgramConversion, WeeklyTrend,
};
use campaign_core::config::AppConfig;
use campaign_core::types::{Category, NormalizedRecord};
use campaign_forecast::{forecast, ForecastPoint};
use campaign_optimizer::{
    allocate, budget_sensitivity, optimized_projection, run_scenarios, AllocationStrategy,
    ProgramAllocation, ProgramEconomics, ProgramProjection, ScenarioOutcome, SensitivityPoint,
};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::info;

/// One row of the ROI/efficiency table. Unlike [`ProgramEconomics`], this
/// covers every program; metrics that need leads stay undefined for
/// lead-less programs.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramRoi {
    pub program: String,
    pub spend: f64,
    pub results: u64,
    pub cpl: Option<f64>,
    pub click_to_result_rate: Option<f64>,
    pub leads_per_dollar: Option<f64>,
    pub efficiency_score: Option<f64>,
    pub category: Category,
}

/// The complete derived artifact set of one batch run. Everything here is
/// read-only once computed.
#[derive(Debug, Clone)]
pub struct AnalysisOutputs {
    pub monthly_stats: Vec<MonthlyStats>,
    pub program_click_rates: Vec<ProgramConversion>,
    pub program_lpv_rates: Vec<ProgramConversion>,
    pub program_performance: Vec<CategorizedProgram>,
    pub program_roi: Vec<ProgramRoi>,
    pub weekly_trends: Vec<WeeklyTrend>,
    pub lag_correlations: LagCorrelations,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub forecast: Vec<ForecastPoint>,
    pub balanced_allocation: Vec<ProgramAllocation>,
    pub scenarios: Vec<ScenarioOutcome>,
    pub sensitivity: Vec<SensitivityPoint>,
    pub projections: Vec<ProgramProjection>,
}

impl AnalysisOutputs {
    /// Run every analysis stage over the leads-filtered normalized table.
    pub fn compute(leads: &[NormalizedRecord], config: &AppConfig) -> Self {
        let monthly = monthly_stats(leads);
        let click_rates = conversion_by_program(leads, Denominator::LinkClicks);
        let lpv_rates = conversion_by_program(leads, Denominator::LandingPageViews);

        let performance = program_performance(leads);
        let economics = ProgramEconomics::collect(&performance, &config.optimizer);
        let categorized = assign_categories(performance);
        let roi = roi_table(&categorized, config);

        let weekly = weekly_trends(leads);
        let correlations = lag_correlations(&weekly);
        let monthly_trend_rows = monthly_trends(leads);
        let forecast_points = forecast(leads, &config.forecast);

        let balanced = allocate(&economics, AllocationStrategy::Balanced, &config.optimizer);
        let scenario_outcomes = run_scenarios(&economics, &config.optimizer);
        let sensitivity_points = budget_sensitivity(&economics, &config.optimizer);
        let projections = optimized_projection(&economics, &config.optimizer);

        info!(
            programs = categorized.len(),
            optimizable = economics.len(),
            months = monthly.len(),
            weeks = weekly.len(),
            forecast_months = forecast_points.len(),
            "Analysis stages complete"
        );

        Self {
            monthly_stats: monthly,
            program_click_rates: click_rates,
            program_lpv_rates: lpv_rates,
            program_performance: categorized,
            program_roi: roi,
            weekly_trends: weekly,
            lag_correlations: correlations,
            monthly_trends: monthly_trend_rows,
            forecast: forecast_points,
            balanced_allocation: balanced,
            scenarios: scenario_outcomes,
            sensitivity: sensitivity_points,
            projections,
        }
    }
}

/// Build the ROI table over all programs, best efficiency first; programs
/// with an undefined score sort last.
fn roi_table(categorized: &[CategorizedProgram], config: &AppConfig) -> Vec<ProgramRoi> {
    let mut rows: Vec<ProgramRoi> = categorized
        .iter()
        .map(|c| {
            let p = &c.performance;
            let efficiency_score = match (p.click_to_result_rate, p.mean_cpl) {
                (Some(rate), Some(cpl)) => {
                    Some(rate / 100.0 * (config.optimizer.efficiency_scale / cpl))
                }
                _ => None,
            };
            ProgramRoi {
                program: p.program.clone(),
                spend: p.spend,
                results: p.results,
                cpl: p.mean_cpl,
                click_to_result_rate: p.click_to_result_rate,
                leads_per_dollar: (p.spend > 0.0).then(|| p.results as f64 / p.spend),
                efficiency_score,
                category: c.category,
            }
        })
        .collect();
    rows.sort_by(|a, b| match (a.efficiency_score, b.efficiency_score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::month_abbrev;
    use chrono::{Datelike, NaiveDate};

    fn record(
        program: &str,
        date: &str,
        spend: f64,
        clicks: u64,
        results: u64,
    ) -> NormalizedRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let views = clicks / 2;
        NormalizedRecord {
            campaign_name: format!("{program}-campaign"),
            program: program.to_string(),
            objective: "Leads".to_string(),
            date,
            year: date.year(),
            month: date.month(),
            month_name: month_abbrev(date.month()).to_string(),
            quarter: (date.month() - 1) / 3 + 1,
            iso_week: date.iso_week().week(),
            spend,
            impressions: clicks * 100,
            link_clicks: clicks,
            landing_page_views: views,
            results,
            cpl: (results > 0).then(|| spend / results as f64),
            click_to_result_rate: (clicks > 0)
                .then(|| results as f64 / clicks as f64 * 100.0),
            view_to_result_rate: (views > 0).then(|| results as f64 / views as f64 * 100.0),
        }
    }

    fn fixture() -> Vec<NormalizedRecord> {
        vec![
            record("Program A", "2024-07-01", 1000.0, 100, 10),
            record("Program B", "2024-07-08", 2000.0, 100, 0),
            record("Program C", "2024-08-01", 500.0, 100, 20),
        ]
    }

    #[test]
    fn test_outputs_cover_all_programs() {
        let outputs = AnalysisOutputs::compute(&fixture(), &AppConfig::default());
        assert_eq!(outputs.program_performance.len(), 3);
        assert_eq!(outputs.program_roi.len(), 3);
        // Only A and C are optimizable.
        assert_eq!(outputs.balanced_allocation.len(), 2);
        assert_eq!(outputs.scenarios.len(), 3);
        assert_eq!(outputs.sensitivity.len(), 5);
    }

    #[test]
    fn test_roi_table_sorted_best_efficiency_first() {
        let outputs = AnalysisOutputs::compute(&fixture(), &AppConfig::default());
        // C: rate 20%, CPL 25 -> 8.0. A: rate 10%, CPL 100 -> 1.0.
        assert_eq!(outputs.program_roi[0].program, "Program C");
        assert!((outputs.program_roi[0].efficiency_score.unwrap() - 8.0).abs() < 1e-9);
        assert_eq!(outputs.program_roi[1].program, "Program A");
        // B has no leads: score undefined, sorts last.
        assert_eq!(outputs.program_roi[2].program, "Program B");
        assert!(outputs.program_roi[2].efficiency_score.is_none());
        assert_eq!(outputs.program_roi[2].category, Category::NoLeads);
    }

    #[test]
    fn test_monthly_buckets_match_fixture() {
        let outputs = AnalysisOutputs::compute(&fixture(), &AppConfig::default());
        assert_eq!(outputs.monthly_stats.len(), 2);
        assert_eq!(outputs.monthly_stats[0].month_name, "Jul");
        assert_eq!(outputs.monthly_stats[0].results, 10);
        assert_eq!(outputs.monthly_stats[1].month_name, "Aug");
        assert_eq!(outputs.monthly_stats[1].results, 20);
    }
}
