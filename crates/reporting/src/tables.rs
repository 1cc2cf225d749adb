//! CSV row bindings for the output tables, carrying the exact column
//! headers the presentation collaborators read. Undefined rates serialize
//! as empty cells, never as zero.

use crate::report_builder::ProgramRoi;
use campaign_analytics::{
    CategorizedProgram, MonthlyStats, MonthlyTrend, ProgramConversion, WeeklyTrend,
};
use campaign_core::types::Category;
use campaign_forecast::ForecastPoint;
use campaign_optimizer::{ScenarioOutcome, SensitivityPoint};
use serde::Serialize;

fn round2(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v * 100.0).round() / 100.0)
}

fn round3(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v * 1000.0).round() / 1000.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStatsRow {
    #[serde(rename = "Month_Name")]
    pub month_name: String,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "CPL")]
    pub cpl: Option<f64>,
    #[serde(rename = "Amount spent (USD)")]
    pub spend: f64,
}

impl From<&MonthlyStats> for MonthlyStatsRow {
    fn from(row: &MonthlyStats) -> Self {
        Self {
            month_name: row.month_name.clone(),
            results: row.results,
            cpl: row.mean_cpl,
            spend: row.spend,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClickRateRow {
    #[serde(rename = "Program")]
    pub program: String,
    #[serde(rename = "Link clicks")]
    pub link_clicks: u64,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "Conversion_Rate")]
    pub conversion_rate: Option<f64>,
}

impl From<&ProgramConversion> for ClickRateRow {
    fn from(row: &ProgramConversion) -> Self {
        Self {
            program: row.program.clone(),
            link_clicks: row.denominator,
            results: row.results,
            conversion_rate: round2(row.conversion_rate),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LpvRateRow {
    #[serde(rename = "Program")]
    pub program: String,
    #[serde(rename = "Landing page views")]
    pub landing_page_views: u64,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "Conversion_Rate")]
    pub conversion_rate: Option<f64>,
}

impl From<&ProgramConversion> for LpvRateRow {
    fn from(row: &ProgramConversion) -> Self {
        Self {
            program: row.program.clone(),
            landing_page_views: row.denominator,
            results: row.results,
            conversion_rate: round2(row.conversion_rate),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramPerformanceRow {
    #[serde(rename = "Program")]
    pub program: String,
    #[serde(rename = "Amount spent (USD)")]
    pub spend: f64,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "CPL")]
    pub cpl: Option<f64>,
    #[serde(rename = "Link clicks")]
    pub link_clicks: u64,
    #[serde(rename = "Landing page views")]
    pub landing_page_views: u64,
    #[serde(rename = "Impressions")]
    pub impressions: u64,
    #[serde(rename = "Click_to_Submit_Rate")]
    pub click_to_submit_rate: Option<f64>,
    #[serde(rename = "LPV_to_Submit_Rate")]
    pub lpv_to_submit_rate: Option<f64>,
    #[serde(rename = "CTR")]
    pub ctr: Option<f64>,
    #[serde(rename = "Category")]
    pub category: Category,
}

impl From<&CategorizedProgram> for ProgramPerformanceRow {
    fn from(row: &CategorizedProgram) -> Self {
        let p = &row.performance;
        Self {
            program: p.program.clone(),
            spend: p.spend,
            results: p.results,
            cpl: round2(p.mean_cpl),
            link_clicks: p.link_clicks,
            landing_page_views: p.landing_page_views,
            impressions: p.impressions,
            click_to_submit_rate: round2(p.click_to_result_rate),
            lpv_to_submit_rate: round2(p.view_to_result_rate),
            ctr: round3(p.ctr),
            category: row.category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramRoiRow {
    #[serde(rename = "Program")]
    pub program: String,
    #[serde(rename = "Amount spent (USD)")]
    pub spend: f64,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "CPL")]
    pub cpl: Option<f64>,
    #[serde(rename = "Click_to_Submit_Rate")]
    pub click_to_submit_rate: Option<f64>,
    #[serde(rename = "Leads_per_Dollar")]
    pub leads_per_dollar: Option<f64>,
    #[serde(rename = "Efficiency_Score")]
    pub efficiency_score: Option<f64>,
    #[serde(rename = "Category")]
    pub category: Category,
}

impl From<&ProgramRoi> for ProgramRoiRow {
    fn from(row: &ProgramRoi) -> Self {
        Self {
            program: row.program.clone(),
            spend: row.spend,
            results: row.results,
            cpl: round2(row.cpl),
            click_to_submit_rate: round2(row.click_to_result_rate),
            leads_per_dollar: row.leads_per_dollar,
            efficiency_score: row.efficiency_score,
            category: row.category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyTrendRow {
    #[serde(rename = "Week")]
    pub week: u32,
    #[serde(rename = "Link clicks")]
    pub link_clicks: u64,
    #[serde(rename = "Landing page views")]
    pub landing_page_views: u64,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "Amount spent (USD)")]
    pub spend: f64,
    #[serde(rename = "Clicks_Lag1")]
    pub clicks_lag1: Option<u64>,
    #[serde(rename = "LPV_Lag1")]
    pub lpv_lag1: Option<u64>,
    #[serde(rename = "Clicks_Lag2")]
    pub clicks_lag2: Option<u64>,
    #[serde(rename = "LPV_Lag2")]
    pub lpv_lag2: Option<u64>,
}

impl From<&WeeklyTrend> for WeeklyTrendRow {
    fn from(row: &WeeklyTrend) -> Self {
        Self {
            week: row.iso_week,
            link_clicks: row.link_clicks,
            landing_page_views: row.landing_page_views,
            results: row.results,
            spend: row.spend,
            clicks_lag1: row.clicks_lag1,
            lpv_lag1: row.views_lag1,
            clicks_lag2: row.clicks_lag2,
            lpv_lag2: row.views_lag2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrendRow {
    #[serde(rename = "Month_Name")]
    pub month_name: String,
    #[serde(rename = "Link clicks")]
    pub link_clicks: u64,
    #[serde(rename = "Landing page views")]
    pub landing_page_views: u64,
    #[serde(rename = "Results")]
    pub results: u64,
    #[serde(rename = "Amount spent (USD)")]
    pub spend: f64,
}

impl From<&MonthlyTrend> for MonthlyTrendRow {
    fn from(row: &MonthlyTrend) -> Self {
        Self {
            month_name: row.month_name.clone(),
            link_clicks: row.link_clicks,
            landing_page_views: row.landing_page_views,
            results: row.results,
            spend: row.spend,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WhatIfScenarioRow {
    #[serde(rename = "Scenario")]
    pub scenario: String,
    #[serde(rename = "Total_Budget")]
    pub total_budget: f64,
    #[serde(rename = "Total_Leads")]
    pub total_leads: f64,
    #[serde(rename = "Avg_CPL")]
    pub avg_cpl: Option<f64>,
    #[serde(rename = "Improvement_Leads")]
    pub improvement_leads: f64,
    #[serde(rename = "Improvement_CPL")]
    pub improvement_cpl: f64,
}

impl From<&ScenarioOutcome> for WhatIfScenarioRow {
    fn from(row: &ScenarioOutcome) -> Self {
        Self {
            scenario: row.scenario.clone(),
            total_budget: row.total_budget,
            total_leads: row.total_leads,
            avg_cpl: row.avg_cpl,
            improvement_leads: row.lead_improvement_pct,
            improvement_cpl: row.cpl_improvement_pct,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SensitivityRow {
    #[serde(rename = "Budget_Multiplier")]
    pub budget_multiplier: f64,
    #[serde(rename = "Total_Budget")]
    pub total_budget: f64,
    #[serde(rename = "Total_Leads")]
    pub total_leads: f64,
    #[serde(rename = "Avg_CPL")]
    pub avg_cpl: Option<f64>,
    #[serde(rename = "ROI")]
    pub roi: f64,
}

impl From<&SensitivityPoint> for SensitivityRow {
    fn from(row: &SensitivityPoint) -> Self {
        Self {
            budget_multiplier: row.multiplier,
            total_budget: row.total_budget,
            total_leads: row.total_leads,
            avg_cpl: row.avg_cpl,
            roi: row.roi,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastRow {
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Month_Name")]
    pub month_name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Predicted_Leads")]
    pub predicted_leads: f64,
    #[serde(rename = "Predicted_CPL")]
    pub predicted_cpl: f64,
}

impl From<&ForecastPoint> for ForecastRow {
    fn from(row: &ForecastPoint) -> Self {
        Self {
            month: row.month,
            month_name: row.month_name.clone(),
            year: row.year,
            predicted_leads: row.predicted_leads,
            predicted_cpl: row.predicted_cpl,
        }
    }
}
