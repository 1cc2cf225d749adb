//! CSV export — each table is written once, as a complete file, into the
//! output directory.

use crate::report_builder::AnalysisOutputs;
use crate::tables::{
    ClickRateRow, ForecastRow, LpvRateRow, MonthlyStatsRow, MonthlyTrendRow,
    ProgramPerformanceRow, ProgramRoiRow, SensitivityRow, WeeklyTrendRow, WhatIfScenarioRow,
};
use campaign_core::CampaignResult;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub const MONTHLY_STATS_FILE: &str = "monthly_stats.csv";
pub const PROGRAM_CLICK_RATES_FILE: &str = "program_click_rates.csv";
pub const PROGRAM_LPV_RATES_FILE: &str = "program_lpv_rates.csv";
pub const PROGRAM_PERFORMANCE_FILE: &str = "program_performance.csv";
pub const PROGRAM_ROI_FILE: &str = "program_roi.csv";
pub const WEEKLY_TRENDS_FILE: &str = "weekly_trends.csv";
pub const MONTHLY_TRENDS_FILE: &str = "monthly_trends.csv";
pub const WHAT_IF_SCENARIOS_FILE: &str = "what_if_scenarios.csv";
pub const ROI_OPTIMIZATION_FILE: &str = "roi_optimization.csv";
pub const FORECAST_FILE: &str = "forecast.csv";

fn write_table<R: Serialize>(path: &Path, rows: &[R]) -> CampaignResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Table written");
    Ok(())
}

fn rows<'a, S, R: From<&'a S>>(source: &'a [S]) -> Vec<R> {
    source.iter().map(R::from).collect()
}

/// Write every output table. Optional artifacts (forecast, scenarios,
/// sensitivity) are omitted when empty so downstream consumers can skip the
/// dependent sections instead of reading a headerless file.
pub fn export(outputs: &AnalysisOutputs, dir: &Path) -> CampaignResult<()> {
    fs::create_dir_all(dir)?;

    write_table::<MonthlyStatsRow>(&dir.join(MONTHLY_STATS_FILE), &rows(&outputs.monthly_stats))?;
    write_table::<ClickRateRow>(
        &dir.join(PROGRAM_CLICK_RATES_FILE),
        &rows(&outputs.program_click_rates),
    )?;
    write_table::<LpvRateRow>(
        &dir.join(PROGRAM_LPV_RATES_FILE),
        &rows(&outputs.program_lpv_rates),
    )?;
    write_table::<ProgramPerformanceRow>(
        &dir.join(PROGRAM_PERFORMANCE_FILE),
        &rows(&outputs.program_performance),
    )?;
    write_table::<ProgramRoiRow>(&dir.join(PROGRAM_ROI_FILE), &rows(&outputs.program_roi))?;
    write_table::<WeeklyTrendRow>(&dir.join(WEEKLY_TRENDS_FILE), &rows(&outputs.weekly_trends))?;
    write_table::<MonthlyTrendRow>(
        &dir.join(MONTHLY_TRENDS_FILE),
        &rows(&outputs.monthly_trends),
    )?;

    if !outputs.scenarios.is_empty() {
        write_table::<WhatIfScenarioRow>(
            &dir.join(WHAT_IF_SCENARIOS_FILE),
            &rows(&outputs.scenarios),
        )?;
    }
    if !outputs.sensitivity.is_empty() {
        write_table::<SensitivityRow>(
            &dir.join(ROI_OPTIMIZATION_FILE),
            &rows(&outputs.sensitivity),
        )?;
    }
    if !outputs.forecast.is_empty() {
        write_table::<ForecastRow>(&dir.join(FORECAST_FILE), &rows(&outputs.forecast))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::config::AppConfig;
    use campaign_core::types::{month_abbrev, NormalizedRecord};
    use chrono::{Datelike, NaiveDate};

    fn record(program: &str, date: &str, spend: f64, clicks: u64, results: u64) -> NormalizedRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
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
            landing_page_views: clicks / 2,
            results,
            cpl: (results > 0).then(|| spend / results as f64),
            click_to_result_rate: (clicks > 0)
                .then(|| results as f64 / clicks as f64 * 100.0),
            view_to_result_rate: (clicks / 2 > 0)
                .then(|| results as f64 / (clicks / 2) as f64 * 100.0),
        }
    }

    #[test]
    fn test_export_writes_core_tables() {
        let records = vec![
            record("A", "2024-07-01", 1000.0, 100, 10),
            record("B", "2024-08-01", 500.0, 100, 20),
        ];
        let outputs = AnalysisOutputs::compute(&records, &AppConfig::default());
        let dir = std::env::temp_dir().join("campaign_insights_export_test");
        let _ = fs::remove_dir_all(&dir);

        export(&outputs, &dir).unwrap();

        for file in [
            MONTHLY_STATS_FILE,
            PROGRAM_CLICK_RATES_FILE,
            PROGRAM_LPV_RATES_FILE,
            PROGRAM_PERFORMANCE_FILE,
            PROGRAM_ROI_FILE,
            WEEKLY_TRENDS_FILE,
            MONTHLY_TRENDS_FILE,
            WHAT_IF_SCENARIOS_FILE,
            ROI_OPTIMIZATION_FILE,
        ] {
            assert!(dir.join(file).exists(), "missing {file}");
        }

        let monthly = fs::read_to_string(dir.join(MONTHLY_STATS_FILE)).unwrap();
        assert!(monthly.starts_with("Month_Name,Results,CPL,Amount spent (USD)"));
    }

    #[test]
    fn test_optional_forecast_is_skipped_when_empty() {
        // Single month of history: no trend can be fitted.
        let records = vec![record("A", "2024-07-01", 1000.0, 100, 10)];
        let outputs = AnalysisOutputs::compute(&records, &AppConfig::default());
        assert!(outputs.forecast.is_empty());

        let dir = std::env::temp_dir().join("campaign_insights_export_nofc_test");
        let _ = fs::remove_dir_all(&dir);
        export(&outputs, &dir).unwrap();
        assert!(!dir.join(FORECAST_FILE).exists());
        assert!(dir.join(MONTHLY_STATS_FILE).exists());
    }
}
