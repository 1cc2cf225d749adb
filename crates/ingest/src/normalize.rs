//! Raw-record normalization: program resolution, calendar-field derivation,
//! zero-fill of missing counts, and null-safe rate computation.

use campaign_core::types::{month_abbrev, CampaignKeyRow, NormalizedRecord, RawRecord};
use campaign_core::{CampaignError, CampaignResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::info;

/// Build the campaign-to-program mapping from the key sheet. Blank rows are
/// skipped and names trimmed.
pub fn program_mapping(rows: &[CampaignKeyRow]) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    for row in rows {
        let (Some(campaign), Some(program)) =
            (row.campaign_name.as_deref(), row.program_name.as_deref())
        else {
            continue;
        };
        let campaign = campaign.trim();
        let program = program.trim();
        if campaign.is_empty() || program.is_empty() {
            continue;
        }
        mapping.insert(campaign.to_string(), program.to_string());
    }
    mapping
}

fn parse_report_date(raw: &str) -> CampaignResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    // Spreadsheet exports sometimes carry a midnight timestamp.
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(CampaignError::Input(format!(
        "unparseable reporting date: {raw:?}"
    )))
}

fn count(value: Option<f64>) -> u64 {
    value.map(|v| v.max(0.0).round() as u64).unwrap_or(0)
}

fn rate(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64 * 100.0)
}

/// Produce the normalized table from raw records. Unmapped campaigns keep
/// their raw campaign name as the program name; missing counts become zero;
/// each rate is `None` exactly when its denominator is zero. The input is
/// never mutated.
pub fn normalize(
    records: &[RawRecord],
    mapping: &HashMap<String, String>,
) -> CampaignResult<Vec<NormalizedRecord>> {
    let mut normalized = Vec::with_capacity(records.len());
    for record in records {
        let date = parse_report_date(&record.reporting_starts)?;
        let spend = record.amount_spent.unwrap_or(0.0);
        let impressions = count(record.impressions);
        let link_clicks = count(record.link_clicks);
        let landing_page_views = count(record.landing_page_views);
        let results = count(record.results);
        let program = mapping
            .get(record.campaign_name.trim())
            .cloned()
            .unwrap_or_else(|| record.campaign_name.clone());

        normalized.push(NormalizedRecord {
            campaign_name: record.campaign_name.clone(),
            program,
            objective: record.objective.clone(),
            date,
            year: date.year(),
            month: date.month(),
            month_name: month_abbrev(date.month()).to_string(),
            quarter: (date.month() - 1) / 3 + 1,
            iso_week: date.iso_week().week(),
            spend,
            impressions,
            link_clicks,
            landing_page_views,
            results,
            cpl: (results > 0).then(|| spend / results as f64),
            click_to_result_rate: rate(results, link_clicks),
            view_to_result_rate: rate(results, landing_page_views),
        });
    }
    Ok(normalized)
}

/// Restrict the normalized table to one campaign objective. Every
/// downstream computation consumes only this subset.
pub fn filter_by_objective(
    records: &[NormalizedRecord],
    objective: &str,
) -> Vec<NormalizedRecord> {
    let filtered: Vec<NormalizedRecord> = records
        .iter()
        .filter(|r| r.objective == objective)
        .cloned()
        .collect();
    info!(
        total = records.len(),
        kept = filtered.len(),
        objective,
        "Filtered records by objective"
    );
    filtered
}
