//! Monthly series construction and the seasonal-adjusted projection.

use crate::trend::LinearTrend;
use campaign_core::config::ForecastConfig;
use campaign_core::types::{month_abbrev, NormalizedRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// One historical month keyed by calendar month number.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySeriesPoint {
    pub month: u32,
    pub results: u64,
    pub spend: f64,
    /// Mean of the month's defined per-record CPLs.
    pub mean_cpl: Option<f64>,
}

/// Group records by calendar month number, ascending. The month number is
/// the regression predictor.
pub fn monthly_series(records: &[NormalizedRecord]) -> Vec<MonthlySeriesPoint> {
    #[derive(Default)]
    struct Acc {
        results: u64,
        spend: f64,
        cpls: Vec<f64>,
    }

    let mut groups: BTreeMap<u32, Acc> = BTreeMap::new();
    for record in records {
        let acc = groups.entry(record.month).or_default();
        acc.results += record.results;
        acc.spend += record.spend;
        if let Some(cpl) = record.cpl {
            acc.cpls.push(cpl);
        }
    }
    groups
        .into_iter()
        .map(|(month, acc)| MonthlySeriesPoint {
            month,
            results: acc.results,
            spend: acc.spend,
            mean_cpl: if acc.cpls.is_empty() {
                None
            } else {
                Some(acc.cpls.iter().sum::<f64>() / acc.cpls.len() as f64)
            },
        })
        .collect()
}

/// A projected future month after seasonal adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub month: u32,
    pub month_name: String,
    pub year: i32,
    pub predicted_leads: f64,
    pub predicted_cpl: f64,
}

/// Fit lead volume and CPL against the month index and project onto the
/// configured future months. Lead projections are multiplied by the month's
/// seasonal factor; CPL projections are divided by it — higher expected
/// volume implies proportionally lower cost per lead. Months with no
/// defined CPL are imputed with the mean of the defined monthly means
/// before fitting.
///
/// Returns an empty forecast (with a warning) when the history is too short
/// to fit; downstream consumers treat the forecast table as optional.
pub fn forecast(records: &[NormalizedRecord], config: &ForecastConfig) -> Vec<ForecastPoint> {
    let series = monthly_series(records);
    if series.len() < 2 {
        warn!(
            months = series.len(),
            "Not enough monthly history to fit a trend; skipping forecast"
        );
        return Vec::new();
    }

    let xs: Vec<f64> = series.iter().map(|p| p.month as f64).collect();
    let leads: Vec<f64> = series.iter().map(|p| p.results as f64).collect();

    let defined: Vec<f64> = series.iter().filter_map(|p| p.mean_cpl).collect();
    if defined.is_empty() {
        warn!("No month has a defined CPL; skipping forecast");
        return Vec::new();
    }
    let cpl_fill = defined.iter().sum::<f64>() / defined.len() as f64;
    let cpls: Vec<f64> = series
        .iter()
        .map(|p| p.mean_cpl.unwrap_or(cpl_fill))
        .collect();

    let (Some(leads_trend), Some(cpl_trend)) =
        (LinearTrend::fit(&xs, &leads), LinearTrend::fit(&xs, &cpls))
    else {
        warn!("Degenerate monthly history; skipping forecast");
        return Vec::new();
    };

    let anchor = records.iter().map(|r| (r.year, r.month)).max();
    config
        .future_months
        .iter()
        .map(|&month| {
            let factor = config.factor_for(month);
            let year = match anchor {
                Some((year, anchor_month)) if month > anchor_month => year,
                Some((year, _)) => year + 1,
                None => 0,
            };
            ForecastPoint {
                month,
                month_name: month_abbrev(month).to_string(),
                year,
                predicted_leads: leads_trend.predict(month as f64) * factor,
                predicted_cpl: cpl_trend.predict(month as f64) / factor,
            }
        })
        .collect()
}
