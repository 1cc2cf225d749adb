//! Aggregation engine — groups normalized records by time bucket or program
//! and computes null-safe totals, means, and rates.

use crate::stats;
use campaign_core::types::{fiscal_position, NormalizedRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

// ─── Shared accumulation ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Totals {
    spend: f64,
    impressions: u64,
    link_clicks: u64,
    landing_page_views: u64,
    results: u64,
    /// Per-record CPLs that were defined; their mean is the bucket CPL.
    cpls: Vec<f64>,
}

impl Totals {
    fn absorb(&mut self, record: &NormalizedRecord) {
        self.spend += record.spend;
        self.impressions += record.impressions;
        self.link_clicks += record.link_clicks;
        self.landing_page_views += record.landing_page_views;
        self.results += record.results;
        if let Some(cpl) = record.cpl {
            self.cpls.push(cpl);
        }
    }

    fn mean_cpl(&self) -> Option<f64> {
        stats::mean(&self.cpls)
    }
}

fn group_by<'a, K, F>(records: &'a [NormalizedRecord], key: F) -> HashMap<K, Totals>
where
    K: std::hash::Hash + Eq,
    F: Fn(&'a NormalizedRecord) -> K,
{
    let mut groups: HashMap<K, Totals> = HashMap::new();
    for record in records {
        groups.entry(key(record)).or_default().absorb(record);
    }
    groups
}

fn ratio_pct(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64 * 100.0)
}

/// Descending sort on an optional metric; undefined values sort last.
fn cmp_desc_undefined_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ─── Monthly statistics ─────────────────────────────────────────────────────

/// One month of lead volume, mean CPL, and spend.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    pub month_name: String,
    pub results: u64,
    /// Mean of the month's defined per-record CPLs; `None` when no record
    /// in the month produced a lead.
    pub mean_cpl: Option<f64>,
    pub spend: f64,
}

/// Per-month totals in fiscal-calendar order (July first), never
/// alphabetical.
pub fn monthly_stats(records: &[NormalizedRecord]) -> Vec<MonthlyStats> {
    let groups = group_by(records, |r| r.month_name.clone());
    let mut rows: Vec<MonthlyStats> = groups
        .into_iter()
        .map(|(month_name, totals)| MonthlyStats {
            month_name,
            results: totals.results,
            mean_cpl: totals.mean_cpl(),
            spend: totals.spend,
        })
        .collect();
    rows.sort_by_key(|row| fiscal_position(&row.month_name));
    rows
}

// ─── Per-program conversion rates ───────────────────────────────────────────

/// Which engagement count a conversion rate is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denominator {
    LinkClicks,
    LandingPageViews,
}

/// One program's conversion rate against a chosen denominator.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramConversion {
    pub program: String,
    pub denominator: u64,
    pub results: u64,
    /// 100 x results / denominator; `None` when the denominator sum is zero.
    pub conversion_rate: Option<f64>,
}

/// Per-program conversion table, best rate first; programs with an undefined
/// rate sort last.
pub fn conversion_by_program(
    records: &[NormalizedRecord],
    denominator: Denominator,
) -> Vec<ProgramConversion> {
    let groups = group_by(records, |r| r.program.clone());
    let mut rows: Vec<ProgramConversion> = groups
        .into_iter()
        .map(|(program, totals)| {
            let denom = match denominator {
                Denominator::LinkClicks => totals.link_clicks,
                Denominator::LandingPageViews => totals.landing_page_views,
            };
            ProgramConversion {
                program,
                denominator: denom,
                results: totals.results,
                conversion_rate: ratio_pct(totals.results, denom),
            }
        })
        .collect();
    rows.sort_by(|a, b| cmp_desc_undefined_last(a.conversion_rate, b.conversion_rate));
    rows
}

// ─── Per-program performance ────────────────────────────────────────────────

/// Full per-program metric row: totals, mean CPL, and engagement rates.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramPerformance {
    pub program: String,
    pub spend: f64,
    pub results: u64,
    /// Mean of the program's defined per-record CPLs; `None` when the
    /// program has no leads.
    pub mean_cpl: Option<f64>,
    pub link_clicks: u64,
    pub landing_page_views: u64,
    pub impressions: u64,
    pub click_to_result_rate: Option<f64>,
    pub view_to_result_rate: Option<f64>,
    /// 100 x link clicks / impressions.
    pub ctr: Option<f64>,
}

/// Per-program performance table, highest CPL first; programs with an
/// undefined CPL sort last.
pub fn program_performance(records: &[NormalizedRecord]) -> Vec<ProgramPerformance> {
    let groups = group_by(records, |r| r.program.clone());
    let mut rows: Vec<ProgramPerformance> = groups
        .into_iter()
        .map(|(program, totals)| ProgramPerformance {
            program,
            spend: totals.spend,
            results: totals.results,
            mean_cpl: totals.mean_cpl(),
            link_clicks: totals.link_clicks,
            landing_page_views: totals.landing_page_views,
            impressions: totals.impressions,
            click_to_result_rate: ratio_pct(totals.results, totals.link_clicks),
            view_to_result_rate: ratio_pct(totals.results, totals.landing_page_views),
            ctr: ratio_pct(totals.link_clicks, totals.impressions),
        })
        .collect();
    rows.sort_by(|a, b| cmp_desc_undefined_last(a.mean_cpl, b.mean_cpl));
    rows
}

// ─── Weekly and monthly trends ──────────────────────────────────────────────

/// One ISO week of engagement totals, with 1- and 2-week lagged engagement
/// columns for lead-lag analysis.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyTrend {
    pub iso_week: u32,
    pub link_clicks: u64,
    pub landing_page_views: u64,
    pub results: u64,
    pub spend: f64,
    pub clicks_lag1: Option<u64>,
    pub views_lag1: Option<u64>,
    pub clicks_lag2: Option<u64>,
    pub views_lag2: Option<u64>,
}

/// Weekly totals in ascending week order, with positional lag columns.
pub fn weekly_trends(records: &[NormalizedRecord]) -> Vec<WeeklyTrend> {
    let mut groups: BTreeMap<u32, Totals> = BTreeMap::new();
    for record in records {
        groups.entry(record.iso_week).or_default().absorb(record);
    }
    let ordered: Vec<(u32, Totals)> = groups.into_iter().collect();
    ordered
        .iter()
        .enumerate()
        .map(|(i, (week, totals))| WeeklyTrend {
            iso_week: *week,
            link_clicks: totals.link_clicks,
            landing_page_views: totals.landing_page_views,
            results: totals.results,
            spend: totals.spend,
            clicks_lag1: i.checked_sub(1).map(|j| ordered[j].1.link_clicks),
            views_lag1: i.checked_sub(1).map(|j| ordered[j].1.landing_page_views),
            clicks_lag2: i.checked_sub(2).map(|j| ordered[j].1.link_clicks),
            views_lag2: i.checked_sub(2).map(|j| ordered[j].1.landing_page_views),
        })
        .collect()
}

/// One month of engagement totals.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    pub month_name: String,
    pub link_clicks: u64,
    pub landing_page_views: u64,
    pub results: u64,
    pub spend: f64,
}

/// Monthly engagement totals in fiscal-calendar order.
pub fn monthly_trends(records: &[NormalizedRecord]) -> Vec<MonthlyTrend> {
    let groups = group_by(records, |r| r.month_name.clone());
    let mut rows: Vec<MonthlyTrend> = groups
        .into_iter()
        .map(|(month_name, totals)| MonthlyTrend {
            month_name,
            link_clicks: totals.link_clicks,
            landing_page_views: totals.landing_page_views,
            results: totals.results,
            spend: totals.spend,
        })
        .collect();
    rows.sort_by_key(|row| fiscal_position(&row.month_name));
    rows
}

// ─── Lead-lag correlation ───────────────────────────────────────────────────

/// Pearson correlations of lagged engagement against lead volume over the
/// weekly table.
#[derive(Debug, Clone, Serialize)]
pub struct LagCorrelations {
    pub clicks_lag1: Option<f64>,
    pub clicks_lag2: Option<f64>,
    pub views_lag1: Option<f64>,
    pub views_lag2: Option<f64>,
}

pub fn lag_correlations(weekly: &[WeeklyTrend]) -> LagCorrelations {
    fn correlate<F>(weekly: &[WeeklyTrend], lag: F) -> Option<f64>
    where
        F: Fn(&WeeklyTrend) -> Option<u64>,
    {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for week in weekly {
            if let Some(value) = lag(week) {
                xs.push(value as f64);
                ys.push(week.results as f64);
            }
        }
        stats::pearson(&xs, &ys)
    }

    LagCorrelations {
        clicks_lag1: correlate(weekly, |w| w.clicks_lag1),
        clicks_lag2: correlate(weekly, |w| w.clicks_lag2),
        views_lag1: correlate(weekly, |w| w.views_lag1),
        views_lag2: correlate(weekly, |w| w.views_lag2),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
