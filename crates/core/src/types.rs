use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the "Campaign Name Key" sheet. Blank cells are kept as `None`
/// and skipped when the mapping is built.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignKeyRow {
    #[serde(rename = "Campaign Name")]
    pub campaign_name: Option<String>,
    #[serde(rename = "Program Name")]
    pub program_name: Option<String>,
}

/// One reporting-period row of the "RAW DATA" sheet, with the sheet's own
/// column headers. Numeric cells may be empty; counts may arrive as floats
/// from spreadsheet exports.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Campaign name")]
    pub campaign_name: String,
    #[serde(rename = "Objective")]
    pub objective: String,
    #[serde(rename = "Reporting starts")]
    pub reporting_starts: String,
    #[serde(rename = "Reporting ends")]
    pub reporting_ends: Option<String>,
    #[serde(rename = "Amount spent (USD)")]
    pub amount_spent: Option<f64>,
    #[serde(rename = "Impressions")]
    pub impressions: Option<f64>,
    #[serde(rename = "Link clicks")]
    pub link_clicks: Option<f64>,
    #[serde(rename = "Landing page views")]
    pub landing_page_views: Option<f64>,
    #[serde(rename = "Results")]
    pub results: Option<f64>,
}

/// A raw record after program resolution, date derivation, and zero-fill.
/// Rates are `None` exactly when their denominator is zero; undefined values
/// never participate in downstream arithmetic.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    pub campaign_name: String,
    pub program: String,
    pub objective: String,
    pub date: NaiveDate,
    pub year: i32,
    /// Calendar month, 1–12.
    pub month: u32,
    /// Three-letter month abbreviation ("Jul", "Aug", ...).
    pub month_name: String,
    pub quarter: u32,
    pub iso_week: u32,
    pub spend: f64,
    pub impressions: u64,
    pub link_clicks: u64,
    pub landing_page_views: u64,
    pub results: u64,
    /// Cost per lead: spend / results when results > 0.
    pub cpl: Option<f64>,
    /// 100 x results / link clicks when clicks > 0.
    pub click_to_result_rate: Option<f64>,
    /// 100 x results / landing page views when views > 0.
    pub view_to_result_rate: Option<f64>,
}

/// Month abbreviations in fiscal-year order (FY starts in July). All
/// month-keyed tables sort by this sequence, never alphabetically.
pub const FISCAL_MONTH_ORDER: [&str; 12] = [
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun",
];

/// Position of a month abbreviation within the fiscal year; unknown names
/// sort last.
pub fn fiscal_position(month_name: &str) -> usize {
    FISCAL_MONTH_ORDER
        .iter()
        .position(|m| *m == month_name)
        .unwrap_or(FISCAL_MONTH_ORDER.len())
}

/// Three-letter abbreviation for a calendar month number.
pub fn month_abbrev(month: u32) -> &'static str {
    const ABBREV: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    match month {
        1..=12 => ABBREV[(month - 1) as usize],
        _ => "???",
    }
}

/// Performance bucket assigned per program from population quantile
/// thresholds. Serialized with the labels the output tables carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Performing Well")]
    PerformingWell,
    #[serde(rename = "High CPL")]
    HighCpl,
    #[serde(rename = "Low Conversion")]
    LowConversion,
    #[serde(rename = "Underperforming")]
    Underperforming,
    #[serde(rename = "No Leads")]
    NoLeads,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::PerformingWell => "Performing Well",
            Category::HighCpl => "High CPL",
            Category::LowConversion => "Low Conversion",
            Category::Underperforming => "Underperforming",
            Category::NoLeads => "No Leads",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
