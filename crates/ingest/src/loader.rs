//! Sheet loading — the campaign name key and the raw fact table, exported
//! from the reporting workbook as CSV.

use campaign_core::types::{CampaignKeyRow, RawRecord};
use campaign_core::CampaignResult;
use std::path::Path;
use tracing::info;

/// File name of the campaign-to-program mapping sheet.
pub const CAMPAIGN_KEY_FILE: &str = "campaign_name_key.csv";
/// File name of the raw fact sheet.
pub const RAW_DATA_FILE: &str = "raw_data.csv";

/// Load the campaign-to-program mapping sheet. A missing or malformed file
/// is fatal for the run.
pub fn load_campaign_key(path: &Path) -> CampaignResult<Vec<CampaignKeyRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    info!(rows = rows.len(), path = %path.display(), "Campaign name key loaded");
    Ok(rows)
}

/// Load the raw fact sheet. A missing or malformed file is fatal for the
/// run.
pub fn load_raw_records(path: &Path) -> CampaignResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    info!(records = records.len(), path = %path.display(), "Raw data loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_campaign_key_skips_nothing_but_parses_blanks() {
        let path = write_temp(
            "campaign_insights_key_test.csv",
            "Campaign Name,Program Name\nCOLLEGE_A,Program A\n,\n",
        );
        let rows = load_campaign_key(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].campaign_name.as_deref(), Some("COLLEGE_A"));
        assert!(rows[1].campaign_name.is_none());
    }

    #[test]
    fn test_load_raw_records_with_empty_numeric_cells() {
        let path = write_temp(
            "campaign_insights_raw_test.csv",
            "Campaign name,Objective,Reporting starts,Reporting ends,Amount spent (USD),Impressions,Link clicks,Landing page views,Results\n\
             COLLEGE_A,Leads,2024-07-01,2024-07-31,1000.5,50000,120,,\n",
        );
        let records = load_raw_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount_spent, Some(1000.5));
        assert_eq!(records[0].link_clicks, Some(120.0));
        assert!(records[0].landing_page_views.is_none());
        assert!(records[0].results.is_none());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let missing = std::path::Path::new("/nonexistent/raw_data.csv");
        assert!(load_raw_records(missing).is_err());
    }
}
