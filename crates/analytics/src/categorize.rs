//! Categorization heuristic — buckets each program by population quantile
//! thresholds of CPL and conversion rate.

use crate::aggregate::ProgramPerformance;
use crate::stats;
use campaign_core::types::Category;
use serde::Serialize;
use tracing::info;

/// Population thresholds computed over programs with at least one result.
/// A threshold is `None` when the population carries no defined values for
/// that metric; comparisons against an undefined threshold never match.
#[derive(Debug, Clone, Serialize)]
pub struct Thresholds {
    pub cpl_median: Option<f64>,
    pub cpl_p75: Option<f64>,
    pub conversion_median: Option<f64>,
    pub conversion_p25: Option<f64>,
}

impl Thresholds {
    pub fn from_performance(rows: &[ProgramPerformance]) -> Self {
        let population: Vec<&ProgramPerformance> =
            rows.iter().filter(|r| r.results > 0).collect();
        let cpls: Vec<f64> = population.iter().filter_map(|r| r.mean_cpl).collect();
        let rates: Vec<f64> = population
            .iter()
            .filter_map(|r| r.click_to_result_rate)
            .collect();

        let thresholds = Self {
            cpl_median: stats::median(&cpls),
            cpl_p75: stats::quantile(&cpls, 0.75),
            conversion_median: stats::median(&rates),
            conversion_p25: stats::quantile(&rates, 0.25),
        };
        info!(
            cpl_median = ?thresholds.cpl_median,
            cpl_p75 = ?thresholds.cpl_p75,
            conversion_median = ?thresholds.conversion_median,
            conversion_p25 = ?thresholds.conversion_p25,
            "Categorization thresholds computed"
        );
        thresholds
    }
}

fn above(value: Option<f64>, threshold: Option<f64>) -> bool {
    matches!((value, threshold), (Some(v), Some(t)) if v > t)
}

fn below(value: Option<f64>, threshold: Option<f64>) -> bool {
    matches!((value, threshold), (Some(v), Some(t)) if v < t)
}

/// Assign one category per program. The precedence order is a design
/// decision: the later buckets would otherwise overlap with the earlier
/// ones, and first match wins.
pub fn categorize(row: &ProgramPerformance, thresholds: &Thresholds) -> Category {
    if row.results == 0 || row.mean_cpl.is_none() {
        return Category::NoLeads;
    }
    if above(row.mean_cpl, thresholds.cpl_p75)
        && below(row.click_to_result_rate, thresholds.conversion_p25)
    {
        return Category::Underperforming;
    }
    if above(row.mean_cpl, thresholds.cpl_median) {
        return Category::HighCpl;
    }
    if below(row.click_to_result_rate, thresholds.conversion_median) {
        return Category::LowConversion;
    }
    Category::PerformingWell
}

/// A program's performance row with its assigned category.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedProgram {
    pub performance: ProgramPerformance,
    pub category: Category,
}

/// Compute thresholds over the table and categorize every program.
pub fn assign_categories(rows: Vec<ProgramPerformance>) -> Vec<CategorizedProgram> {
    let thresholds = Thresholds::from_performance(&rows);
    rows.into_iter()
        .map(|performance| {
            let category = categorize(&performance, &thresholds);
            CategorizedProgram {
                performance,
                category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(program: &str, cpl: Option<f64>, rate: Option<f64>, results: u64) -> ProgramPerformance {
        ProgramPerformance {
            program: program.to_string(),
            spend: cpl.unwrap_or(0.0) * results as f64,
            results,
            mean_cpl: cpl,
            link_clicks: 100,
            landing_page_views: 80,
            impressions: 10_000,
            click_to_result_rate: rate,
            view_to_result_rate: rate,
            ctr: Some(1.0),
        }
    }

    /// Five programs with CPLs 10..50 and rates 1..5 give thresholds:
    /// CPL median 30, p75 40; rate median 3, p25 2.
    fn population() -> Vec<ProgramPerformance> {
        vec![
            row("p10", Some(10.0), Some(5.0), 10),
            row("p20", Some(20.0), Some(4.0), 10),
            row("p30", Some(30.0), Some(3.0), 10),
            row("p40", Some(40.0), Some(2.0), 10),
            row("p50", Some(50.0), Some(1.0), 10),
        ]
    }

    #[test]
    fn test_thresholds_from_population() {
        let t = Thresholds::from_performance(&population());
        assert_eq!(t.cpl_median, Some(30.0));
        assert_eq!(t.cpl_p75, Some(40.0));
        assert_eq!(t.conversion_median, Some(3.0));
        assert_eq!(t.conversion_p25, Some(2.0));
    }

    #[test]
    fn test_thresholds_exclude_programs_without_results() {
        let mut rows = population();
        // A zero-result program with a wild rate must not move thresholds.
        rows.push(row("dead", None, Some(99.0), 0));
        let t = Thresholds::from_performance(&rows);
        assert_eq!(t.conversion_median, Some(3.0));
    }

    // Precedence, first match wins ------------------------------------------

    #[test]
    fn test_no_leads_takes_precedence() {
        let t = Thresholds::from_performance(&population());
        assert_eq!(categorize(&row("x", None, None, 0), &t), Category::NoLeads);
    }

    #[test]
    fn test_worst_on_both_axes_is_underperforming_not_high_cpl() {
        let t = Thresholds::from_performance(&population());
        // CPL above p75 AND conversion below p25: despite also qualifying
        // for HighCpl, precedence lands it in Underperforming.
        let worst = row("worst", Some(45.0), Some(1.5), 5);
        assert_eq!(categorize(&worst, &t), Category::Underperforming);
    }

    #[test]
    fn test_high_cpl_without_low_conversion() {
        let t = Thresholds::from_performance(&population());
        let pricey = row("pricey", Some(45.0), Some(4.5), 5);
        assert_eq!(categorize(&pricey, &t), Category::HighCpl);
    }

    #[test]
    fn test_low_conversion_with_acceptable_cpl() {
        let t = Thresholds::from_performance(&population());
        let sluggish = row("sluggish", Some(15.0), Some(2.5), 5);
        assert_eq!(categorize(&sluggish, &t), Category::LowConversion);
    }

    #[test]
    fn test_performing_well_otherwise() {
        let t = Thresholds::from_performance(&population());
        let good = row("good", Some(15.0), Some(4.5), 5);
        assert_eq!(categorize(&good, &t), Category::PerformingWell);
    }

    #[test]
    fn test_categorization_is_total() {
        let rows = {
            let mut rows = population();
            rows.push(row("dead", None, None, 0));
            rows
        };
        let categorized = assign_categories(rows);
        assert_eq!(categorized.len(), 6);
        // Every program with results > 0 gets a non-NoLeads bucket here, and
        // the zero-result program gets NoLeads.
        for c in &categorized {
            if c.performance.results == 0 {
                assert_eq!(c.category, Category::NoLeads);
            } else {
                assert_ne!(c.category, Category::NoLeads);
            }
        }
    }
}
