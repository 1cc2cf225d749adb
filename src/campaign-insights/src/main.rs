//! Campaign Insights — single-pass batch analysis of ad-delivery records:
//! performance metrics, program categorization, lead forecasts, and
//! budget-optimization recommendations.
//!
//! Main entry point that loads the workbook sheets, runs every analysis
//! stage, and writes the output tables.

use campaign_core::config::AppConfig;
use campaign_ingest::loader::{self, CAMPAIGN_KEY_FILE, RAW_DATA_FILE};
use campaign_ingest::{filter_by_objective, normalize, program_mapping};
use campaign_reporting::{export, AnalysisOutputs};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "campaign-insights")]
#[command(about = "Batch campaign performance analysis and budget optimization")]
#[command(version)]
struct Cli {
    /// Directory holding the workbook sheet exports (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory the output tables are written to (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Campaign objective to analyze (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__OBJECTIVE")]
    objective: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Campaign Insights starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(dir) = cli.input_dir {
        config.input_dir = dir.display().to_string();
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir.display().to_string();
    }
    if let Some(objective) = cli.objective {
        config.objective = objective;
    }

    info!(
        input_dir = %config.input_dir,
        output_dir = %config.output_dir,
        objective = %config.objective,
        "Configuration loaded"
    );

    // Load the two workbook sheets; either missing is fatal.
    let input_dir = Path::new(&config.input_dir);
    let key_rows = loader::load_campaign_key(&input_dir.join(CAMPAIGN_KEY_FILE))?;
    let raw_records = loader::load_raw_records(&input_dir.join(RAW_DATA_FILE))?;

    // Normalize and restrict to the objective under analysis.
    let mapping = program_mapping(&key_rows);
    let normalized = normalize(&raw_records, &mapping)?;
    let leads = filter_by_objective(&normalized, &config.objective);

    if let (Some(start), Some(end)) = (
        leads.iter().map(|r| r.date).min(),
        leads.iter().map(|r| r.date).max(),
    ) {
        info!(records = leads.len(), start = %start, end = %end, "Analysis window");
    }

    // Compute every table in one pass and write the outputs.
    let outputs = AnalysisOutputs::compute(&leads, &config);
    summarize(&outputs);
    export(&outputs, Path::new(&config.output_dir))?;

    info!("Analysis complete; all tables written");

    Ok(())
}

/// Log the run summary the way the downstream narrative consumes it.
fn summarize(outputs: &AnalysisOutputs) {
    let correlations = &outputs.lag_correlations;
    info!(
        clicks_lag1 = ?correlations.clicks_lag1,
        clicks_lag2 = ?correlations.clicks_lag2,
        views_lag1 = ?correlations.views_lag1,
        views_lag2 = ?correlations.views_lag2,
        "Engagement-to-lead correlations (weekly lags)"
    );

    for point in &outputs.forecast {
        info!(
            month = %format!("{} {}", point.month_name, point.year),
            predicted_leads = %format!("{:.0}", point.predicted_leads),
            predicted_cpl = %format!("{:.2}", point.predicted_cpl),
            "Forecast"
        );
    }

    for allocation in &outputs.balanced_allocation {
        info!(
            program = %allocation.program,
            weight = %format!("{:.3}", allocation.weight),
            current_budget = %format!("{:.2}", allocation.current_budget),
            allocated_budget = %format!("{:.2}", allocation.allocated_budget),
            projected_leads = %format!("{:.1}", allocation.projected_leads),
            "Balanced allocation"
        );
    }

    for projection in &outputs.projections {
        info!(
            program = %projection.program,
            historical_cpl = %format!("{:.2}", projection.historical_cpl),
            predicted_cpl = %format!("{:.2}", projection.predicted_cpl),
            predicted_leads = %format!("{:.1}", projection.predicted_leads),
            "Optimized projection at current spend"
        );
    }

    for scenario in &outputs.scenarios {
        info!(
            scenario = %scenario.scenario,
            total_budget = %format!("{:.0}", scenario.total_budget),
            total_leads = %format!("{:.0}", scenario.total_leads),
            lead_improvement_pct = %format!("{:.1}", scenario.lead_improvement_pct),
            "What-if scenario"
        );
    }
}
