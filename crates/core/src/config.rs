use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_INSIGHTS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Only records with this objective enter the analysis.
    #[serde(default = "default_objective")]
    pub objective: String,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Calendar months to project, in chronological order.
    #[serde(default = "default_future_months")]
    pub future_months: Vec<u32>,
    /// Seasonal multiplier per calendar month, calibrated from historical
    /// observation. Lead projections are multiplied by the factor; CPL
    /// projections are divided by it.
    #[serde(default = "default_seasonal_factors")]
    pub seasonal_factors: Vec<SeasonalFactor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonalFactor {
    pub month: u32,
    pub factor: f64,
}

impl ForecastConfig {
    /// Seasonal factor for a calendar month; months without an entry are
    /// treated as unadjusted.
    pub fn factor_for(&self, month: u32) -> f64 {
        self.seasonal_factors
            .iter()
            .find(|s| s.month == month)
            .map(|s| s.factor)
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    /// Scale applied to the efficiency score: (rate/100) * (scale / CPL).
    #[serde(default = "default_efficiency_scale")]
    pub efficiency_scale: f64,
    /// Efficiency-score weight of the balanced allocation.
    #[serde(default = "default_balanced_efficiency_weight")]
    pub balanced_efficiency_weight: f64,
    /// Conversion-rate weight of the balanced allocation.
    #[serde(default = "default_balanced_conversion_weight")]
    pub balanced_conversion_weight: f64,
    /// Budget multipliers swept over the balanced allocation.
    #[serde(default = "default_budget_multipliers")]
    pub budget_multipliers: Vec<f64>,
    /// How many of the remaining top programs share a paused budget.
    #[serde(default = "default_reallocation_targets")]
    pub reallocation_targets: usize,
    /// Assumed CPL multiplier for the optimized projection.
    #[serde(default = "default_optimized_cpl_factor")]
    pub optimized_cpl_factor: f64,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioRule>,
}

/// A named what-if scenario: select programs by a ranking rule and scale
/// their budget. A multiplier of zero pauses the selection and hands the
/// freed budget to the top remaining programs in equal shares.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRule {
    pub name: String,
    pub selection: ScenarioSelection,
    pub count: usize,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSelection {
    /// Highest efficiency score first.
    TopEfficiency,
    /// Highest cost per lead first.
    TopCpl,
    /// Lowest efficiency score first.
    BottomEfficiency,
}

// Default functions
fn default_input_dir() -> String {
    "data".to_string()
}
fn default_output_dir() -> String {
    "analysis_results".to_string()
}
fn default_objective() -> String {
    "Leads".to_string()
}
fn default_future_months() -> Vec<u32> {
    vec![7, 8, 9, 10, 11, 12]
}
fn default_seasonal_factors() -> Vec<SeasonalFactor> {
    [
        (7, 0.52),
        (8, 0.84),
        (9, 0.52),
        (10, 0.69),
        (11, 0.55),
        (12, 1.00),
    ]
    .into_iter()
    .map(|(month, factor)| SeasonalFactor { month, factor })
    .collect()
}
fn default_efficiency_scale() -> f64 {
    1000.0
}
fn default_balanced_efficiency_weight() -> f64 {
    0.6
}
fn default_balanced_conversion_weight() -> f64 {
    0.4
}
fn default_budget_multipliers() -> Vec<f64> {
    vec![0.8, 0.9, 1.0, 1.1, 1.2]
}
fn default_reallocation_targets() -> usize {
    3
}
fn default_optimized_cpl_factor() -> f64 {
    0.9
}
fn default_scenarios() -> Vec<ScenarioRule> {
    vec![
        ScenarioRule {
            name: "Increase Top 3 Programs by 30%".to_string(),
            selection: ScenarioSelection::TopEfficiency,
            count: 3,
            multiplier: 1.3,
        },
        ScenarioRule {
            name: "Reduce High CPL Programs by 25%".to_string(),
            selection: ScenarioSelection::TopCpl,
            count: 3,
            multiplier: 0.75,
        },
        ScenarioRule {
            name: "Pause Underperformers, Reallocate".to_string(),
            selection: ScenarioSelection::BottomEfficiency,
            count: 2,
            multiplier: 0.0,
        },
    ]
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            future_months: default_future_months(),
            seasonal_factors: default_seasonal_factors(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            efficiency_scale: default_efficiency_scale(),
            balanced_efficiency_weight: default_balanced_efficiency_weight(),
            balanced_conversion_weight: default_balanced_conversion_weight(),
            budget_multipliers: default_budget_multipliers(),
            reallocation_targets: default_reallocation_targets(),
            optimized_cpl_factor: default_optimized_cpl_factor(),
            scenarios: default_scenarios(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            objective: default_objective(),
            forecast: ForecastConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_INSIGHTS")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
