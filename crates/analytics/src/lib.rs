//! Aggregation engine, categorization heuristic, and the numeric helpers
//! they share.

pub mod aggregate;
pub mod categorize;
pub mod stats;

pub use aggregate::{
    conversion_by_program, lag_correlations, monthly_stats, monthly_trends, program_performance,
    weekly_trends, Denominator, LagCorrelations, MonthlyStats, MonthlyTrend, ProgramConversion,
    ProgramPerformance, WeeklyTrend,
};
pub use categorize::{assign_categories, categorize, CategorizedProgram, Thresholds};
