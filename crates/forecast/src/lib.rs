//! Forecast model — an ordinary-least-squares trend over monthly aggregates
//! with a multiplicative seasonal adjustment.

pub mod model;
pub mod trend;

pub use model::{forecast, monthly_series, ForecastPoint, MonthlySeriesPoint};
pub use trend::LinearTrend;
