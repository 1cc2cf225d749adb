//! Workbook loading and record normalization for the campaign analysis
//! pipeline.

pub mod loader;
pub mod normalize;

pub use loader::{load_campaign_key, load_raw_records};
pub use normalize::{filter_by_objective, normalize, program_mapping};
