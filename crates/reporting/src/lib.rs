//! Output-table assembly and CSV export — the flat tables the presentation
//! collaborators (chart renderer, slide builder, dashboard) consume.

pub mod export;
pub mod report_builder;
pub mod tables;

pub use export::export;
pub use report_builder::{AnalysisOutputs, ProgramRoi};
