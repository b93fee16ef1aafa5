//! CLI command implementations.
//!
//! Each command is implemented in its own module; the shared pipeline lives
//! in `run`. Commands orchestrate the library components to perform user
//! tasks.

pub mod export;
pub mod report;
pub mod run;

// Re-export main command functions
pub use export::{execute_export, ExportArgs};
pub use report::{execute_report, ReportArgs};
pub use run::{run_analysis, validate_options, AnalysisOptions, AnalysisOutcome};
