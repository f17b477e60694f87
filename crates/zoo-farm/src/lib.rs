/*
[INPUT]:  Public API exports for the zoo-farm crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod accounts;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod scheduler;
pub mod session;
pub mod startup;

// Re-export main types for convenience
pub use accounts::ProxyAssignment;
pub use config::RunnerConfig;
pub use pipeline::{AccountJob, PipelineContext, PipelineReport, StepStatus};
pub use scheduler::{BatchScheduler, OutcomeStatus, PipelineOutcome};
pub use session::AccountSession;
