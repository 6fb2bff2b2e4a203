pub mod client;
pub mod debug_logger;
pub mod report;
pub mod request;
pub mod runner;
pub mod types;

// Re-export commonly used items
pub use client::{client_for, HttpProbeClient};
pub use debug_logger::{get_debug_logger, DebugLogger};
pub use report::{run_all, run_all_with, ProbeSummary};
pub use request::ProbeRequest;
pub use runner::{probe, probe_with};
pub use types::*;
