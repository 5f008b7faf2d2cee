//! Shared application service layer for thermopot.
//!
//! Centralizes scenario handling, simulation execution with result caching,
//! result querying and parameter sweeps so the CLI stays thin.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod sweep_service;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, SimulationProgress};
pub use project_service::{
    ScenarioOverrides, ScenarioSummary, apply_overrides, build_container, build_heater,
    build_simulation, load_scenario, save_scenario, summarize_scenario, validate_scenario,
};
pub use query::{
    RunSummary, filter_events, get_run_summary, series_to_csv, temperature_at, time_to_reach,
    write_series_csv,
};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run,
    ensure_run_with_progress, list_runs, load_run, load_run_events, simulate_scenario,
};
pub use sweep_service::{SweepParameter, SweepReport, run_parameter_sweep};
