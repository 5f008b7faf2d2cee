//! Error types for the tp-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid vessel: {0}")]
    Vessel(String),

    #[error("Simulation error: {0}")]
    Simulation(#[from] tp_sim::SimError),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tp_project::ProjectError> for AppError {
    fn from(err: tp_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<tp_vessel::VesselError> for AppError {
    fn from(err: tp_vessel::VesselError) -> Self {
        AppError::Vessel(err.to_string())
    }
}

impl From<tp_results::ResultsError> for AppError {
    fn from(err: tp_results::ResultsError) -> Self {
        match err {
            tp_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
