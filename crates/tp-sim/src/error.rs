//! Error types for simulation operations.

use std::fmt;

use thiserror::Error;

/// Why a run was stopped before reaching the target temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StopReason {
    /// Simulated time passed `StopCriteria::max_elapsed_s`.
    TimeLimit { max_elapsed_s: f64 },
    /// Temperature settled below target (heat loss balances heating).
    Equilibrium { spread_c: f64 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TimeLimit { max_elapsed_s } => {
                write!(f, "time limit of {max_elapsed_s:.0} s reached")
            }
            StopReason::Equilibrium { spread_c } => {
                write!(f, "thermal equilibrium (spread {spread_c:.4} °C)")
            }
        }
    }
}

/// Errors encountered during a simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Configuration error: invalid {field} = {value}")]
    Configuration { field: &'static str, value: f64 },

    #[error(
        "Target not reached: {reason} after {elapsed_s:.1} s at {temperature_c:.2} °C"
    )]
    NonConvergence {
        elapsed_s: f64,
        temperature_c: f64,
        reason: StopReason,
    },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<tp_core::TpError> for SimError {
    fn from(e: tp_core::TpError) -> Self {
        match e {
            tp_core::TpError::NonFinite { what, value }
            | tp_core::TpError::NonPositive { what, value } => SimError::Configuration {
                field: what,
                value,
            },
            tp_core::TpError::InvalidArg { what } => SimError::InvalidArg { what },
        }
    }
}
