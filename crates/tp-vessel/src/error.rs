//! Error types for vessel definitions.

use thiserror::Error;
use tp_core::TpError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VesselError {
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidProperty {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown {kind}: {name}")]
    UnknownCatalogEntry { kind: &'static str, name: String },
}

pub type VesselResult<T> = Result<T, VesselError>;

impl From<TpError> for VesselError {
    fn from(e: TpError) -> Self {
        match e {
            TpError::NonFinite { what, value } => VesselError::InvalidProperty {
                field: what,
                value,
                reason: "must be finite",
            },
            TpError::NonPositive { what, value } => VesselError::InvalidProperty {
                field: what,
                value,
                reason: "must be positive",
            },
            TpError::InvalidArg { what } => VesselError::InvalidProperty {
                field: what,
                value: f64::NAN,
                reason: "invalid argument",
            },
        }
    }
}
