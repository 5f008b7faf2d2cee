//! Time-stepped thermal simulation of a heated container.
//!
//! Provides:
//! - Per-step heating and ambient heat-loss deltas
//! - Ice addition model (warming to the melting point, then melting)
//! - Event log and interpolated series for rendering
//! - Simulation driver with explicit stop criteria
//! - Parallel parameter sweeps

pub mod config;
pub mod error;
pub mod events;
pub mod heat;
pub mod ice;
pub mod interpolate;
pub mod sim;
pub mod sweep;

pub use config::{EquilibriumCheck, IceConfig, IceConstants, SimConfig, StopCriteria};
pub use error::{SimError, SimResult, StopReason};
pub use events::{EventLog, SimEvent, SimEventKind};
pub use heat::{StepHeat, cooling_delta, heating_delta, step_heat};
pub use ice::{IcePhase, IceState, IceStepOutcome};
pub use interpolate::{SamplePoint, intermediate_points};
pub use sim::{IceSummary, SimProgress, SimRecord, Simulation};
pub use sweep::{RunSummary, SweepCase, SweepDefinition, SweepOutcome, SweepStats, run_sweep};
