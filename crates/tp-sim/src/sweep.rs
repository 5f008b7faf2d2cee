//! Parameter sweeps.
//!
//! A sweep runs one independent simulation per parameter value. Each point
//! builds its own inputs, so points share nothing and run in parallel.

use std::fmt;

use rayon::prelude::*;
use tp_vessel::{Container, PowerSource};
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::sim::Simulation;

/// Linearly spaced values of one parameter, both ends included.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepDefinition {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
}

impl SweepDefinition {
    pub fn linear(start: f64, end: f64, num_points: usize) -> SimResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SimError::InvalidArg {
                what: "sweep bounds must be finite",
            });
        }
        if num_points < 2 {
            return Err(SimError::InvalidArg {
                what: "sweep must have at least 2 points",
            });
        }
        Ok(Self {
            start,
            end,
            num_points,
        })
    }

    pub fn points(&self) -> Vec<f64> {
        let span = self.end - self.start;
        let last = (self.num_points - 1) as f64;
        (0..self.num_points)
            .map(|i| self.start + span * (i as f64 / last))
            .collect()
    }
}

/// Inputs for one sweep point.
pub struct SweepCase {
    pub simulation: Simulation,
    pub container: Container,
    pub source: Box<dyn PowerSource>,
}

/// Condensed result of a successful point.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub elapsed_s: f64,
    pub final_temperature_c: f64,
    pub steps: u64,
    /// Fluid volume added by melted ice (m³)
    pub added_volume_m3: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepOutcome {
    pub value: f64,
    pub result: Result<RunSummary, String>,
}

/// Run `build(value)` then simulate, for every value, in parallel.
///
/// Outcomes come back in the order of `values`. A failing point, whether it
/// fails to build or to reach its target, does not abort the others.
pub fn run_sweep<F, E>(values: &[f64], build: F) -> Vec<SweepOutcome>
where
    F: Fn(f64) -> Result<SweepCase, E> + Sync,
    E: fmt::Display,
{
    info!(points = values.len(), "sweep started");
    let outcomes: Vec<SweepOutcome> = values
        .par_iter()
        .map(|&value| {
            let result = run_point(value, &build);
            debug!(value, ok = result.is_ok(), "sweep point finished");
            SweepOutcome { value, result }
        })
        .collect();
    info!(
        failures = outcomes.iter().filter(|o| o.result.is_err()).count(),
        "sweep finished"
    );
    outcomes
}

fn run_point<F, E>(value: f64, build: &F) -> Result<RunSummary, String>
where
    F: Fn(f64) -> Result<SweepCase, E>,
    E: fmt::Display,
{
    let SweepCase {
        simulation,
        mut container,
        source,
    } = build(value).map_err(|e| e.to_string())?;
    let record = simulation
        .run(&mut container, source.as_ref())
        .map_err(|e| e.to_string())?;
    Ok(RunSummary {
        elapsed_s: record.elapsed_s,
        final_temperature_c: record.final_temperature_c,
        steps: record.steps,
        added_volume_m3: record.ice.map_or(0.0, |ice| ice.added_volume_m3),
    })
}

/// Aggregate over a sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepStats {
    pub successes: usize,
    pub failures: usize,
    /// min/mean/max time to target over successful points; `None` if none
    pub min_time_s: Option<f64>,
    pub mean_time_s: Option<f64>,
    pub max_time_s: Option<f64>,
}

impl SweepStats {
    pub fn from_outcomes(outcomes: &[SweepOutcome]) -> Self {
        let times: Vec<f64> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| r.elapsed_s))
            .collect();
        let successes = times.len();
        let (min_time_s, mean_time_s, max_time_s) = if times.is_empty() {
            (None, None, None)
        } else {
            let min = times.iter().copied().fold(f64::INFINITY, f64::min);
            let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = times.iter().sum::<f64>() / successes as f64;
            (Some(min), Some(mean), Some(max))
        };
        Self {
            successes,
            failures: outcomes.len() - successes,
            min_time_s,
            mean_time_s,
            max_time_s,
        }
    }
}
