//! Parameter sweeps over a scenario.

use std::fmt;
use std::str::FromStr;

use tp_project::Scenario;
use tp_project::schema::IceDef;
use tp_sim::{SweepCase, SweepDefinition, SweepOutcome, SweepStats, run_sweep};
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::project_service;

/// Scenario parameter varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepParameter {
    /// m
    WallThickness,
    /// °C
    AmbientTemperature,
    /// °C
    InitialTemperature,
    /// W
    HeaterPower,
    /// kg
    IceMass,
}

impl SweepParameter {
    pub const ALL: [SweepParameter; 5] = [
        SweepParameter::WallThickness,
        SweepParameter::AmbientTemperature,
        SweepParameter::InitialTemperature,
        SweepParameter::HeaterPower,
        SweepParameter::IceMass,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SweepParameter::WallThickness => "wall-thickness",
            SweepParameter::AmbientTemperature => "ambient",
            SweepParameter::InitialTemperature => "initial-temp",
            SweepParameter::HeaterPower => "power",
            SweepParameter::IceMass => "ice-mass",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SweepParameter::WallThickness => "m",
            SweepParameter::AmbientTemperature | SweepParameter::InitialTemperature => "°C",
            SweepParameter::HeaterPower => "W",
            SweepParameter::IceMass => "kg",
        }
    }

    /// Write `value` into the scenario.
    pub fn apply(&self, scenario: &mut Scenario, value: f64) {
        match self {
            SweepParameter::WallThickness => scenario.vessel.wall_thickness_m = value,
            SweepParameter::AmbientTemperature => scenario.simulation.ambient_temp_c = value,
            SweepParameter::InitialTemperature => scenario.vessel.initial_temp_c = value,
            SweepParameter::HeaterPower => {
                scenario.heater.power_w = Some(value);
                scenario.heater.voltage_v = None;
                scenario.heater.current_a = None;
            }
            SweepParameter::IceMass => {
                let ice = scenario.ice.get_or_insert_with(IceDef::default);
                ice.enabled = true;
                ice.mass_kg = value;
            }
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SweepParameter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        SweepParameter::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| {
                let keys: Vec<&str> = SweepParameter::ALL.iter().map(|p| p.key()).collect();
                AppError::InvalidInput(format!(
                    "unknown sweep parameter '{}' (expected one of: {})",
                    s,
                    keys.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct SweepReport {
    pub parameter: SweepParameter,
    pub outcomes: Vec<SweepOutcome>,
    pub stats: SweepStats,
}

/// Run the scenario once per sweep point, in parallel.
pub fn run_parameter_sweep(
    scenario: &Scenario,
    parameter: SweepParameter,
    definition: &SweepDefinition,
) -> AppResult<SweepReport> {
    project_service::validate_scenario(scenario)?;
    if parameter == SweepParameter::WallThickness
        && scenario.heater.loss_coefficient_w_per_k.is_some()
    {
        warn!("heater has an explicit loss coefficient; wall thickness will not change heat loss");
    }

    let values = definition.points();
    let outcomes = run_sweep(&values, |value| -> AppResult<SweepCase> {
        let mut point = scenario.clone();
        parameter.apply(&mut point, value);
        let container = project_service::build_container(&point)?;
        let heater = project_service::build_heater(&point, &container)?;
        Ok(SweepCase {
            simulation: project_service::build_simulation(&point),
            container,
            source: Box::new(heater),
        })
    });
    let stats = SweepStats::from_outcomes(&outcomes);

    Ok(SweepReport {
        parameter,
        outcomes,
        stats,
    })
}
