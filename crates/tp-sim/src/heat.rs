//! Per-step heating and heat-loss deltas.
//!
//! Everything here is a pure function of the fluid state and configuration;
//! the driver alone applies the result to the container.

use tp_core::ensure_positive;
use tp_core::units::watts;
use tp_vessel::{Container, PowerSource};

use crate::config::SimConfig;
use crate::error::SimResult;

/// Temperature rise (°C) from `power_w` applied for `dt_s` to a charge with
/// the given heat capacity (J/°C).
pub fn heating_delta(power_w: f64, dt_s: f64, heat_capacity_j_per_c: f64) -> f64 {
    (power_w * dt_s / heat_capacity_j_per_c).max(0.0)
}

/// Temperature drop (°C) from losing heat at `loss_w` for `dt_s`.
///
/// The drop is never negative and never takes the fluid below ambient.
pub fn cooling_delta(
    loss_w: f64,
    dt_s: f64,
    heat_capacity_j_per_c: f64,
    fluid_temp_c: f64,
    ambient_temp_c: f64,
) -> f64 {
    let drop = (loss_w * dt_s / heat_capacity_j_per_c).max(0.0);
    drop.min((fluid_temp_c - ambient_temp_c).max(0.0))
}

/// Heating and cooling contributions of one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepHeat {
    pub heating_c: f64,
    pub cooling_c: f64,
}

impl StepHeat {
    pub fn net_c(&self) -> f64 {
        self.heating_c - self.cooling_c
    }
}

/// Heating and (if enabled) cooling for one step at `fluid_temp_c`.
pub fn step_heat(
    source: &dyn PowerSource,
    container: &Container,
    fluid_temp_c: f64,
    config: &SimConfig,
) -> SimResult<StepHeat> {
    let capacity = ensure_positive(container.heat_capacity_j_per_c(), "fluid heat capacity")?;
    let dt = config.time_step_s;

    let heating_c = heating_delta(watts(source.power()), dt, capacity);
    let cooling_c = if config.include_heat_loss {
        let loss_w =
            watts(source.heat_loss(fluid_temp_c, config.ambient_temp_c)) * config.correction_factor;
        cooling_delta(loss_w, dt, capacity, fluid_temp_c, config.ambient_temp_c)
    } else {
        0.0
    };

    Ok(StepHeat {
        heating_c,
        cooling_c,
    })
}
