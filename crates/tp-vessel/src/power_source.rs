//! Heating power sources.

use tp_core::units::{Power, w, watts};
use tp_core::{ensure_finite, ensure_positive};

use crate::container::Container;
use crate::error::{VesselError, VesselResult};

/// Anything that heats the container and, optionally, models how fast the
/// container loses heat to its surroundings.
///
/// Implementations are pure functions of their parameters and the given
/// temperatures, so one source can be shared across parallel runs.
pub trait PowerSource: Send + Sync {
    /// Nominal heating power delivered to the fluid.
    fn power(&self) -> Power;

    /// Rate of heat lost to the environment at the given fluid and ambient
    /// temperatures (°C). Never negative: a colder fluid does not gain heat
    /// through this path.
    fn heat_loss(&self, fluid_temp_c: f64, ambient_temp_c: f64) -> Power;
}

/// Resistive heater with Newton-law losses `U·(T - T_amb)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElectricHeater {
    power_w: f64,
    /// Overall heat-loss coefficient U (W/K).
    loss_coefficient_w_per_k: f64,
}

impl ElectricHeater {
    pub fn new(power: Power) -> VesselResult<Self> {
        let power_w = ensure_finite(watts(power), "heater power")?;
        if power_w < 0.0 {
            return Err(VesselError::InvalidProperty {
                field: "heater power",
                value: power_w,
                reason: "must not be negative",
            });
        }
        Ok(Self {
            power_w,
            loss_coefficient_w_per_k: 0.0,
        })
    }

    /// Heater rated from its supply voltage and current draw.
    pub fn from_supply(voltage_v: f64, current_a: f64) -> VesselResult<Self> {
        ensure_positive(voltage_v, "supply voltage")?;
        ensure_positive(current_a, "supply current")?;
        Self::new(w(voltage_v * current_a))
    }

    /// Heater whose loss coefficient is derived from the container walls.
    pub fn for_container(
        power: Power,
        container: &Container,
        correction_factor: f64,
    ) -> VesselResult<Self> {
        let u = container
            .heat_loss_coefficient(correction_factor)
            .ok_or(VesselError::InvalidProperty {
                field: "wall",
                value: f64::NAN,
                reason: "container has no wall geometry to derive heat loss from",
            })?;
        Self::new(power)?.with_loss_coefficient(u)
    }

    pub fn with_loss_coefficient(mut self, loss_coefficient_w_per_k: f64) -> VesselResult<Self> {
        let u = ensure_finite(loss_coefficient_w_per_k, "heat loss coefficient")?;
        if u < 0.0 {
            return Err(VesselError::InvalidProperty {
                field: "heat loss coefficient",
                value: u,
                reason: "must not be negative",
            });
        }
        self.loss_coefficient_w_per_k = u;
        Ok(self)
    }

    pub fn loss_coefficient_w_per_k(&self) -> f64 {
        self.loss_coefficient_w_per_k
    }
}

impl PowerSource for ElectricHeater {
    fn power(&self) -> Power {
        w(self.power_w)
    }

    fn heat_loss(&self, fluid_temp_c: f64, ambient_temp_c: f64) -> Power {
        let loss = self.loss_coefficient_w_per_k * (fluid_temp_c - ambient_temp_c);
        w(loss.max(0.0))
    }
}
