//! Engine configuration.

use tp_core::constants::{
    ICE_DENSITY_KG_M3, ICE_LATENT_HEAT, ICE_MELTING_POINT_C, ICE_SPECIFIC_HEAT,
};
use tp_core::{ensure_finite, ensure_positive};

use crate::error::{SimError, SimResult};

/// Top-level knobs for a heating run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Fixed time step (seconds)
    pub time_step_s: f64,
    /// Run until the fluid reaches this temperature (°C)
    pub target_temp_c: f64,
    /// Surroundings temperature for heat loss (°C)
    pub ambient_temp_c: f64,
    /// Apply the power source's heat-loss model each step
    pub include_heat_loss: bool,
    /// Empirical multiplier on the heat-loss rate
    pub correction_factor: f64,
    pub ice: IceConfig,
    pub ice_constants: IceConstants,
    pub stop: StopCriteria,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step_s: 1.0,
            target_temp_c: 60.0,
            ambient_temp_c: 25.0,
            include_heat_loss: true,
            correction_factor: 1.0,
            ice: IceConfig::default(),
            ice_constants: IceConstants::default(),
            stop: StopCriteria::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.time_step_s, "time step")?;
        ensure_finite(self.target_temp_c, "target temperature")?;
        ensure_finite(self.ambient_temp_c, "ambient temperature")?;
        let cf = ensure_finite(self.correction_factor, "correction factor")?;
        if cf < 0.0 {
            return Err(SimError::Configuration {
                field: "correction factor",
                value: cf,
            });
        }
        if self.ice.enabled {
            self.ice.validate()?;
            self.ice_constants.validate()?;
        }
        self.stop.validate()
    }
}

/// When and how much ice is dropped into the fluid.
#[derive(Clone, Debug, PartialEq)]
pub struct IceConfig {
    pub enabled: bool,
    /// Elapsed time at which the ice goes in (seconds)
    pub trigger_time_s: f64,
    /// kg
    pub mass_kg: f64,
    /// °C
    pub initial_temp_c: f64,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger_time_s: 0.0,
            mass_kg: 0.1,
            initial_temp_c: -10.0,
        }
    }
}

impl IceConfig {
    /// A non-positive mass is allowed here; the run treats it as no ice.
    fn validate(&self) -> SimResult<()> {
        let t = ensure_finite(self.trigger_time_s, "ice trigger time")?;
        if t < 0.0 {
            return Err(SimError::Configuration {
                field: "ice trigger time",
                value: t,
            });
        }
        ensure_finite(self.mass_kg, "ice mass")?;
        ensure_finite(self.initial_temp_c, "ice temperature")?;
        Ok(())
    }
}

/// Material constants and empirical exchange rates for the ice model (SI).
#[derive(Clone, Debug, PartialEq)]
pub struct IceConstants {
    /// J/(kg·°C)
    pub specific_heat_j_per_kg_c: f64,
    /// kg/m³
    pub density_kg_m3: f64,
    /// J/kg
    pub latent_heat_j_per_kg: f64,
    /// °C
    pub melting_point_c: f64,
    /// Fluid to solid ice exchange rate while warming (W/°C)
    pub warming_factor_w_per_c: f64,
    /// Fluid to ice exchange rate while melting (W/°C)
    pub melting_factor_w_per_c: f64,
    /// Upper bound on the ice temperature rise in one step (°C)
    pub max_warming_per_step_c: f64,
    /// Upper bound on melting, as a fraction of the initial mass per second
    pub max_melt_fraction_per_s: f64,
}

impl Default for IceConstants {
    fn default() -> Self {
        Self {
            specific_heat_j_per_kg_c: ICE_SPECIFIC_HEAT,
            density_kg_m3: ICE_DENSITY_KG_M3,
            latent_heat_j_per_kg: ICE_LATENT_HEAT,
            melting_point_c: ICE_MELTING_POINT_C,
            warming_factor_w_per_c: 20.0,
            melting_factor_w_per_c: 12.0,
            max_warming_per_step_c: 1.0,
            max_melt_fraction_per_s: 0.02,
        }
    }
}

impl IceConstants {
    fn validate(&self) -> SimResult<()> {
        ensure_positive(self.specific_heat_j_per_kg_c, "ice specific heat")?;
        ensure_positive(self.density_kg_m3, "ice density")?;
        ensure_positive(self.latent_heat_j_per_kg, "ice latent heat")?;
        ensure_finite(self.melting_point_c, "ice melting point")?;
        ensure_positive(self.warming_factor_w_per_c, "ice warming factor")?;
        ensure_positive(self.melting_factor_w_per_c, "ice melting factor")?;
        ensure_positive(self.max_warming_per_step_c, "ice max warming per step")?;
        ensure_positive(self.max_melt_fraction_per_s, "ice max melt fraction")?;
        Ok(())
    }
}

/// Guards that end a run which cannot reach its target.
#[derive(Clone, Debug, PartialEq)]
pub struct StopCriteria {
    /// Hard limit on simulated time (seconds)
    pub max_elapsed_s: f64,
    /// Plateau detection; `None` disables it
    pub equilibrium: Option<EquilibriumCheck>,
}

impl Default for StopCriteria {
    fn default() -> Self {
        Self {
            max_elapsed_s: 300_000.0,
            equilibrium: Some(EquilibriumCheck::default()),
        }
    }
}

impl StopCriteria {
    fn validate(&self) -> SimResult<()> {
        ensure_positive(self.max_elapsed_s, "max elapsed time")?;
        if let Some(eq) = &self.equilibrium {
            ensure_positive(eq.interval_s, "equilibrium check interval")?;
            ensure_positive(eq.tolerance_c, "equilibrium tolerance")?;
            if eq.samples < 2 {
                return Err(SimError::Configuration {
                    field: "equilibrium samples",
                    value: eq.samples as f64,
                });
            }
        }
        Ok(())
    }
}

/// Temperature is sampled every `interval_s`; once the last `samples`
/// readings span less than `tolerance_c` the run is declared stuck.
#[derive(Clone, Debug, PartialEq)]
pub struct EquilibriumCheck {
    pub interval_s: f64,
    pub samples: usize,
    pub tolerance_c: f64,
}

impl Default for EquilibriumCheck {
    fn default() -> Self {
        Self {
            interval_s: 1000.0,
            samples: 5,
            tolerance_c: 0.001,
        }
    }
}
