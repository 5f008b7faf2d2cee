//! Scenario validation logic.

use crate::schema::{
    FluidDef, HeaterDef, IceDef, MaterialDef, Scenario, ShapeDef, SimulationDef, StopDef,
    VesselDef,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind} '{name}'")]
    UnknownCatalogEntry { kind: String, name: String },

    #[error("Conflicting fields: {fields} ({reason})")]
    Conflict { fields: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<f64, ValidationError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

fn positive(field: &str, v: f64) -> Result<f64, ValidationError> {
    if finite(field, v)? > 0.0 {
        Ok(v)
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<f64, ValidationError> {
    if finite(field, v)? >= 0.0 {
        Ok(v)
    } else {
        Err(invalid(field, v, "must not be negative"))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    validate_vessel(&scenario.vessel)?;
    validate_heater(&scenario.heater)?;
    validate_simulation(&scenario.simulation)?;
    if let Some(ice) = &scenario.ice {
        validate_ice(ice)?;
    }
    if let Some(stop) = &scenario.stop {
        validate_stop(stop)?;
    }
    Ok(())
}

fn validate_vessel(vessel: &VesselDef) -> Result<(), ValidationError> {
    match &vessel.shape {
        ShapeDef::Cylinder { radius_m, height_m } => {
            positive("vessel.shape.radius_m", *radius_m)?;
            positive("vessel.shape.height_m", *height_m)?;
        }
    }

    match &vessel.material {
        MaterialDef::Catalog { name } => {
            if tp_vessel::Material::from_catalog(name).is_err() {
                return Err(ValidationError::UnknownCatalogEntry {
                    kind: "material".to_string(),
                    name: name.clone(),
                });
            }
        }
        MaterialDef::Custom {
            thermal_conductivity_w_m_k,
            specific_heat_j_per_kg_k,
            density_kg_m3,
            ..
        } => {
            positive(
                "vessel.material.thermal_conductivity_w_m_k",
                *thermal_conductivity_w_m_k,
            )?;
            positive(
                "vessel.material.specific_heat_j_per_kg_k",
                *specific_heat_j_per_kg_k,
            )?;
            positive("vessel.material.density_kg_m3", *density_kg_m3)?;
        }
    }

    positive("vessel.wall_thickness_m", vessel.wall_thickness_m)?;

    match &vessel.fluid {
        FluidDef::Catalog { name } => {
            if tp_vessel::Fluid::from_catalog(name).is_err() {
                return Err(ValidationError::UnknownCatalogEntry {
                    kind: "fluid".to_string(),
                    name: name.clone(),
                });
            }
        }
        FluidDef::Custom {
            density_kg_m3,
            specific_heat_j_per_kg_c,
            ..
        } => {
            positive("vessel.fluid.density_kg_m3", *density_kg_m3)?;
            positive(
                "vessel.fluid.specific_heat_j_per_kg_c",
                *specific_heat_j_per_kg_c,
            )?;
        }
    }

    if let Some(volume) = vessel.fluid_volume_m3 {
        positive("vessel.fluid_volume_m3", volume)?;
        if volume > vessel.shape.volume_m3() {
            return Err(invalid(
                "vessel.fluid_volume_m3",
                volume,
                "exceeds the vessel volume",
            ));
        }
    }

    finite("vessel.initial_temp_c", vessel.initial_temp_c)?;
    Ok(())
}

fn validate_heater(heater: &HeaterDef) -> Result<(), ValidationError> {
    match (heater.power_w, heater.voltage_v, heater.current_a) {
        (Some(p), None, None) => {
            non_negative("heater.power_w", p)?;
        }
        (None, Some(v), Some(a)) => {
            positive("heater.voltage_v", v)?;
            positive("heater.current_a", a)?;
        }
        (Some(_), _, _) => {
            return Err(ValidationError::Conflict {
                fields: "heater.power_w, heater.voltage_v/current_a".to_string(),
                reason: "give either power or supply voltage and current".to_string(),
            });
        }
        (None, None, None) => {
            return Err(invalid(
                "heater",
                "{}",
                "needs power_w or voltage_v with current_a",
            ));
        }
        _ => {
            return Err(ValidationError::Conflict {
                fields: "heater.voltage_v, heater.current_a".to_string(),
                reason: "supply rating needs both voltage and current".to_string(),
            });
        }
    }
    if let Some(u) = heater.loss_coefficient_w_per_k {
        non_negative("heater.loss_coefficient_w_per_k", u)?;
    }
    Ok(())
}

fn validate_simulation(sim: &SimulationDef) -> Result<(), ValidationError> {
    positive("simulation.time_step_s", sim.time_step_s)?;
    finite("simulation.target_temp_c", sim.target_temp_c)?;
    finite("simulation.ambient_temp_c", sim.ambient_temp_c)?;
    non_negative("simulation.correction_factor", sim.correction_factor)?;
    Ok(())
}

fn validate_ice(ice: &IceDef) -> Result<(), ValidationError> {
    if ice.add_time_s.is_some() {
        return Err(ValidationError::Conflict {
            fields: "ice.add_time_s".to_string(),
            reason: "renamed to ice.trigger_time_s in version 2".to_string(),
        });
    }
    non_negative("ice.trigger_time_s", ice.trigger_time_s)?;
    // A non-positive mass is accepted; the engine ignores it.
    finite("ice.mass_kg", ice.mass_kg)?;
    finite("ice.initial_temp_c", ice.initial_temp_c)?;
    Ok(())
}

fn validate_stop(stop: &StopDef) -> Result<(), ValidationError> {
    positive("stop.max_elapsed_s", stop.max_elapsed_s)?;
    if stop.detect_equilibrium {
        positive("stop.equilibrium_interval_s", stop.equilibrium_interval_s)?;
        positive("stop.equilibrium_tolerance_c", stop.equilibrium_tolerance_c)?;
        if stop.equilibrium_samples < 2 {
            return Err(invalid(
                "stop.equilibrium_samples",
                stop.equilibrium_samples,
                "needs at least 2 samples",
            ));
        }
    }
    Ok(())
}
