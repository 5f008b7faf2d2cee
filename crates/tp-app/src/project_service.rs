//! Scenario loading, saving, validation, and construction of the engine
//! inputs a scenario describes.

use std::path::Path;

use tp_core::units::{w, watts};
use tp_project::schema::{FluidDef, HeaterDef, MaterialDef, Scenario, ShapeDef};
use tp_sim::{EquilibriumCheck, IceConfig, SimConfig, Simulation, StopCriteria};
use tp_vessel::{Container, ElectricHeater, Fluid, Material, PowerSource, Shape, Wall};
use tracing::debug;

use crate::error::AppResult;

/// Command-line style overrides applied on top of a loaded scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOverrides {
    pub time_step_s: Option<f64>,
    pub target_temp_c: Option<f64>,
    pub ambient_temp_c: Option<f64>,
    pub include_heat_loss: Option<bool>,
}

impl ScenarioOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Key figures of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub fluid: String,
    pub material: String,
    /// m²/s, `None` without wall geometry
    pub wall_diffusivity_m2_s: Option<f64>,
    pub fluid_volume_m3: f64,
    pub fluid_mass_kg: f64,
    pub heater_power_w: f64,
    pub loss_coefficient_w_per_k: f64,
    pub target_temp_c: f64,
    pub ice_mass_kg: Option<f64>,
}

/// Load, migrate and validate a scenario (YAML, or JSON by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    Ok(tp_project::load(path)?)
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => tp_project::save_json(path, scenario)?,
        _ => tp_project::save_yaml(path, scenario)?,
    }
    Ok(())
}

/// Schema validation plus a dry build of the vessel and heater.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    tp_project::validate_scenario(scenario).map_err(tp_project::ProjectError::from)?;
    let container = build_container(scenario)?;
    build_heater(scenario, &container)?;
    build_simulation(scenario).config().validate()?;
    Ok(())
}

pub fn apply_overrides(scenario: &mut Scenario, overrides: &ScenarioOverrides) {
    let sim = &mut scenario.simulation;
    if let Some(dt) = overrides.time_step_s {
        sim.time_step_s = dt;
    }
    if let Some(target) = overrides.target_temp_c {
        sim.target_temp_c = target;
    }
    if let Some(ambient) = overrides.ambient_temp_c {
        sim.ambient_temp_c = ambient;
    }
    if let Some(loss) = overrides.include_heat_loss {
        sim.include_heat_loss = loss;
    }
}

fn build_material(def: &MaterialDef) -> AppResult<Material> {
    Ok(match def {
        MaterialDef::Catalog { name } => Material::from_catalog(name)?,
        MaterialDef::Custom {
            name,
            thermal_conductivity_w_m_k,
            specific_heat_j_per_kg_k,
            density_kg_m3,
        } => Material::new(
            name.clone(),
            *thermal_conductivity_w_m_k,
            *specific_heat_j_per_kg_k,
            *density_kg_m3,
        )?,
    })
}

fn build_fluid(def: &FluidDef) -> AppResult<Fluid> {
    Ok(match def {
        FluidDef::Catalog { name } => Fluid::from_catalog(name)?,
        FluidDef::Custom {
            name,
            density_kg_m3,
            specific_heat_j_per_kg_c,
        } => Fluid::new(name.clone(), *density_kg_m3, *specific_heat_j_per_kg_c)?,
    })
}

/// Container with its walls, filled as the scenario says (two thirds of the
/// vessel when no fluid volume is given).
pub fn build_container(scenario: &Scenario) -> AppResult<Container> {
    let vessel = &scenario.vessel;
    let shape = match vessel.shape {
        ShapeDef::Cylinder { radius_m, height_m } => Shape::cylinder(radius_m, height_m)?,
    };
    let wall = Wall::new(
        shape,
        build_material(&vessel.material)?,
        vessel.wall_thickness_m,
    )?;
    let fluid = build_fluid(&vessel.fluid)?;

    let container = match vessel.fluid_volume_m3 {
        Some(volume) => {
            let container = Container::new(fluid, volume, vessel.initial_temp_c)?.with_wall(wall);
            container.validate()?;
            container
        }
        None => Container::with_standard_fill(wall, fluid, vessel.initial_temp_c)?,
    };
    debug!(
        volume_m3 = container.fluid_volume_m3,
        mass_kg = container.fluid_mass_kg(),
        "container built"
    );
    Ok(container)
}

/// Heater with its loss coefficient: explicit in the scenario, or derived
/// from the container walls. The engine applies the correction factor.
pub fn build_heater(scenario: &Scenario, container: &Container) -> AppResult<ElectricHeater> {
    let HeaterDef {
        power_w,
        voltage_v,
        current_a,
        loss_coefficient_w_per_k,
    } = &scenario.heater;

    let power = match (power_w, voltage_v, current_a) {
        (Some(p), _, _) => w(*p),
        (None, Some(v), Some(a)) => ElectricHeater::from_supply(*v, *a)?.power(),
        _ => {
            return Err(crate::AppError::InvalidInput(
                "heater needs power_w or voltage_v with current_a".to_string(),
            ));
        }
    };

    let heater = match loss_coefficient_w_per_k {
        Some(u) => ElectricHeater::new(power)?.with_loss_coefficient(*u)?,
        None => ElectricHeater::for_container(power, container, 1.0)?,
    };
    debug!(
        power_w = watts(heater.power()),
        loss_w_per_k = heater.loss_coefficient_w_per_k(),
        "heater built"
    );
    Ok(heater)
}

pub fn build_simulation(scenario: &Scenario) -> Simulation {
    let s = &scenario.simulation;
    let mut config = SimConfig {
        time_step_s: s.time_step_s,
        target_temp_c: s.target_temp_c,
        ambient_temp_c: s.ambient_temp_c,
        include_heat_loss: s.include_heat_loss,
        correction_factor: s.correction_factor,
        ..SimConfig::default()
    };
    if let Some(ice) = &scenario.ice {
        config.ice = IceConfig {
            enabled: ice.enabled,
            trigger_time_s: ice.trigger_time_s,
            mass_kg: ice.mass_kg,
            initial_temp_c: ice.initial_temp_c,
        };
    }
    if let Some(stop) = &scenario.stop {
        config.stop = StopCriteria {
            max_elapsed_s: stop.max_elapsed_s,
            equilibrium: stop.detect_equilibrium.then(|| EquilibriumCheck {
                interval_s: stop.equilibrium_interval_s,
                samples: stop.equilibrium_samples,
                tolerance_c: stop.equilibrium_tolerance_c,
            }),
        };
    }
    Simulation::new(config)
}

pub fn summarize_scenario(scenario: &Scenario) -> AppResult<ScenarioSummary> {
    let container = build_container(scenario)?;
    let heater = build_heater(scenario, &container)?;
    Ok(ScenarioSummary {
        name: scenario.name.clone(),
        fluid: container.fluid.name.clone(),
        material: container
            .wall
            .as_ref()
            .map(|w| w.material.name.clone())
            .unwrap_or_default(),
        wall_diffusivity_m2_s: container
            .wall
            .as_ref()
            .map(|w| w.material.thermal_diffusivity()),
        fluid_volume_m3: container.fluid_volume_m3,
        fluid_mass_kg: container.fluid_mass_kg(),
        heater_power_w: watts(heater.power()),
        loss_coefficient_w_per_k: heater.loss_coefficient_w_per_k(),
        target_temp_c: scenario.simulation.target_temp_c,
        ice_mass_kg: scenario
            .ice
            .as_ref()
            .filter(|ice| ice.enabled)
            .map(|ice| ice.mass_kg),
    })
}
