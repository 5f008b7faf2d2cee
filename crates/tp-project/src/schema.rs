//! Scenario schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub vessel: VesselDef,
    pub heater: HeaterDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice: Option<IceDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselDef {
    pub shape: ShapeDef,
    pub material: MaterialDef,
    pub wall_thickness_m: f64,
    pub fluid: FluidDef,
    /// Omitted: fill two thirds of the vessel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid_volume_m3: Option<f64>,
    pub initial_temp_c: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ShapeDef {
    Cylinder { radius_m: f64, height_m: f64 },
}

impl ShapeDef {
    pub fn volume_m3(&self) -> f64 {
        match self {
            ShapeDef::Cylinder { radius_m, height_m } => {
                std::f64::consts::PI * radius_m * radius_m * height_m
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MaterialDef {
    Catalog {
        name: String,
    },
    Custom {
        name: String,
        thermal_conductivity_w_m_k: f64,
        specific_heat_j_per_kg_k: f64,
        density_kg_m3: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FluidDef {
    Catalog {
        name: String,
    },
    Custom {
        name: String,
        density_kg_m3: f64,
        specific_heat_j_per_kg_c: f64,
    },
}

/// Heater rating: either `power_w`, or `voltage_v` with `current_a`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HeaterDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_v: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_a: Option<f64>,
    /// Omitted: derived from the vessel walls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_coefficient_w_per_k: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationDef {
    pub time_step_s: f64,
    pub target_temp_c: f64,
    pub ambient_temp_c: f64,
    pub include_heat_loss: bool,
    pub correction_factor: f64,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            time_step_s: 1.0,
            target_temp_c: 60.0,
            ambient_temp_c: 25.0,
            include_heat_loss: true,
            correction_factor: 1.0,
        }
    }
}

/// Ice addition. Writing an `ice:` block turns ice on unless it says
/// `enabled: false`; a scenario without the block runs without ice, matching
/// the engine's own default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IceDef {
    /// Defaults to `true`: the block itself is the request for ice.
    pub enabled: bool,
    pub trigger_time_s: f64,
    pub mass_kg: f64,
    pub initial_temp_c: f64,
    /// Version 1 name of `trigger_time_s`; cleared by migration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_time_s: Option<f64>,
}

impl Default for IceDef {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_time_s: 0.0,
            mass_kg: 0.1,
            initial_temp_c: -10.0,
            add_time_s: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StopDef {
    pub max_elapsed_s: f64,
    pub detect_equilibrium: bool,
    pub equilibrium_interval_s: f64,
    pub equilibrium_samples: usize,
    pub equilibrium_tolerance_c: f64,
}

impl Default for StopDef {
    fn default() -> Self {
        Self {
            max_elapsed_s: 300_000.0,
            detect_equilibrium: true,
            equilibrium_interval_s: 1000.0,
            equilibrium_samples: 5,
            equilibrium_tolerance_c: 0.001,
        }
    }
}
