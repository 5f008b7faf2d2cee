//! Container holding the heated fluid.

use tp_core::{ensure_finite, ensure_positive};

use crate::error::{VesselError, VesselResult};
use crate::fluid::Fluid;
use crate::material::Material;
use crate::shape::Shape;

/// Internal convection coefficient, fluid to wall (W/m²K).
const H_FLUID: f64 = 800.0;
/// External natural convection coefficient, wall to air (W/m²K).
const H_AIR: f64 = 15.0;

const MIN_THICKNESS_M: f64 = 0.0001;
const MAX_THICKNESS_M: f64 = 0.1;
const MIN_AREA_M2: f64 = 0.001;
const MIN_CONDUCTIVITY: f64 = 1.0;
const MAX_CONDUCTIVITY: f64 = 500.0;
const MIN_RESISTANCE_K_PER_W: f64 = 1e-6;
const MIN_COEFFICIENT_W_PER_K: f64 = 0.001;
const MAX_COEFFICIENT_W_PER_K: f64 = 100.0;

/// Container walls: geometry, material and thickness.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub shape: Shape,
    pub material: Material,
    pub thickness_m: f64,
}

impl Wall {
    pub fn new(shape: Shape, material: Material, thickness_m: f64) -> VesselResult<Self> {
        ensure_positive(thickness_m, "wall thickness")?;
        Ok(Self {
            shape,
            material,
            thickness_m,
        })
    }

    /// Overall heat-loss coefficient U in W/K.
    ///
    /// Series resistance of inner convection, wall conduction and outer
    /// convection, scaled by `correction_factor` and a thin-wall amplification.
    pub fn heat_loss_coefficient(&self, correction_factor: f64) -> f64 {
        let thickness = self.thickness_m.clamp(MIN_THICKNESS_M, MAX_THICKNESS_M);
        let area = self.shape.surface_area_m2().max(MIN_AREA_M2);
        let wall_material = Material {
            thermal_conductivity_w_m_k: self
                .material
                .thermal_conductivity_w_m_k
                .clamp(MIN_CONDUCTIVITY, MAX_CONDUCTIVITY),
            ..self.material.clone()
        };

        let r_fluid = 1.0 / (H_FLUID * area);
        let r_wall = wall_material.thermal_resistance(thickness) / area;
        let thickness_effect = (1.0 + (0.002 / thickness) * 0.5).clamp(1.0, 3.0);
        let r_air = 1.0 / (H_AIR * area * thickness_effect);

        let r_total = (r_fluid + r_wall + r_air).max(MIN_RESISTANCE_K_PER_W);
        let u = 1.0 / r_total;

        let thickness_mm = thickness * 1000.0;
        let amplification = if thickness_mm < 1.0 {
            4.0
        } else if thickness_mm < 2.0 {
            3.0
        } else if thickness_mm < 5.0 {
            2.0
        } else {
            1.5
        };

        (u * correction_factor * amplification).clamp(MIN_COEFFICIENT_W_PER_K, MAX_COEFFICIENT_W_PER_K)
    }
}

/// Fluid in a container. The simulation engine reads the fluid properties,
/// writes the temperature, and grows the volume as ice melts into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    pub fluid: Fluid,
    /// m³
    pub fluid_volume_m3: f64,
    /// °C
    pub temperature_c: f64,
    pub wall: Option<Wall>,
}

impl Container {
    pub fn new(fluid: Fluid, fluid_volume_m3: f64, temperature_c: f64) -> VesselResult<Self> {
        let container = Self {
            fluid,
            fluid_volume_m3,
            temperature_c,
            wall: None,
        };
        container.validate()?;
        Ok(container)
    }

    /// Container filled to the standard two thirds of the wall volume.
    pub fn with_standard_fill(wall: Wall, fluid: Fluid, temperature_c: f64) -> VesselResult<Self> {
        let volume = Self::standard_fluid_volume(&wall);
        Self::new(fluid, volume, temperature_c).map(|c| c.with_wall(wall))
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.wall = Some(wall);
        self
    }

    pub fn standard_fluid_volume(wall: &Wall) -> f64 {
        (2.0 / 3.0) * wall.shape.volume_m3()
    }

    pub fn validate(&self) -> VesselResult<()> {
        self.fluid.validate()?;
        ensure_positive(self.fluid_volume_m3, "fluid volume")?;
        ensure_finite(self.temperature_c, "fluid temperature")?;
        if let Some(wall) = &self.wall
            && wall.shape.volume_m3() < self.fluid_volume_m3
        {
            return Err(VesselError::InvalidProperty {
                field: "fluid volume",
                value: self.fluid_volume_m3,
                reason: "exceeds container volume",
            });
        }
        Ok(())
    }

    pub fn fluid_mass_kg(&self) -> f64 {
        self.fluid.density_kg_m3 * self.fluid_volume_m3
    }

    /// Heat capacity of the whole fluid charge in J/°C.
    pub fn heat_capacity_j_per_c(&self) -> f64 {
        self.fluid.heat_capacity_per_volume() * self.fluid_volume_m3
    }

    pub fn add_fluid_volume(&mut self, volume_m3: f64) {
        self.fluid_volume_m3 += volume_m3;
    }

    pub fn set_temperature(&mut self, temperature_c: f64) {
        self.temperature_c = temperature_c;
    }

    /// Overall heat-loss coefficient (W/K), or `None` without wall geometry.
    pub fn heat_loss_coefficient(&self, correction_factor: f64) -> Option<f64> {
        self.wall
            .as_ref()
            .map(|w| w.heat_loss_coefficient(correction_factor))
    }
}
