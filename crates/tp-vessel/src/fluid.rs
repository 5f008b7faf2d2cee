//! Liquid property sets.

use tp_core::constants::{WATER_DENSITY_KG_M3, WATER_SPECIFIC_HEAT};
use tp_core::ensure_positive;

use crate::error::{VesselError, VesselResult};

/// Thermal properties of the heated liquid.
#[derive(Clone, Debug, PartialEq)]
pub struct Fluid {
    pub name: String,
    /// kg/m³
    pub density_kg_m3: f64,
    /// J/(kg·°C)
    pub specific_heat_j_per_kg_c: f64,
    /// Pa·s
    pub viscosity_pa_s: f64,
    /// W/(m·K)
    pub thermal_conductivity_w_m_k: f64,
}

impl Fluid {
    pub fn new(
        name: impl Into<String>,
        density_kg_m3: f64,
        specific_heat_j_per_kg_c: f64,
    ) -> VesselResult<Self> {
        let fluid = Self {
            name: name.into(),
            density_kg_m3,
            specific_heat_j_per_kg_c,
            viscosity_pa_s: 0.0,
            thermal_conductivity_w_m_k: 0.0,
        };
        fluid.validate()?;
        Ok(fluid)
    }

    pub fn with_transport(mut self, viscosity_pa_s: f64, thermal_conductivity_w_m_k: f64) -> Self {
        self.viscosity_pa_s = viscosity_pa_s;
        self.thermal_conductivity_w_m_k = thermal_conductivity_w_m_k;
        self
    }

    pub fn validate(&self) -> VesselResult<()> {
        ensure_positive(self.density_kg_m3, "fluid density")?;
        ensure_positive(self.specific_heat_j_per_kg_c, "fluid specific heat")?;
        Ok(())
    }

    /// Volumetric heat capacity in J/(m³·°C).
    pub fn heat_capacity_per_volume(&self) -> f64 {
        self.specific_heat_j_per_kg_c * self.density_kg_m3
    }

    pub fn water() -> Self {
        Self {
            name: "Water".to_string(),
            density_kg_m3: WATER_DENSITY_KG_M3,
            specific_heat_j_per_kg_c: WATER_SPECIFIC_HEAT,
            viscosity_pa_s: 0.001,
            thermal_conductivity_w_m_k: 0.6,
        }
    }

    pub fn olive_oil() -> Self {
        Self {
            name: "Olive oil".to_string(),
            density_kg_m3: 911.0,
            specific_heat_j_per_kg_c: 1970.0,
            viscosity_pa_s: 0.081,
            thermal_conductivity_w_m_k: 0.17,
        }
    }

    pub fn ethylene_glycol() -> Self {
        Self {
            name: "Ethylene glycol".to_string(),
            density_kg_m3: 1113.0,
            specific_heat_j_per_kg_c: 2400.0,
            viscosity_pa_s: 0.0161,
            thermal_conductivity_w_m_k: 0.258,
        }
    }

    /// Look up a catalog fluid by case-insensitive name.
    pub fn from_catalog(name: &str) -> VesselResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "water" | "h2o" => Ok(Self::water()),
            "olive_oil" | "olive oil" | "oil" => Ok(Self::olive_oil()),
            "ethylene_glycol" | "ethylene glycol" | "glycol" => Ok(Self::ethylene_glycol()),
            _ => Err(VesselError::UnknownCatalogEntry {
                kind: "fluid",
                name: name.to_string(),
            }),
        }
    }
}
