//! Container wall materials.

use tp_core::ensure_positive;

use crate::error::{VesselError, VesselResult};

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// W/(m·K)
    pub thermal_conductivity_w_m_k: f64,
    /// J/(kg·K)
    pub specific_heat_j_per_kg_k: f64,
    /// kg/m³
    pub density_kg_m3: f64,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        thermal_conductivity_w_m_k: f64,
        specific_heat_j_per_kg_k: f64,
        density_kg_m3: f64,
    ) -> VesselResult<Self> {
        ensure_positive(thermal_conductivity_w_m_k, "wall thermal conductivity")?;
        ensure_positive(specific_heat_j_per_kg_k, "wall specific heat")?;
        ensure_positive(density_kg_m3, "wall density")?;
        Ok(Self {
            name: name.into(),
            thermal_conductivity_w_m_k,
            specific_heat_j_per_kg_k,
            density_kg_m3,
        })
    }

    /// Thermal diffusivity in m²/s.
    pub fn thermal_diffusivity(&self) -> f64 {
        self.thermal_conductivity_w_m_k / (self.density_kg_m3 * self.specific_heat_j_per_kg_k)
    }

    /// Areal thermal resistance (R-value) in m²·K/W for a wall of `thickness_m`.
    pub fn thermal_resistance(&self, thickness_m: f64) -> f64 {
        thickness_m / self.thermal_conductivity_w_m_k
    }

    pub fn stainless_steel() -> Self {
        Self {
            name: "Stainless steel".to_string(),
            thermal_conductivity_w_m_k: 16.2,
            specific_heat_j_per_kg_k: 502.0,
            density_kg_m3: 7900.0,
        }
    }

    pub fn aluminium() -> Self {
        Self {
            name: "Aluminium".to_string(),
            thermal_conductivity_w_m_k: 237.0,
            specific_heat_j_per_kg_k: 897.0,
            density_kg_m3: 2700.0,
        }
    }

    pub fn copper() -> Self {
        Self {
            name: "Copper".to_string(),
            thermal_conductivity_w_m_k: 401.0,
            specific_heat_j_per_kg_k: 385.0,
            density_kg_m3: 8960.0,
        }
    }

    pub fn glass() -> Self {
        Self {
            name: "Borosilicate glass".to_string(),
            thermal_conductivity_w_m_k: 1.14,
            specific_heat_j_per_kg_k: 830.0,
            density_kg_m3: 2230.0,
        }
    }

    pub fn from_catalog(name: &str) -> VesselResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "steel" | "stainless_steel" | "stainless steel" => Ok(Self::stainless_steel()),
            "aluminium" | "aluminum" => Ok(Self::aluminium()),
            "copper" => Ok(Self::copper()),
            "glass" | "borosilicate" => Ok(Self::glass()),
            _ => Err(VesselError::UnknownCatalogEntry {
                kind: "material",
                name: name.to_string(),
            }),
        }
    }
}
