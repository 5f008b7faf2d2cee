// tp-core/src/units.rs

use uom::si::f64::Power as UomPower;

// Public canonical unit types (SI, f64)
pub type Power = UomPower;

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

/// Value of a power in watts.
#[inline]
pub fn watts(p: Power) -> f64 {
    use uom::si::power::watt;
    p.get::<watt>()
}

pub mod constants {
    /// Ice at 0 °C.
    pub const ICE_DENSITY_KG_M3: f64 = 920.0;
    /// J/(kg·°C)
    pub const ICE_SPECIFIC_HEAT: f64 = 2108.0;
    /// Latent heat of fusion, J/kg.
    pub const ICE_LATENT_HEAT: f64 = 334_000.0;
    pub const ICE_MELTING_POINT_C: f64 = 0.0;

    pub const WATER_DENSITY_KG_M3: f64 = 1000.0;
    /// J/(kg·°C)
    pub const WATER_SPECIFIC_HEAT: f64 = 4186.0;
}
