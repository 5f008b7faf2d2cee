//! Container geometry.

use std::f64::consts::PI;

use tp_core::ensure_positive;

use crate::error::VesselResult;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Upright cylinder, open or closed depending on the area query.
    Cylinder { radius_m: f64, height_m: f64 },
}

impl Shape {
    pub fn cylinder(radius_m: f64, height_m: f64) -> VesselResult<Self> {
        ensure_positive(radius_m, "cylinder radius")?;
        ensure_positive(height_m, "cylinder height")?;
        Ok(Shape::Cylinder { radius_m, height_m })
    }

    pub fn volume_m3(&self) -> f64 {
        match *self {
            Shape::Cylinder { height_m, .. } => self.base_area_m2() * height_m,
        }
    }

    /// Full surface: both discs plus the side wall.
    pub fn surface_area_m2(&self) -> f64 {
        2.0 * self.base_area_m2() + self.lateral_area_m2()
    }

    pub fn lateral_area_m2(&self) -> f64 {
        match *self {
            Shape::Cylinder { radius_m, height_m } => 2.0 * PI * radius_m * height_m,
        }
    }

    pub fn base_area_m2(&self) -> f64 {
        match *self {
            Shape::Cylinder { radius_m, .. } => PI * radius_m * radius_m,
        }
    }
}
