//! tp-vessel: the physical setup around the simulated fluid.
//!
//! Provides:
//! - Fluid property sets and a small catalog
//! - Wall materials and container shapes
//! - `Container`: fluid state plus wall geometry and heat-loss coefficient
//! - `PowerSource` trait with an electric heater implementation

pub mod container;
pub mod error;
pub mod fluid;
pub mod material;
pub mod power_source;
pub mod shape;

pub use container::{Container, Wall};
pub use error::{VesselError, VesselResult};
pub use fluid::Fluid;
pub use material::Material;
pub use power_source::{ElectricHeater, PowerSource};
pub use shape::Shape;
