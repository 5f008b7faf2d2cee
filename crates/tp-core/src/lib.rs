//! tp-core: stable foundation for thermopot.
//!
//! Contains:
//! - units (uom power type + constructors, material constants)
//! - numeric (Real + tolerances + float checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{TpError, TpResult};
pub use numeric::*;
pub use units::*;
