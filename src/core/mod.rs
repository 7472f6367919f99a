//! Core types, errors and constants for heliostat aiming

pub mod types;
pub mod constants;
pub mod error;

pub use types::*;
pub use constants::*;
pub use error::{AimingError, AimResult};
