//! Heliostat geometry algorithms

pub mod projection;
pub mod sun_vector;
pub mod aiming;
pub mod field;

pub use projection::{project, project_with_height, offset, unproject, ProjectionValidator};
pub use sun_vector::{direction_vector, to_vector, to_unit_vector};
pub use aiming::{aim, aim_detailed, circular_mean, normalize_azimuth, AimSolution};
pub use field::{aim_all, aim_each, ring_mirrors, IndexedOrientation};
