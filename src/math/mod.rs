pub mod affine;
pub mod line;
pub mod plane;
pub mod quaternion;
pub mod vector;

pub use affine::{Affine, Mat3};
pub use line::Line;
pub use plane::Plane;
pub use quaternion::Quaternion;
pub use vector::{Vec2, Vec3, Vec4, Vector};

/// Small tolerance used throughout the geometry/tracer code to reject
/// near-grazing hits and near-zero discriminants.
pub const EPSILON: f64 = 1e-6;
