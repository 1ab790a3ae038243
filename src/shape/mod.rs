//! Polymorphic shape dispatch — the intersection contract of spec §4.3.
//!
//! Modeled as a trait object (`Box<dyn Shape>`), mirroring the teacher's
//! `trait Formula { fn compute_de(...) }` + `Box<dyn Formula>` dispatch
//! (`formulas/mod.rs`) rather than a closed enum, since CSG and Transform
//! nodes need to hold arbitrarily nested heterogeneous children.

pub mod boxshape;
pub mod csg;
pub mod cylinder;
pub mod polyhedron;
pub mod sphere;
pub mod transform;

use crate::color::Color;
use crate::material::Surface;
use crate::math::{Line, Vec3};
use crate::scene::Scene;

pub use boxshape::BoxShape;
pub use csg::{CsgNode, CsgOp};
pub use cylinder::Cylinder;
pub use polyhedron::Polyhedron;
pub use sphere::Sphere;
pub use transform::Transformed;

/// The result of a successful `intersect` call (spec §4.3).
///
/// `t_min < t_max` always; either may be negative. `color_*`/`material_*`
/// are only meaningful when `info` was requested; callers doing a fast
/// any-hit scan (`info = false`) may see placeholder values in those fields
/// and must not read them.
#[derive(Clone)]
pub struct Hit {
    pub t_min: f64,
    pub t_max: f64,
    pub normal_min: Vec3,
    pub normal_max: Vec3,
    pub inside_min: bool,
    pub inside_max: bool,
    pub color_min: Color,
    pub color_max: Color,
    pub material_min: Surface,
    pub material_max: Surface,
}

impl Hit {
    /// A `Hit` shell with only the t-interval and inside flags set; used by
    /// the cheap `info=false` scan where normals/colors/materials are never
    /// read (spec §4.5 step 1).
    pub fn cheap(t_min: f64, t_max: f64, inside_min: bool, inside_max: bool) -> Self {
        Self {
            t_min,
            t_max,
            normal_min: Vec3::zero(),
            normal_max: Vec3::zero(),
            inside_min,
            inside_max,
            color_min: Color::BLACK,
            color_max: Color::BLACK,
            material_min: Surface::default(),
            material_max: Surface::default(),
        }
    }
}

/// Every Shape variant implements this single operation. `info` selects
/// between the cheap any-hit form (shadow rays, the first pass of the
/// nearest-hit scan) and the full form (normal/pigment/material resolved).
pub trait Shape: Send + Sync {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit>;
}

/// The smaller of `t_min`/`t_max` that is still strictly positive, or
/// `None` if both lie behind the ray origin. Used by the nearest-hit scan
/// (spec §4.5 step 1) and by CSG combination.
pub fn nearest_forward_t(hit: &Hit) -> Option<f64> {
    if hit.t_min > 0.0 {
        Some(hit.t_min)
    } else if hit.t_max > 0.0 {
        Some(hit.t_max)
    } else {
        None
    }
}
