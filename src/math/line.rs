//! Ray parameterization — grounded on the teacher's small-struct-plus-method
//! style (`math3d.rs`) and `horki342-RayTracer`'s `Ray{origin,direction}.pos(t)`.

use super::vector::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Line {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline(always)]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
