//! Outward-normal-plus-offset plane, used by `Polyhedron` half-spaces and
//! `Cylinder` caps.

use super::line::Line;
use super::vector::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Outward unit normal.
    pub normal: Vec3,
    /// Signed offset such that points `p` on the plane satisfy `normal.dot(p) + offset == 0`.
    pub offset: f64,
}

impl Plane {
    pub fn new(normal: Vec3, offset: f64) -> Self {
        Self { normal: normal.normalize(), offset }
    }

    /// Signed distance of `p` from the plane (positive on the outward side).
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        self.normal.dot(&p) + self.offset
    }

    /// Ray parameter `t` at which `line` crosses this plane, or `None` if the
    /// ray is parallel to it.
    pub fn intersect(&self, line: &Line) -> Option<f64> {
        let denom = self.normal.dot(&line.direction);
        if denom.abs() < 1e-12 {
            return None;
        }
        Some(-(self.normal.dot(&line.origin) + self.offset) / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_axis_aligned() {
        let p = Plane::new(Vec3::new3(0.0, 0.0, 1.0), 0.0);
        let l = Line::new(Vec3::new3(0.0, 0.0, -5.0), Vec3::new3(0.0, 0.0, 1.0));
        let t = p.intersect(&l).unwrap();
        assert!((t - 5.0).abs() < 1e-10);
    }

    #[test]
    fn parallel_ray_misses() {
        let p = Plane::new(Vec3::new3(0.0, 0.0, 1.0), 0.0);
        let l = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(1.0, 0.0, 0.0));
        assert!(p.intersect(&l).is_none());
    }

    #[test]
    fn signed_distance_sign() {
        let p = Plane::new(Vec3::new3(0.0, 0.0, 1.0), 0.0);
        assert!(p.signed_distance(Vec3::new3(0.0, 0.0, 2.0)) > 0.0);
        assert!(p.signed_distance(Vec3::new3(0.0, 0.0, -2.0)) < 0.0);
    }
}
