//! Finite capped cylinder — spec §4.3: transform to a local frame with axis
//! along Z (bottom→top); intersect the infinite cylinder `x^2+y^2=r^2`,
//! clip by the two cap planes, and also intersect the two caps directly;
//! report the nearest entry/exit segment.

use std::f64::consts::PI;

use super::{Hit, Shape};
use crate::math::{Line, Vec3};
use crate::scene::Scene;

pub struct Cylinder {
    pub bottom: Vec3,
    pub top: Vec3,
    pub radius: f64,
    pub pigment_index: usize,
    pub surface_index: usize,
    /// Orthonormal local frame: `axis` runs bottom→top, `u_axis`/`v_axis`
    /// span the cross-section plane.
    axis: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
    height: f64,
}

impl Cylinder {
    pub fn new(bottom: Vec3, top: Vec3, radius: f64, pigment_index: usize, surface_index: usize) -> Self {
        let delta = top - bottom;
        let height = delta.length();
        let axis = delta.normalize();
        let u_axis = axis.perpendicular();
        let v_axis = axis.cross(&u_axis);
        Self { bottom, top, radius, pigment_index, surface_index, axis, u_axis, v_axis, height }
    }

    fn to_local(&self, p: Vec3) -> Vec3 {
        let rel = p - self.bottom;
        Vec3::new3(rel.dot(&self.u_axis), rel.dot(&self.v_axis), rel.dot(&self.axis))
    }

    fn normal_from_local(&self, local_radial: Vec3) -> Vec3 {
        (self.u_axis * local_radial.x() + self.v_axis * local_radial.y()).normalize()
    }

    fn side_uv(&self, local: Vec3) -> (f64, f64) {
        let angle = local.y().atan2(local.x());
        let u = (angle / (2.0 * PI)) + 0.5;
        let v = (local.z() / self.height).clamp(0.0, 1.0);
        (u, v)
    }
}

struct Candidate {
    t: f64,
    normal: Vec3,
    inside: bool,
}

impl Shape for Cylinder {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit> {
        let origin_local = self.to_local(ray.origin);
        let dir_local = Vec3::new3(
            ray.direction.dot(&self.u_axis),
            ray.direction.dot(&self.v_axis),
            ray.direction.dot(&self.axis),
        );

        let mut candidates: Vec<Candidate> = Vec::with_capacity(4);

        let a = dir_local.x() * dir_local.x() + dir_local.y() * dir_local.y();
        if a > 1e-12 {
            let b = 2.0 * (origin_local.x() * dir_local.x() + origin_local.y() * dir_local.y());
            let c = origin_local.x() * origin_local.x() + origin_local.y() * origin_local.y()
                - self.radius * self.radius;
            let discriminant = b * b - 4.0 * a * c;
            if discriminant >= 0.0 {
                let sqrt_d = discriminant.sqrt();
                for t in [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)] {
                    let z = origin_local.z() + t * dir_local.z();
                    if z >= 0.0 && z <= self.height {
                        let local = Vec3::new3(
                            origin_local.x() + t * dir_local.x(),
                            origin_local.y() + t * dir_local.y(),
                            z,
                        );
                        let normal = self.normal_from_local(local);
                        let inside = origin_local.x() * origin_local.x()
                            + origin_local.y() * origin_local.y()
                            < self.radius * self.radius;
                        candidates.push(Candidate { t, normal, inside });
                    }
                }
            }
        }

        if dir_local.z().abs() > 1e-12 {
            for (z_plane, normal) in [(0.0, -self.axis), (self.height, self.axis)] {
                let t = (z_plane - origin_local.z()) / dir_local.z();
                let x = origin_local.x() + t * dir_local.x();
                let y = origin_local.y() + t * dir_local.y();
                if x * x + y * y <= self.radius * self.radius {
                    let inside = origin_local.z() > 0.0 && origin_local.z() < self.height;
                    candidates.push(Candidate { t, normal, inside });
                }
            }
        }

        if candidates.len() < 2 {
            return None;
        }

        candidates.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
        let entry = &candidates[0];
        let exit = &candidates[candidates.len() - 1];

        if !info {
            return Some(Hit::cheap(entry.t, exit.t, entry.inside, exit.inside));
        }

        let point_min = ray.at(entry.t);
        let point_max = ray.at(exit.t);
        let pigment = &scene.pigments[self.pigment_index];
        let material = scene.surfaces[self.surface_index];

        let (u_min, v_min) = self.side_uv(self.to_local(point_min));
        let (u_max, v_max) = self.side_uv(self.to_local(point_max));

        Some(Hit {
            t_min: entry.t,
            t_max: exit.t,
            normal_min: entry.normal,
            normal_max: exit.normal,
            inside_min: entry.inside,
            inside_max: exit.inside,
            color_min: pigment.sample(point_min, u_min, v_min),
            color_max: pigment.sample(point_max, u_max, v_max),
            material_min: material,
            material_max: material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::material::Surface;
    use crate::pigment::Pigment;

    fn cylinder_scene() -> (Cylinder, Scene) {
        let mut scene = Scene::empty();
        let pigment_index = scene.push_pigment(Pigment::solid(Color::rgb(0.0, 0.0, 1.0)));
        let surface_index = scene.push_surface(Surface::default());
        (
            Cylinder::new(Vec3::new3(0.0, 0.0, -1.0), Vec3::new3(0.0, 0.0, 1.0), 1.0, pigment_index, surface_index),
            scene,
        )
    }

    #[test]
    fn straight_down_axis_hits_both_caps() {
        let (c, scene) = cylinder_scene();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = c.intersect(&ray, &scene, true).unwrap();
        assert!((hit.t_min - 4.0).abs() < 1e-6);
        assert!((hit.t_max - 6.0).abs() < 1e-6);
    }

    #[test]
    fn side_hit_normals_are_unit() {
        let (c, scene) = cylinder_scene();
        let ray = Line::new(Vec3::new3(5.0, 0.0, 0.0), Vec3::new3(-1.0, 0.0, 0.0));
        let hit = c.intersect(&ray, &scene, true).unwrap();
        assert!((hit.normal_min.length() - 1.0).abs() < 1e-6);
        assert!((hit.normal_max.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn miss_beyond_radius() {
        let (c, scene) = cylinder_scene();
        let ray = Line::new(Vec3::new3(5.0, 5.0, 0.0), Vec3::new3(-1.0, 0.0, 0.0));
        assert!(c.intersect(&ray, &scene, true).is_none());
    }
}
