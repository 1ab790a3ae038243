//! Sphere primitive — spec §4.3: solve `||O+tD-C||^2 = r^2`, normal at `t`
//! is `(at(t)-C)/r`.

use std::f64::consts::PI;

use super::{Hit, Shape};
use crate::math::{Line, Vec3, EPSILON};
use crate::scene::Scene;

pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub pigment_index: usize,
    pub surface_index: usize,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64, pigment_index: usize, surface_index: usize) -> Self {
        Self { center, radius, pigment_index, surface_index }
    }

    /// Spherical UV of a point on the sphere's surface, in the shape's local
    /// frame (spec §4.3: "spherical coords for Sphere").
    fn uv(&self, point: Vec3) -> (f64, f64) {
        let local = (point - self.center) / self.radius;
        let u = (local.z().atan2(local.x()) / (2.0 * PI)) + 0.5;
        let v = (local.y().clamp(-1.0, 1.0)).asin() / PI + 0.5;
        (u, v)
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < -EPSILON {
            return None;
        }
        let discriminant = discriminant.max(0.0);
        let sqrt_d = discriminant.sqrt();
        let t_min = (-b - sqrt_d) / (2.0 * a);
        let t_max = (-b + sqrt_d) / (2.0 * a);

        if !info {
            return Some(Hit::cheap(t_min, t_max, false, true));
        }

        let point_min = ray.at(t_min);
        let point_max = ray.at(t_max);
        let normal_min = (point_min - self.center).normalize();
        let normal_max = (point_max - self.center).normalize();

        let pigment = &scene.pigments[self.pigment_index];
        let material = scene.surfaces[self.surface_index];

        let (u_min, v_min) = self.uv(point_min);
        let (u_max, v_max) = self.uv(point_max);

        Some(Hit {
            t_min,
            t_max,
            normal_min,
            normal_max,
            inside_min: false,
            inside_max: true,
            color_min: pigment.sample(point_min - self.center, u_min, v_min),
            color_max: pigment.sample(point_max - self.center, u_max, v_max),
            material_min: material,
            material_max: material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::pigment::Pigment;
    use crate::scene::Scene;

    fn unit_sphere_scene() -> (Sphere, Scene) {
        let mut scene = Scene::empty();
        let pigment_index = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 0.0, 0.0)));
        let surface_index = scene.push_surface(crate::material::Surface::default());
        (Sphere::new(Vec3::zero(), 1.0, pigment_index, surface_index), scene)
    }

    #[test]
    fn ray_through_center_hits_symmetric_ts() {
        let (sphere, scene) = unit_sphere_scene();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = sphere.intersect(&ray, &scene, true).unwrap();
        assert!(hit.t_min < hit.t_max);
        assert!((hit.t_min - 4.0).abs() < 1e-9);
        assert!((hit.t_max - 6.0).abs() < 1e-9);
    }

    #[test]
    fn normals_are_unit_length() {
        let (sphere, scene) = unit_sphere_scene();
        let ray = Line::new(Vec3::new3(0.3, 0.2, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = sphere.intersect(&ray, &scene, true).unwrap();
        assert!((hit.normal_min.length() - 1.0).abs() < 1e-6);
        assert!((hit.normal_max.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn miss_outside_radius() {
        let (sphere, scene) = unit_sphere_scene();
        let ray = Line::new(Vec3::new3(5.0, 5.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        assert!(sphere.intersect(&ray, &scene, true).is_none());
    }

    #[test]
    fn cheap_scan_skips_info() {
        let (sphere, scene) = unit_sphere_scene();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = sphere.intersect(&ray, &scene, false).unwrap();
        assert!((hit.t_min - 4.0).abs() < 1e-9);
    }
}
