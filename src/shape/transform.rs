//! Pivoted affine transform wrapper — spec §4.3: transform the incoming ray
//! by `M^-1` (origin as point, direction as vector, not renormalized so the
//! returned `t` stays valid in outer space), intersect the child, then
//! transform returned normals by `M^-T` and renormalize.

use super::{Hit, Shape};
use crate::math::{Affine, Line};
use crate::scene::Scene;

pub struct Transformed {
    pub child: Box<dyn Shape>,
    pub transform: Affine,
}

impl Transformed {
    pub fn new(child: Box<dyn Shape>, transform: Affine) -> Self {
        Self { child, transform }
    }
}

impl Shape for Transformed {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit> {
        let local_ray = Line::new(
            self.transform.inverse_transform_point(ray.origin),
            self.transform.inverse_transform_direction(ray.direction),
        );

        let hit = self.child.intersect(&local_ray, scene, info)?;

        if !info {
            return Some(hit);
        }

        Some(Hit {
            normal_min: self.transform.transform_normal(hit.normal_min),
            normal_max: self.transform.transform_normal(hit.normal_max),
            ..hit
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::material::Surface;
    use crate::math::{Mat3, Vec3};
    use crate::pigment::Pigment;
    use crate::shape::Sphere;

    #[test]
    fn translated_sphere_moves_the_hit() {
        let mut scene = Scene::empty();
        let pigment_index = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 0.0, 0.0)));
        let surface_index = scene.push_surface(Surface::default());
        let sphere = Sphere::new(Vec3::zero(), 1.0, pigment_index, surface_index);

        let mut transform = Affine::new(Vec3::zero());
        transform.translate(Vec3::new3(0.0, 0.0, 3.0));
        let transformed = Transformed::new(Box::new(sphere), transform);

        let ray = Line::new(Vec3::new3(0.0, 0.0, 10.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = transformed.intersect(&ray, &scene, true).unwrap();
        // Sphere now centered at z=3, so entry is at t=6 instead of t=9.
        assert!((hit.t_min - 6.0).abs() < 1e-6);
    }

    #[test]
    fn scaled_sphere_normal_stays_unit() {
        let mut scene = Scene::empty();
        let pigment_index = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 0.0, 0.0)));
        let surface_index = scene.push_surface(Surface::default());
        let sphere = Sphere::new(Vec3::zero(), 1.0, pigment_index, surface_index);

        let mut transform = Affine::new(Vec3::zero());
        transform.compose_linear(Mat3::scale(2.0, 1.0, 1.0));
        let transformed = Transformed::new(Box::new(sphere), transform);

        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = transformed.intersect(&ray, &scene, true).unwrap();
        assert!((hit.normal_min.length() - 1.0).abs() < 1e-6);
    }
}
