//! Convex polyhedron via half-space intersection — spec §4.3: for each
//! plane, intersect the ray with the plane; accumulate `enter = max of t
//! where D.n < 0`, `exit = min of t where D.n > 0`; miss if `enter > exit`
//! or no plane bounds the ray; normal is the plane that produced the
//! current bound.

use super::{Hit, Shape};
use crate::math::{Line, Plane, Vec3};
use crate::scene::Scene;

pub struct Polyhedron {
    /// Inward-facing planes per spec §3 ("set of half-space planes with
    /// inward normals"); intersection math below flips them to outward
    /// conventions internally so `Hit::normal_*` stays outward per §4.3.
    pub planes: Vec<Plane>,
    pub pigment_index: usize,
    pub surface_index: usize,
}

impl Polyhedron {
    pub fn new(planes: Vec<Plane>, pigment_index: usize, surface_index: usize) -> Self {
        Self { planes, pigment_index, surface_index }
    }

    fn uv(&self, plane_index: usize, point: Vec3) -> (f64, f64) {
        let n = self.planes[plane_index].normal;
        let u_axis = n.perpendicular();
        let v_axis = n.cross(&u_axis);
        (point.dot(&u_axis), point.dot(&v_axis))
    }
}

impl Shape for Polyhedron {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit> {
        let mut enter = f64::NEG_INFINITY;
        let mut exit = f64::INFINITY;
        let mut enter_plane = 0usize;
        let mut exit_plane = 0usize;
        let mut bounded_enter = false;
        let mut bounded_exit = false;

        for (i, plane) in self.planes.iter().enumerate() {
            // Inward normal in the scene data; outward for the contract is
            // its negation.
            let outward = -plane.normal;
            let denom = outward.dot(&ray.direction);
            let numer = -(outward.dot(&ray.origin) + (-plane.offset));

            if denom.abs() < 1e-12 {
                // Ray parallel to this plane: if origin is outside, miss entirely.
                if outward.dot(&ray.origin) + (-plane.offset) > 0.0 {
                    return None;
                }
                continue;
            }

            let t = numer / denom;
            if denom < 0.0 {
                if t > enter {
                    enter = t;
                    enter_plane = i;
                    bounded_enter = true;
                }
            } else if t < exit {
                exit = t;
                exit_plane = i;
                bounded_exit = true;
            }
        }

        if !bounded_enter || !bounded_exit || enter > exit {
            return None;
        }

        if !info {
            return Some(Hit::cheap(enter, exit, false, true));
        }

        let normal_min = -self.planes[enter_plane].normal;
        let normal_max = -self.planes[exit_plane].normal;
        let point_min = ray.at(enter);
        let point_max = ray.at(exit);

        let pigment = &scene.pigments[self.pigment_index];
        let material = scene.surfaces[self.surface_index];
        let (u_min, v_min) = self.uv(enter_plane, point_min);
        let (u_max, v_max) = self.uv(exit_plane, point_max);

        Some(Hit {
            t_min: enter,
            t_max: exit,
            normal_min,
            normal_max,
            inside_min: false,
            inside_max: true,
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

    /// A unit cube built from six inward-normal half-spaces.
    fn cube_scene() -> (Polyhedron, Scene) {
        let mut scene = Scene::empty();
        let pigment_index = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 1.0, 0.0)));
        let surface_index = scene.push_surface(Surface::default());
        let planes = vec![
            Plane::new(Vec3::new3(1.0, 0.0, 0.0), 1.0),
            Plane::new(Vec3::new3(-1.0, 0.0, 0.0), 1.0),
            Plane::new(Vec3::new3(0.0, 1.0, 0.0), 1.0),
            Plane::new(Vec3::new3(0.0, -1.0, 0.0), 1.0),
            Plane::new(Vec3::new3(0.0, 0.0, 1.0), 1.0),
            Plane::new(Vec3::new3(0.0, 0.0, -1.0), 1.0),
        ];
        (Polyhedron::new(planes, pigment_index, surface_index), scene)
    }

    #[test]
    fn straight_on_hit_is_unit_cube_sized() {
        let (cube, scene) = cube_scene();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = cube.intersect(&ray, &scene, true).unwrap();
        assert!((hit.t_min - 4.0).abs() < 1e-9);
        assert!((hit.t_max - 6.0).abs() < 1e-9);
    }

    #[test]
    fn miss_when_entirely_outside() {
        let (cube, scene) = cube_scene();
        let ray = Line::new(Vec3::new3(5.0, 5.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        assert!(cube.intersect(&ray, &scene, true).is_none());
    }

    #[test]
    fn normals_point_outward() {
        let (cube, scene) = cube_scene();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let hit = cube.intersect(&ray, &scene, true).unwrap();
        assert!((hit.normal_min.z() - 1.0).abs() < 1e-9);
        assert!((hit.normal_max.z() - (-1.0)).abs() < 1e-9);
    }
}
