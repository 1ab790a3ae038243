//! Axis-aligned box — spec §4.3 slab method: t_min = max of per-axis
//! enters, t_max = min of per-axis exits; normal is the axis whose slab
//! produced the current t.

use super::{Hit, Shape};
use crate::math::{Line, Vec3};
use crate::scene::Scene;

pub struct BoxShape {
    pub min: Vec3,
    pub max: Vec3,
    pub pigment_index: usize,
    pub surface_index: usize,
}

impl BoxShape {
    pub fn new(min: Vec3, max: Vec3, pigment_index: usize, surface_index: usize) -> Self {
        Self { min, max, pigment_index, surface_index }
    }

    /// Face-local UV for a point known to lie on the box surface: project
    /// onto the two axes orthogonal to whichever axis is "flattest" there
    /// (spec §4.3: "face-local coords for Box faces").
    fn uv(&self, point: Vec3, axis: usize) -> (f64, f64) {
        let size = self.max - self.min;
        let rel = point - self.min;
        match axis {
            0 => (safe_div(rel.y(), size.y()), safe_div(rel.z(), size.z())),
            1 => (safe_div(rel.x(), size.x()), safe_div(rel.z(), size.z())),
            _ => (safe_div(rel.x(), size.x()), safe_div(rel.y(), size.y())),
        }
    }
}

fn safe_div(a: f64, b: f64) -> f64 {
    if b.abs() < 1e-12 {
        0.0
    } else {
        a / b
    }
}

impl Shape for BoxShape {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        let mut axis_min = 0usize;
        let mut axis_max = 0usize;
        let mut sign_min = -1.0;
        let mut sign_max = 1.0;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if dir.abs() < 1e-12 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / dir;
            let mut t1 = (lo - origin) * inv_dir;
            let mut t2 = (hi - origin) * inv_dir;
            let mut s1 = -1.0;
            let mut s2 = 1.0;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                std::mem::swap(&mut s1, &mut s2);
            }

            if t1 > t_min {
                t_min = t1;
                axis_min = axis;
                sign_min = s1;
            }
            if t2 < t_max {
                t_max = t2;
                axis_max = axis;
                sign_max = s2;
            }
        }

        if t_min > t_max {
            return None;
        }

        if !info {
            return Some(Hit::cheap(t_min, t_max, false, true));
        }

        let mut normal_min = Vec3::zero();
        normal_min[axis_min] = sign_min;
        let mut normal_max = Vec3::zero();
        normal_max[axis_max] = sign_max;

        let point_min = ray.at(t_min);
        let point_max = ray.at(t_max);

        let pigment = &scene.pigments[self.pigment_index];
        let material = scene.surfaces[self.surface_index];

        let (u_min, v_min) = self.uv(point_min, axis_min);
        let (u_max, v_max) = self.uv(point_max, axis_max);

        Some(Hit {
            t_min,
            t_max,
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
