//! Recursive shading/tracing loop (spec §4.5) — grounded on the original
//! engine's `raytrace.cc` (`Collision`/`Trace`): two-phase nearest-hit scan,
//! Whitted-style reflection/transmission recursion, Phong direct lighting
//! with shadow rays. Ported from `static`-scratch globals to ordinary
//! per-call stack locals (spec §9) so `trace` is safely callable from every
//! `rayon` worker concurrently, and generalized from single-sample
//! reflection/transmission/shadow rays to the deviation-set driven
//! distributed sampling spec §4.1/§4.5 require.

use crate::color::Color;
use crate::math::{Line, Vec3, EPSILON};
use crate::scene::Scene;
use crate::shape::nearest_forward_t;

/// Self-intersection guard used when nudging recursive/shadow ray origins
/// off the surface they were just computed from.
const RAY_BIAS: f64 = 1e-4;

/// Bundles the deviation sets and recursion knobs threaded through every
/// `trace` call (spec §4.5's `Δlight, Δreflect, Δtransmit, fallback_color,
/// depth` parameters), so a single immutable value can be shared across
/// worker threads instead of re-threading five arguments.
pub struct TraceConfig {
    pub light_deviations: Vec<(f64, f64)>,
    pub reflect_deviations: Vec<((f64, f64), f64)>,
    pub transmit_deviations: Vec<((f64, f64), f64)>,
    pub fallback_color: Color,
    pub max_depth: u32,
}

/// Public entry point (spec §4.5): `Trace(ray, scene, ambient, lights,
/// Δlight, Δreflect, Δtransmit, fallback_color, depth) -> Color`. `ambient`
/// and `lights` are read from `scene` directly since `Scene` already owns
/// them (spec §3 lifecycle: scene entities are parsed once, never mutated).
pub fn trace(ray: &Line, scene: &Scene, config: &TraceConfig, depth: u32) -> Color {
    let Some((shape_index, _)) = nearest_hit(ray, scene) else {
        return config.fallback_color;
    };

    // Two-phase nearest-hit search (spec §4.5 step 1): full info is fetched
    // only for the surviving winner of the cheap scan.
    let Some(hit) = scene.shapes[shape_index].intersect(ray, scene, true) else {
        return config.fallback_color;
    };

    let use_min = hit.t_min > 0.0;
    let t = if use_min { hit.t_min } else { hit.t_max };
    let raw_normal = if use_min { hit.normal_min } else { hit.normal_max };
    let pigment_color = if use_min { hit.color_min } else { hit.color_max };
    let material = if use_min { hit.material_min } else { hit.material_max };
    let entering_from_inside = if use_min { hit.inside_min } else { hit.inside_max };

    let point = ray.at(t);
    // Perturb by the bump vector; no explicit renormalize (spec §4.5 step 2
    // — "renormalize implicitly via later dot products").
    let normal = raw_normal + material.bump;

    let mut reflected = Color::BLACK;
    let mut transmitted = Color::BLACK;

    if depth > 0 {
        if material.reflect > EPSILON {
            let r = (ray.direction - normal * (2.0 * normal.dot(&ray.direction))).normalize();
            reflected = sample_cone(r, point, &config.reflect_deviations, scene, config, depth)
                .scale(material.reflect);
        }

        if material.transmit > EPSILON {
            let eta = if entering_from_inside { material.ior } else { 1.0 / material.ior };
            let c1 = normal.dot(&(-ray.direction));
            let k = 1.0 - eta * eta * (1.0 - c1 * c1);
            if k >= 0.0 {
                let t_dir = (normal * (eta * c1 - k.sqrt()) - (-ray.direction) * eta).normalize();
                transmitted =
                    sample_cone(t_dir, point, &config.transmit_deviations, scene, config, depth)
                        .scale(material.transmit);
            }
        }
    }

    let ambient = scene.ambient.hadamard(&Color::rgb(material.ambient, material.ambient, material.ambient)).hadamard(&pigment_color);

    let mut direct = Color::BLACK;
    if material.diffuse > EPSILON || material.specular > EPSILON {
        for light in &scene.lights {
            direct = direct + sample_light(light, point, &normal, ray, &material, &pigment_color, scene, config);
        }
    }

    reflected + transmitted + ambient + direct
}

/// Smaller-of-(t_min,t_max)-that-is-still-positive scan across every shape
/// (spec §4.5 step 1), using the cheap `info=false` intersection form.
fn nearest_hit(ray: &Line, scene: &Scene) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, shape) in scene.shapes.iter().enumerate() {
        if let Some(hit) = shape.intersect(ray, scene, false) {
            if let Some(t) = nearest_forward_t(&hit) {
                if best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((i, t));
                }
            }
        }
    }
    best
}

/// `true` if any shape blocks the ray strictly before `max_t` (spec §4.5
/// step 5's shadow-ray test), using the cheap any-hit scan form.
fn occluded(ray: &Line, scene: &Scene, max_t: f64) -> bool {
    for shape in &scene.shapes {
        if let Some(hit) = shape.intersect(ray, scene, false) {
            if let Some(t) = nearest_forward_t(&hit) {
                if t < max_t - EPSILON {
                    return true;
                }
            }
        }
    }
    false
}

/// Shared cone-sampling pattern used by both reflection and transmission
/// (spec §4.5 steps 3/4): build a tangent basis around `direction`, anchor
/// a point 5 units along it, jitter by each `(offset, weight)` deviation,
/// recurse, and return the weighted average.
fn sample_cone(
    direction: Vec3,
    hit: Vec3,
    deviations: &[((f64, f64), f64)],
    scene: &Scene,
    config: &TraceConfig,
    depth: u32,
) -> Color {
    let up = direction.perpendicular();
    let right = direction.cross(&up);
    let anchor = hit + direction * 5.0;

    let mut sum = Color::BLACK;
    let mut weight_sum = 0.0;
    for &((ox, oy), weight) in deviations {
        let target = anchor + right * ox + up * oy;
        let d = (target - hit).normalize();
        let sample_ray = Line::new(hit + d * RAY_BIAS, d);
        sum = sum + trace(&sample_ray, scene, config, depth - 1).scale(weight);
        weight_sum += weight;
    }

    if weight_sum <= 0.0 {
        Color::BLACK
    } else {
        sum.scale(1.0 / weight_sum)
    }
}

/// One light's area-sampled contribution to direct lighting (spec §4.5
/// step 5): for every `(lx, ly)` in `Δlight`, cast a shadow-tested sample
/// direction toward a jittered point on the light's tangent plane, then
/// accumulate Phong diffuse+specular scaled by attenuation; divide by
/// `|Δlight|`.
fn sample_light(
    light: &crate::light::Light,
    hit: Vec3,
    normal: &Vec3,
    ray: &Line,
    material: &crate::material::Surface,
    pigment_color: &Color,
    scene: &Scene,
    config: &TraceConfig,
) -> Color {
    let delta = light.position - hit;
    let d = delta.length();
    if d < 1e-12 {
        return Color::BLACK;
    }
    let omega = delta / d;
    let up = omega.perpendicular();
    let right = omega.cross(&up);

    let mut accumulated = Color::BLACK;
    let sample_count = config.light_deviations.len().max(1) as f64;

    for &(lx, ly) in &config.light_deviations {
        let sample_point = light.position + right * lx + up * ly;
        let omega_prime = (sample_point - hit).normalize();

        let shadow_ray = Line::new(hit + omega_prime * RAY_BIAS, omega_prime);
        if occluded(&shadow_ray, scene, d) {
            continue;
        }

        let attenuation = light.attenuation(d);
        let diffuse_term = normal.dot(&omega_prime).max(0.0) * material.diffuse;
        let diffuse = pigment_color.hadamard(&light.color).scale(diffuse_term);

        let h = (omega_prime - ray.direction).normalize();
        let specular_term = normal.dot(&h).max(0.0).powf(material.alpha) * material.specular;
        let specular = light.color.scale(specular_term);

        accumulated = accumulated + (diffuse + specular).scale(attenuation);
    }

    accumulated.scale(1.0 / sample_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::material::Surface;
    use crate::math::Vec3;
    use crate::pigment::Pigment;
    use crate::shape::Sphere;

    fn base_config() -> TraceConfig {
        TraceConfig {
            light_deviations: vec![(0.0, 0.0)],
            reflect_deviations: vec![((0.0, 0.0), std::f64::consts::SQRT_2)],
            transmit_deviations: vec![((0.0, 0.0), std::f64::consts::SQRT_2)],
            fallback_color: Color::BLACK,
            max_depth: 4,
        }
    }

    #[test]
    fn miss_returns_fallback_color_bit_exact() {
        let scene = Scene::empty();
        let config = base_config();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let color = trace(&ray, &scene, &config, 0);
        assert_eq!(color, config.fallback_color);
    }

    #[test]
    fn flat_ambient_sphere_is_solid_color() {
        let mut scene = Scene::empty();
        scene.ambient = Color::rgb(1.0, 1.0, 1.0);
        let pigment = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 0.0, 0.0)));
        let surface = scene.push_surface(Surface::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0));
        scene.push_shape(Box::new(Sphere::new(Vec3::zero(), 1.0, pigment, surface)));

        let config = base_config();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let color = trace(&ray, &scene, &config, 2);
        assert!((color.r - 1.0).abs() < 1e-9);
        assert!(color.g.abs() < 1e-9);
        assert!(color.b.abs() < 1e-9);
    }

    #[test]
    fn depth_zero_skips_reflection_but_keeps_ambient() {
        let mut scene = Scene::empty();
        scene.ambient = Color::rgb(1.0, 1.0, 1.0);
        let pigment = scene.push_pigment(Pigment::solid(Color::rgb(0.2, 0.2, 0.2)));
        let surface = scene.push_surface(Surface::new(1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0));
        scene.push_shape(Box::new(Sphere::new(Vec3::zero(), 1.0, pigment, surface)));

        let config = base_config();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let color = trace(&ray, &scene, &config, 0);
        // No reflection contribution at depth 0 — only ambient survives.
        assert!((color.r - 0.2).abs() < 1e-9);
    }

    #[test]
    fn shadowed_point_gets_no_direct_light() {
        let mut scene = Scene::empty();
        scene.ambient = Color::BLACK;
        let pigment = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 1.0, 1.0)));
        let surface = scene.push_surface(Surface::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0));
        scene.push_shape(Box::new(Sphere::new(Vec3::zero(), 1.0, pigment, surface)));
        // Blocking sphere directly between the hit point and the light.
        let blocker_pigment = scene.push_pigment(Pigment::solid(Color::BLACK));
        let blocker_surface = scene.push_surface(Surface::default());
        scene.push_shape(Box::new(Sphere::new(Vec3::new3(0.0, 0.0, 3.0), 0.5, blocker_pigment, blocker_surface)));
        scene.lights.push(crate::light::Light::new(
            Vec3::new3(0.0, 0.0, 10.0),
            Color::rgb(1.0, 1.0, 1.0),
            1.0,
            0.0,
            0.0,
        ));

        let config = base_config();
        let ray = Line::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::new3(0.0, 0.0, -1.0));
        let color = trace(&ray, &scene, &config, 2);
        assert!(color.r.abs() < 1e-9);
    }
}
