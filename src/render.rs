//! Data-parallel per-pixel render driver (spec §5) — grounded on the
//! teacher's `engine/raymarcher.rs` scanline-interleaved render loop,
//! generalized from manual worker-id striping to `rayon`'s work-stealing
//! `into_par_iter`, since this crate targets native threads rather than Web
//! Workers with a shared G-buffer.

use rayon::prelude::*;

use crate::camera::Camera;
use crate::color::Color;
use crate::sampling::{self, AaMode};
use crate::scene::Scene;
use crate::tracer::{self, TraceConfig};

/// Everything `render` needs beyond the scene/camera themselves (spec §6's
/// CLI-exposed sampling and recursion knobs).
pub struct RenderSettings {
    pub aa_mode: AaMode,
    /// Per-axis light sample count; `0` degenerates to a single point sample.
    pub light_rays: u32,
    /// Side length of the light's jittered sampling square (CLI `--light-area`,
    /// which stores `sqrt(area)` directly per spec §6).
    pub light_area_side: f64,
    pub reflect_rays: u32,
    pub transmit_rays: u32,
    pub max_depth: u32,
    pub fallback_color: Color,
}

/// Renders `scene` through `camera` into a row-major 8-bit RGB framebuffer
/// (`width*height*3` bytes), one independent pixel at a time (spec §5: "no
/// shared mutable state between pixels; the scene is read-only").
pub fn render(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> Vec<u8> {
    let pixel_aa = sampling::pixel_deviations(settings.aa_mode);
    let light_deviations = sampling::light_deviations(settings.light_rays, settings.light_area_side);
    let reflect_deviations = sampling::cone_deviations(settings.reflect_rays);
    let transmit_deviations = sampling::cone_deviations(settings.transmit_rays);

    let config = TraceConfig {
        light_deviations,
        reflect_deviations,
        transmit_deviations,
        fallback_color: settings.fallback_color,
        max_depth: settings.max_depth,
    };

    let width = camera.width;
    let height = camera.height;
    let sample_count = pixel_aa.len().max(1) as f64;

    (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            let pixel_aa = &pixel_aa;
            let config = &config;
            (0..width).flat_map(move |x| {
                let mut accum = Color::BLACK;
                for &(dx, dy) in pixel_aa {
                    let ray = camera.primary_ray(x, y, dx, dy);
                    accum = accum + tracer::trace(&ray, scene, config, config.max_depth);
                }
                accum.scale(1.0 / sample_count).interval_fixed()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Surface;
    use crate::math::Vec3;
    use crate::pigment::Pigment;
    use crate::shape::Sphere;

    fn flat_lit_sphere_scene() -> Scene {
        let mut scene = Scene::empty();
        scene.ambient = Color::rgb(1.0, 1.0, 1.0);
        let pigment = scene.push_pigment(Pigment::solid(Color::rgb(1.0, 0.0, 0.0)));
        let surface = scene.push_surface(Surface::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0));
        scene.push_shape(Box::new(Sphere::new(Vec3::zero(), 1.0, pigment, surface)));
        scene
    }

    fn default_settings() -> RenderSettings {
        RenderSettings {
            aa_mode: AaMode::Center,
            light_rays: 0,
            light_area_side: 0.0,
            reflect_rays: 0,
            transmit_rays: 0,
            max_depth: 4,
            fallback_color: Color::BLACK,
        }
    }

    #[test]
    fn framebuffer_has_expected_length() {
        let scene = flat_lit_sphere_scene();
        let camera = Camera::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::zero(), Vec3::new3(0.0, 1.0, 0.0), 60.0, 16, 12, false);
        let settings = default_settings();
        let buf = render(&scene, &camera, &settings);
        assert_eq!(buf.len(), 16 * 12 * 3);
    }

    #[test]
    fn center_pixel_sees_solid_red_sphere() {
        let scene = flat_lit_sphere_scene();
        let camera = Camera::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::zero(), Vec3::new3(0.0, 1.0, 0.0), 60.0, 17, 17, false);
        let settings = default_settings();
        let buf = render(&scene, &camera, &settings);
        let idx = (8 * 17 + 8) * 3;
        assert_eq!(buf[idx], 255);
        assert_eq!(buf[idx + 1], 0);
        assert_eq!(buf[idx + 2], 0);
    }

    #[test]
    fn corner_pixel_misses_sphere_and_shows_fallback() {
        let scene = flat_lit_sphere_scene();
        let camera = Camera::new(Vec3::new3(0.0, 0.0, 5.0), Vec3::zero(), Vec3::new3(0.0, 1.0, 0.0), 60.0, 17, 17, false);
        let mut settings = default_settings();
        settings.fallback_color = Color::rgb(0.0, 0.0, 1.0);
        let buf = render(&scene, &camera, &settings);
        let idx = 0;
        assert_eq!(buf[idx], 0);
        assert_eq!(buf[idx + 1], 0);
        assert_eq!(buf[idx + 2], 255);
    }
}
