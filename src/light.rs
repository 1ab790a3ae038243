//! Point light with quadratic attenuation — grounded on `lighting/paint.rs`
//! `LightConfig` (direction/color/amplitude fields) and the original engine's
//! `raytrace.cc` attenuation formula (`1/(kc + d*kl + d^2*kq)`).

use crate::color::Color;
use crate::math::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub constant_attenuation: f64,
    pub linear_attenuation: f64,
    pub quadratic_attenuation: f64,
}

impl Light {
    pub fn new(position: Vec3, color: Color, kc: f64, kl: f64, kq: f64) -> Self {
        Self {
            position,
            color,
            constant_attenuation: kc,
            linear_attenuation: kl,
            quadratic_attenuation: kq,
        }
    }

    /// Scalar falloff at distance `d`. The scene parser guarantees
    /// `kc+kl*d+kq*d^2` is never identically zero (spec §7).
    pub fn attenuation(&self, d: f64) -> f64 {
        1.0 / (self.constant_attenuation
            + d * self.linear_attenuation
            + d * d * self.quadratic_attenuation)
    }
}
