//! RGBA color and 8-bit framebuffer conversion — grounded on the teacher's
//! `math/utils.rs` (`clampf`, `float_to_byte`) and the elementwise-blend style
//! of `lighting/gradient.rs::sample`.

use std::ops::{Add, Mul};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Elementwise (Hadamard) product — used for pigment·material and
    /// pigment·light-color combination throughout the tracer.
    pub fn hadamard(&self, other: &Color) -> Color {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
    }

    pub fn scale(&self, k: f64) -> Color {
        Color { r: self.r * k, g: self.g * k, b: self.b * k, a: self.a * k }
    }

    /// Clamps each channel to [0,1] and maps to an 8-bit framebuffer pixel.
    /// The only gamma-less clamp-and-scale step in the pipeline (spec §3/§6);
    /// no global dynamic-range rescale is ever applied.
    pub fn interval_fixed(&self) -> [u8; 3] {
        [clamp01(self.r), clamp01(self.g), clamp01(self.b)]
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a + rhs.a,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;
    fn mul(self, rhs: f64) -> Color {
        self.scale(rhs)
    }
}

fn clamp01(channel: f64) -> u8 {
    let clamped = channel.clamp(0.0, 1.0);
    (clamped * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fixed_clamps_out_of_range() {
        let c = Color::rgb(-1.0, 0.5, 2.0);
        assert_eq!(c.interval_fixed(), [0, 128, 255]);
    }

    #[test]
    fn hadamard_is_elementwise() {
        let a = Color::rgb(1.0, 0.5, 0.0);
        let b = Color::rgb(0.5, 0.5, 1.0);
        let c = a.hadamard(&b);
        assert!((c.r - 0.5).abs() < 1e-12);
        assert!((c.g - 0.25).abs() < 1e-12);
        assert!((c.b - 0.0).abs() < 1e-12);
    }

    #[test]
    fn add_and_scale() {
        let a = Color::rgb(0.1, 0.2, 0.3);
        let b = Color::rgb(0.1, 0.1, 0.1);
        let sum = (a + b).scale(2.0);
        assert!((sum.r - 0.4).abs() < 1e-9);
        assert!((sum.g - 0.6).abs() < 1e-9);
        assert!((sum.b - 0.8).abs() < 1e-9);
    }
}
