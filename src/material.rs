//! Per-surface scalar coefficient bundle — grounded on `lighting/paint.rs`'s
//! `PaintConfig`/`LightConfig` field style and `horki342-RayTracer`'s plain
//! `Material{color,ambient,diffuse,specular,shininess}` struct, generalized
//! with the reflect/transmit/ior fields and bump vector this spec's Material
//! needs (§3).

use crate::math::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Surface {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    /// Phong specular exponent.
    pub alpha: f64,
    pub reflect: f64,
    pub transmit: f64,
    pub ior: f64,
    /// Normal-perturbation vector; zero unless a bump texture is bound.
    pub bump: Vec3,
}

impl Surface {
    pub fn new(ambient: f64, diffuse: f64, specular: f64, alpha: f64, reflect: f64, transmit: f64, ior: f64) -> Self {
        Self { ambient, diffuse, specular, alpha, reflect, transmit, ior, bump: Vec3::zero() }
    }

    pub fn with_bump(mut self, bump: Vec3) -> Self {
        self.bump = bump;
        self
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_zero_bump() {
        let s = Surface::default();
        assert_eq!(s.bump, Vec3::zero());
    }

    #[test]
    fn with_bump_overrides_only_bump() {
        let s = Surface::default().with_bump(Vec3::new3(0.1, 0.0, 0.0));
        assert!((s.bump.x() - 0.1).abs() < 1e-12);
        assert!((s.ambient - 1.0).abs() < 1e-12);
    }
}
