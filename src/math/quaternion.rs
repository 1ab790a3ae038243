//! Unit quaternion rotation — generalized from the teacher's `Quaternion`
//! (`math3d.rs`), which used an explicit `x,y,z,w` struct with `identity`,
//! `normalize`, `mul`, and `to_matrix3`. Kept here in the same shape plus the
//! axis+angle constructor the CSG transform wrapper needs.

use super::vector::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub fn identity() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }

    /// Build a unit quaternion representing a rotation of `angle_rad` about
    /// `axis` (need not be pre-normalized).
    pub fn axis_angle(axis: Vec3, angle_rad: f64) -> Self {
        let axis = axis.normalize();
        let half = angle_rad * 0.5;
        let s = half.sin();
        Self {
            x: axis.x() * s,
            y: axis.y() * s,
            z: axis.z() * s,
            w: half.cos(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len < 1e-12 {
            return Self::identity();
        }
        Self { x: self.x / len, y: self.y / len, z: self.z / len, w: self.w / len }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Rotate `v` by this quaternion via `q * (v,0) * q^-1`, specialized for
    /// unit quaternions (conjugate == inverse).
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let qv = Vec3::new3(self.x, self.y, self.z);
        let uv = qv.cross(&v);
        let uuv = qv.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    pub fn to_matrix3(&self) -> [[f64; 3]; 3] {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        [
            [1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - z * w), 2.0 * (x * z + y * w)],
            [2.0 * (x * y + z * w), 1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - x * w)],
            [2.0 * (x * z - y * w), 2.0 * (y * z + x * w), 1.0 - 2.0 * (x * x + y * y)],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_unit() {
        assert!((Quaternion::identity().length() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn axis_angle_is_unit() {
        let q = Quaternion::axis_angle(Vec3::new3(0.0, 0.0, 1.0), 0.77);
        assert!((q.length() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn rotate_90_about_z_maps_x_to_y() {
        let q = Quaternion::axis_angle(Vec3::new3(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
        let r = q.rotate(Vec3::new3(1.0, 0.0, 0.0));
        assert!((r.x()).abs() < 1e-9);
        assert!((r.y() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn identity_rotate_is_noop() {
        let v = Vec3::new3(1.0, 2.0, 3.0);
        let r = Quaternion::identity().rotate(v);
        assert!((r - v).length() < 1e-12);
    }
}
