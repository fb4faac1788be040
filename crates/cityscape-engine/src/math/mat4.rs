use core::ops::Mul;

use super::Vec3;

/// 4x4 matrix, column-major, acting on column vectors.
///
/// `cols[j][i]` is row `i` of column `j`, matching the memory layout WGSL
/// expects for `mat4x4<f32>` uniforms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Affine translation by `(x, y, z)`.
    #[inline]
    pub const fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4 {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Rotation about the +Y axis by `angle` radians (counter-clockwise when
    /// viewed from +Y).
    #[inline]
    pub fn rotation_y(angle: f32) -> Mat4 {
        let (sin, cos) = angle.sin_cos();
        Mat4 {
            cols: [
                [cos, 0.0, -sin, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [sin, 0.0, cos, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Right-handed perspective projection with wgpu 0..1 depth.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();
        let r = 1.0 / (near - far);
        Mat4 {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, far * r, -1.0],
                [0.0, 0.0, near * far * r, 0.0],
            ],
        }
    }

    /// Right-handed orthographic projection with wgpu 0..1 depth.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let rd = 1.0 / (near - far);
        Mat4 {
            cols: [
                [2.0 * rw, 0.0, 0.0, 0.0],
                [0.0, 2.0 * rh, 0.0, 0.0],
                [0.0, 0.0, rd, 0.0],
                [-(right + left) * rw, -(top + bottom) * rh, near * rd, 1.0],
            ],
        }
    }

    /// Right-handed view matrix looking from `eye` toward `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let f = (target - eye).normalized();
        let s = f.cross(up).normalized();
        let u = s.cross(f);
        Mat4 {
            cols: [
                [s.x, u.x, -f.x, 0.0],
                [s.y, u.y, -f.y, 0.0],
                [s.z, u.z, -f.z, 0.0],
                [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
            ],
        }
    }

    /// Transforms a point (`w = 1`), dropping the resulting `w`.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Column-major layout suitable for direct upload into a uniform buffer.
    #[inline]
    pub const fn to_cols_array_2d(self) -> [[f32; 4]; 4] {
        self.cols
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, cell) in col.iter_mut().enumerate() {
                *cell = self.cols[0][i] * rhs.cols[j][0]
                    + self.cols[1][i] * rhs.cols[j][1]
                    + self.cols[2][i] * rhs.cols[j][2]
                    + self.cols[3][i] * rhs.cols[j][3];
            }
        }
        Mat4 { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_eq(a: Mat4, b: Mat4, tol: f32) {
        for j in 0..4 {
            for i in 0..4 {
                assert!(
                    (a.cols[j][i] - b.cols[j][i]).abs() <= tol,
                    "col {j}, row {i}: {} vs {}",
                    a.cols[j][i],
                    b.cols[j][i]
                );
            }
        }
    }

    #[test]
    fn rotation_y_zero_is_identity() {
        assert_mat_eq(Mat4::rotation_y(0.0), Mat4::IDENTITY, 0.0);
    }

    #[test]
    fn rotation_y_round_trips() {
        let theta = 1.234;
        assert_mat_eq(
            Mat4::rotation_y(theta) * Mat4::rotation_y(-theta),
            Mat4::IDENTITY,
            1e-6,
        );
    }

    #[test]
    fn rotation_y_quarter_turn_maps_z_to_x() {
        let m = Mat4::rotation_y(core::f32::consts::FRAC_PI_2);
        let p = m.transform_point(Vec3::new(0.0, 0.0, 1.0));
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn translation_moves_points() {
        let m = Mat4::translation(1.0, -2.0, 3.0);
        assert_eq!(
            m.transform_point(Vec3::new(1.0, 1.0, 1.0)),
            Vec3::new(2.0, -1.0, 4.0)
        );
    }

    #[test]
    fn rotation_about_pivot_keeps_pivot_fixed() {
        let pivot = Vec3::new(5.0, 0.0, -3.0);
        let m = Mat4::translation(pivot.x, pivot.y, pivot.z)
            * Mat4::rotation_y(0.7)
            * Mat4::translation(-pivot.x, -pivot.y, -pivot.z);
        let p = m.transform_point(pivot);
        assert!((p - pivot).length() < 1e-5);
    }

    #[test]
    fn look_at_places_eye_at_view_origin() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let p = view.transform_point(eye);
        assert!(p.length() < 1e-5);
    }

    #[test]
    fn look_at_target_lands_on_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let view = Mat4::look_at(eye, Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let p = view.transform_point(Vec3::zero());
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!((p.z + 10.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let m = Mat4::perspective(core::f32::consts::FRAC_PI_4, 1.0, 0.1, 1000.0);
        // transform_point drops w; reconstruct depth manually for a point on
        // the optical axis at the near plane.
        let z = -0.1;
        let clip_z = m.cols[2][2] * z + m.cols[3][2];
        let clip_w = -z;
        assert!((clip_z / clip_w).abs() < 1e-6);
    }

    #[test]
    fn orthographic_maps_unit_box_to_ndc() {
        let m = Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 1000.0);
        let p = m.transform_point(Vec3::new(1.0, -1.0, -0.1));
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y + 1.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }
}
