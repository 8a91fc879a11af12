use core::fmt;
use core::ops::{Index, Mul};

use bytemuck::{Pod, Zeroable};

use super::Vec4;

/// 4x4 `f32` matrix, column-major.
///
/// Storage is 16 contiguous floats: `m[c * 4 + r]` is column `c`, row `r`.
/// This is the layout WGSL expects for a `mat4x4<f32>` uniform, so the
/// matrix can be uploaded with `bytemuck::bytes_of` without reordering.
///
/// All constructors are pure; nothing is mutated in place.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Multiplicative identity.
    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Builds a matrix from 16 floats in column-major order.
    #[inline]
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Builds a matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            m: [
                c0.x, c0.y, c0.z, c0.w, //
                c1.x, c1.y, c1.z, c1.w, //
                c2.x, c2.y, c2.z, c2.w, //
                c3.x, c3.y, c3.z, c3.w,
            ],
        }
    }

    /// Column-major backing storage.
    #[inline]
    pub const fn as_array(&self) -> &[f32; 16] {
        &self.m
    }

    /// Returns `[column][row]` nested arrays.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [
            self.col(0).to_array(),
            self.col(1).to_array(),
            self.col(2).to_array(),
            self.col(3).to_array(),
        ]
    }

    /// Entry at column `c`, row `r`. Panics if either index is >= 4.
    #[inline]
    pub fn get(&self, c: usize, r: usize) -> f32 {
        assert!(c < 4 && r < 4, "Mat4 index ({c}, {r}) out of range");
        self.m[c * 4 + r]
    }

    #[inline]
    pub fn col(&self, c: usize) -> Vec4 {
        Vec4::new(self.get(c, 0), self.get(c, 1), self.get(c, 2), self.get(c, 3))
    }

    #[inline]
    pub fn row(&self, r: usize) -> Vec4 {
        Vec4::new(self.get(0, r), self.get(1, r), self.get(2, r), self.get(3, r))
    }

    /// Matrix product `a * b`.
    ///
    /// `result[c][r] = sum_k a[k][r] * b[c][k]`. The product accumulates into a
    /// fresh buffer, so neither operand is read after being partially written.
    pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for c in 0..4 {
            for r in 0..4 {
                let mut acc = 0.0f32;
                for k in 0..4 {
                    acc += a.m[k * 4 + r] * b.m[c * 4 + k];
                }
                out[c * 4 + r] = acc;
            }
        }
        Mat4 { m: out }
    }

    /// Returns `self * Rz(angle)`, a rotation about +Z by `angle` radians.
    ///
    /// Any finite angle is accepted; callers typically pass elapsed seconds.
    pub fn rotate_z(self, angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let rz = Mat4::from_cols_array([
            c, s, 0.0, 0.0, //
            -s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        Mat4::multiply(self, rz)
    }

    /// OpenGL-style orthographic projection of the box
    /// `[left, right] x [bottom, top] x [near, far]` onto the unit cube.
    ///
    /// No validation: equal bounds on an axis divide by zero and the result
    /// carries infinite or NaN entries. Use [`Mat4::try_orthographic`] when the
    /// bounds come from something that can collapse (e.g. a minimized window).
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut m = [0.0f32; 16];

        m[0] = 2.0 / (right - left);
        m[5] = 2.0 / (top - bottom);
        m[10] = -2.0 / (far - near);

        m[12] = -(right + left) / (right - left);
        m[13] = -(top + bottom) / (top - bottom);
        m[14] = -(far + near) / (far - near);
        m[15] = 1.0;

        Mat4 { m }
    }

    /// Checked [`Mat4::orthographic`].
    ///
    /// Fails when any bound is non-finite or a pair of bounds coincides.
    pub fn try_orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Mat4, OrthoError> {
        check_span(OrthoAxis::X, left, right)?;
        check_span(OrthoAxis::Y, bottom, top)?;
        check_span(OrthoAxis::Z, near, far)?;
        Ok(Mat4::orthographic(left, right, bottom, top, near, far))
    }

    /// Applies the matrix to a column vector.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        self.col(0) * v.x + self.col(1) * v.y + self.col(2) * v.z + self.col(3) * v.w
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }

    /// Element-wise comparison with absolute tolerance `eps`.
    pub fn abs_diff_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

fn check_span(axis: OrthoAxis, min: f32, max: f32) -> Result<(), OrthoError> {
    if !min.is_finite() || !max.is_finite() || min == max {
        return Err(OrthoError { axis, min, max });
    }
    Ok(())
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::multiply(self, rhs)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.transform(rhs)
    }
}

/// `(column, row)` indexing.
impl Index<(usize, usize)> for Mat4 {
    type Output = f32;
    #[inline]
    fn index(&self, (c, r): (usize, usize)) -> &f32 {
        assert!(c < 4 && r < 4, "Mat4 index ({c}, {r}) out of range");
        &self.m[c * 4 + r]
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(cols: [[f32; 4]; 4]) -> Self {
        Mat4::from_cols(
            Vec4::from_array(cols[0]),
            Vec4::from_array(cols[1]),
            Vec4::from_array(cols[2]),
            Vec4::from_array(cols[3]),
        )
    }
}

impl fmt::Debug for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..4).map(|c| self.col(c).to_array()))
            .finish()
    }
}

/// Axis of an orthographic view volume.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OrthoAxis {
    X,
    Y,
    Z,
}

/// Rejected orthographic bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoError {
    pub axis: OrthoAxis,
    pub min: f32,
    pub max: f32,
}

impl fmt::Display for OrthoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "degenerate orthographic bounds on {:?} axis: {} .. {}",
            self.axis, self.min, self.max
        )
    }
}

impl std::error::Error for OrthoError {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    fn sample_a() -> Mat4 {
        Mat4::from_cols_array([
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ])
    }

    fn sample_b() -> Mat4 {
        Mat4::from_cols_array([
            0.5, -1.0, 0.0, 2.0, //
            1.5, 0.25, -3.0, 0.0, //
            -2.0, 1.0, 1.0, 0.5, //
            0.0, 4.0, -0.5, 1.0,
        ])
    }

    fn sample_c() -> Mat4 {
        Mat4::identity().rotate_z(0.7) * Mat4::orthographic(-3.0, 1.0, -2.0, 5.0, 0.5, 10.0)
    }

    // ── identity / multiply ───────────────────────────────────────────────

    #[test]
    fn identity_has_ones_on_diagonal() {
        let m = Mat4::identity();
        for c in 0..4 {
            for r in 0..4 {
                assert_eq!(m[(c, r)], if c == r { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn identity_is_two_sided() {
        for m in [sample_a(), sample_b(), sample_c()] {
            assert_eq!(Mat4::multiply(Mat4::identity(), m), m);
            assert_eq!(Mat4::multiply(m, Mat4::identity()), m);
        }
    }

    #[test]
    fn multiply_uses_column_major_convention() {
        // Translation by (1, 2, 3) followed by a point at the origin.
        let t = Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(1.0, 2.0, 3.0, 1.0),
        );
        let scale = Mat4::orthographic(-2.0, 2.0, -2.0, 2.0, 2.0, -2.0);

        // scale * t translates first, then scales.
        let p = (scale * t) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(0.5, 1.0, 1.5, 1.0));
    }

    #[test]
    fn multiply_matches_hand_computed_entry() {
        let a = sample_a();
        let b = sample_b();
        let p = a * b;
        // column 1, row 2: sum_k a[k][2] * b[1][k]
        let expected = 3.0 * 1.5 + 7.0 * 0.25 + 11.0 * -3.0 + 15.0 * 0.0;
        assert_eq!(p[(1, 2)], expected);
        assert_eq!(p.get(1, 2), a.row(2).dot(b.col(1)));
    }

    #[test]
    fn multiply_is_associative() {
        let (a, b, c) = (sample_a(), sample_b(), sample_c());
        let left = (a * b) * c;
        let right = a * (b * c);
        assert!(left.abs_diff_eq(&right, 1e-3), "{left:?} != {right:?}");
    }

    #[test]
    fn multiply_with_itself_does_not_corrupt() {
        let a = sample_b();
        let sq = a * a;
        let mut expected = [0.0f32; 16];
        for c in 0..4 {
            for r in 0..4 {
                expected[c * 4 + r] = a.row(r).dot(a.col(c));
            }
        }
        assert_eq!(sq, Mat4::from_cols_array(expected));
    }

    // ── rotate_z ──────────────────────────────────────────────────────────

    #[test]
    fn rotate_z_by_zero_is_identity() {
        assert_eq!(Mat4::identity().rotate_z(0.0), Mat4::identity());
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let m = Mat4::identity().rotate_z(FRAC_PI_2);
        let expected = Mat4::from([
            [0.0, 1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert!(m.abs_diff_eq(&expected, 1e-6), "{m:?}");
    }

    #[test]
    fn rotate_z_turns_x_axis_counter_clockwise() {
        let p = Mat4::identity().rotate_z(FRAC_PI_2) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_z_then_inverse_returns_original() {
        for m in [Mat4::identity(), sample_a(), sample_c()] {
            for angle in [0.3, -1.2, PI, 10.0, 1234.5] {
                let back = m.rotate_z(angle).rotate_z(-angle);
                assert!(back.abs_diff_eq(&m, 1e-3), "angle {angle}: {back:?} != {m:?}");
            }
        }
    }

    #[test]
    fn rotate_z_leaves_z_and_w_untouched() {
        let m = Mat4::identity().rotate_z(2.5);
        assert_eq!(m.col(2), Vec4::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(m.col(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    // ── orthographic ──────────────────────────────────────────────────────

    #[test]
    fn orthographic_unit_cube_is_identity() {
        let m = Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 1.0, -1.0);
        assert_eq!(m, Mat4::identity());
    }

    #[test]
    fn orthographic_wide_centered_box() {
        let m = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, -1.0);
        assert_eq!(m[(0, 0)], 0.5);
        assert_eq!(m[(1, 1)], 1.0);
        assert_eq!(m[(2, 2)], 1.0);
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(m[(3, 0)], 0.0);
        assert_eq!(m[(3, 1)], 0.0);
        assert_eq!(m[(3, 2)], 0.0);
    }

    #[test]
    fn orthographic_off_center_translates() {
        let m = Mat4::orthographic(0.0, 4.0, 0.0, 2.0, -1.0, 1.0);
        assert!((m[(0, 0)] - 0.5).abs() < EPS);
        assert!((m[(1, 1)] - 1.0).abs() < EPS);
        assert!((m[(2, 2)] + 1.0).abs() < EPS);
        assert!((m[(3, 0)] + 1.0).abs() < EPS);
        assert!((m[(3, 1)] + 1.0).abs() < EPS);
        assert!(m[(3, 2)].abs() < EPS);

        // Box corners land on the NDC cube corners.
        let lo = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let hi = m * Vec4::new(4.0, 2.0, 0.0, 1.0);
        assert!((lo.x + 1.0).abs() < EPS && (lo.y + 1.0).abs() < EPS);
        assert!((hi.x - 1.0).abs() < EPS && (hi.y - 1.0).abs() < EPS);
    }

    #[test]
    fn orthographic_degenerate_bounds_are_not_finite() {
        assert!(!Mat4::orthographic(1.0, 1.0, -1.0, 1.0, 1.0, -1.0).is_finite());
        assert!(!Mat4::orthographic(-1.0, 1.0, 0.0, 0.0, 1.0, -1.0).is_finite());
        assert!(!Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.5, 0.5).is_finite());
    }

    #[test]
    fn try_orthographic_reports_axis() {
        let err = Mat4::try_orthographic(1.0, 1.0, -1.0, 1.0, 1.0, -1.0).unwrap_err();
        assert_eq!(err.axis, OrthoAxis::X);

        let err = Mat4::try_orthographic(-1.0, 1.0, 3.0, 3.0, 1.0, -1.0).unwrap_err();
        assert_eq!(err.axis, OrthoAxis::Y);

        let err = Mat4::try_orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err.axis, OrthoAxis::Z);

        let err = Mat4::try_orthographic(f32::NAN, 1.0, -1.0, 1.0, 1.0, -1.0).unwrap_err();
        assert_eq!(err.axis, OrthoAxis::X);
        assert!(err.to_string().contains("X axis"));
    }

    #[test]
    fn try_orthographic_matches_unchecked() {
        let checked = Mat4::try_orthographic(-1.5, 1.5, -1.0, 1.0, 1.0, -1.0).unwrap();
        assert_eq!(checked, Mat4::orthographic(-1.5, 1.5, -1.0, 1.0, 1.0, -1.0));
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn bytes_are_column_major() {
        let m = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, -1.0);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&m));
        assert_eq!(floats.len(), 16);
        assert_eq!(floats, m.as_array());
        assert_eq!(std::mem::size_of::<Mat4>(), 64);
    }

    #[test]
    fn from_nested_arrays_is_columns() {
        let m = Mat4::from([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(m, sample_a());
        assert_eq!(m.col(1), Vec4::new(5.0, 6.0, 7.0, 8.0));
        assert_eq!(m.row(1), Vec4::new(2.0, 6.0, 10.0, 14.0));
        assert_eq!(m.to_cols_array_2d()[3], [13.0, 14.0, 15.0, 16.0]);
    }
}
