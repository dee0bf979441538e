//! Stateless generation and multiplication of 4x4 matrices.
//!
//! All functions operate on row-major [`Matrix4`]s. Points are row vectors,
//! so the product `a · b` applies `a` first and `b` second.

use crate::matrix::Matrix4;

/// Creates the matrix for a rotation by `angle` radians about the x-axis.
///
/// ```text
/// 1  0  0  0
/// 0  c  s  0
/// 0 -s  c  0
/// 0  0  0  1
/// ```
#[inline]
pub fn rotation_x(angle: f64) -> Matrix4 {
    let mut m = Matrix4::zeros();
    write_rotation_x(angle, &mut m);
    m
}

/// Creates the matrix for a rotation by `angle` radians about the y-axis.
///
/// ```text
///  c  0 -s  0
///  0  1  0  0
///  s  0  c  0
///  0  0  0  1
/// ```
#[inline]
pub fn rotation_y(angle: f64) -> Matrix4 {
    let mut m = Matrix4::zeros();
    write_rotation_y(angle, &mut m);
    m
}

/// Creates the matrix for a rotation by `angle` radians about the z-axis.
///
/// ```text
///  c -s  0  0
///  s  c  0  0
///  0  0  1  0
///  0  0  0  1
/// ```
#[inline]
pub fn rotation_z(angle: f64) -> Matrix4 {
    let mut m = Matrix4::zeros();
    write_rotation_z(angle, &mut m);
    m
}

/// Overwrites `dst` with the [`rotation_x`] matrix for `angle`.
#[inline]
pub fn write_rotation_x(angle: f64, dst: &mut Matrix4) {
    let (s, c) = angle.sin_cos();
    *dst = Matrix4::from_row_major([
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, s, 0.0, //
        0.0, -s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
}

/// Overwrites `dst` with the [`rotation_y`] matrix for `angle`.
#[inline]
pub fn write_rotation_y(angle: f64, dst: &mut Matrix4) {
    let (s, c) = angle.sin_cos();
    *dst = Matrix4::from_row_major([
        c, 0.0, -s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
}

/// Overwrites `dst` with the [`rotation_z`] matrix for `angle`.
#[inline]
pub fn write_rotation_z(angle: f64, dst: &mut Matrix4) {
    let (s, c) = angle.sin_cos();
    *dst = Matrix4::from_row_major([
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
}

/// Computes the full matrix product `dst = a · b`.
///
/// Since `dst` is borrowed mutably, it can never alias `a` or `b`.
pub fn multiply(dst: &mut Matrix4, a: &Matrix4, b: &Matrix4) {
    let a = a.as_array();
    let b = b.as_array();
    let d = dst.as_mut_slice();

    d[0] = a[0] * b[0] + a[1] * b[4] + a[2] * b[8] + a[3] * b[12];
    d[1] = a[0] * b[1] + a[1] * b[5] + a[2] * b[9] + a[3] * b[13];
    d[2] = a[0] * b[2] + a[1] * b[6] + a[2] * b[10] + a[3] * b[14];
    d[3] = a[0] * b[3] + a[1] * b[7] + a[2] * b[11] + a[3] * b[15];

    d[4] = a[4] * b[0] + a[5] * b[4] + a[6] * b[8] + a[7] * b[12];
    d[5] = a[4] * b[1] + a[5] * b[5] + a[6] * b[9] + a[7] * b[13];
    d[6] = a[4] * b[2] + a[5] * b[6] + a[6] * b[10] + a[7] * b[14];
    d[7] = a[4] * b[3] + a[5] * b[7] + a[6] * b[11] + a[7] * b[15];

    d[8] = a[8] * b[0] + a[9] * b[4] + a[10] * b[8] + a[11] * b[12];
    d[9] = a[8] * b[1] + a[9] * b[5] + a[10] * b[9] + a[11] * b[13];
    d[10] = a[8] * b[2] + a[9] * b[6] + a[10] * b[10] + a[11] * b[14];
    d[11] = a[8] * b[3] + a[9] * b[7] + a[10] * b[11] + a[11] * b[15];

    d[12] = a[12] * b[0] + a[13] * b[4] + a[14] * b[8] + a[15] * b[12];
    d[13] = a[12] * b[1] + a[13] * b[5] + a[14] * b[9] + a[15] * b[13];
    d[14] = a[12] * b[2] + a[13] * b[6] + a[14] * b[10] + a[15] * b[14];
    d[15] = a[12] * b[3] + a[13] * b[7] + a[14] * b[11] + a[15] * b[15];
}

/// Computes the matrix product `dst = a · b` for two affine matrices,
/// skipping every term that involves the projective column. Column 3 of `dst`
/// is set to `[0, 0, 0, 1]`.
///
/// The result equals that of [`multiply`] as long as both `a` and `b` are
/// affine (see [`Matrix4::is_affine`]). For other inputs the result is
/// meaningless. This is only checked in debug builds.
pub fn multiply_affine(dst: &mut Matrix4, a: &Matrix4, b: &Matrix4) {
    debug_assert!(
        a.is_affine() && b.is_affine(),
        "affine multiplication of matrix with projective terms"
    );

    let a = a.as_array();
    let b = b.as_array();
    let d = dst.as_mut_slice();

    d[0] = a[0] * b[0] + a[1] * b[4] + a[2] * b[8];
    d[1] = a[0] * b[1] + a[1] * b[5] + a[2] * b[9];
    d[2] = a[0] * b[2] + a[1] * b[6] + a[2] * b[10];
    d[3] = 0.0;

    d[4] = a[4] * b[0] + a[5] * b[4] + a[6] * b[8];
    d[5] = a[4] * b[1] + a[5] * b[5] + a[6] * b[9];
    d[6] = a[4] * b[2] + a[5] * b[6] + a[6] * b[10];
    d[7] = 0.0;

    d[8] = a[8] * b[0] + a[9] * b[4] + a[10] * b[8];
    d[9] = a[8] * b[1] + a[9] * b[5] + a[10] * b[9];
    d[10] = a[8] * b[2] + a[9] * b[6] + a[10] * b[10];
    d[11] = 0.0;

    d[12] = a[12] * b[0] + a[13] * b[4] + a[14] * b[8] + b[12];
    d[13] = a[12] * b[1] + a[13] * b[5] + a[14] * b[9] + b[13];
    d[14] = a[12] * b[2] + a[13] * b[6] + a[14] * b[10] + b[14];
    d[15] = 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-12;

    fn reference_product(a: &Matrix4, b: &Matrix4) -> Matrix4 {
        let mut product = Matrix4::zeros();
        for row in 0..4 {
            for col in 0..4 {
                *product.element_mut(row, col) =
                    (0..4).map(|k| a.element(row, k) * b.element(k, col)).sum();
            }
        }
        product
    }

    fn determinant_3x3(m: &Matrix4) -> f64 {
        let [[a, b, c], [d, e, f], [g, h, i]] = m.rotation_block();
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    prop_compose! {
        fn affine_matrix_strategy()(
            block in prop::array::uniform9(-10.0..10.0_f64),
            translation in prop::array::uniform3(-1e3..1e3_f64),
        ) -> Matrix4 {
            Matrix4::from_rows([
                [block[0], block[1], block[2], 0.0],
                [block[3], block[4], block[5], 0.0],
                [block[6], block[7], block[8], 0.0],
                [translation[0], translation[1], translation[2], 1.0],
            ])
        }
    }

    prop_compose! {
        fn general_matrix_strategy()(
            elements in prop::array::uniform16(-10.0..10.0_f64),
        ) -> Matrix4 {
            Matrix4::from_row_major(elements)
        }
    }

    #[test]
    fn rotation_about_x_places_sines_correctly() {
        let angle: f64 = 0.3;
        let (s, c) = angle.sin_cos();
        let m = rotation_x(angle);
        assert_eq!(m.element(0, 0), 1.0);
        assert_eq!(m.element(1, 1), c);
        assert_eq!(m.element(2, 2), c);
        assert_eq!(m.element(1, 2), s);
        assert_eq!(m.element(2, 1), -s);
        assert_eq!(m.element(3, 3), 1.0);
    }

    #[test]
    fn rotation_about_y_places_sines_correctly() {
        let angle: f64 = 0.3;
        let (s, c) = angle.sin_cos();
        let m = rotation_y(angle);
        assert_eq!(m.element(1, 1), 1.0);
        assert_eq!(m.element(0, 0), c);
        assert_eq!(m.element(2, 2), c);
        assert_eq!(m.element(2, 0), s);
        assert_eq!(m.element(0, 2), -s);
        assert_eq!(m.element(3, 3), 1.0);
    }

    #[test]
    fn rotation_about_z_places_sines_correctly() {
        let angle: f64 = 0.3;
        let (s, c) = angle.sin_cos();
        let m = rotation_z(angle);
        assert_eq!(m.element(2, 2), 1.0);
        assert_eq!(m.element(0, 0), c);
        assert_eq!(m.element(1, 1), c);
        assert_eq!(m.element(1, 0), s);
        assert_eq!(m.element(0, 1), -s);
        assert_eq!(m.element(3, 3), 1.0);
    }

    #[test]
    fn zero_rotations_give_identity() {
        assert_eq!(rotation_x(0.0), Matrix4::identity());
        assert_eq!(rotation_y(0.0), Matrix4::identity());
        assert_eq!(rotation_z(0.0), Matrix4::identity());
    }

    #[test]
    fn rotation_generators_are_affine() {
        for angle in [-2.0, 0.5, FRAC_PI_2, PI] {
            assert!(rotation_x(angle).is_affine());
            assert!(rotation_y(angle).is_affine());
            assert!(rotation_z(angle).is_affine());
        }
    }

    #[test]
    fn writing_rotation_overwrites_previous_contents() {
        let mut m = Matrix4::from_row_major([9.0; 16]);
        write_rotation_y(1.2, &mut m);
        assert_eq!(m, rotation_y(1.2));
    }

    #[test]
    fn consecutive_z_rotations_add_angles() {
        let (a, b) = (0.7, -2.3);
        let mut product = Matrix4::zeros();
        multiply(&mut product, &rotation_z(a), &rotation_z(b));
        assert_abs_diff_eq!(product, rotation_z(a + b), epsilon = EPSILON);
    }

    #[test]
    fn multiply_is_row_by_column_product() {
        let mut zx = Matrix4::zeros();
        multiply(&mut zx, &rotation_z(FRAC_PI_2), &rotation_x(FRAC_PI_2));
        let mut xz = Matrix4::zeros();
        multiply(&mut xz, &rotation_x(FRAC_PI_2), &rotation_z(FRAC_PI_2));
        assert!(!abs_diff_eq!(zx, xz, epsilon = 1e-6));
        assert_abs_diff_eq!(
            zx,
            reference_product(&rotation_z(FRAC_PI_2), &rotation_x(FRAC_PI_2))
        );
    }

    #[test]
    fn affine_multiply_forces_unit_projective_column() {
        let mut product = Matrix4::from_row_major([5.0; 16]);
        multiply_affine(&mut product, &rotation_x(0.4), &rotation_y(-0.9));
        assert!(product.is_affine());
    }

    #[test]
    fn affine_multiply_composes_translations() {
        let mut a = Matrix4::identity();
        a[12] = 1.0;
        a[13] = 2.0;
        let b = rotation_z(FRAC_PI_2);
        let mut product = Matrix4::zeros();
        multiply_affine(&mut product, &a, &b);
        // Translation (1, 2, 0) rotated by b.
        assert_abs_diff_eq!(product.element(3, 0), 2.0, epsilon = EPSILON);
        assert_abs_diff_eq!(product.element(3, 1), -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(product.element(3, 2), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn rotation_sequences_stay_orthonormal() {
        let angles = (-16..=16).map(|i| f64::from(i) * PI / 4.0 + 0.1);
        let mut m = Matrix4::identity();
        for (i, angle) in angles.enumerate() {
            let rotation = match i % 3 {
                0 => rotation_x(angle),
                1 => rotation_y(angle),
                _ => rotation_z(angle),
            };
            let mut product = Matrix4::zeros();
            multiply(&mut product, &m, &rotation);
            m = product;

            assert_abs_diff_eq!(determinant_3x3(&m), 1.0, epsilon = 1e-9);
            let block = m.rotation_block();
            for r in 0..3 {
                let norm_sq: f64 = block[r].iter().map(|v| v * v).sum();
                assert_abs_diff_eq!(norm_sq, 1.0, epsilon = 1e-9);
                let col_norm_sq: f64 = (0..3).map(|k| block[k][r] * block[k][r]).sum();
                assert_abs_diff_eq!(col_norm_sq, 1.0, epsilon = 1e-9);
            }
        }
    }

    proptest! {
        #[test]
        fn multiply_matches_reference_product(
            a in general_matrix_strategy(),
            b in general_matrix_strategy(),
        ) {
            let mut product = Matrix4::zeros();
            multiply(&mut product, &a, &b);
            prop_assert!(abs_diff_eq!(product, reference_product(&a, &b), epsilon = 1e-9));
        }
    }

    proptest! {
        #[test]
        fn affine_multiply_matches_full_multiply(
            a in affine_matrix_strategy(),
            b in affine_matrix_strategy(),
        ) {
            let mut full = Matrix4::zeros();
            multiply(&mut full, &a, &b);
            let mut affine = Matrix4::zeros();
            multiply_affine(&mut affine, &a, &b);
            prop_assert_eq!(affine, full);
        }
    }

    proptest! {
        #[test]
        fn rotation_generator_blocks_have_unit_determinant(angle in -4.0 * PI..4.0 * PI) {
            for m in [rotation_x(angle), rotation_y(angle), rotation_z(angle)] {
                prop_assert!(abs_diff_eq!(determinant_3x3(&m), 1.0, epsilon = 1e-12));
            }
        }
    }
}
