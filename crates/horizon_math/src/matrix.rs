//! Matrices.

use crate::ops;
use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use std::{
    fmt,
    ops::{Index, IndexMut, Mul},
};

/// A 4x4 homogeneous matrix of `f64` stored in row-major order.
///
/// The element at row `r` and column `c` lives at flat index `4 * r + c`.
/// Points are treated as row vectors, so row 3 (indices 12 to 15) holds the
/// translation and the homogeneous term, while column 3 (indices 3, 7, 11 and
/// 15) holds the projective terms. For an affine matrix the projective
/// column is `[0, 0, 0, 1]`.
///
/// The matrix is a plain array of 16 contiguous values, so it can be
/// reinterpreted as a byte slice or loaded into SIMD registers directly.
#[repr(transparent)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct Matrix4 {
    elements: [f64; 16],
}

impl Matrix4 {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::from_row_major([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::from_row_major([0.0; 16])
    }

    /// Creates a matrix from the given elements in row-major order.
    #[inline]
    pub const fn from_row_major(elements: [f64; 16]) -> Self {
        Self { elements }
    }

    /// Creates a matrix from single-precision elements in row-major order,
    /// widening each element to `f64`.
    #[inline]
    pub fn from_row_major_f32(elements: [f32; 16]) -> Self {
        Self::from_row_major(elements.map(f64::from))
    }

    /// Creates a matrix with the given rows.
    #[inline]
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        Self::from_row_major([
            r0[0], r0[1], r0[2], r0[3], //
            r1[0], r1[1], r1[2], r1[3], //
            r2[0], r2[1], r2[2], r2[3], //
            r3[0], r3[1], r3[2], r3[3],
        ])
    }

    /// Returns the element at row `row` and column `col`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element(&self, row: usize, col: usize) -> f64 {
        self.elements[flat_index(row, col)]
    }

    /// Returns a mutable reference to the element at row `row` and column
    /// `col`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.elements[flat_index(row, col)]
    }

    /// The elements in row-major order.
    #[inline]
    pub const fn as_array(&self) -> &[f64; 16] {
        &self.elements
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.elements
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.elements
    }

    /// Returns row `row` of the matrix.
    ///
    /// # Panics
    /// If `row` is 4 or larger.
    #[inline]
    pub fn row(&self, row: usize) -> [f64; 4] {
        let start = flat_index(row, 0);
        [
            self.elements[start],
            self.elements[start + 1],
            self.elements[start + 2],
            self.elements[start + 3],
        ]
    }

    /// Returns the four rows of the matrix.
    #[inline]
    pub const fn to_rows(&self) -> [[f64; 4]; 4] {
        let [
            m00, m01, m02, m03, //
            m10, m11, m12, m13, //
            m20, m21, m22, m23, //
            m30, m31, m32, m33,
        ] = self.elements;
        [
            [m00, m01, m02, m03],
            [m10, m11, m12, m13],
            [m20, m21, m22, m23],
            [m30, m31, m32, m33],
        ]
    }

    /// The upper-left 3x3 block, holding the rotation (and any scaling or
    /// shearing) part of the transform, as rows.
    #[inline]
    pub fn rotation_block(&self) -> [[f64; 3]; 3] {
        let m = &self.elements;
        [
            [m[0], m[1], m[2]],
            [m[4], m[5], m[6]],
            [m[8], m[9], m[10]],
        ]
    }

    /// The translation stored in row 3.
    #[inline]
    pub fn translation(&self) -> [f64; 3] {
        [self.elements[12], self.elements[13], self.elements[14]]
    }

    /// Whether the matrix has no projective terms, meaning that column 3 is
    /// exactly `[0, 0, 0, 1]`.
    #[inline]
    pub fn is_affine(&self) -> bool {
        let m = &self.elements;
        m[3] == 0.0 && m[7] == 0.0 && m[11] == 0.0 && m[15] == 1.0
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 16]> for Matrix4 {
    fn from(elements: [f64; 16]) -> Self {
        Self::from_row_major(elements)
    }
}

impl From<[f32; 16]> for Matrix4 {
    fn from(elements: [f32; 16]) -> Self {
        Self::from_row_major_f32(elements)
    }
}

impl From<Matrix4> for [f64; 16] {
    fn from(matrix: Matrix4) -> Self {
        matrix.elements
    }
}

impl Index<usize> for Matrix4 {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.elements[index]
    }
}

impl IndexMut<usize> for Matrix4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.elements[index]
    }
}

impl<'a> Mul<&'a Matrix4> for &'a Matrix4 {
    type Output = Matrix4;

    #[inline]
    fn mul(self, rhs: &'a Matrix4) -> Matrix4 {
        let mut product = Matrix4::zeros();
        ops::multiply(&mut product, self, rhs);
        product
    }
}

impl Mul<Matrix4> for &Matrix4 {
    type Output = Matrix4;

    #[inline]
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self * &rhs
    }
}

impl<'a> Mul<&'a Matrix4> for Matrix4 {
    type Output = Matrix4;

    #[inline]
    fn mul(self, rhs: &'a Matrix4) -> Matrix4 {
        &self * rhs
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    #[inline]
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        &self * &rhs
    }
}

impl AbsDiffEq for Matrix4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.elements
            .iter()
            .zip(&other.elements)
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix4 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.elements
            .iter()
            .zip(&other.elements)
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl fmt::Display for Matrix4 {
    /// Writes the matrix as four fixed-width rows with two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            if row > 0 {
                writeln!(f)?;
            }
            let [a, b, c, d] = self.row(row);
            write!(f, "  {a:5.2}  {b:5.2}  {c:5.2}  {d:5.2}")?;
        }
        Ok(())
    }
}

#[inline]
fn flat_index(row: usize, col: usize) -> usize {
    assert!(row < 4 && col < 4, "index out of bounds");
    4 * row + col
}
