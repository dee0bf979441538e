//! Transforms accumulated into a single matrix.

use crate::{Result, TransformError, matrix::Matrix4, ops, quaternion};
use std::fmt;

/// Log target for matrix dumps.
pub const DUMP_LOG_TARGET: &str = "horizon_math::dump";

/// A floating point type that point coordinates can be stored as.
///
/// Transformations are always computed in `f64`, and the result is converted
/// back to the storage type.
pub trait Coordinate: Copy {
    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;
}

/// A 4x4 transformation matrix that rotations can be accumulated into.
///
/// Points are transformed as row vectors, `p' = p · M`. Every rotation is
/// post-multiplied onto the current matrix, `M' = M · R`, so it is applied
/// after the already accumulated transform, about the fixed world axes.
///
/// Two matrix buffers are kept. A rotation reads the current buffer, writes
/// the product into the other one and then flips which of them is current,
/// so composing never allocates or copies a full matrix, and no element is
/// read after it has been overwritten.
///
/// The type is plain data. Mutation requires exclusive access, so sharing
/// an instance between threads for mutation needs external synchronization.
#[derive(Clone)]
pub struct TransformMatrix {
    buffers: [Matrix4; 2],
    current: usize,
}

impl TransformMatrix {
    /// Creates a transform holding the identity matrix.
    pub fn new() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    /// Creates a transform holding the given matrix.
    pub fn from_matrix(matrix: Matrix4) -> Self {
        Self {
            buffers: [matrix, Matrix4::zeros()],
            current: 0,
        }
    }

    /// Creates a transform holding the product `a · b`, meaning `a` followed
    /// by `b`.
    pub fn composed(a: &Matrix4, b: &Matrix4) -> Self {
        let mut transform = Self::new();
        ops::multiply(transform.matrix_mut(), a, b);
        transform
    }

    /// Discards the accumulated transform and sets the matrix to identity.
    pub fn reset(&mut self) {
        *self.matrix_mut() = Matrix4::identity();
    }

    /// Returns a reference to the current matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix4 {
        &self.buffers[self.current]
    }

    /// Returns a mutable reference to the live current matrix. Writes through
    /// the reference change the transform itself. Use [`Self::to_matrix`] for
    /// a detached copy.
    #[inline]
    pub fn matrix_mut(&mut self) -> &mut Matrix4 {
        &mut self.buffers[self.current]
    }

    /// Returns a copy of the current matrix that is unaffected by later
    /// changes to the transform.
    #[inline]
    pub fn to_matrix(&self) -> Matrix4 {
        *self.matrix()
    }

    /// Replaces the current matrix. Single-precision input is widened. The
    /// matrix is not validated.
    pub fn set_matrix(&mut self, matrix: impl Into<Matrix4>) {
        *self.matrix_mut() = matrix.into();
    }

    /// Post-multiplies the matrix by [`ops::rotation_x`], rotating by `angle`
    /// radians about the world x-axis.
    pub fn rotate_x(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        self.post_multiply(|rows| rows.map(|[x, y, z, w]| [x, y * c - z * s, y * s + z * c, w]));
    }

    /// Post-multiplies the matrix by [`ops::rotation_y`], rotating by `angle`
    /// radians about the world y-axis.
    pub fn rotate_y(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        self.post_multiply(|rows| rows.map(|[x, y, z, w]| [x * c + z * s, y, z * c - x * s, w]));
    }

    /// Post-multiplies the matrix by [`ops::rotation_z`], rotating by `angle`
    /// radians about the world z-axis.
    pub fn rotate_z(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        self.post_multiply(|rows| rows.map(|[x, y, z, w]| [x * c + y * s, y * c - x * s, z, w]));
    }

    /// Replaces the matrix with the rotation about x by `angle` radians.
    pub fn set_rotation_x(&mut self, angle: f64) {
        ops::write_rotation_x(angle, self.matrix_mut());
    }

    /// Replaces the matrix with the rotation about y by `angle` radians.
    pub fn set_rotation_y(&mut self, angle: f64) {
        ops::write_rotation_y(angle, self.matrix_mut());
    }

    /// Replaces the matrix with the rotation about z by `angle` radians.
    pub fn set_rotation_z(&mut self, angle: f64) {
        ops::write_rotation_z(angle, self.matrix_mut());
    }

    /// Replaces the whole matrix with the rotation described by the unit
    /// quaternion `(x, y, z, w)`, with no translation. See
    /// [`quaternion::rotation_from_quaternion`] for the convention.
    ///
    /// If `w` is [`None`] it is derived from the vector part as
    /// `sqrt(1 - (x² + y² + z²))`, which is never negative.
    ///
    /// # Errors
    /// Returns [`TransformError::QuaternionMagnitude`] if `w` must be derived
    /// and `x² + y² + z² > 1`. The matrix is left unchanged in that case.
    pub fn set_from_quaternion(&mut self, x: f64, y: f64, z: f64, w: Option<f64>) -> Result<()> {
        let w = match w {
            Some(w) => w,
            None => quaternion::derived_real_part(x, y, z)?,
        };
        quaternion::write_rotation_from_quaternion(x, y, z, w, self.matrix_mut());
        Ok(())
    }

    /// Like [`Self::set_from_quaternion`], but takes the components as a
    /// slice of either `[x, y, z]` or `[x, y, z, w]`.
    ///
    /// # Errors
    /// Returns [`TransformError::QuaternionComponentCount`] for any other
    /// slice length, and [`TransformError::QuaternionMagnitude`] as described
    /// for [`Self::set_from_quaternion`].
    pub fn set_from_quaternion_slice<T: Coordinate>(&mut self, components: &[T]) -> Result<()> {
        match *components {
            [x, y, z] => self.set_from_quaternion(x.to_f64(), y.to_f64(), z.to_f64(), None),
            [x, y, z, w] => {
                self.set_from_quaternion(x.to_f64(), y.to_f64(), z.to_f64(), Some(w.to_f64()))
            }
            _ => Err(TransformError::QuaternionComponentCount {
                count: components.len(),
            }),
        }
    }

    /// Transforms a single point.
    #[inline]
    pub fn transform_point(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let m = self.matrix().as_array();
        [
            x * m[0] + y * m[4] + z * m[8] + m[12],
            x * m[1] + y * m[5] + z * m[9] + m[13],
            x * m[2] + y * m[6] + z * m[10] + m[14],
        ]
    }

    /// Transforms the points stored as consecutive `x, y, z` triples in
    /// `src` and writes the results to the start of `dst`.
    ///
    /// # Panics
    /// If the length of `src` is not a multiple of 3, or if `dst` is shorter
    /// than `src`. Nothing is written in that case.
    pub fn transform_points<T: Coordinate>(&self, src: &[T], dst: &mut [T]) {
        assert_point_buffer(src);
        assert!(
            dst.len() >= src.len(),
            "destination buffer holds {} coordinates, source holds {}",
            dst.len(),
            src.len()
        );
        for (source, destination) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
            let transformed = self.transform_point([
                source[0].to_f64(),
                source[1].to_f64(),
                source[2].to_f64(),
            ]);
            for (coord, value) in destination.iter_mut().zip(transformed) {
                *coord = T::from_f64(value);
            }
        }
    }

    /// Transforms the points stored as consecutive `x, y, z` triples in
    /// `points`, overwriting them with the results.
    ///
    /// # Panics
    /// If the length of `points` is not a multiple of 3. Nothing is written
    /// in that case.
    pub fn transform_points_in_place<T: Coordinate>(&self, points: &mut [T]) {
        assert_point_buffer(points);
        for point in points.chunks_exact_mut(3) {
            let transformed =
                self.transform_point([point[0].to_f64(), point[1].to_f64(), point[2].to_f64()]);
            for (coord, value) in point.iter_mut().zip(transformed) {
                *coord = T::from_f64(value);
            }
        }
    }

    /// Logs the current matrix row by row at debug level under
    /// [`DUMP_LOG_TARGET`].
    pub fn dump(&self) {
        for line in self.matrix().to_string().lines() {
            log::debug!(target: DUMP_LOG_TARGET, "{line}");
        }
    }

    /// Writes the rows produced by `product` from the rows of the current
    /// matrix into the scratch buffer and makes it current. A rotation in
    /// the plane of two axes maps each row `[x, y, z, w]` independently.
    fn post_multiply(&mut self, product: impl FnOnce([[f64; 4]; 4]) -> [[f64; 4]; 4]) {
        let (m, t) = self.current_and_scratch();
        *t = Matrix4::from_rows(product(m.to_rows()));
        self.swap_buffers();
    }

    fn current_and_scratch(&mut self) -> (&Matrix4, &mut Matrix4) {
        let [first, second] = &mut self.buffers;
        if self.current == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        }
    }

    fn swap_buffers(&mut self) {
        self.current ^= 1;
    }
}

impl fmt::Debug for TransformMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformMatrix")
            .field("matrix", self.matrix())
            .finish()
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Matrix4> for TransformMatrix {
    fn from(matrix: Matrix4) -> Self {
        Self::from_matrix(matrix)
    }
}

impl Coordinate for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Coordinate for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

fn assert_point_buffer<T>(points: &[T]) {
    assert!(
        points.len() % 3 == 0,
        "point buffer length {} is not a multiple of 3",
        points.len()
    );
}
