//! Conversion of unit quaternions to rotation matrices.

use crate::{Result, TransformError, matrix::Matrix4};

/// Derives the real part `w` of a unit quaternion from its vector part as
/// `sqrt(1 - (x² + y² + z²))`.
///
/// The derived `w` is never negative, so only quaternions in the `w >= 0`
/// hemisphere can be described by their vector part alone.
///
/// # Errors
/// Returns [`TransformError::QuaternionMagnitude`] if `x² + y² + z² > 1`.
#[inline]
pub fn derived_real_part(x: f64, y: f64, z: f64) -> Result<f64> {
    let squared_magnitude = x * x + y * y + z * z;
    if squared_magnitude > 1.0 {
        return Err(TransformError::QuaternionMagnitude { squared_magnitude });
    }
    Ok((1.0 - squared_magnitude).sqrt())
}

/// Creates the affine matrix holding the rotation described by the unit
/// quaternion `(x, y, z, w)` and no translation.
///
/// For a quaternion describing a rotation by `θ` about the z-axis the result
/// equals [`rotation_z(θ)`](crate::ops::rotation_z). The x- and y-axis
/// generators turn the other way, so [`rotation_x(θ)`](crate::ops::rotation_x)
/// corresponds to the quaternion `(-sin(θ/2), 0, 0, cos(θ/2))`, and likewise
/// for y.
#[inline]
pub fn rotation_from_quaternion(x: f64, y: f64, z: f64, w: f64) -> Matrix4 {
    let mut m = Matrix4::zeros();
    write_rotation_from_quaternion(x, y, z, w, &mut m);
    m
}

/// Overwrites all of `dst` with [`rotation_from_quaternion`].
pub fn write_rotation_from_quaternion(x: f64, y: f64, z: f64, w: f64, dst: &mut Matrix4) {
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (xw, yw, zw) = (x * w, y * w, z * w);

    *dst = Matrix4::from_row_major([
        1.0 - 2.0 * yy - 2.0 * zz,
        2.0 * xy - 2.0 * zw,
        2.0 * xz + 2.0 * yw,
        0.0,
        2.0 * xy + 2.0 * zw,
        1.0 - 2.0 * xx - 2.0 * zz,
        2.0 * yz - 2.0 * xw,
        0.0,
        2.0 * xz - 2.0 * yw,
        2.0 * yz + 2.0 * xw,
        1.0 - 2.0 * xx - 2.0 * yy,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]);
}
