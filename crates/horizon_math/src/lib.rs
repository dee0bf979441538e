//! Homogeneous 4x4 transformation matrices for composing instrument scenes.

pub mod matrix;
pub mod ops;
pub mod quaternion;
pub mod transform;

pub use matrix::Matrix4;
pub use transform::{Coordinate, TransformMatrix};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    #[error("Quaternion vector part has squared magnitude {squared_magnitude} > 1")]
    QuaternionMagnitude { squared_magnitude: f64 },

    #[error("Quaternion must have 3 or 4 components, got {count}")]
    QuaternionComponentCount { count: usize },
}
