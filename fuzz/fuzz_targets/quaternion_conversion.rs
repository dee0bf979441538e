#![no_main]

use horizon_math::{TransformError, TransformMatrix};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|components: Vec<f64>| {
    let mut transform = TransformMatrix::new();
    let before = transform.to_matrix();

    match transform.set_from_quaternion_slice(&components) {
        Ok(()) => assert!(transform.matrix().is_affine()),
        Err(TransformError::QuaternionComponentCount { count }) => {
            assert!(count != 3 && count != 4);
            assert_eq!(transform.to_matrix(), before);
        }
        Err(TransformError::QuaternionMagnitude { squared_magnitude }) => {
            assert_eq!(components.len(), 3);
            assert!(squared_magnitude > 1.0);
            assert_eq!(transform.to_matrix(), before);
        }
    }
});
