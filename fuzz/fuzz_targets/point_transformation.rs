#![no_main]

use horizon_math::{Matrix4, TransformMatrix};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Matrix4, Vec<[f32; 3]>)| {
    let (matrix, points) = input;
    let transform = TransformMatrix::from_matrix(matrix);
    let src: Vec<f32> = points.into_iter().flatten().collect();

    let mut dst = vec![0.0; src.len()];
    transform.transform_points(&src, &mut dst);

    let mut in_place = src;
    transform.transform_points_in_place(&mut in_place);

    for (a, b) in dst.iter().zip(&in_place) {
        assert!(a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()));
    }
});
