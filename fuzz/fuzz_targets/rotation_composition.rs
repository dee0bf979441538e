#![no_main]

use arbitrary::Arbitrary;
use horizon_math::{Matrix4, TransformMatrix, ops};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Clone, Copy, Debug)]
enum Rotation {
    X(f64),
    Y(f64),
    Z(f64),
}

fuzz_target!(|rotations: Vec<Rotation>| {
    let mut transform = TransformMatrix::new();
    let mut expected = Matrix4::identity();

    for rotation in rotations {
        let (angle, generator) = match rotation {
            Rotation::X(angle) => (angle, ops::rotation_x(angle)),
            Rotation::Y(angle) => (angle, ops::rotation_y(angle)),
            Rotation::Z(angle) => (angle, ops::rotation_z(angle)),
        };
        if !angle.is_finite() {
            return;
        }
        match rotation {
            Rotation::X(_) => transform.rotate_x(angle),
            Rotation::Y(_) => transform.rotate_y(angle),
            Rotation::Z(_) => transform.rotate_z(angle),
        }
        let mut product = Matrix4::zeros();
        ops::multiply(&mut product, &expected, &generator);
        expected = product;

        assert!(transform.matrix().is_affine());
        let actual = transform.matrix().as_slice();
        for (a, b) in actual.iter().zip(expected.as_slice()) {
            assert!((a - b).abs() <= 1e-9);
        }
    }
});
