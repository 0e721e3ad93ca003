#![allow(dead_code)]

use approx::assert_relative_eq;
use tesseroids::constants::Model;
use tesseroids::tesseroid::Tesseroid;

/// 0.1° × 0.1° × 1 km crustal block centered on (0, 0).
pub fn small_block() -> Model {
    vec![Tesseroid::new(-0.05, 0.05, -0.05, 0.05, 0.0, 1000.0, 2670.0).unwrap()]
}

/// 1° × 1° × 1 km block of density 1000 centered on (0, 0).
pub fn degree_block() -> Model {
    vec![Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, 1000.0, 1000.0).unwrap()]
}

pub fn assert_fields_close(actual: &[f64], expected: &[f64], max_relative: f64) {
    assert_eq!(actual.len(), expected.len(), "field lengths differ");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(a.is_finite(), "value {i} is not finite: {a}");
        assert_relative_eq!(*a, *e, max_relative = max_relative);
    }
}

pub fn relative_error(value: f64, reference: f64) -> f64 {
    ((value - reference) / reference).abs()
}
