use num::Float;

/// Linear interpolation of the line through `(x1, y1)` and `(x2, y2)` evaluated at `x`.
///
/// Points sharing an x coordinate divide by zero and yield NaN or infinity.
pub fn lerp<F: Float>(y1: F, y2: F, x1: F, x2: F, x: F) -> F {
    let dx = x2 - x1;
    let dy = y2 - y1;

    y1 + (x - x1) * dy / dx
}

/// Clamps a degree into `[0, 1]`. NaN passes through untouched.
pub fn clamp01<F: Float>(value: F) -> F {
    if value < F::zero() {
        F::zero()
    } else if value > F::one() {
        F::one()
    } else {
        value
    }
}

/// Midpoint of two coordinates
pub(crate) fn midpoint<F: Float>(a: F, b: F) -> F {
    a + (b - a) / (F::one() + F::one())
}

#[test]
fn test_lerp() {
    assert_eq!(lerp(0., 0.5, 0., 1., 2.), 1.);
    assert_eq!(lerp(0., 0.5, 0., 1., 1.), 0.5);
    assert_eq!(lerp(0., 0.5, 0., 1., 0.5), 0.25);
    assert_eq!(lerp(0., 0.5, 0., 1., -10.), -5.);
    assert_eq!(lerp(3.0f32, 0., 2., 3., 2.5), 1.5);
}

#[test]
fn test_clamp01() {
    assert_eq!(clamp01(-0.5), 0.);
    assert_eq!(clamp01(0.25), 0.25);
    assert_eq!(clamp01(7.), 1.);
    assert_eq!(clamp01(f64::NEG_INFINITY), 0.);
    assert!(clamp01(f64::NAN).is_nan());
}

#[test]
fn test_midpoint() {
    assert_eq!(midpoint(0., 25.), 12.5);
    assert_eq!(midpoint(100., 75.), 87.5);
}
