use std::f32::consts::PI;

/// The ideal lowpass kernel `sin(pi x) / (pi x)`.
#[inline]
pub fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        let a = x * PI;
        a.sin() / a
    }
}

/// Sinc windowed by a wider sinc, zero outside `|x| < taps`.
#[inline]
pub fn lanczos(taps: f32, x: f32) -> f32 {
    if x.abs() < taps {
        sinc(x) * sinc(x / taps)
    } else {
        0.0
    }
}

/// The Mitchell-Netravali cubic family on `[-2, 2]`.
///
/// B=1/3, C=1/3 is the classic Mitchell filter; B=1, C=0 the cubic
/// B-spline; B=0, C=1/2 Catmull-Rom.
#[inline]
pub fn cubic_bc(b: f32, c: f32, x: f32) -> f32 {
    let a = x.abs();
    let k = if a < 1.0 {
        (12.0 - 9.0 * b - 6.0 * c) * a.powi(3)
            + (-18.0 + 12.0 * b + 6.0 * c) * a.powi(2)
            + (6.0 - 2.0 * b)
    } else if a < 2.0 {
        (-b - 6.0 * c) * a.powi(3)
            + (6.0 * b + 30.0 * c) * a.powi(2)
            + (-12.0 * b - 48.0 * c) * a
            + (8.0 * b + 24.0 * c)
    } else {
        0.0
    };
    k / 6.0
}

/// Truncated gaussian on `[-1, 1]` of the normalized coordinate.
#[inline]
pub fn gaussian(x: f32) -> f32 {
    if x.abs() < 1.0 {
        (-2.0 * x * x).exp()
    } else {
        0.0
    }
}

/// Narrower gaussian used by the "sharp-gaussian" filter.
#[inline]
pub fn sharp_gaussian(x: f32) -> f32 {
    if x.abs() < 1.0 {
        (-4.0 * x * x).exp()
    } else {
        0.0
    }
}

/// The minimum 4-term Blackman-Harris window, remapped so `x` spans
/// `[-1, 1]` across the support.
#[inline]
pub fn blackman_harris(x: f32) -> f32 {
    if x.abs() >= 1.0 {
        return 0.0;
    }
    // window phase: 0 at the left support edge, 2*pi at the right
    let t = PI * (x + 1.0);
    const A0: f32 = 0.35875;
    const A1: f32 = 0.48829;
    const A2: f32 = 0.14128;
    const A3: f32 = 0.01168;
    A0 - A1 * t.cos() + A2 * (2.0 * t).cos() - A3 * (3.0 * t).cos()
}
