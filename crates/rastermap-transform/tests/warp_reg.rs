use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use rastermap_image::{ImageBuf, ImageSpec, PixelFormat, Roi, WrapMode};
use rastermap_transform::{rotate, warp, M33};

fn smooth(w: i32, h: i32) -> ImageBuf {
    let data = (0..w * h)
        .map(|i| {
            let (x, y) = ((i % w) as f32, (i / w) as f32);
            0.5 + 0.25 * (x * 0.4).sin() + 0.25 * (y * 0.3).cos()
        })
        .collect();
    ImageBuf::from_data(ImageSpec::new(w, h, 1, PixelFormat::F32), data).unwrap()
}

#[test]
fn identity_warp_is_exact_for_wide_filters() {
    let src = smooth(8, 8);
    for name in ["triangle", "blackman-harris", "lanczos3"] {
        let dst = warp(
            &src,
            &M33::IDENTITY,
            name,
            0.0,
            false,
            WrapMode::Black,
            Roi::UNDEFINED,
            0,
        );
        assert!(!dst.has_error(), "{name}");
        for y in 2..6 {
            for x in 2..6 {
                let got = dst.getchannel(x, y, 0);
                let want = src.getchannel(x, y, 0);
                assert!(
                    (got - want).abs() < 1e-5,
                    "{name} at ({x},{y}): {got} vs {want}"
                );
            }
        }
    }
}

#[test]
fn constant_source_survives_rotation_in_the_interior() {
    let src = ImageBuf::from_data(
        ImageSpec::new(16, 16, 1, PixelFormat::F32),
        vec![0.6f32; 256],
    )
    .unwrap();
    let dst = rotate(&src, 0.4, None, "lanczos3", 0.0, false, Roi::UNDEFINED, 0);
    assert!(!dst.has_error());
    // far enough from the window edge that no black wraps into the filter
    for y in 6..10 {
        for x in 6..10 {
            assert!((dst.getchannel(x, y, 0) - 0.6).abs() < 1e-4);
        }
    }
}

#[test]
fn quarter_turn_of_solid_rgba_square_is_exact() {
    // an 8x8 solid red square maps onto itself under a 90 degree turn
    let mut data = Vec::with_capacity(8 * 8 * 4);
    for _ in 0..64 {
        data.extend_from_slice(&[1.0f32, 0.0, 0.0, 1.0]);
    }
    let src = ImageBuf::from_data(ImageSpec::new(8, 8, 4, PixelFormat::F32), data).unwrap();
    let dst = rotate(&src, FRAC_PI_2, None, "lanczos3", 0.0, false, Roi::UNDEFINED, 0);
    assert!(!dst.has_error());
    for y in 0..8 {
        for x in 0..8 {
            assert!((dst.getchannel(x, y, 0) - 1.0).abs() < 1e-4);
            assert!(dst.getchannel(x, y, 1).abs() < 1e-4);
            assert!((dst.getchannel(x, y, 3) - 1.0).abs() < 1e-4);
        }
    }
}

#[test]
fn eighth_turn_blacks_out_the_corners() {
    let data = vec![1.0f32; 8 * 8];
    let src = ImageBuf::from_data(ImageSpec::new(8, 8, 1, PixelFormat::F32), data).unwrap();
    let dst = rotate(&src, FRAC_PI_4, None, "lanczos3", 0.0, false, Roi::UNDEFINED, 0);
    assert!(!dst.has_error());
    // the rotated square no longer covers the window corners; a little
    // lanczos ringing against the black wrap is expected
    assert!(dst.getchannel(0, 0, 0).abs() < 0.1);
    assert!(dst.getchannel(7, 7, 0).abs() < 0.1);
    // the center is untouched
    assert!((dst.getchannel(4, 4, 0) - 1.0).abs() < 1e-3);
}

#[test]
fn rotate_roundtrip_recovers_the_interior() {
    let src = smooth(16, 16);
    let once = rotate(&src, 0.3, None, "lanczos3", 0.0, true, Roi::UNDEFINED, 0);
    assert!(!once.has_error());
    let back = rotate(&once, -0.3, None, "lanczos3", 0.0, true, Roi::UNDEFINED, 0);
    assert!(!back.has_error());

    let mut sum_sq = 0.0f64;
    let mut n = 0usize;
    for y in 4..12 {
        for x in 4..12 {
            let d = (back.getchannel(x, y, 0) - src.getchannel(x, y, 0)) as f64;
            sum_sq += d * d;
            n += 1;
        }
    }
    let rms = (sum_sq / n as f64).sqrt();
    assert!(rms < 0.02, "rms {rms}");
}

#[test]
fn projective_matrix_varies_the_footprint_without_failing() {
    // a real perspective: the jacobian changes across the image
    let src = smooth(16, 16);
    let m = M33([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let mut persp = m;
    persp.0[2] = 0.01;
    let dst = warp(
        &src,
        &persp,
        "lanczos3",
        0.0,
        false,
        WrapMode::Clamp,
        Roi::UNDEFINED,
        0,
    );
    assert!(!dst.has_error());
    // values stay within the source's range plus a little filter overshoot
    for y in 0..16 {
        for x in 0..16 {
            let v = dst.getchannel(x, y, 0);
            assert!((-0.05..=1.05).contains(&v), "({x},{y}) = {v}");
        }
    }
}
