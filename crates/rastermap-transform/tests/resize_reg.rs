use rastermap_filter::Filter2D;
use rastermap_image::{ImageBuf, ImageSpec, PixelFormat, Roi, WrapMode};
use rastermap_transform::{resize, resize_filter, resize_into, warp, M33};

fn ramp(w: i32, h: i32) -> ImageBuf {
    let data = (0..w * h).map(|i| (i % w + i / w) as f32 / 8.0).collect();
    ImageBuf::from_data(ImageSpec::new(w, h, 1, PixelFormat::F32), data).unwrap()
}

#[test]
fn identity_resize_is_exact_for_symmetric_filters() {
    let src = ramp(8, 8);
    for name in ["triangle", "blackman-harris", "lanczos3", "mitchell"] {
        let dst = resize(&src, name, 0.0, Roi::new(0, 8, 0, 8), 0);
        assert!(!dst.has_error(), "{name}: {:?}", dst.error());
        for y in 1..7 {
            for x in 1..7 {
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
fn constant_source_stays_constant_under_downsampling() {
    // weight tables normalize to one, so a flat image cannot drift
    let src = ImageBuf::from_data(
        ImageSpec::new(9, 7, 2, PixelFormat::F32),
        vec![0.75f32; 9 * 7 * 2],
    )
    .unwrap();
    for name in ["box", "blackman-harris", "lanczos3"] {
        let dst = resize(&src, name, 0.0, Roi::new(0, 5, 0, 3), 0);
        assert!(!dst.has_error());
        for y in 0..3 {
            for x in 0..5 {
                for c in 0..2 {
                    assert!(
                        (dst.getchannel(x, y, c) - 0.75).abs() < 1e-5,
                        "{name} ({x},{y},{c})"
                    );
                }
            }
        }
    }
}

struct ZeroFilter;

impl Filter2D for ZeroFilter {
    fn name(&self) -> &'static str {
        "zero"
    }
    fn width(&self) -> f32 {
        2.0
    }
    fn height(&self) -> f32 {
        2.0
    }
    fn separable(&self) -> bool {
        true
    }
    fn eval(&self, _x: f32, _y: f32) -> f32 {
        0.0
    }
    fn xfilt(&self, _x: f32) -> f32 {
        0.0
    }
    fn yfilt(&self, _y: f32) -> f32 {
        0.0
    }
}

#[test]
fn zero_weights_produce_exact_zeros() {
    let src = ImageBuf::from_data(
        ImageSpec::new(6, 6, 1, PixelFormat::F32),
        vec![1.0f32; 36],
    )
    .unwrap();
    let dst = resize_filter(&src, Some(&ZeroFilter), Roi::new(0, 3, 0, 3), 0);
    assert!(!dst.has_error());
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(dst.getchannel(x, y, 0), 0.0);
        }
    }
}

#[test]
fn integer_translation_commutes_with_resize() {
    let src = ramp(16, 16);

    // resize to half, then shift right by one pixel
    let half = resize(&src, "triangle", 0.0, Roi::new(0, 8, 0, 8), 0);
    assert!(!half.has_error());
    let a = warp(
        &half,
        &M33::translation(1.0, 0.0),
        "triangle",
        0.0,
        false,
        WrapMode::Black,
        Roi::UNDEFINED,
        0,
    );
    assert!(!a.has_error());

    // shift right by two source pixels, then resize to half
    let shifted = warp(
        &src,
        &M33::translation(2.0, 0.0),
        "triangle",
        0.0,
        false,
        WrapMode::Black,
        Roi::UNDEFINED,
        0,
    );
    assert!(!shifted.has_error());
    let b = resize(&shifted, "triangle", 0.0, Roi::new(0, 8, 0, 8), 0);
    assert!(!b.has_error());

    // compare where neither side touches shifted-in or clamped pixels
    for y in 1..7 {
        for x in 2..=6 {
            let va = a.getchannel(x, y, 0);
            let vb = b.getchannel(x, y, 0);
            assert!((va - vb).abs() < 1e-5, "({x},{y}): {va} vs {vb}");
        }
    }
}

#[test]
fn u8_roundtrip_through_the_format_table() {
    let src = ImageBuf::from_data(
        ImageSpec::new(8, 8, 3, PixelFormat::U8),
        vec![200u8; 8 * 8 * 3],
    )
    .unwrap();
    let mut dst = ImageBuf::uninitialized();
    assert!(resize_into(&mut dst, &src, "triangle", 0.0, Roi::new(0, 4, 0, 4), 0));
    assert_eq!(dst.spec().format, PixelFormat::U8);
    for c in 0..3 {
        assert_eq!(dst.as_slice::<u8>().unwrap()[c as usize], 200);
        assert!((dst.getchannel(2, 2, c) - 200.0 / 255.0).abs() < 1e-3);
    }
}

#[test]
fn resize_across_formats_converts_values() {
    // f32 source into a pre-allocated u16 destination
    let src = ImageBuf::from_data(
        ImageSpec::new(4, 4, 1, PixelFormat::F32),
        vec![0.5f32; 16],
    )
    .unwrap();
    let mut dst = ImageBuf::new(ImageSpec::new(2, 2, 1, PixelFormat::U16));
    assert!(resize_into(&mut dst, &src, "box", 0.0, Roi::UNDEFINED, 0));
    let px = dst.as_slice::<u16>().unwrap();
    assert!((px[0] as f32 / u16::MAX as f32 - 0.5).abs() < 1e-3);
}

#[test]
fn resize_respects_nthreads_hint() {
    let src = ramp(16, 16);
    let single = resize(&src, "lanczos3", 0.0, Roi::new(0, 8, 0, 8), 1);
    let pooled = resize(&src, "lanczos3", 0.0, Roi::new(0, 8, 0, 8), 4);
    assert!(!single.has_error() && !pooled.has_error());
    assert_eq!(
        single.as_slice::<f32>().unwrap(),
        pooled.as_slice::<f32>().unwrap()
    );
}
