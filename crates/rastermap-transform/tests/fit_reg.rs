use rastermap_image::{ImageBuf, ImageSpec, PixelFormat, Roi};
use rastermap_transform::fit;

fn solid(w: i32, h: i32, val: f32) -> ImageBuf {
    ImageBuf::from_data(
        ImageSpec::new(w, h, 1, PixelFormat::F32),
        vec![val; (w * h) as usize],
    )
    .unwrap()
}

// Scan the column/row extents where the fitted content lives.
fn content_bounds(img: &ImageBuf, threshold: f32) -> (i32, i32, i32, i32) {
    let roi = img.roi();
    let (mut x0, mut x1) = (i32::MAX, i32::MIN);
    let (mut y0, mut y1) = (i32::MAX, i32::MIN);
    for y in roi.ybegin..roi.yend {
        for x in roi.xbegin..roi.xend {
            if img.getchannel(x, y, 0) > threshold {
                x0 = x0.min(x);
                x1 = x1.max(x + 1);
                y0 = y0.min(y);
                y1 = y1.max(y + 1);
            }
        }
    }
    (x0, x1, y0, y1)
}

#[test]
fn exact_fit_preserves_aspect_and_centers() {
    // 100x50 into a 200x200 rect: content should span the full width and
    // occupy a 2:1 rectangle centered vertically. A unit-width box filter
    // keeps the scaled edge crisp so the rectangle is measurable to the
    // pixel.
    let src = solid(100, 50, 1.0);
    let dst = fit(&src, "box", 1.0, "letterbox", true, Roi::new(0, 200, 0, 200), 0);
    assert!(!dst.has_error(), "{:?}", dst.error());

    let (x0, x1, y0, y1) = content_bounds(&dst, 0.5);
    assert_eq!((x0, x1), (0, 200));
    assert_eq!((y0, y1), (50, 150));
    let aspect = (x1 - x0) as f32 / (y1 - y0) as f32;
    let srcaspect = 100.0 / 50.0;
    assert!((aspect - srcaspect).abs() < 1e-6);
    // centering: padding above equals padding below
    assert_eq!(y0 - 0, 200 - y1);
}

#[test]
fn exact_fit_avoids_edge_ringing_on_downscale() {
    // 4x4 ones scaled by one half under lanczos3: edge clamping keeps
    // the interior flat instead of ringing against the black padding
    let src = solid(4, 4, 1.0);
    let dst = fit(&src, "lanczos3", 0.0, "letterbox", true, Roi::new(0, 2, 0, 2), 0);
    assert!(!dst.has_error());
    for y in 0..2 {
        for x in 0..2 {
            let v = dst.getchannel(x, y, 0);
            assert!((v - 1.0).abs() < 1e-3, "({x},{y}) = {v}");
        }
    }
}

#[test]
fn width_mode_fills_horizontally() {
    let src = solid(100, 50, 1.0);
    let dst = fit(&src, "triangle", 0.0, "width", false, Roi::new(0, 200, 0, 200), 0);
    assert!(!dst.has_error());
    let spec = dst.spec();
    assert_eq!((spec.width, spec.height), (200, 100));
    assert_eq!((spec.x, spec.y), (0, 50));
}

#[test]
fn height_mode_fills_vertically() {
    // a tall source into a square rect under "height" pads horizontally
    let src = solid(50, 100, 1.0);
    let dst = fit(&src, "triangle", 0.0, "height", false, Roi::new(0, 200, 0, 200), 0);
    assert!(!dst.has_error());
    let spec = dst.spec();
    assert_eq!((spec.width, spec.height), (100, 200));
    assert_eq!((spec.x, spec.y), (50, 0));
}

#[test]
fn letterbox_picks_the_covering_axis() {
    // wider than the rect: fill width; taller: fill height
    let wide = fit(
        &solid(100, 50, 1.0),
        "triangle",
        0.0,
        "letterbox",
        false,
        Roi::new(0, 200, 0, 200),
        0,
    );
    assert_eq!(wide.spec().height, 100);
    let tall = fit(
        &solid(50, 100, 1.0),
        "triangle",
        0.0,
        "letterbox",
        false,
        Roi::new(0, 200, 0, 200),
        0,
    );
    assert_eq!(tall.spec().width, 100);
}

#[test]
fn fit_reports_unknown_filters() {
    let src = solid(8, 8, 1.0);
    let mut dst = ImageBuf::uninitialized();
    let ok = fit::fit_into(
        &mut dst,
        &src,
        "gauss",
        0.0,
        "letterbox",
        false,
        Roi::new(0, 4, 0, 4),
        0,
    );
    assert!(!ok);
    assert!(dst.error().unwrap().contains("gauss"));
}
