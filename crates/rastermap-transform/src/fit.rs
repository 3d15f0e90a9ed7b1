use rastermap_filter::Filter2D;
use rastermap_image::{ImageBuf, Roi, WrapMode};

use crate::error::TransformError;
use crate::matrix::M33;
use crate::prep::{prep, PrepFlags};
use crate::resize;
use crate::warp::warp_impl;

const PREP: PrepFlags = PrepFlags {
    support_deep: false,
    copy_roi_full: false,
};

// The placement fit settles on: how the aspect-preserving resize window
// sits inside the fit rectangle.
struct FitPlan {
    resize_full_width: i32,
    resize_full_height: i32,
    xoffset: i32,
    yoffset: i32,
    xoff: f32,
    yoff: f32,
    scale: f32,
}

fn plan_fit(src: &ImageBuf, fit_rect: &Roi, fillmode: &str) -> FitPlan {
    let srcspec = src.spec();
    let fit_full_width = fit_rect.width();
    let fit_full_height = fit_rect.height();
    let oldaspect = srcspec.full_width as f32 / srcspec.full_height as f32;
    let newaspect = fit_full_width as f32 / fit_full_height as f32;

    let mut plan = FitPlan {
        resize_full_width: fit_full_width,
        resize_full_height: fit_full_height,
        xoffset: 0,
        yoffset: 0,
        xoff: 0.0,
        yoff: 0.0,
        scale: 1.0,
    };

    // unknown fill modes fall back to letterbox, which then picks the
    // axis that the source fully fills
    let mut fillmode = match fillmode {
        "height" | "width" => fillmode,
        _ => "letterbox",
    };
    if fillmode == "letterbox" {
        fillmode = if newaspect >= oldaspect {
            "height"
        } else {
            "width"
        };
    }
    if fillmode == "height" {
        plan.resize_full_width = (plan.resize_full_height as f32 * oldaspect + 0.5) as i32;
        plan.xoffset = (fit_full_width - plan.resize_full_width) / 2;
        plan.scale = fit_full_height as f32 / srcspec.full_height as f32;
        plan.xoff = (fit_full_width as f32 - plan.scale * srcspec.full_width as f32) / 2.0;
    } else if fillmode == "width" {
        plan.resize_full_height = (plan.resize_full_width as f32 / oldaspect + 0.5) as i32;
        plan.yoffset = (fit_full_height - plan.resize_full_height) / 2;
        plan.scale = fit_full_width as f32 / srcspec.full_width as f32;
        plan.yoff = (fit_full_height as f32 - plan.scale * srcspec.full_height as f32) / 2.0;
    }
    plan
}

fn fit_filter_impl(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filter: Option<&dyn Filter2D>,
    fillmode: &str,
    exact: bool,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let mut roi = resize::default_roi(dst, roi);
    prep(dst, src, &mut roi, PREP)?;

    let srcspec = src.spec().clone();
    let plan = plan_fit(src, &roi, fillmode);
    log::debug!(
        "fit {}x{} -> {} (scale {})",
        srcspec.full_width,
        srcspec.full_height,
        roi,
        plan.scale
    );

    let newroi = Roi::with_channels(
        roi.xbegin,
        roi.xend,
        roi.ybegin,
        roi.yend,
        srcspec.nchannels,
    );

    let owned;
    let filter = match filter {
        Some(f) => f,
        None => {
            let wratio = plan.resize_full_width as f32 / srcspec.full_width as f32;
            let hratio = plan.resize_full_height as f32 / srcspec.full_height as f32;
            let w = 2.0 * wratio.max(1.0);
            let h = 2.0 * hratio.max(1.0);
            owned = <dyn Filter2D>::create("triangle", w, h)
                .ok_or_else(|| TransformError::UnknownFilter("triangle".to_string()))?;
            owned.as_ref()
        }
    };

    if exact {
        // Subpixel filtered warp: preserves the aspect ratio and centers
        // the image exactly, at the cost of slightly soft edges where the
        // scaled image does not land on pixel boundaries.
        let m = M33([
            plan.scale, 0.0, 0.0, //
            0.0, plan.scale, 0.0, //
            plan.xoff, plan.yoff, 1.0,
        ]);
        let mut newspec = srcspec.clone();
        newspec.set_roi(newroi);
        newspec.set_roi_full(newroi);
        dst.reset(newspec);
        warp_impl(
            dst,
            src,
            &m,
            Some(filter),
            false,
            WrapMode::Black,
            true,
            Roi::UNDEFINED,
            nthreads,
        )?;
    } else {
        // Whole-pixel resize: sharpest result, but the aspect ratio and
        // centering only hold to the nearest pixel.
        if plan.resize_full_width != srcspec.full_width
            || plan.resize_full_height != srcspec.full_height
            || roi.xbegin != srcspec.full_x
            || roi.ybegin != srcspec.full_y
        {
            let resizeroi = Roi::with_channels(
                roi.xbegin,
                roi.xbegin + plan.resize_full_width,
                roi.ybegin,
                roi.ybegin + plan.resize_full_height,
                srcspec.nchannels,
            );
            let mut newspec = srcspec.clone();
            newspec.set_roi(resizeroi);
            newspec.set_roi_full(resizeroi);
            dst.reset(newspec);
            resize::resize_filter_impl(dst, src, Some(filter), resizeroi, nthreads)?;
        } else {
            dst.copy_from(src)?;
        }
        let spec = dst.spec_mut();
        spec.full_width = roi.width();
        spec.full_height = roi.height();
        spec.full_x = roi.xbegin;
        spec.full_y = roi.ybegin;
        spec.x = plan.xoffset;
        spec.y = plan.yoffset;
    }
    Ok(())
}

/// Fit `src` inside the fit rectangle (the ROI, or the destination full
/// window) preserving its aspect ratio, under a caller-provided filter
/// (`None` falls back to a triangle sized to the scale change).
///
/// `fillmode` is "letterbox", "width" or "height"; unknown values mean
/// letterbox, which fills whichever axis keeps the whole source visible.
/// With `exact` the placement is a single subpixel warp; without it the
/// source is resized to whole pixels and the data window shifted into
/// place. Returns false on failure with the reason on `dst`'s error
/// channel.
pub fn fit_filter_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filter: Option<&dyn Filter2D>,
    fillmode: &str,
    exact: bool,
    roi: Roi,
    nthreads: usize,
) -> bool {
    match fit_filter_impl(dst, src, filter, fillmode, exact, roi, nthreads) {
        Ok(()) => true,
        Err(e) => {
            if !dst.has_error() {
                dst.set_error(e.to_string());
            }
            false
        }
    }
}

/// Fit with a filter looked up by catalog name; an empty name picks the
/// resize defaults from the scale ratios. See [`fit_filter_into`].
#[allow(clippy::too_many_arguments)]
pub fn fit_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filtername: &str,
    filterwidth: f32,
    fillmode: &str,
    exact: bool,
    roi: Roi,
    nthreads: usize,
) -> bool {
    let mut prep_roi = resize::default_roi(dst, roi);
    if let Err(e) = prep(dst, src, &mut prep_roi, PREP) {
        dst.set_error(e.to_string());
        return false;
    }
    let (wratio, hratio) = resize::full_ratios(dst, src);
    let filter = match resize::get_resize_filter(filtername, filterwidth, wratio, hratio) {
        Ok(f) => f,
        Err(e) => {
            dst.set_error(e.to_string());
            return false;
        }
    };
    fit_filter_into(
        dst,
        src,
        Some(filter.as_ref()),
        fillmode,
        exact,
        prep_roi,
        nthreads,
    )
}

/// Like [`fit_filter_into`], returning a freshly allocated destination.
/// On failure the result carries a non-empty error message.
pub fn fit_filter(
    src: &ImageBuf,
    filter: Option<&dyn Filter2D>,
    fillmode: &str,
    exact: bool,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !fit_filter_into(&mut result, src, filter, fillmode, exact, roi, nthreads)
        && !result.has_error()
    {
        result.set_error("fit() error");
    }
    result
}

/// Like [`fit_into`], returning a freshly allocated destination. On
/// failure the result carries a non-empty error message.
pub fn fit(
    src: &ImageBuf,
    filtername: &str,
    filterwidth: f32,
    fillmode: &str,
    exact: bool,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !fit_into(
        &mut result,
        src,
        filtername,
        filterwidth,
        fillmode,
        exact,
        roi,
        nthreads,
    ) && !result.has_error()
    {
        result.set_error("fit() error");
    }
    result
}

#[cfg(test)]
mod tests {
    use rastermap_image::{ImageSpec, PixelFormat};

    use super::*;

    fn const_image(w: i32, h: i32, val: f32) -> ImageBuf {
        ImageBuf::from_data(
            ImageSpec::new(w, h, 1, PixelFormat::F32),
            vec![val; (w * h) as usize],
        )
        .unwrap()
    }

    #[test]
    fn letterbox_wide_source_pads_vertically() {
        // 100x50 into 200x200: fills the width, 100 rows of padding split
        // evenly above and below
        let src = const_image(100, 50, 1.0);
        let dst = fit(&src, "triangle", 0.0, "letterbox", false, Roi::new(0, 200, 0, 200), 0);
        assert!(!dst.has_error(), "{:?}", dst.error());
        let spec = dst.spec();
        assert_eq!((spec.full_width, spec.full_height), (200, 200));
        assert_eq!((spec.width, spec.height), (200, 100));
        assert_eq!((spec.x, spec.y), (0, 50));
    }

    #[test]
    fn fillmode_coercion() {
        let src = const_image(100, 50, 1.0);
        let a = fit(&src, "triangle", 0.0, "no-such-mode", false, Roi::new(0, 200, 0, 200), 0);
        let b = fit(&src, "triangle", 0.0, "letterbox", false, Roi::new(0, 200, 0, 200), 0);
        assert_eq!(a.spec(), b.spec());
    }

    #[test]
    fn exact_fit_sets_windows_to_fit_rect() {
        let src = const_image(100, 50, 1.0);
        let dst = fit(&src, "lanczos3", 0.0, "letterbox", true, Roi::new(0, 200, 0, 200), 0);
        assert!(!dst.has_error());
        let spec = dst.spec();
        assert_eq!((spec.x, spec.y, spec.width, spec.height), (0, 0, 200, 200));
        assert_eq!((spec.full_width, spec.full_height), (200, 200));
        // padding rows are black, scaled rows carry the source color
        assert!(dst.getchannel(100, 10, 0).abs() < 1e-5);
        assert!((dst.getchannel(100, 100, 0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fit_identity_copies() {
        let src = const_image(64, 64, 0.5);
        let dst = fit(&src, "triangle", 0.0, "letterbox", false, Roi::new(0, 64, 0, 64), 0);
        assert!(!dst.has_error());
        assert_eq!(dst.spec().width, 64);
        assert!((dst.getchannel(10, 10, 0) - 0.5).abs() < 1e-6);
    }
}
