use rastermap_filter::Filter2D;
use rastermap_image::{BufElement, ImageBuf, Roi, WrapMode};

use crate::dispatch::with_pixel_format;
use crate::dual::Dual2;
use crate::error::TransformError;
use crate::matrix::M33;
use crate::parallel;
use crate::prep::{prep, PrepFlags};
use crate::sample::{filtered_sample, SrcView};

const PREP: PrepFlags = PrepFlags {
    support_deep: false,
    copy_roi_full: true,
};

fn warp_kernel<D: BufElement, S: BufElement>(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    m: &M33,
    filter: &dyn Filter2D,
    wrap: WrapMode,
    edgeclamp: bool,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    // singular maps fall back to identity
    let minv = m.inverse().unwrap_or(M33::IDENTITY);
    let view = SrcView::<S>::new(src)?;
    let nch = src.nchannels() as usize;
    let dst_nch = dst.nchannels() as usize;

    parallel::for_each_row::<D, _>(dst, roi, nthreads, |y, row| {
        let mut pel = vec![0.0f32; nch];
        for (x, out) in (roi.xbegin..roi.xend).zip(row.chunks_exact_mut(dst_nch)) {
            // seed unit partials so the projective divide hands back the
            // full Jacobian alongside the mapped point
            let dx = Dual2::new(x as f32 + 0.5, 1.0, 0.0);
            let dy = Dual2::new(y as f32 + 0.5, 0.0, 1.0);
            let (sx, sy) = minv.transform_dual(dx, dy);
            filtered_sample(
                &view,
                sx.val,
                sy.val,
                sx.dx,
                sy.dx,
                sx.dy,
                sy.dy,
                filter,
                wrap,
                edgeclamp,
                &mut pel,
            );
            for c in roi.chbegin..roi.chend {
                out[c as usize] = D::from_f32(pel[c as usize]);
            }
        }
    })?;

    Ok(())
}

pub(crate) fn warp_impl(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    m: &M33,
    filter: Option<&dyn Filter2D>,
    recompute_roi: bool,
    wrap: WrapMode,
    edgeclamp: bool,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let mut dst_roi = if dst.initialized() {
        if roi.defined() {
            roi
        } else {
            dst.roi()
        }
    } else if roi.defined() {
        roi
    } else if recompute_roi {
        m.projected_roi(src.roi())
    } else {
        src.roi()
    };
    dst_roi.chend = dst_roi.chend.min(src.nchannels());

    prep(dst, src, &mut dst_roi, PREP)?;

    let owned;
    let filter = match filter {
        Some(f) => f,
        None => {
            owned = <dyn Filter2D>::create("lanczos3", 6.0, 6.0)
                .ok_or_else(|| TransformError::UnknownFilter("lanczos3".to_string()))?;
            owned.as_ref()
        }
    };

    log::debug!("warp {} with {}", dst_roi, filter.name());
    with_pixel_format!(dst.spec().format, D, {
        with_pixel_format!(src.spec().format, S, {
            warp_kernel::<D, S>(dst, src, m, filter, wrap, edgeclamp, dst_roi, nthreads)
        })
    })
}

// Named filter lookup for warp: no ratio scaling, the catalog width rules.
fn get_warp_filter(filtername: &str, filterwidth: f32) -> Result<Box<dyn Filter2D>, TransformError> {
    let name = if filtername.is_empty() {
        "lanczos3"
    } else {
        filtername
    };
    let fd =
        <dyn Filter2D>::find(name).ok_or_else(|| TransformError::UnknownFilter(name.to_string()))?;
    let w = if filterwidth > 0.0 {
        filterwidth
    } else {
        fd.width
    };
    <dyn Filter2D>::create(name, w, w)
        .ok_or_else(|| TransformError::UnknownFilter(name.to_string()))
}

/// Warp `src` into `dst` through the 3x3 matrix `m` (row-vector
/// convention, source to destination) under a caller-provided filter
/// (`None` falls back to lanczos3).
///
/// Every destination pixel is inverse-mapped to source space with
/// analytic derivatives, and the filter footprint stretches with the
/// local Jacobian so minified regions stay alias-free. When
/// `recompute_roi` is set and neither a ROI nor an initialized
/// destination pins the output region, the destination data window is
/// the projection of the source data window through `m`. Returns false
/// on failure with the reason on `dst`'s error channel.
pub fn warp_filter_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    m: &M33,
    filter: Option<&dyn Filter2D>,
    recompute_roi: bool,
    wrap: WrapMode,
    roi: Roi,
    nthreads: usize,
) -> bool {
    match warp_impl(dst, src, m, filter, recompute_roi, wrap, false, roi, nthreads) {
        Ok(()) => true,
        Err(e) => {
            dst.set_error(e.to_string());
            false
        }
    }
}

/// Warp `src` into `dst` with a filter looked up by catalog name (empty
/// name means lanczos3, `filterwidth <= 0` the catalog width). See
/// [`warp_filter_into`].
#[allow(clippy::too_many_arguments)]
pub fn warp_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    m: &M33,
    filtername: &str,
    filterwidth: f32,
    recompute_roi: bool,
    wrap: WrapMode,
    roi: Roi,
    nthreads: usize,
) -> bool {
    let filter = match get_warp_filter(filtername, filterwidth) {
        Ok(f) => f,
        Err(e) => {
            dst.set_error(e.to_string());
            return false;
        }
    };
    warp_filter_into(
        dst,
        src,
        m,
        Some(filter.as_ref()),
        recompute_roi,
        wrap,
        roi,
        nthreads,
    )
}

/// Like [`warp_filter_into`], returning a freshly allocated destination.
/// On failure the result carries a non-empty error message.
pub fn warp_filter(
    src: &ImageBuf,
    m: &M33,
    filter: Option<&dyn Filter2D>,
    recompute_roi: bool,
    wrap: WrapMode,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !warp_filter_into(&mut result, src, m, filter, recompute_roi, wrap, roi, nthreads)
        && !result.has_error()
    {
        result.set_error("warp() error");
    }
    result
}

/// Like [`warp_into`], returning a freshly allocated destination. On
/// failure the result carries a non-empty error message.
#[allow(clippy::too_many_arguments)]
pub fn warp(
    src: &ImageBuf,
    m: &M33,
    filtername: &str,
    filterwidth: f32,
    recompute_roi: bool,
    wrap: WrapMode,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !warp_into(
        &mut result,
        src,
        m,
        filtername,
        filterwidth,
        recompute_roi,
        wrap,
        roi,
        nthreads,
    ) && !result.has_error()
    {
        result.set_error("warp() error");
    }
    result
}

fn rotation_matrix(src: &ImageBuf, angle: f32, center: Option<(f32, f32)>) -> M33 {
    let (cx, cy) = center.unwrap_or_else(|| {
        let full = src.roi_full();
        (
            0.5 * (full.xbegin + full.xend) as f32,
            0.5 * (full.ybegin + full.yend) as f32,
        )
    });
    M33::rotation_about(angle, cx, cy)
}

/// Rotate `src` by `angle` radians counterclockwise about `center` (the
/// full-window center when `None`), a thin convenience over [`warp_into`]
/// with Black wrap. Returns false on failure with the reason on `dst`'s
/// error channel.
#[allow(clippy::too_many_arguments)]
pub fn rotate_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    angle: f32,
    center: Option<(f32, f32)>,
    filtername: &str,
    filterwidth: f32,
    recompute_roi: bool,
    roi: Roi,
    nthreads: usize,
) -> bool {
    let m = rotation_matrix(src, angle, center);
    warp_into(
        dst,
        src,
        &m,
        filtername,
        filterwidth,
        recompute_roi,
        WrapMode::Black,
        roi,
        nthreads,
    )
}

/// [`rotate_into`] with a caller-provided filter.
#[allow(clippy::too_many_arguments)]
pub fn rotate_filter_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    angle: f32,
    center: Option<(f32, f32)>,
    filter: Option<&dyn Filter2D>,
    recompute_roi: bool,
    roi: Roi,
    nthreads: usize,
) -> bool {
    let m = rotation_matrix(src, angle, center);
    warp_filter_into(
        dst,
        src,
        &m,
        filter,
        recompute_roi,
        WrapMode::Black,
        roi,
        nthreads,
    )
}

/// Like [`rotate_into`], returning a freshly allocated destination. On
/// failure the result carries a non-empty error message.
#[allow(clippy::too_many_arguments)]
pub fn rotate(
    src: &ImageBuf,
    angle: f32,
    center: Option<(f32, f32)>,
    filtername: &str,
    filterwidth: f32,
    recompute_roi: bool,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !rotate_into(
        &mut result,
        src,
        angle,
        center,
        filtername,
        filterwidth,
        recompute_roi,
        roi,
        nthreads,
    ) && !result.has_error()
    {
        result.set_error("rotate() error");
    }
    result
}

/// Like [`rotate_filter_into`], returning a freshly allocated
/// destination. On failure the result carries a non-empty error message.
#[allow(clippy::too_many_arguments)]
pub fn rotate_filter(
    src: &ImageBuf,
    angle: f32,
    center: Option<(f32, f32)>,
    filter: Option<&dyn Filter2D>,
    recompute_roi: bool,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !rotate_filter_into(
        &mut result,
        src,
        angle,
        center,
        filter,
        recompute_roi,
        roi,
        nthreads,
    ) && !result.has_error()
    {
        result.set_error("rotate() error");
    }
    result
}
