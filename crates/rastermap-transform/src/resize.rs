use num_traits::identities::Zero;
use rastermap_filter::Filter2D;
use rastermap_image::{AccumType, BufElement, ImageBuf, PixelType, Roi, WrapMode};

use crate::dispatch::with_pixel_format;
use crate::error::TransformError;
use crate::parallel;
use crate::prep::{prep, PrepFlags};
use crate::sample::{floorfrac, ifloor, SrcView};

const PREP: PrepFlags = PrepFlags {
    support_deep: false,
    copy_roi_full: false,
};

// Accumulator selected by the destination element type.
type Acc<D> = <D as PixelType>::Accum;

// Per-column tap table for a separable filter: `xtaps` normalized weights
// per output column, shared by every row of the region.
fn column_weights(
    filter: &dyn Filter2D,
    roi: &Roi,
    dstfx: f32,
    dstpixelwidth: f32,
    srcfx: f32,
    srcfw: f32,
    xratio: f32,
    radi: i32,
    xtaps: usize,
) -> Vec<f32> {
    let mut all = vec![0.0f32; xtaps * roi.width() as usize];
    for x in roi.xbegin..roi.xend {
        let xfiltval =
            &mut all[(x - roi.xbegin) as usize * xtaps..(x - roi.xbegin + 1) as usize * xtaps];
        let s = (x as f32 - dstfx + 0.5) * dstpixelwidth;
        let src_xf = srcfx + s * srcfw;
        let (_, src_xf_frac) = floorfrac(src_xf);
        let mut totalweight_x = 0.0f32;
        for (i, w) in xfiltval.iter_mut().enumerate() {
            *w = filter.xfilt(xratio * (i as f32 - radi as f32 - (src_xf_frac - 0.5)));
            totalweight_x += *w;
        }
        if totalweight_x != 0.0 {
            for w in xfiltval.iter_mut() {
                *w /= totalweight_x;
            }
        }
    }
    all
}

fn resize_kernel<D: BufElement, S: BufElement>(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filter: &dyn Filter2D,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let srcspec = src.spec().clone();
    let dstspec = dst.spec().clone();
    let nchannels = roi.chend.min(dstspec.nchannels) as usize;

    let srcfx = srcspec.full_x as f32;
    let srcfy = srcspec.full_y as f32;
    let srcfw = srcspec.full_width as f32;
    let srcfh = srcspec.full_height as f32;

    // Ratios of dst/src size. Values larger than 1 upsample and the filter
    // keeps its width in source pixels; values less than 1 downsample and
    // the filter must stretch to hold down the high frequencies.
    let xratio = dstspec.full_width as f32 / srcfw;
    let yratio = dstspec.full_height as f32 / srcfh;

    let dstfx = dstspec.full_x as f32;
    let dstfy = dstspec.full_y as f32;
    let dstpixelwidth = 1.0 / dstspec.full_width as f32;
    let dstpixelheight = 1.0 / dstspec.full_height as f32;
    let filterrad = filter.width() / 2.0;

    // Integer filter radius in source pixels; the gather covers
    // [src_x-radi, src_x+radi] x [src_y-radj, src_y+radj].
    let radi = (filterrad / xratio).ceil() as i32;
    let radj = (filterrad / yratio).ceil() as i32;
    let xtaps = (2 * radi + 1) as usize;
    let ytaps = (2 * radj + 1) as usize;

    let view = SrcView::<S>::new(src)?;

    if filter.separable() {
        // Horizontal tap weights are the same for every row, so compute
        // them once per column up front. The vertical weights are per row
        // and are filled inside the row loop, which never revisits a row.
        let xfiltval_all = column_weights(
            filter,
            &roi,
            dstfx,
            dstpixelwidth,
            srcfx,
            srcfw,
            xratio,
            radi,
            xtaps,
        );

        parallel::for_each_row::<D, _>(dst, roi, nthreads, |y, row| {
            let t = (y as f32 - dstfy + 0.5) * dstpixelheight;
            let src_yf = srcfy + t * srcfh;
            let (src_y, src_yf_frac) = floorfrac(src_yf);

            let mut yfiltval = vec![0.0f32; ytaps];
            let mut totalweight_y = 0.0f32;
            for (j, w) in yfiltval.iter_mut().enumerate() {
                *w = filter.yfilt(yratio * (j as f32 - radj as f32 - (src_yf_frac - 0.5)));
                totalweight_y += *w;
            }
            if totalweight_y != 0.0 {
                for w in yfiltval.iter_mut() {
                    *w /= totalweight_y;
                }
            }

            let mut pel = vec![Acc::<D>::zero(); nchannels];
            for (x, out) in (roi.xbegin..roi.xend).zip(row.chunks_exact_mut(
                dstspec.nchannels as usize,
            )) {
                let s = (x as f32 - dstfx + 0.5) * dstpixelwidth;
                let src_xf = srcfx + s * srcfw;
                let src_x = ifloor(src_xf);
                pel.fill(Acc::<D>::zero());
                let xfiltval = &xfiltval_all
                    [(x - roi.xbegin) as usize * xtaps..(x - roi.xbegin + 1) as usize * xtaps];
                let totalweight_x: f32 = xfiltval.iter().sum();
                if totalweight_x != 0.0 {
                    for j in -radj..=radj {
                        let wy = yfiltval[(j + radj) as usize];
                        if wy == 0.0 {
                            // zero weight for this tap row, skip the reads
                            continue;
                        }
                        for (i, &wx) in xfiltval.iter().enumerate() {
                            let w = wy * wx;
                            if w != 0.0 {
                                let sx = src_x - radi + i as i32;
                                let sy = src_y + j;
                                for (c, p) in pel.iter_mut().enumerate() {
                                    *p += Acc::<D>::from_weight(w)
                                        * view.texel::<Acc<D>>(sx, sy, c as i32, WrapMode::Clamp);
                                }
                            }
                        }
                    }
                }
                // column weights are already normalized; a zero row sum
                // zeroes the pixel
                if totalweight_y == 0.0 {
                    for o in out.iter_mut().take(nchannels) {
                        *o = D::from_f32(0.0);
                    }
                } else {
                    for (o, p) in out.iter_mut().zip(pel.iter()) {
                        *o = p.to_pixel();
                    }
                }
            }
        })?;
    } else {
        // Non-separable filter: evaluate the full 2D kernel per tap.
        parallel::for_each_row::<D, _>(dst, roi, nthreads, |y, row| {
            let t = (y as f32 - dstfy + 0.5) * dstpixelheight;
            let src_yf = srcfy + t * srcfh;
            let (src_y, src_yf_frac) = floorfrac(src_yf);

            let mut pel = vec![Acc::<D>::zero(); nchannels];
            for (x, out) in (roi.xbegin..roi.xend).zip(row.chunks_exact_mut(
                dstspec.nchannels as usize,
            )) {
                let s = (x as f32 - dstfx + 0.5) * dstpixelwidth;
                let src_xf = srcfx + s * srcfw;
                let (src_x, src_xf_frac) = floorfrac(src_xf);
                pel.fill(Acc::<D>::zero());
                let mut totalweight = 0.0f32;
                for j in -radj..=radj {
                    for i in -radi..=radi {
                        let w = filter.eval(
                            xratio * (i as f32 - (src_xf_frac - 0.5)),
                            yratio * (j as f32 - (src_yf_frac - 0.5)),
                        );
                        if w != 0.0 {
                            totalweight += w;
                            for (c, p) in pel.iter_mut().enumerate() {
                                *p += Acc::<D>::from_weight(w)
                                    * view.texel::<Acc<D>>(
                                        src_x + i,
                                        src_y + j,
                                        c as i32,
                                        WrapMode::Clamp,
                                    );
                            }
                        }
                    }
                }
                if totalweight == 0.0 {
                    for o in out.iter_mut().take(nchannels) {
                        *o = D::from_f32(0.0);
                    }
                } else {
                    let inv = Acc::<D>::from_weight(1.0 / totalweight);
                    for (o, p) in out.iter_mut().zip(pel.iter()) {
                        *o = (*p * inv).to_pixel();
                    }
                }
            }
        })?;
    }

    Ok(())
}

fn resize_prepped(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filter: &dyn Filter2D,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    log::debug!(
        "resize {}x{} -> {}x{} with {}",
        src.spec().full_width,
        src.spec().full_height,
        dst.spec().full_width,
        dst.spec().full_height,
        filter.name()
    );
    with_pixel_format!(dst.spec().format, D, {
        with_pixel_format!(src.spec().format, S, {
            resize_kernel::<D, S>(dst, src, filter, roi, nthreads)
        })
    })
}

// ROI defaulting: resize-family calls target the destination full window.
pub(crate) fn default_roi(dst: &ImageBuf, roi: Roi) -> Roi {
    if roi.defined() || !dst.initialized() {
        roi
    } else {
        dst.roi_full()
    }
}

// Pick a filter for resizing by name, or by the size ratios when no name
// was given: quality defaults are lanczos3 for upsampling and
// blackman-harris as soon as either axis shrinks. Non-fixed filter widths
// scale with the magnification ratio so enlargements stay smooth.
pub(crate) fn get_resize_filter(
    filtername: &str,
    fwidth: f32,
    wratio: f32,
    hratio: f32,
) -> Result<Box<dyn Filter2D>, TransformError> {
    let name = if filtername.is_empty() {
        if wratio < 1.0 || hratio < 1.0 {
            "blackman-harris"
        } else {
            "lanczos3"
        }
    } else {
        filtername
    };
    let fd = <dyn Filter2D>::find(name)
        .ok_or_else(|| TransformError::UnknownFilter(name.to_string()))?;
    let w = if fwidth > 0.0 {
        fwidth
    } else {
        fd.width * wratio.max(1.0)
    };
    let h = if fwidth > 0.0 {
        fwidth
    } else {
        fd.width * hratio.max(1.0)
    };
    <dyn Filter2D>::create(name, w, h)
        .ok_or_else(|| TransformError::UnknownFilter(name.to_string()))
}

// The last-resort fallback when a caller passed no filter at all.
fn fallback_filter(wratio: f32, hratio: f32) -> Result<Box<dyn Filter2D>, TransformError> {
    let w = 2.0 * wratio.max(1.0);
    let h = 2.0 * hratio.max(1.0);
    <dyn Filter2D>::create("triangle", w, h)
        .ok_or_else(|| TransformError::UnknownFilter("triangle".to_string()))
}

pub(crate) fn full_ratios(dst: &ImageBuf, src: &ImageBuf) -> (f32, f32) {
    (
        dst.spec().full_width as f32 / src.spec().full_width as f32,
        dst.spec().full_height as f32 / src.spec().full_height as f32,
    )
}

pub(crate) fn resize_filter_impl(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filter: Option<&dyn Filter2D>,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let mut roi = default_roi(dst, roi);
    prep(dst, src, &mut roi, PREP)?;
    let owned;
    let filter = match filter {
        Some(f) => f,
        None => {
            let (wratio, hratio) = full_ratios(dst, src);
            owned = fallback_filter(wratio, hratio)?;
            owned.as_ref()
        }
    };
    resize_prepped(dst, src, filter, roi, nthreads)
}

fn resize_impl(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filtername: &str,
    filterwidth: f32,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let mut roi = default_roi(dst, roi);
    prep(dst, src, &mut roi, PREP)?;
    let (wratio, hratio) = full_ratios(dst, src);
    let filter = get_resize_filter(filtername, filterwidth, wratio, hratio)?;
    resize_prepped(dst, src, filter.as_ref(), roi, nthreads)
}

/// Resize `src` into `dst` under a caller-provided reconstruction filter
/// (`None` falls back to a triangle sized `2 * max(1, ratio)` per axis).
///
/// Source and destination full windows define the mapping; the data
/// window of an uninitialized destination is taken from `roi`. Returns
/// false on failure with the reason on `dst`'s error channel.
pub fn resize_filter_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filter: Option<&dyn Filter2D>,
    roi: Roi,
    nthreads: usize,
) -> bool {
    match resize_filter_impl(dst, src, filter, roi, nthreads) {
        Ok(()) => true,
        Err(e) => {
            dst.set_error(e.to_string());
            false
        }
    }
}

/// Resize `src` into `dst` with a filter looked up by catalog name.
///
/// An empty `filtername` picks lanczos3 when upsampling, blackman-harris
/// when either axis is downsampling. `filterwidth <= 0` uses the
/// catalog width scaled by `max(1, ratio)` per axis. Returns false on
/// failure with the reason on `dst`'s error channel.
///
/// # Example
///
/// ```
/// use rastermap_image::{ImageBuf, ImageSpec, PixelFormat, Roi};
/// use rastermap_transform::resize::resize_into;
///
/// let src = ImageBuf::from_data(
///     ImageSpec::new(4, 4, 1, PixelFormat::F32),
///     vec![1.0f32; 16],
/// )
/// .unwrap();
/// let mut dst = ImageBuf::uninitialized();
/// let ok = resize_into(&mut dst, &src, "triangle", 0.0, Roi::new(0, 2, 0, 2), 0);
/// assert!(ok);
/// assert_eq!(dst.spec().full_width, 2);
/// ```
pub fn resize_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    filtername: &str,
    filterwidth: f32,
    roi: Roi,
    nthreads: usize,
) -> bool {
    match resize_impl(dst, src, filtername, filterwidth, roi, nthreads) {
        Ok(()) => true,
        Err(e) => {
            dst.set_error(e.to_string());
            false
        }
    }
}

/// Like [`resize_filter_into`], returning a freshly allocated destination.
/// On failure the result carries a non-empty error message.
pub fn resize_filter(
    src: &ImageBuf,
    filter: Option<&dyn Filter2D>,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !resize_filter_into(&mut result, src, filter, roi, nthreads) && !result.has_error() {
        result.set_error("resize() error");
    }
    result
}

/// Like [`resize_into`], returning a freshly allocated destination. On
/// failure the result carries a non-empty error message.
pub fn resize(
    src: &ImageBuf,
    filtername: &str,
    filterwidth: f32,
    roi: Roi,
    nthreads: usize,
) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !resize_into(&mut result, src, filtername, filterwidth, roi, nthreads)
        && !result.has_error()
    {
        result.set_error("resize() error");
    }
    result
}
