use rastermap_image::{BufElement, ImageBuf, PixelFormat, Roi, WrapMode};

use crate::dispatch::with_pixel_format;
use crate::error::TransformError;
use crate::parallel;
use crate::prep::{prep, PrepFlags};
use crate::sample::{bilinear_sample, ifloor, SrcView};

const PREP: PrepFlags = PrepFlags {
    support_deep: true,
    copy_roi_full: false,
};

// Full-window geometry shared by the mapping of every resample pass.
struct ResampleMap {
    srcfx: f32,
    srcfy: f32,
    srcfw: f32,
    srcfh: f32,
    dstfx: f32,
    dstfy: f32,
    dstpixelwidth: f32,
    dstpixelheight: f32,
}

impl ResampleMap {
    fn new(dst: &ImageBuf, src: &ImageBuf) -> ResampleMap {
        let srcspec = src.spec();
        let dstspec = dst.spec();
        ResampleMap {
            srcfx: srcspec.full_x as f32,
            srcfy: srcspec.full_y as f32,
            srcfw: srcspec.full_width as f32,
            srcfh: srcspec.full_height as f32,
            dstfx: dstspec.full_x as f32,
            dstfy: dstspec.full_y as f32,
            dstpixelwidth: 1.0 / dstspec.full_width as f32,
            dstpixelheight: 1.0 / dstspec.full_height as f32,
        }
    }

    // Source-space float position of the destination pixel center, via
    // NDC of the destination full window.
    #[inline]
    fn src_pos(&self, x: i32, y: i32) -> (f32, f32) {
        let s = (x as f32 - self.dstfx + 0.5) * self.dstpixelwidth;
        let t = (y as f32 - self.dstfy + 0.5) * self.dstpixelheight;
        (self.srcfx + s * self.srcfw, self.srcfy + t * self.srcfh)
    }
}

fn resample_kernel<D: BufElement, S: BufElement>(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    interpolate: bool,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let map = ResampleMap::new(dst, src);
    let view = SrcView::<S>::new(src)?;
    let dst_nch = dst.nchannels() as usize;

    parallel::for_each_row::<D, _>(dst, roi, nthreads, |y, row| {
        let mut pel = vec![0.0f32; dst_nch];
        for (x, out) in (roi.xbegin..roi.xend).zip(row.chunks_exact_mut(dst_nch)) {
            let (src_xf, src_yf) = map.src_pos(x, y);
            if interpolate {
                bilinear_sample::<S, f32>(&view, src_xf, src_yf, &mut pel);
                for c in roi.chbegin..roi.chend {
                    out[c as usize] = D::from_f32(pel[c as usize]);
                }
            } else {
                let src_x = ifloor(src_xf);
                let src_y = ifloor(src_yf);
                for c in roi.chbegin..roi.chend {
                    out[c as usize] =
                        D::from_f32(view.texel::<f32>(src_x, src_y, c, WrapMode::Clamp));
                }
            }
        }
    })?;

    Ok(())
}

fn resample_deep(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let map = ResampleMap::new(dst, src);
    let src_roi = src.roi();
    let src_spec = src.spec().clone();
    let dst_spec = dst.spec().clone();
    let nchannels = src.nchannels();

    let src_index = |x: i32, y: i32| -> Option<usize> {
        if src_roi.contains(x, y) {
            Some(((y - src_spec.y) * src_spec.width + (x - src_spec.x)) as usize)
        } else {
            None
        }
    };

    // Allocation of per-pixel sample storage is not thread safe, so fix
    // every destination sample count in a serial pass before any copying.
    {
        let src_deep = src.deep_data().ok_or(TransformError::DeepMismatch)?;
        let dst_deep = dst.deep_data_mut().ok_or(TransformError::DeepMismatch)?;
        for y in roi.ybegin..roi.yend {
            for x in roi.xbegin..roi.xend {
                let (src_xf, src_yf) = map.src_pos(x, y);
                let nsamps = src_index(ifloor(src_xf), ifloor(src_yf))
                    .map_or(0, |i| src_deep.pixel(i).samples());
                let didx =
                    ((y - dst_spec.y) * dst_spec.width + (x - dst_spec.x)) as usize;
                dst_deep.pixel_mut(didx).set_samples(nsamps);
            }
        }
    }

    let src_deep = src.deep_data().ok_or(TransformError::DeepMismatch)?;
    parallel::for_each_deep_row(dst, roi, nthreads, |y, row| {
        for (x, out) in (roi.xbegin..roi.xend).zip(row.iter_mut()) {
            let (src_xf, src_yf) = map.src_pos(x, y);
            let Some(sidx) = src_index(ifloor(src_xf), ifloor(src_yf)) else {
                continue;
            };
            let srcpel = src_deep.pixel(sidx);
            let nsamps = srcpel.samples();
            // only fill storage sized by the pre-pass
            if nsamps == 0 || nsamps != out.samples() {
                continue;
            }
            for c in 0..nchannels {
                if dst_spec.channelformat(c) == PixelFormat::U32 {
                    for samp in 0..nsamps {
                        out.set_value_u32(c as usize, samp, srcpel.value_u32(c as usize, samp));
                    }
                } else {
                    for samp in 0..nsamps {
                        out.set_value(c as usize, samp, srcpel.value(c as usize, samp));
                    }
                }
            }
        }
    })?;

    Ok(())
}

fn resample_impl(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    interpolate: bool,
    roi: Roi,
    nthreads: usize,
) -> Result<(), TransformError> {
    let mut roi = roi;
    prep(dst, src, &mut roi, PREP)?;
    log::debug!("resample {} interpolate={}", roi, interpolate);

    if src.deep() {
        return resample_deep(dst, src, roi, nthreads);
    }

    with_pixel_format!(dst.spec().format, D, {
        with_pixel_format!(src.spec().format, S, {
            resample_kernel::<D, S>(dst, src, interpolate, roi, nthreads)
        })
    })
}

/// Point-resample `src` into `dst`: nearest neighbor when `interpolate`
/// is false, a 2x2 bilinear when true, both clamping reads at the source
/// data window edge. No filtered reconstruction happens; this is the
/// cheap path, and the only one available to deep images (which copy the
/// nearest pixel's samples). Returns false on failure with the reason on
/// `dst`'s error channel.
pub fn resample_into(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    interpolate: bool,
    roi: Roi,
    nthreads: usize,
) -> bool {
    match resample_impl(dst, src, interpolate, roi, nthreads) {
        Ok(()) => true,
        Err(e) => {
            dst.set_error(e.to_string());
            false
        }
    }
}

/// Like [`resample_into`], returning a freshly allocated destination. On
/// failure the result carries a non-empty error message.
pub fn resample(src: &ImageBuf, interpolate: bool, roi: Roi, nthreads: usize) -> ImageBuf {
    let mut result = ImageBuf::uninitialized();
    if !resample_into(&mut result, src, interpolate, roi, nthreads) && !result.has_error() {
        result.set_error("resample() error");
    }
    result
}
