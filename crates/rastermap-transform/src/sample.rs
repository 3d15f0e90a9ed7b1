use rastermap_filter::Filter2D;
use rastermap_image::{AccumType, BufElement, ImageBuf, WrapMode};

use crate::error::TransformError;

/// Floor to integer.
#[inline]
pub(crate) fn ifloor(x: f32) -> i32 {
    x.floor() as i32
}

/// Split into integer floor and fractional part in `[0, 1)`.
#[inline]
pub(crate) fn floorfrac(x: f32) -> (i32, f32) {
    let i = ifloor(x);
    (i, x - i as f32)
}

/// A typed read-only view of a source image's data window, resolving
/// out-of-window reads through a [`WrapMode`].
pub(crate) struct SrcView<'a, S: BufElement> {
    data: &'a [S],
    x0: i32,
    y0: i32,
    w: i32,
    h: i32,
    nch: i32,
}

impl<'a, S: BufElement> SrcView<'a, S> {
    pub fn new(src: &'a ImageBuf) -> Result<Self, TransformError> {
        let spec = src.spec();
        Ok(SrcView {
            data: src.as_slice::<S>()?,
            x0: spec.x,
            y0: spec.y,
            w: spec.width,
            h: spec.height,
            nch: spec.nchannels,
        })
    }

    /// Source data window bounds as `(xbegin, xend, ybegin, yend)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (self.x0, self.x0 + self.w, self.y0, self.y0 + self.h)
    }

    /// Read channel `c` at `(x, y)`, wrapping out-of-window coordinates.
    #[inline]
    pub fn texel<A: AccumType>(&self, x: i32, y: i32, c: i32, wrap: WrapMode) -> A {
        let Some(xx) = wrap.resolve(x, self.x0, self.x0 + self.w) else {
            return A::zero();
        };
        let Some(yy) = wrap.resolve(y, self.y0, self.y0 + self.h) else {
            return A::zero();
        };
        let idx = (((yy - self.y0) * self.w + (xx - self.x0)) * self.nch + c) as usize;
        A::from_pixel(self.data[idx])
    }
}

/// Gather a filter-weighted, normalized average around source position
/// `(s, t)`, with the footprint stretched isotropically by the inverse-map
/// derivatives so minified regions keep at least a one-pixel footprint.
///
/// `edgeclamp` clips the support rectangle to the data window before
/// iterating; with Black wrap this stops negative-lobe filters from
/// ringing against the window boundary. Results land in `result`, one
/// value per channel, zeros when the weights sum to nothing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn filtered_sample<S: BufElement>(
    src: &SrcView<S>,
    s: f32,
    t: f32,
    dsdx: f32,
    dtdx: f32,
    dsdy: f32,
    dtdy: f32,
    filter: &dyn Filter2D,
    wrap: WrapMode,
    edgeclamp: bool,
    result: &mut [f32],
) {
    let ds = 1.0f32.max(dsdx.abs().max(dsdy.abs()));
    let dt = 1.0f32.max(dtdx.abs().max(dtdy.abs()));
    let ds_inv = 1.0 / ds;
    let dt_inv = 1.0 / dt;
    let filterrad_s = 0.5 * ds * filter.width();
    let filterrad_t = 0.5 * dt * filter.width();
    let mut smin = ifloor(s - filterrad_s);
    let mut smax = (s + filterrad_s).ceil() as i32;
    let mut tmin = ifloor(t - filterrad_t);
    let mut tmax = (t + filterrad_t).ceil() as i32;
    if edgeclamp {
        let (xb, xe, yb, ye) = src.bounds();
        smin = smin.clamp(xb, xe);
        smax = smax.clamp(xb, xe);
        tmin = tmin.clamp(yb, ye);
        tmax = tmax.clamp(yb, ye);
    }

    result.fill(0.0);
    let mut total_w = 0.0f32;
    for y in tmin..tmax {
        for x in smin..smax {
            let w = filter.eval(
                ds_inv * (x as f32 + 0.5 - s),
                dt_inv * (y as f32 + 0.5 - t),
            );
            if w != 0.0 {
                for (c, sum) in result.iter_mut().enumerate() {
                    *sum += w * src.texel::<f32>(x, y, c as i32, wrap);
                }
                total_w += w;
            }
        }
    }
    if total_w > 0.0 {
        for sum in result.iter_mut() {
            *sum /= total_w;
        }
    } else {
        result.fill(0.0);
    }
}

/// Bilinearly interpolate at continuous source coordinates whose pixel
/// centers sit at half-integers, clamping reads at the window edge.
pub(crate) fn bilinear_sample<S: BufElement, A: AccumType>(
    src: &SrcView<S>,
    x: f32,
    y: f32,
    out: &mut [A],
) {
    let (x0, fx) = floorfrac(x - 0.5);
    let (y0, fy) = floorfrac(y - 0.5);
    let w00 = A::from_weight((1.0 - fx) * (1.0 - fy));
    let w10 = A::from_weight(fx * (1.0 - fy));
    let w01 = A::from_weight((1.0 - fx) * fy);
    let w11 = A::from_weight(fx * fy);
    for (c, out) in out.iter_mut().enumerate() {
        let c = c as i32;
        let v00: A = src.texel(x0, y0, c, WrapMode::Clamp);
        let v10: A = src.texel(x0 + 1, y0, c, WrapMode::Clamp);
        let v01: A = src.texel(x0, y0 + 1, c, WrapMode::Clamp);
        let v11: A = src.texel(x0 + 1, y0 + 1, c, WrapMode::Clamp);
        *out = v00 * w00 + v10 * w10 + v01 * w01 + v11 * w11;
    }
}
