use rayon::prelude::*;

use rastermap_image::{BufElement, DeepPixel, ImageBuf, Roi};

use crate::error::TransformError;

/// Run `f` on the global rayon pool, or on a freshly built pool when the
/// caller passed a nonzero worker-count hint.
pub(crate) fn run_pool<R: Send>(nthreads: usize, f: impl FnOnce() -> R + Send) -> R {
    if nthreads == 0 {
        return f();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(nthreads).build() {
        Ok(pool) => pool.install(f),
        Err(_) => f(),
    }
}

/// Apply `f` to every destination row of `roi` in parallel.
///
/// Each invocation receives the row's y coordinate and the mutable span of
/// `roi.width() * nchannels` elements starting at `roi.xbegin`. Rows are
/// disjoint, so workers never overlap; row-major order holds within each
/// worker's span and the result does not depend on scheduling.
pub(crate) fn for_each_row<D, F>(
    dst: &mut ImageBuf,
    roi: Roi,
    nthreads: usize,
    f: F,
) -> Result<(), TransformError>
where
    D: BufElement,
    F: Fn(i32, &mut [D]) + Send + Sync,
{
    let spec = dst.spec().clone();
    let row_len = (spec.width * spec.nchannels) as usize;
    let col_off = ((roi.xbegin - spec.x) * spec.nchannels) as usize;
    let col_len = (roi.width() * spec.nchannels) as usize;
    let skip = (roi.ybegin - spec.y) as usize * row_len;

    let data = dst.as_slice_mut::<D>()?;
    let rows = &mut data[skip..skip + roi.height() as usize * row_len];

    run_pool(nthreads, || {
        rows.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| {
                let y = roi.ybegin + i as i32;
                f(y, &mut row[col_off..col_off + col_len]);
            });
    });

    Ok(())
}

/// Deep variant of [`for_each_row`]: `f` receives the row's y coordinate
/// and the span of deep pixels covering `roi`'s columns. Sample counts
/// must already be sized; workers only fill existing storage.
pub(crate) fn for_each_deep_row(
    dst: &mut ImageBuf,
    roi: Roi,
    nthreads: usize,
    f: impl Fn(i32, &mut [DeepPixel]) + Send + Sync,
) -> Result<(), TransformError> {
    let spec = dst.spec().clone();
    let row_len = spec.width as usize;
    let col_off = (roi.xbegin - spec.x) as usize;
    let col_len = roi.width() as usize;
    let skip = (roi.ybegin - spec.y) as usize * row_len;

    let deep = dst
        .deep_data_mut()
        .ok_or(TransformError::DeepMismatch)?;
    let rows = &mut deep.pixels_mut()[skip..skip + roi.height() as usize * row_len];

    run_pool(nthreads, || {
        rows.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| {
                let y = roi.ybegin + i as i32;
                f(y, &mut row[col_off..col_off + col_len]);
            });
    });

    Ok(())
}
