use rastermap_image::{ImageBuf, Roi};

use crate::error::TransformError;

/// Per-driver policy for [`prep`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrepFlags {
    /// Allow deep sources (resample only).
    pub support_deep: bool,
    /// When allocating the destination, keep the source full window
    /// (warp) instead of deriving it from the ROI (resize/resample/fit).
    pub copy_roi_full: bool,
}

/// Validate the destination against the source and ROI, allocating the
/// destination if it has no storage yet. Every driver calls this before
/// touching pixels; a failure here leaves the destination pixels alone.
pub(crate) fn prep(
    dst: &mut ImageBuf,
    src: &ImageBuf,
    roi: &mut Roi,
    flags: PrepFlags,
) -> Result<(), TransformError> {
    if !src.initialized() {
        return Err(TransformError::UninitializedSource);
    }

    if !roi.defined() {
        *roi = if dst.initialized() {
            dst.roi()
        } else {
            src.roi()
        };
    }
    roi.chbegin = roi.chbegin.max(0);
    roi.chend = roi.chend.min(src.nchannels());

    if roi.depth() > 1 {
        return Err(TransformError::VolumeNotSupported);
    }
    if src.deep() && !flags.support_deep {
        return Err(TransformError::DeepNotSupported);
    }

    if dst.initialized() {
        if dst.deep() != src.deep() {
            return Err(TransformError::DeepMismatch);
        }
        if dst.nchannels() < roi.chend {
            return Err(TransformError::ChannelMismatch(dst.nchannels(), roi.chend));
        }
        // never write outside the destination's data window
        *roi = roi.intersection(&Roi {
            chbegin: roi.chbegin,
            chend: roi.chend,
            ..dst.roi()
        });
    } else {
        let mut spec = src.spec().clone();
        spec.nchannels = roi.chend;
        spec.deep = src.deep() && flags.support_deep;
        spec.set_roi(*roi);
        if flags.copy_roi_full {
            spec.set_roi_full(src.spec().roi_full());
        } else {
            spec.set_roi_full(*roi);
        }
        dst.reset(spec);
    }
    Ok(())
}
