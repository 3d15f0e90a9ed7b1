use crate::pixel::PixelFormat;
use crate::roi::Roi;

/// Geometry and format description of an image.
///
/// The *data window* `[x, x+width) x [y, y+height)` is the region that
/// actually stores pixels. The *full window* is the (usually larger)
/// reference rectangle that defines the image's normalized coordinate
/// space; resize and warp operate in full-window coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    /// Data window origin x.
    pub x: i32,
    /// Data window origin y.
    pub y: i32,
    /// Data window width.
    pub width: i32,
    /// Data window height.
    pub height: i32,
    /// Full window origin x.
    pub full_x: i32,
    /// Full window origin y.
    pub full_y: i32,
    /// Full window width.
    pub full_width: i32,
    /// Full window height.
    pub full_height: i32,
    /// Number of channels per pixel.
    pub nchannels: i32,
    /// Element format shared by all channels.
    pub format: PixelFormat,
    /// Whether pixels carry deep sample lists.
    pub deep: bool,
    /// Per-channel formats for deep data; empty means "all [`Self::format`]".
    pub channel_formats: Vec<PixelFormat>,
}

impl ImageSpec {
    /// A spec whose data and full windows are both `width x height` at the
    /// origin.
    pub fn new(width: i32, height: i32, nchannels: i32, format: PixelFormat) -> ImageSpec {
        ImageSpec {
            x: 0,
            y: 0,
            width,
            height,
            full_x: 0,
            full_y: 0,
            full_width: width,
            full_height: height,
            nchannels,
            format,
            deep: false,
            channel_formats: Vec::new(),
        }
    }

    /// The data window as a ROI (channels `0..nchannels`).
    pub fn roi(&self) -> Roi {
        Roi::with_channels(
            self.x,
            self.x + self.width,
            self.y,
            self.y + self.height,
            self.nchannels,
        )
    }

    /// The full window as a ROI (channels `0..nchannels`).
    pub fn roi_full(&self) -> Roi {
        Roi::with_channels(
            self.full_x,
            self.full_x + self.full_width,
            self.full_y,
            self.full_y + self.full_height,
            self.nchannels,
        )
    }

    /// Set the data window from a ROI.
    pub fn set_roi(&mut self, roi: Roi) {
        self.x = roi.xbegin;
        self.y = roi.ybegin;
        self.width = roi.width();
        self.height = roi.height();
    }

    /// Set the full window from a ROI.
    pub fn set_roi_full(&mut self, roi: Roi) {
        self.full_x = roi.xbegin;
        self.full_y = roi.ybegin;
        self.full_width = roi.width();
        self.full_height = roi.height();
    }

    /// Format of channel `c` (deep images may differ per channel).
    pub fn channelformat(&self, c: i32) -> PixelFormat {
        self.channel_formats
            .get(c as usize)
            .copied()
            .unwrap_or(self.format)
    }

    /// Number of pixels in the data window.
    pub fn npixels(&self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_roundtrip() {
        let mut spec = ImageSpec::new(16, 8, 3, PixelFormat::F32);
        assert_eq!(spec.roi(), spec.roi_full());

        spec.set_roi(Roi::new(2, 6, 1, 5));
        assert_eq!((spec.x, spec.y, spec.width, spec.height), (2, 1, 4, 4));
        assert_eq!(spec.roi_full().width(), 16);
    }

    #[test]
    fn channelformat_defaults() {
        let mut spec = ImageSpec::new(4, 4, 2, PixelFormat::F32);
        assert_eq!(spec.channelformat(1), PixelFormat::F32);
        spec.channel_formats = vec![PixelFormat::F32, PixelFormat::U32];
        assert_eq!(spec.channelformat(1), PixelFormat::U32);
    }
}
