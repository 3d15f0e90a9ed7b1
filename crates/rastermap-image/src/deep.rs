use crate::pixel::PixelFormat;

/// Per-channel sample storage for one deep pixel.
///
/// Channels declared `U32` keep their integer values bit-exact; all other
/// formats are held as `f32`.
#[derive(Debug, Clone)]
enum DeepChannel {
    F32(Vec<f32>),
    U32(Vec<u32>),
}

impl DeepChannel {
    fn resize(&mut self, n: usize) {
        match self {
            DeepChannel::F32(v) => v.resize(n, 0.0),
            DeepChannel::U32(v) => v.resize(n, 0),
        }
    }
}

/// One deep pixel: a variable-length list of samples per channel.
#[derive(Debug, Clone)]
pub struct DeepPixel {
    nsamples: usize,
    chans: Vec<DeepChannel>,
}

impl DeepPixel {
    fn new(channel_formats: &[PixelFormat]) -> DeepPixel {
        DeepPixel {
            nsamples: 0,
            chans: channel_formats
                .iter()
                .map(|f| match f {
                    PixelFormat::U32 => DeepChannel::U32(Vec::new()),
                    _ => DeepChannel::F32(Vec::new()),
                })
                .collect(),
        }
    }

    /// Number of samples stored at this pixel.
    pub fn samples(&self) -> usize {
        self.nsamples
    }

    /// Resize every channel to hold `n` samples.
    ///
    /// Not safe to call concurrently with anything else touching this
    /// pixel; callers grow samples in a serial pass.
    pub fn set_samples(&mut self, n: usize) {
        self.nsamples = n;
        for ch in &mut self.chans {
            ch.resize(n);
        }
    }

    /// Sample `s` of channel `c` as float.
    pub fn value(&self, c: usize, s: usize) -> f32 {
        match &self.chans[c] {
            DeepChannel::F32(v) => v[s],
            DeepChannel::U32(v) => v[s] as f32,
        }
    }

    /// Sample `s` of channel `c` with integer values preserved.
    pub fn value_u32(&self, c: usize, s: usize) -> u32 {
        match &self.chans[c] {
            DeepChannel::F32(v) => v[s] as u32,
            DeepChannel::U32(v) => v[s],
        }
    }

    /// Store a float into sample `s` of channel `c`.
    pub fn set_value(&mut self, c: usize, s: usize, val: f32) {
        match &mut self.chans[c] {
            DeepChannel::F32(v) => v[s] = val,
            DeepChannel::U32(v) => v[s] = val as u32,
        }
    }

    /// Store an integer into sample `s` of channel `c`, bit-exact for U32
    /// channels.
    pub fn set_value_u32(&mut self, c: usize, s: usize, val: u32) {
        match &mut self.chans[c] {
            DeepChannel::F32(v) => v[s] = val as f32,
            DeepChannel::U32(v) => v[s] = val,
        }
    }
}

/// Deep storage for a whole data window: one [`DeepPixel`] per raster
/// position, in row-major order.
#[derive(Debug, Clone)]
pub struct DeepData {
    pixels: Vec<DeepPixel>,
}

impl DeepData {
    /// Allocate empty deep storage for `npixels` pixels with the given
    /// per-channel formats.
    pub fn new(npixels: usize, channel_formats: &[PixelFormat]) -> DeepData {
        DeepData {
            pixels: vec![DeepPixel::new(channel_formats); npixels],
        }
    }

    /// Number of pixels covered.
    pub fn npixels(&self) -> usize {
        self.pixels.len()
    }

    /// The pixel at flat index `idx`.
    pub fn pixel(&self, idx: usize) -> &DeepPixel {
        &self.pixels[idx]
    }

    /// Mutable pixel at flat index `idx`.
    pub fn pixel_mut(&mut self, idx: usize) -> &mut DeepPixel {
        &mut self.pixels[idx]
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[DeepPixel] {
        &self.pixels
    }

    /// All pixels mutably, row-major. Used to hand out disjoint row spans
    /// to parallel workers once sample counts are fixed.
    pub fn pixels_mut(&mut self) -> &mut [DeepPixel] {
        &mut self.pixels
    }
}
