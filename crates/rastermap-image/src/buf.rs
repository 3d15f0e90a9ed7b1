use half::f16;

use crate::deep::DeepData;
use crate::error::ImageError;
use crate::pixel::{PixelFormat, PixelType};
use crate::roi::Roi;
use crate::spec::ImageSpec;

/// Typed pixel storage behind the runtime [`PixelFormat`] tag.
#[derive(Debug, Clone)]
pub enum PixelData {
    /// No storage; the image is uninitialized.
    Empty,
    /// 8-bit unsigned storage.
    U8(Vec<u8>),
    /// 8-bit signed storage.
    I8(Vec<i8>),
    /// 16-bit unsigned storage.
    U16(Vec<u16>),
    /// 16-bit signed storage.
    I16(Vec<i16>),
    /// 32-bit unsigned storage.
    U32(Vec<u32>),
    /// 32-bit signed storage.
    I32(Vec<i32>),
    /// 16-bit float storage.
    F16(Vec<f16>),
    /// 32-bit float storage.
    F32(Vec<f32>),
    /// 64-bit float storage.
    F64(Vec<f64>),
}

macro_rules! for_each_data {
    ($data:expr, $v:ident, $body:expr, $empty:expr) => {
        match $data {
            PixelData::Empty => $empty,
            PixelData::U8($v) => $body,
            PixelData::I8($v) => $body,
            PixelData::U16($v) => $body,
            PixelData::I16($v) => $body,
            PixelData::U32($v) => $body,
            PixelData::I32($v) => $body,
            PixelData::F16($v) => $body,
            PixelData::F32($v) => $body,
            PixelData::F64($v) => $body,
        }
    };
}

impl PixelData {
    fn zeroed(format: PixelFormat, len: usize) -> PixelData {
        match format {
            PixelFormat::U8 => PixelData::U8(vec![0; len]),
            PixelFormat::I8 => PixelData::I8(vec![0; len]),
            PixelFormat::U16 => PixelData::U16(vec![0; len]),
            PixelFormat::I16 => PixelData::I16(vec![0; len]),
            PixelFormat::U32 => PixelData::U32(vec![0; len]),
            PixelFormat::I32 => PixelData::I32(vec![0; len]),
            PixelFormat::F16 => PixelData::F16(vec![f16::from_f32(0.0); len]),
            PixelFormat::F32 => PixelData::F32(vec![0.0; len]),
            PixelFormat::F64 => PixelData::F64(vec![0.0; len]),
        }
    }
}

/// A [`PixelType`] that can be stored in and borrowed from [`PixelData`].
pub trait BufElement: PixelType {
    /// Borrow the storage as a typed slice, if the variant matches.
    fn slice(data: &PixelData) -> Option<&[Self]>;
    /// Borrow the storage as a mutable typed slice, if the variant matches.
    fn slice_mut(data: &mut PixelData) -> Option<&mut [Self]>;
    /// Wrap an owned vector into storage.
    fn into_data(v: Vec<Self>) -> PixelData;
}

macro_rules! impl_buf_element {
    ($t:ty, $variant:ident) => {
        impl BufElement for $t {
            fn slice(data: &PixelData) -> Option<&[Self]> {
                match data {
                    PixelData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut PixelData) -> Option<&mut [Self]> {
                match data {
                    PixelData::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }

            fn into_data(v: Vec<Self>) -> PixelData {
                PixelData::$variant(v)
            }
        }
    };
}

impl_buf_element!(u8, U8);
impl_buf_element!(i8, I8);
impl_buf_element!(u16, U16);
impl_buf_element!(i16, I16);
impl_buf_element!(u32, U32);
impl_buf_element!(i32, I32);
impl_buf_element!(f16, F16);
impl_buf_element!(f32, F32);
impl_buf_element!(f64, F64);

/// An image buffer: an [`ImageSpec`] plus pixel storage, optional deep
/// sample storage, and an error channel that transform drivers report
/// failures through.
#[derive(Debug, Clone)]
pub struct ImageBuf {
    spec: ImageSpec,
    data: PixelData,
    deep: Option<DeepData>,
    error: Option<String>,
}

impl Default for ImageBuf {
    fn default() -> Self {
        ImageBuf::uninitialized()
    }
}

impl ImageBuf {
    /// An image with no storage; transforms allocate it via their prep
    /// step.
    pub fn uninitialized() -> ImageBuf {
        ImageBuf {
            spec: ImageSpec::new(0, 0, 0, PixelFormat::F32),
            data: PixelData::Empty,
            deep: None,
            error: None,
        }
    }

    /// Allocate a zero-filled image for `spec`.
    pub fn new(spec: ImageSpec) -> ImageBuf {
        let mut buf = ImageBuf::uninitialized();
        buf.reset(spec);
        buf
    }

    /// Build an image over caller-provided pixel data.
    ///
    /// # Errors
    ///
    /// Fails if `T` does not match `spec.format` or the data length does
    /// not cover the data window.
    pub fn from_data<T: BufElement>(spec: ImageSpec, data: Vec<T>) -> Result<ImageBuf, ImageError> {
        if T::FORMAT != spec.format {
            return Err(ImageError::FormatMismatch(spec.format, T::FORMAT));
        }
        let needed = spec.npixels() * spec.nchannels as usize;
        if data.len() != needed {
            return Err(ImageError::InvalidChannelShape(data.len(), needed));
        }
        Ok(ImageBuf {
            spec,
            data: T::into_data(data),
            deep: None,
            error: None,
        })
    }

    /// Whether the image has pixel storage.
    pub fn initialized(&self) -> bool {
        !matches!(self.data, PixelData::Empty) || self.deep.is_some()
    }

    /// Drop any existing storage and reallocate zero-filled for `spec`.
    pub fn reset(&mut self, spec: ImageSpec) {
        let len = spec.npixels() * spec.nchannels as usize;
        if spec.deep {
            let formats: Vec<PixelFormat> = (0..spec.nchannels)
                .map(|c| spec.channelformat(c))
                .collect();
            self.deep = Some(DeepData::new(spec.npixels(), &formats));
            self.data = PixelData::Empty;
        } else {
            self.data = PixelData::zeroed(spec.format, len);
            self.deep = None;
        }
        self.spec = spec;
        self.error = None;
    }

    /// The image description.
    pub fn spec(&self) -> &ImageSpec {
        &self.spec
    }

    /// Mutable image description. Callers adjusting windows after the fact
    /// must keep the storage length valid.
    pub fn spec_mut(&mut self) -> &mut ImageSpec {
        &mut self.spec
    }

    /// Channel count shorthand.
    pub fn nchannels(&self) -> i32 {
        self.spec.nchannels
    }

    /// Data window shorthand.
    pub fn roi(&self) -> Roi {
        self.spec.roi()
    }

    /// Full window shorthand.
    pub fn roi_full(&self) -> Roi {
        self.spec.roi_full()
    }

    /// Whether this image stores deep sample lists.
    pub fn deep(&self) -> bool {
        self.deep.is_some()
    }

    /// Deep storage, if any.
    pub fn deep_data(&self) -> Option<&DeepData> {
        self.deep.as_ref()
    }

    /// Mutable deep storage, if any.
    pub fn deep_data_mut(&mut self) -> Option<&mut DeepData> {
        self.deep.as_mut()
    }

    /// Borrow the pixels as a typed slice.
    ///
    /// # Errors
    ///
    /// Fails if the image is uninitialized or `T` does not match the
    /// stored format.
    pub fn as_slice<T: BufElement>(&self) -> Result<&[T], ImageError> {
        if !self.initialized() {
            return Err(ImageError::NotInitialized);
        }
        T::slice(&self.data).ok_or(ImageError::FormatMismatch(self.spec.format, T::FORMAT))
    }

    /// Borrow the pixels as a mutable typed slice.
    ///
    /// # Errors
    ///
    /// Fails if the image is uninitialized or `T` does not match the
    /// stored format.
    pub fn as_slice_mut<T: BufElement>(&mut self) -> Result<&mut [T], ImageError> {
        if !self.initialized() {
            return Err(ImageError::NotInitialized);
        }
        T::slice_mut(&mut self.data).ok_or(ImageError::FormatMismatch(self.spec.format, T::FORMAT))
    }

    #[inline]
    fn flat_index(&self, x: i32, y: i32, c: i32) -> usize {
        (((y - self.spec.y) * self.spec.width + (x - self.spec.x)) * self.spec.nchannels + c)
            as usize
    }

    /// Read channel `c` of pixel `(x, y)` as float, regardless of the
    /// stored format. Reads outside the data window return 0.
    pub fn getchannel(&self, x: i32, y: i32, c: i32) -> f32 {
        if !self.spec.roi().contains(x, y) || c < 0 || c >= self.spec.nchannels {
            return 0.0;
        }
        let idx = self.flat_index(x, y, c);
        for_each_data!(&self.data, v, v[idx].to_f32(), 0.0)
    }

    /// Write channel `c` of pixel `(x, y)` from a float, converting to the
    /// stored format. Writes outside the data window are ignored.
    pub fn setchannel(&mut self, x: i32, y: i32, c: i32, val: f32) {
        if !self.spec.roi().contains(x, y) || c < 0 || c >= self.spec.nchannels {
            return;
        }
        let idx = self.flat_index(x, y, c);
        for_each_data!(
            &mut self.data,
            v,
            v[idx] = PixelType::from_f32(val),
            ()
        )
    }

    /// Replace this image with a copy of `src` (spec, pixels, deep data).
    pub fn copy_from(&mut self, src: &ImageBuf) -> Result<(), ImageError> {
        if !src.initialized() {
            return Err(ImageError::NotInitialized);
        }
        self.spec = src.spec.clone();
        self.data = src.data.clone();
        self.deep = src.deep.clone();
        self.error = None;
        Ok(())
    }

    /// Record an error message on this image's error channel.
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Whether an error has been recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The recorded error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
