/// An error type for image container operations.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// The data length handed to a constructor does not match the spec.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// The buffer holds pixels of a different format than requested.
    #[error("Image holds {0} pixels, not {1}")]
    FormatMismatch(crate::pixel::PixelFormat, crate::pixel::PixelFormat),

    /// The image has no pixel storage yet.
    #[error("Image is not initialized")]
    NotInitialized,

    /// A spec field is out of range (zero-sized window, bad channel count).
    #[error("Invalid image spec: {0}")]
    InvalidSpec(String),

    /// Deep storage was requested on a non-deep image or vice versa.
    #[error("Deep pixel storage mismatch")]
    DeepMismatch,
}
