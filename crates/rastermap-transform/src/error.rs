use rastermap_image::ImageError;

/// An error type for the transform drivers.
#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    /// The requested filter name is not in the catalog.
    #[error("Filter \"{0}\" not recognized")]
    UnknownFilter(String),

    /// The source image has no pixel storage.
    #[error("Uninitialized source image")]
    UninitializedSource,

    /// The ROI spans more than one z slice.
    #[error("Volumetric images are not supported")]
    VolumeNotSupported,

    /// Deep images are only supported where explicitly allowed.
    #[error("Deep images are not supported by this operation")]
    DeepNotSupported,

    /// Source and destination deep-ness must agree.
    #[error("Source and destination must both be deep or both be flat")]
    DeepMismatch,

    /// The initialized destination cannot hold the requested channels.
    #[error("Destination has {0} channels but the ROI needs {1}")]
    ChannelMismatch(i32, i32),

    /// A container operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}
