#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! An image here is a 2D raster bound to a *data window* (the pixel region
//! that actually stores values) inside a *full window* (the reference
//! rectangle that defines the image's normalized coordinate space), with a
//! channel count and a per-channel numeric format chosen at runtime.
//! Reads outside the data window are resolved by a [`WrapMode`] policy.

/// Image buffer container.
pub mod buf;

/// Deep pixel storage (variable-length sample lists per pixel).
pub mod deep;

/// Error types for image operations.
pub mod error;

/// Runtime pixel formats and typed element traits.
pub mod pixel;

/// Region-of-interest rectangles.
pub mod roi;

/// Image geometry and format description.
pub mod spec;

/// Out-of-window read policies.
pub mod wrap;

pub use half::f16;

pub use crate::buf::{BufElement, ImageBuf, PixelData};
pub use crate::deep::{DeepData, DeepPixel};
pub use crate::error::ImageError;
pub use crate::pixel::{AccumType, PixelFormat, PixelType};
pub use crate::roi::Roi;
pub use crate::spec::ImageSpec;
pub use crate::wrap::WrapMode;
