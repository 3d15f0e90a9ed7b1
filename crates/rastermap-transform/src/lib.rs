#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Every transform maps destination pixel centers (at half-integer
//! coordinates) back into source space through the full-window NDC
//! convention, gathers a filter-weighted neighborhood, and writes the
//! destination in parallel over disjoint row spans. Drivers come in two
//! flavors (a borrowed [`rastermap_filter::Filter2D`], or a filter name
//! resolved through the catalog) and two shapes (`*_into` a caller
//! destination returning a success flag, or returning a freshly
//! allocated destination). Failures land on the destination image's
//! error channel.

mod dispatch;
mod parallel;
mod prep;
mod sample;

/// Dual numbers for analytic Jacobians.
pub mod dual;

/// Error types for the transform drivers.
pub mod error;

/// Aspect-preserving placement into a target rectangle.
pub mod fit;

/// 3x3 row-vector matrices and ROI projection.
pub mod matrix;

/// Nearest/bilinear point resampling, including deep images.
pub mod resample;

/// Filtered scaling between full windows.
pub mod resize;

/// Projective warps and rotation.
pub mod warp;

pub use crate::dual::Dual2;
pub use crate::error::TransformError;
pub use crate::fit::{fit, fit_filter, fit_filter_into, fit_into};
pub use crate::matrix::M33;
pub use crate::resample::{resample, resample_into};
pub use crate::resize::{resize, resize_filter, resize_filter_into, resize_into};
pub use crate::warp::{
    rotate, rotate_filter, rotate_filter_into, rotate_into, warp, warp_filter, warp_filter_into,
    warp_into,
};
