#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! A [`Filter2D`] is a sampled 2D reconstruction kernel with a support
//! `(width, height)` in source pixels and a separability flag. Separable
//! filters factor as `f(x, y) = xfilt(x) * yfilt(y)` and let resize build
//! independent 1D tap tables per axis. Several kernels have negative
//! lobes; evaluators return those true negative values and any
//! normalization is the caller's business.

/// Filter trait, descriptors and the named catalog.
pub mod filter;

/// Raw 1D kernel math shared by the concrete filters.
pub mod kernels;

pub use crate::filter::{Filter2D, FilterDesc};
