#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use rastermap_image as image;

#[doc(inline)]
pub use rastermap_filter as filter;

#[doc(inline)]
pub use rastermap_transform as transform;
