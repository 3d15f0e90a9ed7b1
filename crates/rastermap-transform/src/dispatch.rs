/// Bind a runtime [`rastermap_image::PixelFormat`] to a concrete element
/// type and evaluate `$body` with `$T` aliased to it.
///
/// Nesting two invocations builds the two-dimensional
/// (destination, source) format jump table the kernels are instantiated
/// through:
///
/// ```ignore
/// with_pixel_format!(dst_format, D, {
///     with_pixel_format!(src_format, S, { kernel::<D, S>(dst, src, roi) })
/// })
/// ```
macro_rules! with_pixel_format {
    ($fmt:expr, $T:ident, $body:expr) => {
        match $fmt {
            rastermap_image::PixelFormat::U8 => {
                type $T = u8;
                $body
            }
            rastermap_image::PixelFormat::I8 => {
                type $T = i8;
                $body
            }
            rastermap_image::PixelFormat::U16 => {
                type $T = u16;
                $body
            }
            rastermap_image::PixelFormat::I16 => {
                type $T = i16;
                $body
            }
            rastermap_image::PixelFormat::U32 => {
                type $T = u32;
                $body
            }
            rastermap_image::PixelFormat::I32 => {
                type $T = i32;
                $body
            }
            rastermap_image::PixelFormat::F16 => {
                type $T = rastermap_image::f16;
                $body
            }
            rastermap_image::PixelFormat::F32 => {
                type $T = f32;
                $body
            }
            rastermap_image::PixelFormat::F64 => {
                type $T = f64;
                $body
            }
        }
    };
}

pub(crate) use with_pixel_format;
