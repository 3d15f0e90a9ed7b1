use crate::kernels;

/// A sampled 2D reconstruction kernel.
///
/// `width()` and `height()` give the support in source pixels, centered on
/// the sample point. Separable filters factor into the 1D evaluators
/// [`Filter2D::xfilt`] and [`Filter2D::yfilt`]; non-separable filters are
/// evaluated through [`Filter2D::eval`] only.
pub trait Filter2D: Send + Sync {
    /// Catalog name of this filter.
    fn name(&self) -> &'static str;

    /// Horizontal support in source pixels.
    fn width(&self) -> f32;

    /// Vertical support in source pixels.
    fn height(&self) -> f32;

    /// Whether `eval(x, y) == xfilt(x) * yfilt(y)`.
    fn separable(&self) -> bool;

    /// Evaluate the 2D kernel at `(x, y)` pixels from the center.
    fn eval(&self, x: f32, y: f32) -> f32;

    /// Evaluate the horizontal 1D factor.
    fn xfilt(&self, x: f32) -> f32;

    /// Evaluate the vertical 1D factor.
    fn yfilt(&self, y: f32) -> f32;
}

/// Catalog entry describing a named filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterDesc {
    /// Catalog name.
    pub name: &'static str,
    /// Recommended support width in pixels.
    pub width: f32,
    /// Whether the filter ignores a caller-requested width.
    pub fixedwidth: bool,
    /// Whether the kernel factors into 1D parts.
    pub separable: bool,
}

// A separable kernel whose natural domain [-natural/2, natural/2] is
// stretched onto the requested support per axis.
struct Stretched1D {
    name: &'static str,
    width: f32,
    height: f32,
    natural: f32,
    kernel: fn(f32) -> f32,
}

impl Filter2D for Stretched1D {
    fn name(&self) -> &'static str {
        self.name
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn separable(&self) -> bool {
        true
    }

    fn eval(&self, x: f32, y: f32) -> f32 {
        self.xfilt(x) * self.yfilt(y)
    }

    #[inline]
    fn xfilt(&self, x: f32) -> f32 {
        (self.kernel)(x * self.natural / self.width)
    }

    #[inline]
    fn yfilt(&self, y: f32) -> f32 {
        (self.kernel)(y * self.natural / self.height)
    }
}

// Truncated sinc. Unlike the stretched kernels, widening the support does
// not rescale the oscillation, it only admits more lobes.
struct SincFilter {
    width: f32,
    height: f32,
}

impl Filter2D for SincFilter {
    fn name(&self) -> &'static str {
        "sinc"
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn separable(&self) -> bool {
        true
    }

    fn eval(&self, x: f32, y: f32) -> f32 {
        self.xfilt(x) * self.yfilt(y)
    }

    fn xfilt(&self, x: f32) -> f32 {
        if x.abs() > 0.5 * self.width {
            0.0
        } else {
            kernels::sinc(x)
        }
    }

    fn yfilt(&self, y: f32) -> f32 {
        if y.abs() > 0.5 * self.height {
            0.0
        } else {
            kernels::sinc(y)
        }
    }
}

// Radially symmetric lanczos3; not separable.
struct RadialLanczos3 {
    width: f32,
    height: f32,
}

impl Filter2D for RadialLanczos3 {
    fn name(&self) -> &'static str {
        "radial-lanczos3"
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn separable(&self) -> bool {
        false
    }

    fn eval(&self, x: f32, y: f32) -> f32 {
        let xs = x * 6.0 / self.width;
        let ys = y * 6.0 / self.height;
        kernels::lanczos(3.0, (xs * xs + ys * ys).sqrt())
    }

    fn xfilt(&self, x: f32) -> f32 {
        kernels::lanczos(3.0, x * 6.0 / self.width)
    }

    fn yfilt(&self, y: f32) -> f32 {
        kernels::lanczos(3.0, y * 6.0 / self.height)
    }
}

// Flat circular footprint; not separable.
struct DiskFilter {
    width: f32,
    height: f32,
}

impl Filter2D for DiskFilter {
    fn name(&self) -> &'static str {
        "disk"
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn separable(&self) -> bool {
        false
    }

    fn eval(&self, x: f32, y: f32) -> f32 {
        let xs = x * 2.0 / self.width;
        let ys = y * 2.0 / self.height;
        if xs * xs + ys * ys < 1.0 {
            1.0
        } else {
            0.0
        }
    }

    fn xfilt(&self, x: f32) -> f32 {
        if (x * 2.0 / self.width).abs() < 1.0 {
            1.0
        } else {
            0.0
        }
    }

    fn yfilt(&self, y: f32) -> f32 {
        if (y * 2.0 / self.height).abs() < 1.0 {
            1.0
        } else {
            0.0
        }
    }
}

#[inline]
fn box_kernel(x: f32) -> f32 {
    if x.abs() <= 0.5 {
        1.0
    } else {
        0.0
    }
}

#[inline]
fn triangle_kernel(x: f32) -> f32 {
    (1.0 - x.abs()).max(0.0)
}

#[inline]
fn mitchell_kernel(x: f32) -> f32 {
    kernels::cubic_bc(1.0 / 3.0, 1.0 / 3.0, x)
}

#[inline]
fn bspline_kernel(x: f32) -> f32 {
    kernels::cubic_bc(1.0, 0.0, x)
}

#[inline]
fn catmull_rom_kernel(x: f32) -> f32 {
    kernels::cubic_bc(0.0, 0.5, x)
}

#[inline]
fn lanczos3_kernel(x: f32) -> f32 {
    kernels::lanczos(3.0, x)
}

const CATALOG: &[FilterDesc] = &[
    FilterDesc {
        name: "box",
        width: 1.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "triangle",
        width: 2.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "gaussian",
        width: 3.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "sharp-gaussian",
        width: 2.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "blackman-harris",
        width: 3.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "mitchell",
        width: 4.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "b-spline",
        width: 4.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "catmull-rom",
        width: 4.0,
        fixedwidth: true,
        separable: true,
    },
    FilterDesc {
        name: "sinc",
        width: 4.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "lanczos3",
        width: 6.0,
        fixedwidth: false,
        separable: true,
    },
    FilterDesc {
        name: "radial-lanczos3",
        width: 6.0,
        fixedwidth: false,
        separable: false,
    },
    FilterDesc {
        name: "disk",
        width: 1.0,
        fixedwidth: false,
        separable: false,
    },
];

fn stretched(
    name: &'static str,
    width: f32,
    height: f32,
    natural: f32,
    kernel: fn(f32) -> f32,
) -> Box<dyn Filter2D> {
    Box::new(Stretched1D {
        name,
        width,
        height,
        natural,
        kernel,
    })
}

impl dyn Filter2D {
    /// Number of filters in the catalog.
    pub fn num_filters() -> usize {
        CATALOG.len()
    }

    /// The `i`-th catalog entry.
    pub fn filterdesc(i: usize) -> FilterDesc {
        CATALOG[i]
    }

    /// Look up a catalog entry by exact name.
    pub fn find(name: &str) -> Option<FilterDesc> {
        CATALOG.iter().find(|fd| fd.name == name).copied()
    }

    /// Create a filter by exact catalog name with the given support.
    ///
    /// Width or height values `<= 0` fall back to the catalog default, as
    /// does any request on a fixed-width filter. Unknown names yield
    /// `None`.
    pub fn create(name: &str, width: f32, height: f32) -> Option<Box<dyn Filter2D>> {
        let fd = Self::find(name)?;
        let w = if fd.fixedwidth || width <= 0.0 {
            fd.width
        } else {
            width
        };
        let h = if fd.fixedwidth || height <= 0.0 {
            fd.width
        } else {
            height
        };
        let filter: Box<dyn Filter2D> = match fd.name {
            "box" => stretched("box", w, h, 1.0, box_kernel),
            "triangle" => stretched("triangle", w, h, 2.0, triangle_kernel),
            "gaussian" => stretched("gaussian", w, h, 2.0, kernels::gaussian),
            "sharp-gaussian" => stretched("sharp-gaussian", w, h, 2.0, kernels::sharp_gaussian),
            "blackman-harris" => stretched("blackman-harris", w, h, 2.0, kernels::blackman_harris),
            "mitchell" => stretched("mitchell", w, h, 4.0, mitchell_kernel),
            "b-spline" => stretched("b-spline", w, h, 4.0, bspline_kernel),
            "catmull-rom" => stretched("catmull-rom", w, h, 4.0, catmull_rom_kernel),
            "sinc" => Box::new(SincFilter {
                width: w,
                height: h,
            }),
            "lanczos3" => stretched("lanczos3", w, h, 6.0, lanczos3_kernel),
            "radial-lanczos3" => Box::new(RadialLanczos3 {
                width: w,
                height: h,
            }),
            "disk" => Box::new(DiskFilter {
                width: w,
                height: h,
            }),
            _ => return None,
        };
        Some(filter)
    }
}
