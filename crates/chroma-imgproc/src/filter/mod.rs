mod convolution;
pub use convolution::*;

/// Kernel types and stock kernels.
pub mod kernels;
pub use kernels::{Kernel, SeparableKernel, MAX_KERNEL_SIZE};

mod ops;
pub use ops::*;

mod separable_filter;
pub use separable_filter::*;

use chroma_image::Rgb8;

use crate::color::LumaChroma;

/// Running per-channel sum of weighted luma/chroma taps.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TapSum {
    y: i64,
    cb: i64,
    cr: i64,
}

impl TapSum {
    #[inline]
    pub(crate) fn add(&mut self, value: LumaChroma, weight: i32) {
        let weight = weight as i64;
        self.y += value.y as i64 * weight;
        self.cb += value.cb as i64 * weight;
        self.cr += value.cr as i64 * weight;
    }

    /// Scale by `factor` and round half away from zero. The result is not saturated.
    #[inline]
    pub(crate) fn scale(self, factor: f64) -> LumaChroma {
        let scale = |s: i64| (s as f64 * factor).round() as i32;
        LumaChroma::new(scale(self.y), scale(self.cb), scale(self.cr))
    }
}

/// Whether a window of `x_len` by `y_len` taps fits inside the image.
pub(crate) fn fits_footprint(src: &Rgb8, x_len: usize, y_len: usize) -> bool {
    !src.is_empty() && src.width() >= x_len && src.height() >= y_len
}

/// Write an RGB pixel at column `x` of an image row.
#[inline]
pub(crate) fn write_pixel(row: &mut [u8], x: usize, rgb: [u8; 3]) {
    row[x * 3..x * 3 + 3].copy_from_slice(&rgb);
}
