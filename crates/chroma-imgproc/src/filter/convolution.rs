use chroma_image::Rgb8;

use super::kernels::{window_extent, Kernel};
use super::{fits_footprint, write_pixel, TapSum};
use crate::border::BorderTreatment;
use crate::color::rgb_from_luma_chroma;
use crate::error::FilterError;
use crate::event::FilterEvent;
use crate::options::FilterOptions;
use crate::parallel::{for_each_row, ExecutionStrategy};

/// Convolve an image with a 2D kernel in the luma/chroma domain.
///
/// The kernel rows walk the image columns: the tap at kernel row `v` and column `u`
/// samples the pixel `(x + v - half_height, y + u - half_width)`. The sums are weighted
/// by `1 / (width * height)` of the kernel, rounded and saturated before converting back
/// to RGB.
///
/// Pixels outside the evaluated region are copied from the source. Images smaller than the
/// kernel footprint are returned unchanged.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The 2D kernel.
/// * `border` - How taps outside the image are treated.
///
/// # Returns
///
/// The filtered image.
///
/// # Example
///
/// ```
/// use chroma_image::Image;
/// use chroma_imgproc::border::BorderTreatment;
/// use chroma_imgproc::filter::{filter2d, kernels::box_kernel};
///
/// let src = Image::from_size_pixel([4, 4].into(), [40, 80, 120]).unwrap();
/// let kernel = box_kernel(3, 3).unwrap();
/// let dst = filter2d(&src, &kernel, BorderTreatment::MirroredBorder).unwrap();
/// assert_eq!(dst.size(), src.size());
/// ```
pub fn filter2d(
    src: &Rgb8,
    kernel: &Kernel,
    border: BorderTreatment,
) -> Result<Rgb8, FilterError> {
    filter2d_with_options(src, kernel, border, FilterOptions::default())
}

/// Convolve an image with a 2D kernel, with explicit [`FilterOptions`].
///
/// See [`filter2d`].
pub fn filter2d_with_options(
    src: &Rgb8,
    kernel: &Kernel,
    border: BorderTreatment,
    options: FilterOptions,
) -> Result<Rgb8, FilterError> {
    options.notify(FilterEvent::Convolution {
        kernel_width: kernel.width(),
        kernel_height: kernel.height(),
        border,
    });
    convolve(src, kernel, border, options.strategy)
}

/// Convolve an image with a kernel given as row-major data and its dimensions.
///
/// The kernel is validated before any pixel is processed.
///
/// # Errors
///
/// The [`Kernel::new`] errors.
pub fn filter2d_from_slice(
    src: &Rgb8,
    data: &[i32],
    width: usize,
    height: usize,
    border: BorderTreatment,
) -> Result<Rgb8, FilterError> {
    let kernel = Kernel::new(data.to_vec(), width, height)?;
    filter2d(src, &kernel, border)
}

pub(crate) fn convolve(
    src: &Rgb8,
    kernel: &Kernel,
    border: BorderTreatment,
    strategy: ExecutionStrategy,
) -> Result<Rgb8, FilterError> {
    let mut dst = src.clone();

    // kernel rows span the x axis, kernel columns the y axis
    if !fits_footprint(src, kernel.height(), kernel.width()) {
        log::debug!(
            "image {} smaller than the {}x{} kernel, returned unchanged",
            src.size(),
            kernel.width(),
            kernel.height()
        );
        return Ok(dst);
    }

    let (before_x, after_x) = window_extent(kernel.height());
    let (before_y, after_y) = window_extent(kernel.width());
    let xs = border.output_range(src.width(), before_x, after_x);
    let ys = border.output_range(src.height(), before_y, after_y);
    let weight = 1.0 / (kernel.width() * kernel.height()) as f64;

    log::trace!("convolution over x {xs:?}, y {ys:?}, weight {weight}");

    for_each_row(strategy, &mut dst, |y, row| {
        if !ys.contains(&y) {
            return;
        }
        for x in xs.clone() {
            let mut sum = TapSum::default();
            for v in 0..kernel.height() {
                let sx = (x + v) as isize - before_x as isize;
                for u in 0..kernel.width() {
                    let sy = (y + u) as isize - before_y as isize;
                    sum.add(border.sample(src, sx, sy), kernel.at(v, u));
                }
            }
            let value = sum.scale(weight).saturate();
            write_pixel(row, x, rgb_from_luma_chroma(value));
        }
    })?;

    Ok(dst)
}
