use chroma_image::Rgb8;

use super::convolution::convolve;
use super::kernels::{self, Kernel};
use super::separable_filter::{Axis, Pass, PassKind};
use super::fits_footprint;
use crate::border::BorderTreatment;
use crate::error::FilterError;
use crate::event::FilterEvent;
use crate::options::FilterOptions;

/// Apply a 3x3 laplace kernel to the central region of an image.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The laplace kernel, e.g. [`kernels::LAPLACE_4`].
///
/// # Returns
///
/// The filtered image; the one pixel frame is copied from the source.
pub fn laplace(src: &Rgb8, kernel: &[[i32; 3]; 3]) -> Result<Rgb8, FilterError> {
    laplace_with_border(src, kernel, BorderTreatment::CentralRegionOnly)
}

/// Apply a 3x3 laplace kernel with the given border treatment.
pub fn laplace_with_border(
    src: &Rgb8,
    kernel: &[[i32; 3]; 3],
    border: BorderTreatment,
) -> Result<Rgb8, FilterError> {
    laplace_with_options(src, kernel, border, FilterOptions::default())
}

/// Apply a 3x3 laplace kernel, with explicit [`FilterOptions`].
pub fn laplace_with_options(
    src: &Rgb8,
    kernel: &[[i32; 3]; 3],
    border: BorderTreatment,
    options: FilterOptions,
) -> Result<Rgb8, FilterError> {
    let laplace = Kernel::from_rows(kernel)?;
    options.notify(FilterEvent::Laplace {
        kernel: *kernel,
        border,
    });
    convolve(src, &laplace, border, options.strategy)
}

/// Blur an image with the mean of a `width` x `height` window.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel_size` - The window `(width, height)`, each in `[1, 15]`.
/// * `border` - How taps outside the image are treated.
pub fn box_blur(
    src: &Rgb8,
    kernel_size: (usize, usize),
    border: BorderTreatment,
) -> Result<Rgb8, FilterError> {
    box_blur_with_options(src, kernel_size, border, FilterOptions::default())
}

/// Blur an image with the mean of a window, with explicit [`FilterOptions`].
pub fn box_blur_with_options(
    src: &Rgb8,
    kernel_size: (usize, usize),
    border: BorderTreatment,
    options: FilterOptions,
) -> Result<Rgb8, FilterError> {
    let (width, height) = kernel_size;
    let kernel = kernels::box_kernel(width, height)?;
    options.notify(FilterEvent::BoxBlur {
        width,
        height,
        border,
    });
    convolve(src, &kernel, border, options.strategy)
}

/// Blur an image with a separable integer gaussian kernel.
///
/// The kernel comes from [`kernels::gaussian_kernel_1d`]. A horizontal smoothing pass over
/// every row is followed by a vertical one, both honoring `border`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `sigma` - The standard deviation, finite and > 0.
/// * `border` - How taps outside the image are treated.
///
/// # Example
///
/// ```
/// use chroma_image::Image;
/// use chroma_imgproc::border::BorderTreatment;
/// use chroma_imgproc::filter::gaussian_blur;
///
/// let src = Image::from_size_pixel([16, 16].into(), [60, 60, 60]).unwrap();
/// let dst = gaussian_blur(&src, 1.0, BorderTreatment::MirroredBorder).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn gaussian_blur(
    src: &Rgb8,
    sigma: f64,
    border: BorderTreatment,
) -> Result<Rgb8, FilterError> {
    gaussian_blur_with_options(src, sigma, border, FilterOptions::default())
}

/// Blur an image with a gaussian kernel, with explicit [`FilterOptions`].
pub fn gaussian_blur_with_options(
    src: &Rgb8,
    sigma: f64,
    border: BorderTreatment,
    options: FilterOptions,
) -> Result<Rgb8, FilterError> {
    let taps = kernels::gaussian_kernel_1d(sigma)?;
    options.notify(FilterEvent::GaussianBlur {
        sigma,
        kernel_len: taps.len(),
        border,
    });

    if !fits_footprint(src, taps.len(), taps.len()) {
        log::debug!(
            "image {} smaller than the {}-tap gaussian kernel, returned unchanged",
            src.size(),
            taps.len()
        );
        return Ok(src.clone());
    }

    let half = taps.len() / 2;
    let xs = border.output_range(src.width(), half, half);
    let ys = border.output_range(src.height(), half, half);

    let pass = |axis| Pass {
        taps: &taps,
        axis,
        kind: PassKind::Smoothing,
        border,
    };

    let horizontal = pass(Axis::X).run(src, src, xs.clone(), 0..src.height(), options.strategy)?;
    pass(Axis::Y).run(&horizontal, src, xs, ys, options.strategy)
}
