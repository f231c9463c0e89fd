use std::ops::Range;

use chroma_image::Rgb8;

use super::kernels::SeparableKernel;
use super::{fits_footprint, write_pixel, TapSum};
use crate::border::BorderTreatment;
use crate::color::{luma_chroma_from_rgb, rgb_from_luma_chroma, LumaChroma, CHROMA_RANGE};
use crate::error::FilterError;
use crate::event::FilterEvent;
use crate::options::FilterOptions;
use crate::parallel::{for_each_row, ExecutionStrategy};

/// Luma offset added by derivative passes so a zero derivative is mid-gray.
pub const DERIVATIVE_OFFSET: i32 = 127;

/// The image returned by the separable edge filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeOutput {
    /// Gradient magnitude of both axis responses, as gray.
    #[default]
    Magnitude,
    /// The x axis response only.
    XOnly,
    /// The y axis response only.
    YOnly,
}

impl TryFrom<u8> for EdgeOutput {
    type Error = FilterError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EdgeOutput::Magnitude),
            1 => Ok(EdgeOutput::XOnly),
            2 => Ok(EdgeOutput::YOnly),
            _ => Err(FilterError::InvalidEdgeOutput(code)),
        }
    }
}

impl std::fmt::Display for EdgeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            EdgeOutput::Magnitude => "magnitude",
            EdgeOutput::XOnly => "x only",
            EdgeOutput::YOnly => "y only",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassKind {
    /// Signed luma, shifted by [`DERIVATIVE_OFFSET`].
    Derivative,
    Smoothing,
}

impl PassKind {
    #[inline]
    fn saturate(self, value: LumaChroma) -> LumaChroma {
        match self {
            PassKind::Derivative => LumaChroma::new(
                value.y.clamp(CHROMA_RANGE.0, CHROMA_RANGE.1) + DERIVATIVE_OFFSET,
                value.cb,
                value.cr,
            )
            .saturate(),
            PassKind::Smoothing => value.saturate(),
        }
    }
}

/// A single 1D pass of a separable filter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pass<'a> {
    pub taps: &'a [i32],
    pub axis: Axis,
    pub kind: PassKind,
    pub border: BorderTreatment,
}

impl Pass<'_> {
    /// Run the pass over `xs` by `ys`, reading from `src`.
    ///
    /// The output starts as a copy of `base`; pixels outside the ranges keep that value.
    /// Taps are `[-half, half]` around the output pixel and weighted by `1 / Σ|taps|`.
    pub(crate) fn run(
        &self,
        src: &Rgb8,
        base: &Rgb8,
        xs: Range<usize>,
        ys: Range<usize>,
        strategy: ExecutionStrategy,
    ) -> Result<Rgb8, FilterError> {
        let abs_sum: i64 = self.taps.iter().map(|&w| (w as i64).abs()).sum();
        if abs_sum == 0 {
            return Err(FilterError::DegenerateKernel);
        }
        let weight = 1.0 / abs_sum as f64;
        let half = (self.taps.len() / 2) as isize;

        log::trace!(
            "{:?} pass along {:?}: {} taps over x {xs:?}, y {ys:?}",
            self.kind,
            self.axis,
            self.taps.len()
        );

        let mut dst = base.clone();
        for_each_row(strategy, &mut dst, |y, row| {
            if !ys.contains(&y) {
                return;
            }
            for x in xs.clone() {
                let mut sum = TapSum::default();
                for (i, &w) in self.taps.iter().enumerate() {
                    let offset = i as isize - half;
                    let (sx, sy) = match self.axis {
                        Axis::X => (x as isize + offset, y as isize),
                        Axis::Y => (x as isize, y as isize + offset),
                    };
                    sum.add(self.border.sample(src, sx, sy), w);
                }
                let value = self.kind.saturate(sum.scale(weight));
                write_pixel(row, x, rgb_from_luma_chroma(value));
            }
        })?;

        Ok(dst)
    }
}

/// Apply a separable edge filter.
///
/// Each axis response runs a derivative pass along the axis, over full lines of the other
/// axis, followed by a smoothing pass along the other axis. Derivative luma is signed and
/// shifted by [`DERIVATIVE_OFFSET`], so flat regions of a response are mid-gray.
///
/// For [`EdgeOutput::Magnitude`] the bias is removed from both response lumas and the
/// result is rescaled to 8 bits: `g = 2 * (Y - 127)`, then `sqrt(gx² + gy²)` is rounded,
/// saturated and written as gray.
///
/// Only pixels at least `half_len` away from every edge are evaluated; the rest are copied
/// from the source.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The derivative and smoothing pair.
/// * `output` - The response to return.
///
/// # Example
///
/// ```
/// use chroma_image::Image;
/// use chroma_imgproc::filter::{edge_filter, kernels::sobel_kernel_1d, EdgeOutput};
///
/// let src = Image::from_size_pixel([5, 5].into(), [90, 90, 90]).unwrap();
/// let dst = edge_filter(&src, &sobel_kernel_1d(), EdgeOutput::Magnitude).unwrap();
/// assert_eq!(dst.pixel(2, 2), [0, 0, 0]);
/// ```
pub fn edge_filter(
    src: &Rgb8,
    kernel: &SeparableKernel,
    output: EdgeOutput,
) -> Result<Rgb8, FilterError> {
    edge_filter_with_options(src, kernel, output, FilterOptions::default())
}

/// Apply a separable edge filter given as two raw kernel vectors.
///
/// # Errors
///
/// The [`SeparableKernel::new`] errors, raised before any pixel is processed.
pub fn edge_filter_from_slices(
    src: &Rgb8,
    derivative: &[i32],
    smoothing: &[i32],
    output: EdgeOutput,
) -> Result<Rgb8, FilterError> {
    let kernel = SeparableKernel::new(derivative.to_vec(), smoothing.to_vec())?;
    edge_filter(src, &kernel, output)
}

/// Apply a separable edge filter, with explicit [`FilterOptions`].
///
/// See [`edge_filter`].
pub fn edge_filter_with_options(
    src: &Rgb8,
    kernel: &SeparableKernel,
    output: EdgeOutput,
    options: FilterOptions,
) -> Result<Rgb8, FilterError> {
    options.notify(FilterEvent::EdgeFilter {
        derivative: kernel.derivative().to_vec(),
        smoothing: kernel.smoothing().to_vec(),
        output,
    });

    if !fits_footprint(src, kernel.len(), kernel.len()) {
        log::debug!(
            "image {} smaller than the {}-tap edge kernel, returned unchanged",
            src.size(),
            kernel.len()
        );
        return Ok(src.clone());
    }

    let half = kernel.half_len();
    let central = BorderTreatment::CentralRegionOnly;
    let xs = central.output_range(src.width(), half, half);
    let ys = central.output_range(src.height(), half, half);

    let derivative = |axis| Pass {
        taps: kernel.derivative(),
        axis,
        kind: PassKind::Derivative,
        border: central,
    };
    let smoothing = |axis| Pass {
        taps: kernel.smoothing(),
        axis,
        kind: PassKind::Smoothing,
        border: central,
    };

    let x_response = || -> Result<Rgb8, FilterError> {
        let pass = derivative(Axis::X).run(src, src, xs.clone(), 0..src.height(), options.strategy)?;
        smoothing(Axis::Y).run(&pass, src, xs.clone(), ys.clone(), options.strategy)
    };
    let y_response = || -> Result<Rgb8, FilterError> {
        let pass = derivative(Axis::Y).run(src, src, 0..src.width(), ys.clone(), options.strategy)?;
        smoothing(Axis::X).run(&pass, src, xs.clone(), ys.clone(), options.strategy)
    };

    match output {
        EdgeOutput::XOnly => x_response(),
        EdgeOutput::YOnly => y_response(),
        EdgeOutput::Magnitude => {
            let gx = x_response()?;
            let gy = y_response()?;
            gradient_magnitude(src, &gx, &gy, xs, ys, options.strategy)
        }
    }
}

/// Unbiased, 8-bit scaled gradient component from a response pixel.
#[inline]
fn gradient(rgb: [u8; 3]) -> f64 {
    (2 * (luma_chroma_from_rgb(rgb).y - DERIVATIVE_OFFSET)) as f64
}

fn gradient_magnitude(
    src: &Rgb8,
    gx: &Rgb8,
    gy: &Rgb8,
    xs: Range<usize>,
    ys: Range<usize>,
    strategy: ExecutionStrategy,
) -> Result<Rgb8, FilterError> {
    let mut dst = src.clone();
    for_each_row(strategy, &mut dst, |y, row| {
        if !ys.contains(&y) {
            return;
        }
        for x in xs.clone() {
            let dx = gradient(gx.pixel(x, y));
            let dy = gradient(gy.pixel(x, y));
            let norm = (dx * dx + dy * dy).sqrt().round().clamp(0.0, 255.0) as u8;
            write_pixel(row, x, [norm; 3]);
        }
    })?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventRecorder;
    use crate::filter::kernels::{prewitt_kernel_1d, sobel_kernel_1d};
    use chroma_image::{Image, ImageError};

    fn gray_rows(rows: &[&[u8]]) -> Rgb8 {
        let width = rows.first().map_or(0, |r| r.len());
        let data = rows.iter().flat_map(|r| r.iter()).flat_map(|&v| [v, v, v]).collect();
        Image::new([width, rows.len()].into(), data).unwrap()
    }

    fn vertical_edge_6x5() -> Result<Rgb8, ImageError> {
        let mut data = Vec::new();
        for _ in 0..5 {
            for x in 0..6 {
                let v = if x < 3 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Image::new([6, 5].into(), data)
    }

    #[test]
    fn test_edge_output_from_code() {
        assert_eq!(EdgeOutput::try_from(0), Ok(EdgeOutput::Magnitude));
        assert_eq!(EdgeOutput::try_from(1), Ok(EdgeOutput::XOnly));
        assert_eq!(EdgeOutput::try_from(2), Ok(EdgeOutput::YOnly));
        assert_eq!(
            EdgeOutput::try_from(3),
            Err(FilterError::InvalidEdgeOutput(3))
        );
    }

    #[test]
    fn test_derivative_offset_regression() -> Result<(), FilterError> {
        // a zero derivative lands on mid-gray, not black
        let src = Image::from_size_pixel([5, 4].into(), [200, 30, 90])?;
        let dst = edge_filter(&src, &sobel_kernel_1d(), EdgeOutput::XOnly)?;
        for y in 1..3 {
            for x in 1..4 {
                assert_eq!(dst.pixel(x, y), [127, 127, 127]);
            }
        }
        assert_eq!(dst.pixel(0, 0), [200, 30, 90]);
        assert_eq!(dst.pixel(4, 3), [200, 30, 90]);

        assert_eq!(
            PassKind::Derivative.saturate(LumaChroma::new(-300, 0, 0)),
            LumaChroma::ZERO
        );
        assert_eq!(
            PassKind::Derivative.saturate(LumaChroma::new(300, 200, -200)),
            LumaChroma::new(254, 127, -128)
        );
        assert_eq!(
            PassKind::Smoothing.saturate(LumaChroma::new(300, 0, 0)),
            LumaChroma::new(255, 0, 0)
        );
        Ok(())
    }

    #[test]
    fn test_vertical_edge_responses() -> Result<(), FilterError> {
        let src = vertical_edge_6x5()?;
        let kernel = sobel_kernel_1d();

        let x = edge_filter(&src, &kernel, EdgeOutput::XOnly)?;
        #[rustfmt::skip]
        let expected = gray_rows(&[
            &[0, 0, 0, 255, 255, 255],
            &[0, 127, 254, 254, 127, 255],
            &[0, 127, 254, 254, 127, 255],
            &[0, 127, 254, 254, 127, 255],
            &[0, 0, 0, 255, 255, 255],
        ]);
        assert_eq!(x, expected);

        let y = edge_filter(&src, &kernel, EdgeOutput::YOnly)?;
        #[rustfmt::skip]
        let expected = gray_rows(&[
            &[0, 0, 0, 255, 255, 255],
            &[0, 127, 127, 127, 127, 255],
            &[0, 127, 127, 127, 127, 255],
            &[0, 127, 127, 127, 127, 255],
            &[0, 0, 0, 255, 255, 255],
        ]);
        assert_eq!(y, expected);
        Ok(())
    }

    #[test]
    fn test_vertical_edge_magnitude() -> Result<(), FilterError> {
        let src = vertical_edge_6x5()?;
        let dst = edge_filter(&src, &sobel_kernel_1d(), EdgeOutput::Magnitude)?;

        #[rustfmt::skip]
        let expected = gray_rows(&[
            &[0, 0, 0, 255, 255, 255],
            &[0, 0, 254, 254, 0, 255],
            &[0, 0, 254, 254, 0, 255],
            &[0, 0, 254, 254, 0, 255],
            &[0, 0, 0, 255, 255, 255],
        ]);
        assert_eq!(dst, expected);
        Ok(())
    }

    #[test]
    fn test_color_responses() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = Image::new([4, 4].into(), vec![
            68, 32, 130,  60, 253, 230,  241, 194, 107,  48, 249, 14,
            199, 221, 1,  228, 136, 117,  52, 162, 15,  11, 13, 4,
            195, 110, 216,  14, 113, 224,  253, 119, 176,  118, 112, 235,
            148, 11, 213,  51, 95, 151,  61, 170, 216,  97, 155, 145,
        ])?;
        let kernel = sobel_kernel_1d();

        let x = edge_filter(&src, &kernel, EdgeOutput::XOnly)?;
        assert_eq!(x.pixel(1, 1), [120, 133, 123]);
        assert_eq!(x.pixel(2, 1), [86, 95, 75]);
        assert_eq!(x.pixel(1, 2), [113, 142, 119]);
        assert_eq!(x.pixel(2, 2), [132, 120, 116]);

        let y = edge_filter(&src, &kernel, EdgeOutput::YOnly)?;
        assert_eq!(y.pixel(1, 1), [132, 92, 143]);
        assert_eq!(y.pixel(2, 2), [119, 143, 198]);

        let magnitude = edge_filter(&src, &kernel, EdgeOutput::Magnitude)?;
        assert_eq!(magnitude.pixel(1, 1), [34, 34, 34]);
        assert_eq!(magnitude.pixel(2, 1), [88, 88, 88]);
        assert_eq!(magnitude.pixel(1, 2), [59, 59, 59]);
        assert_eq!(magnitude.pixel(2, 2), [31, 31, 31]);
        assert_eq!(magnitude.pixel(0, 3), src.pixel(0, 3));
        Ok(())
    }

    #[test]
    fn test_too_small_returns_input() -> Result<(), FilterError> {
        let src = vertical_edge_6x5()?;
        let kernel = SeparableKernel::new(vec![-1, -1, 0, 1, 1, 1, 1], vec![1; 7])?;
        assert_eq!(edge_filter(&src, &kernel, EdgeOutput::Magnitude)?, src);
        Ok(())
    }

    #[test]
    fn test_invalid_vectors_rejected() -> Result<(), ImageError> {
        let src = vertical_edge_6x5()?;
        assert_eq!(
            edge_filter_from_slices(&src, &[-1, 0, 1], &[1, 2], EdgeOutput::Magnitude),
            Err(FilterError::KernelLengthMismatch(3, 2))
        );
        assert_eq!(
            edge_filter_from_slices(&src, &[-1, 1], &[1, 1], EdgeOutput::XOnly),
            Err(FilterError::EvenKernelLength(2))
        );
        Ok(())
    }

    #[test]
    fn test_edge_filter_event() -> Result<(), FilterError> {
        let src = vertical_edge_6x5()?;
        let recorder = EventRecorder::new();
        let options = FilterOptions::default().with_observer(&recorder);
        edge_filter_with_options(&src, &prewitt_kernel_1d(), EdgeOutput::YOnly, options)?;

        assert_eq!(
            recorder.events(),
            vec![FilterEvent::EdgeFilter {
                derivative: vec![-1, 0, 1],
                smoothing: vec![1, 1, 1],
                output: EdgeOutput::YOnly,
            }]
        );
        Ok(())
    }
}
