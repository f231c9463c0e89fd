use crate::error::FilterError;

/// Largest accepted kernel side, for both 2D kernels and 1D kernel vectors.
pub const MAX_KERNEL_SIZE: usize = 15;

/// The 4-connectivity laplacian 3x3 kernel.
pub const LAPLACE_4: [[i32; 3]; 3] = [[0, 1, 0], [1, -4, 1], [0, 1, 0]];

/// The 8-connectivity laplacian 3x3 kernel.
pub const LAPLACE_8: [[i32; 3]; 3] = [[1, 1, 1], [1, -8, 1], [1, 1, 1]];

/// Scale of the integer gaussian weights; the center tap has this value.
const GAUSSIAN_SCALE: f64 = 1024.0;

/// Number of taps before and after the center of a window of `n` taps.
///
/// Odd windows are symmetric; even windows have one tap fewer after the center.
pub(crate) fn window_extent(n: usize) -> (usize, usize) {
    let before = n / 2;
    (before, n.saturating_sub(1) - before)
}

fn check_size(width: usize, height: usize) -> Result<(), FilterError> {
    let valid = 1..=MAX_KERNEL_SIZE;
    if !valid.contains(&width) || !valid.contains(&height) {
        return Err(FilterError::InvalidKernelSize(width, height));
    }
    Ok(())
}

fn abs_sum(weights: &[i32]) -> i64 {
    weights.iter().map(|&w| (w as i64).abs()).sum()
}

/// An immutable 2D kernel of integer weights.
///
/// The data is row-major with `height` rows of `width` weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<i32>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Construct a kernel from row-major data and its dimensions.
    ///
    /// # Errors
    ///
    /// * [`FilterError::InvalidKernelSize`] if a side is outside `[1, 15]`.
    /// * [`FilterError::InvalidKernelData`] if `data.len() != width * height`.
    /// * [`FilterError::DegenerateKernel`] if every weight is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use chroma_imgproc::filter::kernels::Kernel;
    ///
    /// let kernel = Kernel::new(vec![1, 2, 1, 2, 4, 2], 3, 2).unwrap();
    /// assert_eq!(kernel.at(1, 1), 4);
    /// assert!(Kernel::new(vec![0; 4], 2, 2).is_err());
    /// ```
    pub fn new(data: Vec<i32>, width: usize, height: usize) -> Result<Self, FilterError> {
        check_size(width, height)?;

        if data.len() != width * height {
            return Err(FilterError::InvalidKernelData(data.len(), width * height));
        }

        if abs_sum(&data) == 0 {
            return Err(FilterError::DegenerateKernel);
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Construct a kernel from an array of rows.
    pub fn from_rows<const W: usize, const H: usize>(rows: &[[i32; W]; H]) -> Result<Self, FilterError> {
        Self::new(rows.iter().flatten().copied().collect(), W, H)
    }

    /// Number of weights per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Weight at the given row and column.
    ///
    /// PRECONDITION: `row < height` and `col < width`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.width + col]
    }

    /// The weights in row-major order.
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    /// Sum of absolute weights.
    pub fn abs_sum(&self) -> i64 {
        abs_sum(&self.data)
    }
}

/// A derivative and a smoothing vector of equal odd length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparableKernel {
    derivative: Vec<i32>,
    smoothing: Vec<i32>,
}

impl SeparableKernel {
    /// Construct a separable kernel pair.
    ///
    /// # Errors
    ///
    /// * [`FilterError::KernelLengthMismatch`] if the lengths differ.
    /// * [`FilterError::InvalidKernelSize`] if the length is outside `[1, 15]`.
    /// * [`FilterError::EvenKernelLength`] if the length is even.
    /// * [`FilterError::DegenerateKernel`] if either vector is all zeros.
    pub fn new(derivative: Vec<i32>, smoothing: Vec<i32>) -> Result<Self, FilterError> {
        if derivative.len() != smoothing.len() {
            return Err(FilterError::KernelLengthMismatch(
                derivative.len(),
                smoothing.len(),
            ));
        }

        check_size(derivative.len(), 1)?;

        if derivative.len() % 2 == 0 {
            return Err(FilterError::EvenKernelLength(derivative.len()));
        }

        if abs_sum(&derivative) == 0 || abs_sum(&smoothing) == 0 {
            return Err(FilterError::DegenerateKernel);
        }

        Ok(Self {
            derivative,
            smoothing,
        })
    }

    /// The derivative vector.
    pub fn derivative(&self) -> &[i32] {
        &self.derivative
    }

    /// The smoothing vector.
    pub fn smoothing(&self) -> &[i32] {
        &self.smoothing
    }

    /// Length of both vectors.
    pub fn len(&self) -> usize {
        self.derivative.len()
    }

    /// Always false; a valid pair has at least one tap.
    pub fn is_empty(&self) -> bool {
        self.derivative.is_empty()
    }

    /// Number of taps on each side of the center.
    pub fn half_len(&self) -> usize {
        self.len() / 2
    }
}

/// Create the 3-tap sobel kernel pair: derivative `[-1, 0, 1]`, smoothing `[1, 2, 1]`.
pub fn sobel_kernel_1d() -> SeparableKernel {
    SeparableKernel {
        derivative: vec![-1, 0, 1],
        smoothing: vec![1, 2, 1],
    }
}

/// Create the 3-tap prewitt kernel pair: derivative `[-1, 0, 1]`, smoothing `[1, 1, 1]`.
pub fn prewitt_kernel_1d() -> SeparableKernel {
    SeparableKernel {
        derivative: vec![-1, 0, 1],
        smoothing: vec![1, 1, 1],
    }
}

/// Create an all-ones box kernel.
///
/// # Arguments
///
/// * `width` - The number of columns in `[1, 15]`.
/// * `height` - The number of rows in `[1, 15]`.
pub fn box_kernel(width: usize, height: usize) -> Result<Kernel, FilterError> {
    check_size(width, height)?;
    Kernel::new(vec![1; width * height], width, height)
}

/// Create an integer gaussian kernel.
///
/// The radius is `ceil(3 * sigma)` capped so the kernel has at most 15 taps. Weights are
/// `round(1024 * exp(-x² / 2σ²))`, so far taps of narrow kernels may be zero.
///
/// # Arguments
///
/// * `sigma` - The standard deviation, finite and > 0.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(sigma: f64) -> Result<Vec<i32>, FilterError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::InvalidSigma(sigma));
    }

    let max_radius = (MAX_KERNEL_SIZE / 2) as f64;
    let radius = (3.0 * sigma).ceil().min(max_radius) as i32;
    let sigma_sq = sigma * sigma;

    let kernel = (-radius..=radius)
        .map(|x| {
            // sigma_sq underflows to zero for tiny sigmas, which would make 0/0 at the center
            if x == 0 {
                return GAUSSIAN_SCALE as i32;
            }
            let x = x as f64;
            (GAUSSIAN_SCALE * (-(x * x) / (2.0 * sigma_sq)).exp()).round() as i32
        })
        .collect();

    Ok(kernel)
}
