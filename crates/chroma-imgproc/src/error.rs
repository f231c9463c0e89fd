use chroma_image::ImageError;

use crate::filter::MAX_KERNEL_SIZE;
use crate::parallel::ParallelError;

/// An error type for the filter operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// Kernel width or height outside `[1, MAX_KERNEL_SIZE]`.
    #[error("Invalid kernel size {0}x{1}, each side must be in [1, {max}]", max = MAX_KERNEL_SIZE)]
    InvalidKernelSize(usize, usize),

    /// Kernel data length does not match its dimensions.
    #[error("Kernel data length ({0}) does not match the kernel size ({1})")]
    InvalidKernelData(usize, usize),

    /// A 1D kernel that must have odd length has an even one.
    #[error("Kernel length ({0}) must be odd")]
    EvenKernelLength(usize),

    /// Derivative and smoothing kernels of different lengths.
    #[error("Derivative kernel length ({0}) does not match smoothing kernel length ({1})")]
    KernelLengthMismatch(usize, usize),

    /// Unknown border treatment code.
    #[error("Invalid border treatment code ({0}), expected 0..=3")]
    InvalidBorderTreatment(u8),

    /// Unknown edge filter output code.
    #[error("Invalid edge output code ({0}), expected 0..=2")]
    InvalidEdgeOutput(u8),

    /// Gaussian sigma that is not finite and positive.
    #[error("Invalid gaussian sigma ({0}), must be finite and > 0")]
    InvalidSigma(f64),

    /// The kernel normalization denominator is zero.
    #[error("Degenerate kernel: the sum of absolute weights is zero")]
    DegenerateKernel,

    /// Error from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the parallel executor.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

impl FilterError {
    /// Whether the error is a rejected filter parameter rather than a runtime failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidKernelSize(..)
                | FilterError::InvalidKernelData(..)
                | FilterError::EvenKernelLength(_)
                | FilterError::KernelLengthMismatch(..)
                | FilterError::InvalidBorderTreatment(_)
                | FilterError::InvalidEdgeOutput(_)
                | FilterError::InvalidSigma(_)
        )
    }
}
