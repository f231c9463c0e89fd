use rayon::prelude::*;
use thiserror::Error;

use chroma_image::Image;

/// Images with at least this many pixels run in parallel under [`ExecutionStrategy::Auto`].
pub const PARALLEL_PIXEL_THRESHOLD: usize = 100_000;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the rows of a filter pass are executed.
///
/// Every strategy produces the same pixels: a pass only ever reads from frozen buffers and
/// each row is written by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Parallel rows for images of at least [`PARALLEL_PIXEL_THRESHOLD`] pixels, serial otherwise.
    #[default]
    Auto,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels is processed in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => num_pixels >= PARALLEL_PIXEL_THRESHOLD,
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::ParallelRows | ExecutionStrategy::Fixed(_) => true,
        }
    }
}

/// Apply `f` to every row of `dst` following the given strategy.
///
/// The closure receives the row index and the row data (`cols * C` values).
pub fn for_each_row<T, const C: usize, F>(
    strategy: ExecutionStrategy,
    dst: &mut Image<T, C>,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    let row_stride = dst.cols() * C;
    if row_stride == 0 || dst.rows() == 0 {
        return Ok(());
    }

    let num_pixels = dst.size().area();
    let data = dst.as_slice_mut();

    match strategy {
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                data.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(r, row)| f(r, row));
            });
        }
        _ if strategy.is_parallel(num_pixels) => {
            data.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
        _ => {
            data.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
    }

    Ok(())
}
