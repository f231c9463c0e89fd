#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border treatment for taps outside the image.
pub mod border;

/// luma/chroma color transform module.
pub mod color;

/// error types for the filter operations.
pub mod error;

/// filter events and observers.
pub mod event;

/// image filtering module.
pub mod filter;

/// per-call filter options.
pub mod options;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::error::FilterError;
