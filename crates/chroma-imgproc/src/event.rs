use std::sync::Mutex;

use crate::border::BorderTreatment;
use crate::filter::EdgeOutput;

/// A structured record of one filter invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    /// Generic 2D convolution.
    Convolution {
        /// Kernel columns.
        kernel_width: usize,
        /// Kernel rows.
        kernel_height: usize,
        /// Border treatment in effect.
        border: BorderTreatment,
    },
    /// 3x3 laplace filter.
    Laplace {
        /// The laplace kernel.
        kernel: [[i32; 3]; 3],
        /// Border treatment in effect.
        border: BorderTreatment,
    },
    /// Box blur through the generic convolution.
    BoxBlur {
        /// Kernel columns.
        width: usize,
        /// Kernel rows.
        height: usize,
        /// Border treatment in effect.
        border: BorderTreatment,
    },
    /// Separable edge filter.
    EdgeFilter {
        /// The derivative vector.
        derivative: Vec<i32>,
        /// The smoothing vector.
        smoothing: Vec<i32>,
        /// Requested output image.
        output: EdgeOutput,
    },
    /// Separable gaussian blur.
    GaussianBlur {
        /// Standard deviation.
        sigma: f64,
        /// Number of taps of the 1D kernel.
        kernel_len: usize,
        /// Border treatment in effect.
        border: BorderTreatment,
    },
}

impl std::fmt::Display for FilterEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FilterEvent::Convolution {
                kernel_width,
                kernel_height,
                border,
            } => write!(
                f,
                "filter applied: border treatment: {border}, filter width: {kernel_width}, filter height: {kernel_height}"
            ),
            FilterEvent::Laplace { kernel, border } => {
                write!(f, "laplace applied: border treatment: {border}, kernel: {kernel:?}")
            }
            FilterEvent::BoxBlur {
                width,
                height,
                border,
            } => write!(
                f,
                "box blur applied: border treatment: {border}, size: {width}x{height}"
            ),
            FilterEvent::EdgeFilter {
                derivative,
                smoothing,
                output,
            } => write!(
                f,
                "edge filter applied: derivative: {derivative:?}, smoothing: {smoothing:?}, output: {output}"
            ),
            FilterEvent::GaussianBlur {
                sigma,
                kernel_len,
                border,
            } => write!(
                f,
                "gaussian blur applied: sigma: {sigma}, taps: {kernel_len}, border treatment: {border}"
            ),
        }
    }
}

/// Receives a [`FilterEvent`] for every filter call it is attached to.
pub trait FilterObserver: Send + Sync {
    /// Called once per filter call, before any pixel is processed.
    fn on_event(&self, event: &FilterEvent);
}

/// Forwards events to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl FilterObserver for LogObserver {
    fn on_event(&self, event: &FilterEvent) {
        log::info!("{event}");
    }
}

/// Keeps every received event in memory.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<FilterEvent>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The events received so far, oldest first.
    pub fn events(&self) -> Vec<FilterEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl FilterObserver for EventRecorder {
    fn on_event(&self, event: &FilterEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
