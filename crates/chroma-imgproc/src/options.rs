use crate::event::{FilterEvent, FilterObserver};
use crate::parallel::ExecutionStrategy;

/// Per-call settings shared by every filter operation.
///
/// # Example
///
/// ```
/// use chroma_imgproc::event::EventRecorder;
/// use chroma_imgproc::options::FilterOptions;
/// use chroma_imgproc::parallel::ExecutionStrategy;
///
/// let recorder = EventRecorder::new();
/// let options = FilterOptions::default()
///     .with_strategy(ExecutionStrategy::Serial)
///     .with_observer(&recorder);
///
/// assert_eq!(options.strategy, ExecutionStrategy::Serial);
/// ```
#[derive(Clone, Copy, Default)]
pub struct FilterOptions<'a> {
    /// How the rows of each pass are executed.
    pub strategy: ExecutionStrategy,
    /// Optional receiver of one [`FilterEvent`] per call.
    pub observer: Option<&'a dyn FilterObserver>,
}

impl<'a> FilterOptions<'a> {
    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: &'a dyn FilterObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Deliver `event` to the observer, or log it at debug level when there is none.
    pub(crate) fn notify(&self, event: FilterEvent) {
        match self.observer {
            Some(observer) => observer.on_event(&event),
            None => log::debug!("{event}"),
        }
    }
}

impl std::fmt::Debug for FilterOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FilterOptions")
            .field("strategy", &self.strategy)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderTreatment;
    use crate::event::EventRecorder;

    #[test]
    fn test_notify_delivers_once() {
        let event = FilterEvent::BoxBlur {
            width: 3,
            height: 3,
            border: BorderTreatment::MirroredBorder,
        };

        // without an observer the event only goes to the debug log
        FilterOptions::default().notify(event.clone());

        let recorder = EventRecorder::new();
        let options = FilterOptions::default().with_observer(&recorder);
        options.notify(event.clone());
        assert_eq!(recorder.events(), vec![event]);
    }

    #[test]
    fn test_options_debug() {
        let recorder = EventRecorder::new();
        let options = FilterOptions::default()
            .with_strategy(ExecutionStrategy::Fixed(2))
            .with_observer(&recorder);
        assert_eq!(
            format!("{options:?}"),
            "FilterOptions { strategy: Fixed(2), observer: true }"
        );
    }
}
