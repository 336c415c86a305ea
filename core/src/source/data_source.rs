use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::FetchFailure;
use crate::model::reading::MeterDataset;
use crate::source::DatasetSource;

/// Runs `source.fetch()`, turning a panic into a `FetchFailure` so the
/// caller always gets a result to `finish` with.
pub fn fetch_guarded<S: DatasetSource + ?Sized>(source: &S) -> Result<MeterDataset, FetchFailure> {
    panic::catch_unwind(AssertUnwindSafe(|| source.fetch())).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(FetchFailure::new(source.location(), format!("fetch panicked: {}", reason)))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Tracks the fetch lifecycle `Idle -> Loading -> {Ready | Error}`.
///
/// Only one fetch may be outstanding. A tick that arrives while `Loading`
/// is skipped rather than starting a second fetch.
pub struct DataSource<S: DatasetSource + ?Sized> {
    source: Arc<S>,
    state: FetchState,
}

impl<S: DatasetSource> DataSource<S> {
    pub fn new(source: S) -> Self {
        Self::from_shared(Arc::new(source))
    }
}

impl<S: DatasetSource + ?Sized> DataSource<S> {
    pub fn from_shared(source: Arc<S>) -> Self {
        Self {
            source,
            state: FetchState::Idle,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn location(&self) -> &str {
        self.source.location()
    }

    /// Handle for running the fetch off the current thread.
    pub fn shared_source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    /// Returns `false` when a fetch is already in flight.
    pub fn begin_fetch(&mut self) -> bool {
        if self.is_loading() {
            tracing::debug!(location = self.location(), "fetch already in flight, skipping tick");
            return false;
        }
        self.state = FetchState::Loading;
        true
    }

    pub fn finish(&mut self, result: &Result<MeterDataset, FetchFailure>) {
        self.state = match result {
            Ok(_) => FetchState::Ready,
            Err(_) => FetchState::Error,
        };
    }

    /// Fetches inline. `None` means the tick was skipped.
    pub fn fetch_dataset(&mut self) -> Option<Result<MeterDataset, FetchFailure>> {
        if !self.begin_fetch() {
            return None;
        }
        let result = fetch_guarded(self.source.as_ref());
        self.finish(&result);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reading::DailyReading;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedSource {
        results: Mutex<Vec<Result<MeterDataset, FetchFailure>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(mut results: Vec<Result<MeterDataset, FetchFailure>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DatasetSource for ScriptedSource {
        fn fetch(&self) -> Result<MeterDataset, FetchFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results.lock().unwrap().pop().unwrap()
        }

        fn location(&self) -> &str {
            "scripted"
        }
    }

    fn dataset() -> MeterDataset {
        MeterDataset::new(
            vec![DailyReading::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 10.0)],
            None,
        )
    }

    #[test]
    fn test_transitions() {
        let mut ds = DataSource::new(ScriptedSource::new(vec![
            Ok(dataset()),
            Err(FetchFailure::new("scripted", "HTTP 404")),
            Ok(dataset()),
        ]));
        assert_eq!(ds.state(), FetchState::Idle);

        assert!(ds.fetch_dataset().unwrap().is_ok());
        assert_eq!(ds.state(), FetchState::Ready);

        assert!(ds.fetch_dataset().unwrap().is_err());
        assert_eq!(ds.state(), FetchState::Error);

        // no automatic retry: the next call is the next tick
        assert!(ds.fetch_dataset().unwrap().is_ok());
        assert_eq!(ds.state(), FetchState::Ready);
    }

    struct PanickingSource;

    impl DatasetSource for PanickingSource {
        fn fetch(&self) -> Result<MeterDataset, FetchFailure> {
            panic!("worker blew up")
        }

        fn location(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_panicking_fetch_becomes_failure() {
        let mut ds = DataSource::new(PanickingSource);
        let err = ds.fetch_dataset().unwrap().unwrap_err();
        assert_eq!(err.location, "panicking");
        assert!(err.detail.contains("worker blew up"));
        assert_eq!(ds.state(), FetchState::Error);

        // the next tick is not blocked by a stuck Loading state
        assert!(ds.begin_fetch());
    }

    #[test]
    fn test_guarded_fetch_from_shared_handle() {
        let mut ds = DataSource::from_shared(Arc::new(PanickingSource) as Arc<dyn DatasetSource>);
        assert!(ds.begin_fetch());
        let result = fetch_guarded(ds.shared_source().as_ref());
        ds.finish(&result);
        assert_eq!(ds.state(), FetchState::Error);
    }

    #[test]
    fn test_tick_skipped_while_in_flight() {
        let mut ds = DataSource::new(ScriptedSource::new(vec![Ok(dataset())]));
        assert!(ds.begin_fetch());
        assert_eq!(ds.state(), FetchState::Loading);

        assert!(!ds.begin_fetch());
        assert!(ds.fetch_dataset().is_none());
        assert_eq!(ds.shared_source().calls.load(Ordering::SeqCst), 0);

        let result = ds.shared_source().fetch();
        ds.finish(&result);
        assert_eq!(ds.state(), FetchState::Ready);
        assert!(ds.begin_fetch());
    }
}
