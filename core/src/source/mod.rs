pub mod data_source;
pub mod file;
pub mod http;
pub mod schedule;

use std::sync::Arc;

use crate::error::FetchFailure;
use crate::model::reading::MeterDataset;

pub use data_source::{fetch_guarded, DataSource, FetchState};
pub use file::FileDatasetSource;
pub use http::HttpDatasetSource;
pub use schedule::RefreshSchedule;

/// Somewhere a dataset document can be read from.
///
/// Sources are shared with a worker thread while a fetch is outstanding.
pub trait DatasetSource: Send + Sync {
    fn fetch(&self) -> Result<MeterDataset, FetchFailure>;
    fn location(&self) -> &str;
}

pub type SharedSource = Arc<dyn DatasetSource>;

/// `http://` and `https://` locations are fetched over the network, anything
/// else is treated as a local path.
pub fn open_source(location: &str) -> SharedSource {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Arc::new(HttpDatasetSource::new(location))
    } else {
        Arc::new(FileDatasetSource::new(location))
    }
}
