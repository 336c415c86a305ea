use crate::error::FetchFailure;
use crate::model::reading::MeterDataset;
use crate::source::DatasetSource;

/// Reads the dataset with a plain blocking GET.
///
/// Non-2xx statuses surface as errors from the agent, so transport, status
/// and parse problems all end up as a `FetchFailure`. No timeout beyond the
/// agent defaults.
#[derive(Clone, Debug)]
pub struct HttpDatasetSource {
    url: String,
}

impl HttpDatasetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl DatasetSource for HttpDatasetSource {
    fn fetch(&self) -> Result<MeterDataset, FetchFailure> {
        let mut response = ureq::get(self.url.as_str())
            .header("Accept", "application/json")
            .call()
            .map_err(|e| FetchFailure::new(&self.url, e))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchFailure::new(&self.url, e))?;
        MeterDataset::from_json(&body).map_err(|e| FetchFailure::new(&self.url, e))
    }

    fn location(&self) -> &str {
        &self.url
    }
}
