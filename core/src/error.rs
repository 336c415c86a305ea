use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("dataset contains no readings")]
    EmptyDataset,
}

/// Any failure to obtain a dataset: transport, status, or parse.
///
/// `detail` is diagnostic text for logs. Users only ever see the configured
/// failure message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to fetch {location}: {detail}")]
pub struct FetchFailure {
    pub location: String,
    pub detail: String,
}

impl FetchFailure {
    pub fn new(location: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            location: location.into(),
            detail: detail.to_string(),
        }
    }
}
