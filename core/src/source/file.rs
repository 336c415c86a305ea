use std::fs;
use std::path::PathBuf;

use crate::error::FetchFailure;
use crate::model::reading::MeterDataset;
use crate::source::DatasetSource;

pub const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Clone, Debug)]
pub struct FileDatasetSource {
    location: String,
    file_path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let file_path = PathBuf::from(&location);
        Self { location, file_path }
    }
}

impl DatasetSource for FileDatasetSource {
    fn fetch(&self) -> Result<MeterDataset, FetchFailure> {
        let content = fs::read_to_string(&self.file_path)
            .map_err(|e| FetchFailure::new(&self.location, e))?;
        MeterDataset::from_json(&content).map_err(|e| FetchFailure::new(&self.location, e))
    }

    fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_dataset() {
        let file = write_temp(r#"{"daily_data": [{"date": "2024-05-01", "balance": 12.3}]}"#);
        let source = FileDatasetSource::new(file.path().to_string_lossy());
        let dataset = source.fetch().unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.last_updated.is_none());
    }

    #[test]
    fn test_parse_error_is_fetch_failure() {
        let file = write_temp("{ broken");
        let source = FileDatasetSource::new(file.path().to_string_lossy());
        let err = source.fetch().unwrap_err();
        assert_eq!(err.location, source.location());
        assert!(!err.detail.is_empty());
    }
}
