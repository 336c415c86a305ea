use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One day's meter balance snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub balance: f64,
}

impl DailyReading {
    pub fn new(date: NaiveDate, balance: f64) -> Self {
        Self { date, balance }
    }
}

/// The whole document served by the data source.
///
/// A fresh value is built on every successful fetch and replaces the previous
/// one wholesale. Readings arrive in whatever order the file holds them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MeterDataset {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub daily_data: Vec<DailyReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl MeterDataset {
    pub fn new(daily_data: Vec<DailyReading>, last_updated: Option<String>) -> Self {
        Self { daily_data, last_updated }
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn is_empty(&self) -> bool {
        self.daily_data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.daily_data.len()
    }

    /// Readings oldest first. Same-date readings keep their file order.
    pub fn sorted_ascending(&self) -> Vec<DailyReading> {
        let mut readings = self.daily_data.clone();
        readings.sort_by_key(|r| r.date);
        readings
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DailyReading>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DailyReading>>::deserialize(deserializer)?.unwrap_or_default())
}
