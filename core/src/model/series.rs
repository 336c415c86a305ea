use serde::{Deserialize, Serialize};

/// Chart-ready data: parallel vectors, one entry per labeled day.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub balances: Vec<f64>,
    pub usages: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One formatted line of the readings table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub date: String,
    pub balance: String,
    pub usage: String,
}
