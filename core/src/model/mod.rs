pub mod metrics;
pub mod reading;
pub mod series;
