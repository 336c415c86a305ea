pub mod metrics_engine;
pub mod series_builder;
