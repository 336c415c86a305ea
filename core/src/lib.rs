pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod service;
pub mod source;
pub mod usecase;

pub use config::Settings;
pub use error::{FetchFailure, MetricsError};
pub use format::{DisplayFormat, StandardFormat};
pub use model::metrics::{BalanceLevel, DaysRemaining, DerivedMetrics};
pub use model::reading::{DailyReading, MeterDataset};
pub use model::series::{ChartSeries, TableRow};
pub use service::metrics_engine::{
    average_usage, current_balance, derive_metrics, estimated_days_remaining, yesterday_usage,
};
pub use service::series_builder::{build_chart_series, build_table_rows};
pub use source::{fetch_guarded, open_source, DataSource, DatasetSource, FetchState, RefreshSchedule, SharedSource};
pub use usecase::session::{DashboardSession, PresentationSink, RefreshOutcome};
