use std::sync::Arc;

use crate::config::Settings;
use crate::error::FetchFailure;
use crate::format::{DisplayFormat, StandardFormat};
use crate::model::metrics::{BalanceLevel, DaysRemaining};
use crate::model::reading::MeterDataset;
use crate::model::series::{ChartSeries, TableRow};
use crate::service::metrics_engine::derive_metrics;
use crate::service::series_builder::{build_chart_series, build_table_rows};

/// Where refresh results are rendered.
///
/// Every call replaces what was shown before, so repeating a call with the
/// same input leaves the display unchanged.
pub trait PresentationSink {
    fn show_balance(&mut self, text: &str, level: BalanceLevel);
    fn show_yesterday_usage(&mut self, text: &str);
    fn show_average_usage(&mut self, text: &str);
    fn show_days_remaining(&mut self, days: DaysRemaining);
    fn set_balance_series(&mut self, series: &ChartSeries);
    fn set_usage_series(&mut self, series: &ChartSeries);
    fn set_table(&mut self, rows: &[TableRow]);
    fn show_last_updated(&mut self, text: &str);
    fn show_fetch_failure(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered { readings: usize },
    /// The document had no readings; only the timestamp was touched.
    NoReadings,
    Failed,
}

/// Owns the current dataset and the sink it is rendered into.
pub struct DashboardSession<P: PresentationSink, F: DisplayFormat = StandardFormat> {
    sink: P,
    format: F,
    settings: Settings,
    dataset: Option<Arc<MeterDataset>>,
}

impl<P: PresentationSink> DashboardSession<P, StandardFormat> {
    pub fn new(sink: P, settings: Settings) -> Self {
        let format = StandardFormat::from_offset_minutes(settings.utc_offset_minutes);
        Self::with_format(sink, settings, format)
    }
}

impl<P: PresentationSink, F: DisplayFormat> DashboardSession<P, F> {
    pub fn with_format(sink: P, settings: Settings, format: F) -> Self {
        Self {
            sink,
            format,
            settings,
            dataset: None,
        }
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The dataset from the last successful fetch.
    pub fn dataset(&self) -> Option<Arc<MeterDataset>> {
        self.dataset.clone()
    }

    /// Renders one fetch result.
    ///
    /// A failure only replaces the last-updated text with the failure message;
    /// whatever was rendered before stays on screen.
    pub fn apply(&mut self, result: Result<MeterDataset, FetchFailure>) -> RefreshOutcome {
        match result {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                self.dataset = Some(Arc::clone(&dataset));
                let outcome = self.render(&dataset);
                let last_updated = self.last_updated_text(&dataset);
                self.sink.show_last_updated(&last_updated);
                outcome
            }
            Err(failure) => {
                tracing::error!(location = %failure.location, detail = %failure.detail, "failed to fetch meter data");
                self.sink.show_fetch_failure(&self.settings.messages.fetch_failure);
                RefreshOutcome::Failed
            }
        }
    }

    fn render(&mut self, dataset: &MeterDataset) -> RefreshOutcome {
        if dataset.is_empty() {
            tracing::info!("dataset has no readings, nothing to render");
            return RefreshOutcome::NoReadings;
        }

        let readings = dataset.sorted_ascending();
        let metrics = match derive_metrics(&readings, self.settings.average_window) {
            Ok(metrics) => metrics,
            Err(_) => return RefreshOutcome::NoReadings,
        };

        let level = self.settings.balance_level(metrics.current_balance);
        self.sink.show_balance(&self.format.amount(metrics.current_balance), level);
        self.sink.show_yesterday_usage(&self.format.amount(metrics.yesterday_usage));
        self.sink.show_average_usage(&self.format.amount(metrics.average_usage));
        self.sink.show_days_remaining(metrics.estimated_days_remaining);

        let series = build_chart_series(&readings, self.settings.chart_window, &self.format);
        self.sink.set_usage_series(&series);
        self.sink.set_balance_series(&series);

        let rows = build_table_rows(&readings, &self.format, &self.settings.messages.not_applicable);
        self.sink.set_table(&rows);

        tracing::info!(
            readings = readings.len(),
            balance = metrics.current_balance,
            average = metrics.average_usage,
            "dashboard refreshed"
        );
        RefreshOutcome::Rendered { readings: readings.len() }
    }

    fn last_updated_text(&self, dataset: &MeterDataset) -> String {
        match &dataset.last_updated {
            Some(raw) => self.format.timestamp(raw),
            None => self.settings.messages.unknown.clone(),
        }
    }
}
