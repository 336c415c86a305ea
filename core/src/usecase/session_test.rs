#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::error::FetchFailure;
    use crate::format::StandardFormat;
    use crate::model::metrics::{BalanceLevel, DaysRemaining};
    use crate::model::reading::{DailyReading, MeterDataset};
    use crate::model::series::{ChartSeries, TableRow};
    use crate::source::{DataSource, DatasetSource};
    use crate::usecase::session::{DashboardSession, PresentationSink, RefreshOutcome};
    use chrono::{FixedOffset, NaiveDate};
    use std::sync::Mutex;

    #[derive(Default, Debug, Clone, PartialEq)]
    struct RecordingSink {
        balance: Option<(String, BalanceLevel)>,
        yesterday: Option<String>,
        average: Option<String>,
        days: Option<DaysRemaining>,
        balance_series: Option<ChartSeries>,
        usage_series: Option<ChartSeries>,
        table: Option<Vec<TableRow>>,
        last_updated: Option<String>,
        calls: usize,
    }

    impl PresentationSink for RecordingSink {
        fn show_balance(&mut self, text: &str, level: BalanceLevel) {
            self.calls += 1;
            self.balance = Some((text.to_string(), level));
        }
        fn show_yesterday_usage(&mut self, text: &str) {
            self.calls += 1;
            self.yesterday = Some(text.to_string());
        }
        fn show_average_usage(&mut self, text: &str) {
            self.calls += 1;
            self.average = Some(text.to_string());
        }
        fn show_days_remaining(&mut self, days: DaysRemaining) {
            self.calls += 1;
            self.days = Some(days);
        }
        fn set_balance_series(&mut self, series: &ChartSeries) {
            self.calls += 1;
            self.balance_series = Some(series.clone());
        }
        fn set_usage_series(&mut self, series: &ChartSeries) {
            self.calls += 1;
            self.usage_series = Some(series.clone());
        }
        fn set_table(&mut self, rows: &[TableRow]) {
            self.calls += 1;
            self.table = Some(rows.to_vec());
        }
        fn show_last_updated(&mut self, text: &str) {
            self.calls += 1;
            self.last_updated = Some(text.to_string());
        }
        fn show_fetch_failure(&mut self, message: &str) {
            self.calls += 1;
            self.last_updated = Some(message.to_string());
        }
    }

    struct MockSource {
        results: Mutex<Vec<Result<MeterDataset, FetchFailure>>>,
    }

    impl DatasetSource for MockSource {
        fn fetch(&self) -> Result<MeterDataset, FetchFailure> {
            self.results.lock().unwrap().remove(0)
        }
        fn location(&self) -> &str {
            "mock://data.json"
        }
    }

    fn reading(day: u32, balance: f64) -> DailyReading {
        DailyReading::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), balance)
    }

    fn session() -> DashboardSession<RecordingSink> {
        let format = StandardFormat::with_offset(FixedOffset::east_opt(8 * 3600).unwrap());
        DashboardSession::with_format(RecordingSink::default(), Settings::default(), format)
    }

    fn sample() -> MeterDataset {
        // unordered on purpose
        MeterDataset::new(
            vec![reading(3, 75.0), reading(1, 100.0), reading(2, 90.0)],
            Some("2024-01-03T08:30:00+08:00".to_string()),
        )
    }

    #[test]
    fn test_apply_renders_everything() {
        let mut session = session();
        let outcome = session.apply(Ok(sample()));
        assert_eq!(outcome, RefreshOutcome::Rendered { readings: 3 });

        let sink = session.sink();
        assert_eq!(sink.balance, Some(("75.00".to_string(), BalanceLevel::Medium)));
        assert_eq!(sink.yesterday.as_deref(), Some("15.00"));
        assert_eq!(sink.average.as_deref(), Some("12.50"));
        assert_eq!(sink.days, Some(DaysRemaining::Days(6)));
        assert_eq!(sink.last_updated.as_deref(), Some("2024/1/3 08:30:00"));

        let series = sink.balance_series.as_ref().unwrap();
        assert_eq!(series.labels, vec!["1/1", "1/2", "1/3"]);
        assert_eq!(series.balances, vec![100.0, 90.0, 75.0]);
        assert_eq!(sink.usage_series.as_ref().unwrap().usages, vec![10.0, 10.0, 15.0]);

        let table = sink.table.as_ref().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].date, "2024/1/3");
        assert_eq!(table[0].usage, "15.00");
        assert_eq!(table[2].usage, "n/a");
    }

    #[test]
    fn test_low_balance_level() {
        let mut session = session();
        session.apply(Ok(MeterDataset::new(vec![reading(1, 60.0), reading(2, 42.0)], None)));
        assert_eq!(session.sink().balance, Some(("42.00".to_string(), BalanceLevel::Low)));
        assert_eq!(session.sink().days, Some(DaysRemaining::Days(2)));
    }

    #[test]
    fn test_missing_last_updated_shows_unknown() {
        let mut session = session();
        session.apply(Ok(MeterDataset::new(vec![reading(1, 150.0)], None)));
        assert_eq!(session.sink().last_updated.as_deref(), Some("unknown"));
        assert_eq!(session.sink().balance, Some(("150.00".to_string(), BalanceLevel::Normal)));
        assert_eq!(session.sink().days, Some(DaysRemaining::Unbounded));
    }

    #[test]
    fn test_empty_dataset_renders_nothing_derived() {
        let mut session = session();
        let outcome = session.apply(Ok(MeterDataset::default()));
        assert_eq!(outcome, RefreshOutcome::NoReadings);

        let sink = session.sink();
        assert!(sink.balance.is_none());
        assert!(sink.balance_series.is_none());
        assert!(sink.table.is_none());
        // only the timestamp line is touched
        assert_eq!(sink.calls, 1);
        assert!(session.dataset().unwrap().is_empty());
    }

    #[test]
    fn test_empty_dataset_keeps_previous_render() {
        let mut session = session();
        session.apply(Ok(sample()));
        let before = session.sink().clone();

        session.apply(Ok(MeterDataset::default()));
        let after = session.sink();
        assert_eq!(after.balance, before.balance);
        assert_eq!(after.table, before.table);
    }

    #[test]
    fn test_failure_keeps_previous_render() {
        let mut session = session();
        session.apply(Ok(sample()));
        let before = session.sink().clone();

        let outcome = session.apply(Err(FetchFailure::new("mock://data.json", "HTTP status 500")));
        assert_eq!(outcome, RefreshOutcome::Failed);

        let after = session.sink();
        assert_eq!(after.last_updated.as_deref(), Some("Failed to fetch data, please try again later"));
        assert_eq!(after.balance, before.balance);
        assert_eq!(after.balance_series, before.balance_series);
        assert_eq!(after.table, before.table);
        assert_eq!(after.calls, before.calls + 1);
        // the dataset from the last good fetch is retained
        assert_eq!(session.dataset().unwrap().len(), 3);
    }

    #[test]
    fn test_refresh_replaces_dataset_wholesale() {
        let mut session = session();
        session.apply(Ok(sample()));
        let first = session.dataset().unwrap();

        session.apply(Ok(MeterDataset::new(vec![reading(10, 30.0)], None)));
        let second = session.dataset().unwrap();
        assert_eq!(second.len(), 1);
        // earlier handles still see the old, untouched dataset
        assert_eq!(first.len(), 3);
        assert_eq!(session.sink().table.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_applying_same_dataset_twice_is_idempotent() {
        let mut session = session();
        session.apply(Ok(sample()));
        let mut first = session.sink().clone();
        session.apply(Ok(sample()));
        let mut second = session.sink().clone();
        first.calls = 0;
        second.calls = 0;
        assert_eq!(first, second);
    }

    #[test]
    fn test_data_source_drives_session() {
        let source = MockSource {
            results: Mutex::new(vec![Ok(sample()), Err(FetchFailure::new("mock://data.json", "connection refused"))]),
        };
        let mut data_source = DataSource::new(source);
        let mut session = session();

        let result = data_source.fetch_dataset().unwrap();
        assert_eq!(session.apply(result), RefreshOutcome::Rendered { readings: 3 });

        let result = data_source.fetch_dataset().unwrap();
        assert_eq!(session.apply(result), RefreshOutcome::Failed);
        assert_eq!(session.sink().balance.as_ref().map(|b| b.0.as_str()), Some("75.00"));
    }
}
