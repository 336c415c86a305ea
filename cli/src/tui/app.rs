use chrono::{DateTime, Local};
use meterdash_core::{BalanceLevel, ChartSeries, DaysRemaining, FetchState, PresentationSink, TableRow};
use ratatui::widgets::TableState;

/// Everything the dashboard currently shows.
pub struct App {
    pub location: String,
    pub unit: String,
    pub balance: Option<(String, BalanceLevel)>,
    pub yesterday_usage: Option<String>,
    pub average_usage: Option<String>,
    pub days_remaining: Option<DaysRemaining>,
    pub balance_series: ChartSeries,
    pub usage_series: ChartSeries,
    pub rows: Vec<TableRow>,
    pub last_updated: Option<String>,
    pub failed: bool,
    pub fetch_state: FetchState,
    pub last_checked: Option<DateTime<Local>>,
    pub state: TableState,
}

impl App {
    pub fn new(location: impl Into<String>, unit: impl Into<String>) -> App {
        App {
            location: location.into(),
            unit: unit.into(),
            balance: None,
            yesterday_usage: None,
            average_usage: None,
            days_remaining: None,
            balance_series: ChartSeries::default(),
            usage_series: ChartSeries::default(),
            rows: Vec::new(),
            last_updated: None,
            failed: false,
            fetch_state: FetchState::Idle,
            last_checked: None,
            state: TableState::default(),
        }
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.rows.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }
}

impl PresentationSink for App {
    fn show_balance(&mut self, text: &str, level: BalanceLevel) {
        self.balance = Some((text.to_string(), level));
    }

    fn show_yesterday_usage(&mut self, text: &str) {
        self.yesterday_usage = Some(text.to_string());
    }

    fn show_average_usage(&mut self, text: &str) {
        self.average_usage = Some(text.to_string());
    }

    fn show_days_remaining(&mut self, days: DaysRemaining) {
        self.days_remaining = Some(days);
    }

    fn set_balance_series(&mut self, series: &ChartSeries) {
        self.balance_series = series.clone();
    }

    fn set_usage_series(&mut self, series: &ChartSeries) {
        self.usage_series = series.clone();
    }

    fn set_table(&mut self, rows: &[TableRow]) {
        self.rows = rows.to_vec();
        // keep the selection inside the new table
        match self.state.selected() {
            _ if self.rows.is_empty() => self.state.select(None),
            Some(i) if i >= self.rows.len() => self.state.select(Some(self.rows.len() - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    fn show_last_updated(&mut self, text: &str) {
        self.last_updated = Some(text.to_string());
        self.failed = false;
        self.last_checked = Some(Local::now());
    }

    fn show_fetch_failure(&mut self, message: &str) {
        self.last_updated = Some(message.to_string());
        self.failed = true;
        self.last_checked = Some(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<TableRow> {
        (0..n)
            .map(|i| TableRow {
                date: format!("2024/1/{}", i + 1),
                balance: "1.00".to_string(),
                usage: "0.00".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_selection_follows_table() {
        let mut app = App::new("data.json", "kWh");
        app.set_table(&rows(3));
        assert_eq!(app.state.selected(), Some(0));

        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));

        app.state.select(Some(2));
        app.set_table(&rows(1));
        assert_eq!(app.state.selected(), Some(0));

        app.set_table(&[]);
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_failure_replaces_only_timestamp() {
        let mut app = App::new("data.json", "kWh");
        app.show_balance("75.00", BalanceLevel::Medium);
        app.show_last_updated("2024/1/3 08:30:00");
        app.show_fetch_failure("Failed to fetch data, please try again later");

        assert!(app.failed);
        assert_eq!(app.balance, Some(("75.00".to_string(), BalanceLevel::Medium)));
        assert_eq!(app.last_updated.as_deref(), Some("Failed to fetch data, please try again later"));
    }
}
