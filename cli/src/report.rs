use anyhow::{anyhow, bail, Result};
use meterdash_core::{
    open_source, BalanceLevel, ChartSeries, DashboardSession, DataSource, DaysRemaining, PresentationSink,
    RefreshOutcome, Settings, TableRow,
};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "Day")]
    label: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Usage")]
    usage: String,
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Usage")]
    usage: String,
}

/// Collects one refresh worth of output for printing.
#[derive(Default)]
pub struct ReportSink {
    balance: Option<(String, BalanceLevel)>,
    yesterday_usage: Option<String>,
    average_usage: Option<String>,
    days_remaining: Option<DaysRemaining>,
    series: ChartSeries,
    rows: Vec<TableRow>,
    last_updated: Option<String>,
}

impl PresentationSink for ReportSink {
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
        self.series.labels = series.labels.clone();
        self.series.balances = series.balances.clone();
    }

    fn set_usage_series(&mut self, series: &ChartSeries) {
        self.series.labels = series.labels.clone();
        self.series.usages = series.usages.clone();
    }

    fn set_table(&mut self, rows: &[TableRow]) {
        self.rows = rows.to_vec();
    }

    fn show_last_updated(&mut self, text: &str) {
        self.last_updated = Some(text.to_string());
    }

    fn show_fetch_failure(&mut self, message: &str) {
        self.last_updated = Some(message.to_string());
    }
}

impl ReportSink {
    fn summary_rows(&self, unit: &str) -> Vec<SummaryRow> {
        let with_unit = |v: &Option<String>| match v {
            Some(text) => format!("{} {}", text, unit),
            None => "-".to_string(),
        };

        let balance = match &self.balance {
            Some((text, BalanceLevel::Low)) => format!("{} {} (low)", text, unit),
            Some((text, BalanceLevel::Medium)) => format!("{} {} (medium)", text, unit),
            Some((text, BalanceLevel::Normal)) => format!("{} {}", text, unit),
            None => "-".to_string(),
        };

        vec![
            SummaryRow { metric: "Current balance".to_string(), value: balance },
            SummaryRow { metric: "Yesterday's usage".to_string(), value: with_unit(&self.yesterday_usage) },
            SummaryRow { metric: "Average usage".to_string(), value: with_unit(&self.average_usage) },
            SummaryRow {
                metric: "Estimated days remaining".to_string(),
                value: self.days_remaining.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            },
        ]
    }

    fn recent_rows(&self) -> Vec<RecentRow> {
        self.series
            .labels
            .iter()
            .zip(self.series.balances.iter().zip(self.series.usages.iter()))
            .map(|(label, (balance, usage))| RecentRow {
                label: label.clone(),
                balance: format!("{:.2}", balance),
                usage: format!("{:.2}", usage),
            })
            .collect()
    }
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color
    println!("{}", table);
}

pub fn run(settings: Settings) -> Result<()> {
    let mut data_source = DataSource::from_shared(open_source(&settings.data_location));
    let location = data_source.location().to_string();
    let mut session = DashboardSession::new(ReportSink::default(), settings);

    let result = data_source
        .fetch_dataset()
        .ok_or_else(|| anyhow!("a fetch of {} is already in progress", location))?;
    let outcome = session.apply(result);
    let sink = session.sink();

    println!("\n\x1b[1;36mMeter balance\x1b[0m ({})", location);
    println!("Last updated: {}", sink.last_updated.as_deref().unwrap_or("-"));

    match outcome {
        RefreshOutcome::Failed => bail!("could not load meter data from {}", location),
        RefreshOutcome::NoReadings => {
            println!("No readings found.");
        }
        RefreshOutcome::Rendered { .. } => {
            print_table(sink.summary_rows(&session.settings().unit));
            println!("\n\x1b[1;36mRecent days\x1b[0m");
            print_table(sink.recent_rows());
            println!("\n\x1b[1;36mAll readings\x1b[0m");
            print_table(
                sink.rows
                    .iter()
                    .map(|r| ReadingRow {
                        date: r.date.clone(),
                        balance: r.balance.clone(),
                        usage: r.usage.clone(),
                    })
                    .collect(),
            );
        }
    }
    Ok(())
}
