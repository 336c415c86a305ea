use crate::format::DisplayFormat;
use crate::model::reading::DailyReading;
use crate::model::series::{ChartSeries, TableRow};

pub const DEFAULT_CHART_WINDOW: usize = 7;

/// Balance line and usage bars for the last `window` days.
///
/// The earliest point has no previous day in view, so its usage borrows the
/// delta to the following day.
pub fn build_chart_series<F: DisplayFormat + ?Sized>(
    readings: &[DailyReading],
    window: usize,
    format: &F,
) -> ChartSeries {
    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.date);
    let recent = &sorted[sorted.len().saturating_sub(window)..];

    let mut series = ChartSeries::default();
    for (i, reading) in recent.iter().enumerate() {
        let usage = if i > 0 {
            (recent[i - 1].balance - reading.balance).max(0.0)
        } else if recent.len() > 1 {
            (reading.balance - recent[1].balance).max(0.0)
        } else {
            0.0
        };

        series.labels.push(format.chart_label(reading.date));
        series.balances.push(reading.balance);
        series.usages.push(usage);
    }
    series
}

/// All readings newest first. Usage is the drop from the next older row;
/// a recharge shows as zero and the oldest row has no usage to report.
pub fn build_table_rows<F: DisplayFormat + ?Sized>(
    readings: &[DailyReading],
    format: &F,
    not_applicable: &str,
) -> Vec<TableRow> {
    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .iter()
        .enumerate()
        .map(|(i, reading)| {
            let usage = match sorted.get(i + 1) {
                Some(older) => format.amount((older.balance - reading.balance).max(0.0)),
                None => not_applicable.to_string(),
            };
            TableRow {
                date: format.table_date(reading.date),
                balance: format.amount(reading.balance),
                usage,
            }
        })
        .collect()
}
