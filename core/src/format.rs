use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Display capability the series builder and session depend on.
pub trait DisplayFormat {
    /// Short axis label for a chart point.
    fn chart_label(&self, date: NaiveDate) -> String;
    fn table_date(&self, date: NaiveDate) -> String;
    /// Renders a raw ISO-8601 timestamp from the data file.
    fn timestamp(&self, raw: &str) -> String;

    fn amount(&self, value: f64) -> String {
        format!("{:.2}", value)
    }
}

/// `M/D` labels, `YYYY/M/D` dates, timestamps in local time unless an
/// explicit offset is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormat {
    offset: Option<FixedOffset>,
}

impl StandardFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset: Some(offset) }
    }

    /// `minutes` east of UTC; out-of-range values fall back to local time.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        Self {
            offset: minutes.and_then(offset_from_minutes),
        }
    }

    fn render<Tz: TimeZone>(&self, dt: DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        dt.format("%Y/%-m/%-d %H:%M:%S").to_string()
    }

    fn render_aware(&self, dt: DateTime<FixedOffset>) -> String {
        match self.offset {
            Some(offset) => self.render(dt.with_timezone(&offset)),
            None => self.render(dt.with_timezone(&Local)),
        }
    }

    fn render_naive(&self, naive: NaiveDateTime) -> Option<String> {
        // Timestamps without an offset are wall-clock times in the display zone.
        match self.offset {
            Some(offset) => offset.from_local_datetime(&naive).single().map(|dt| self.render(dt)),
            None => Local.from_local_datetime(&naive).earliest().map(|dt| self.render(dt)),
        }
    }
}

/// `None` when the offset is not representable.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl DisplayFormat for StandardFormat {
    fn chart_label(&self, date: NaiveDate) -> String {
        date.format("%-m/%-d").to_string()
    }

    fn table_date(&self, date: NaiveDate) -> String {
        date.format("%Y/%-m/%-d").to_string()
    }

    fn timestamp(&self, raw: &str) -> String {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return self.render_aware(dt);
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                if let Some(text) = self.render_naive(naive) {
                    return text;
                }
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return self.table_date(date);
        }
        tracing::warn!(timestamp = raw, "unrecognised last_updated timestamp, showing it verbatim");
        raw.to_string()
    }
}
