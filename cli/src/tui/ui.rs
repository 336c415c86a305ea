use meterdash_core::{BalanceLevel, FetchState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table,
    },
    Frame,
};

use crate::tui::app::App;

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    balance: Color,
    usage: Color,
    low: Color,
    medium: Color,
    normal: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    balance: Color::Blue,
    usage: Color::LightBlue,
    low: Color::Red,
    medium: Color::Yellow,
    normal: Color::Green,
};

const PLACEHOLDER: &str = "--";

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Stat cards
            Constraint::Min(10),   // Charts + table
            Constraint::Length(1), // Footer
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);
    draw_cards(f, app, main_chunks[1]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[2]);

    let chart_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(content_chunks[0]);

    draw_balance_chart(f, app, chart_chunks[0]);
    draw_usage_chart(f, app, chart_chunks[1]);
    draw_table(f, app, content_chunks[1]);

    let checked = app
        .last_checked
        .map(|t| format!("checked {} | ", t.format("%H:%M:%S")))
        .unwrap_or_default();
    let footer = Paragraph::new(format!("{}j/k: Scroll | r: Refresh | q: Quit", checked))
        .style(Style::default().fg(THEME.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let status = match app.fetch_state {
        FetchState::Loading => Span::styled(" loading… ", Style::default().fg(THEME.medium)),
        _ if app.failed => Span::styled(" error ", Style::default().fg(THEME.low)),
        _ => Span::raw(""),
    };
    let updated_style = if app.failed {
        Style::default().fg(THEME.low)
    } else {
        Style::default().fg(THEME.text)
    };

    let line = Line::from(vec![
        Span::styled("METER BALANCE", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}  ", app.location), Style::default().fg(THEME.muted)),
        Span::styled("Last updated: ", Style::default().fg(THEME.muted)),
        Span::styled(app.last_updated.as_deref().unwrap_or(PLACEHOLDER), updated_style),
        status,
    ]);

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, area);
}

fn level_color(level: BalanceLevel) -> Color {
    match level {
        BalanceLevel::Low => THEME.low,
        BalanceLevel::Medium => THEME.medium,
        BalanceLevel::Normal => THEME.normal,
    }
}

fn draw_cards(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let (balance, balance_color) = match &app.balance {
        Some((text, level)) => (text.as_str(), level_color(*level)),
        None => (PLACEHOLDER, THEME.text),
    };
    let days = app
        .days_remaining
        .map(|d| d.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let cards = [
        (" Current balance ", balance.to_string(), balance_color, app.unit.as_str()),
        (
            " Yesterday ",
            app.yesterday_usage.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            THEME.text,
            app.unit.as_str(),
        ),
        (
            " 7-day average ",
            app.average_usage.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            THEME.text,
            app.unit.as_str(),
        ),
        (" Days remaining ", days, THEME.text, "days"),
    ];

    for ((title, value, color, unit), chunk) in cards.into_iter().zip(chunks.iter()) {
        let text = Line::from(vec![
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", unit), Style::default().fg(THEME.muted)),
        ]);
        let card = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(THEME.muted)),
            );
        f.render_widget(card, *chunk);
    }
}

fn chart_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}

fn draw_balance_chart(f: &mut Frame, app: &App, area: Rect) {
    let series = &app.balance_series;
    let block = chart_block(format!(" Balance ({}) ", app.unit));
    if series.is_empty() {
        f.render_widget(Paragraph::new("No data available").alignment(Alignment::Center).block(block), area);
        return;
    }

    let points: Vec<(f64, f64)> = series
        .balances
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, *b))
        .collect();

    let min = series.balances.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = series.balances.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.1).max(1.0);
    let (lo, hi) = (min - pad, max + pad);
    let x_max = (series.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("balance")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(THEME.balance))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, x_max])
                .labels(series.labels.clone()),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([lo, hi])
                .labels(vec![format!("{:.0}", lo), format!("{:.0}", (lo + hi) / 2.0), format!("{:.0}", hi)]),
        );
    f.render_widget(chart, area);
}

fn draw_usage_chart(f: &mut Frame, app: &App, area: Rect) {
    let series = &app.usage_series;
    let block = chart_block(format!(" Daily usage ({}) ", app.unit));
    if series.is_empty() {
        f.render_widget(Paragraph::new("No data available").alignment(Alignment::Center).block(block), area);
        return;
    }

    // bars are integral, so usage is charted in hundredths
    let bars: Vec<Bar> = series
        .labels
        .iter()
        .zip(series.usages.iter())
        .map(|(label, usage)| {
            Bar::default()
                .label(label.as_str())
                .value((usage * 100.0).round() as u64)
                .style(Style::default().fg(THEME.usage))
                .text_value(format!("{:.2}", usage))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(6)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn draw_table(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Span::raw(row.date.clone()),
                Span::styled(row.balance.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(row.usage.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(11), // Date
            Constraint::Length(10), // Balance
            Constraint::Min(8),     // Usage
        ],
    )
    .header(Row::new(vec!["Date", "Balance", "Usage"]).style(Style::default().fg(THEME.medium)))
    .block(Block::default().title(" Readings ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(THEME.muted).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}
