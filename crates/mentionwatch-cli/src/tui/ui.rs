//! Dashboard rendering.
//!
//! ┌──────────────────────────────────────────────┐
//! │  📊 mentionwatch  watching: feed.json   #42  │
//! │  last: Eve → rust                            │
//! ├─────────────────────────────┬────────────────┤
//! │  Keyword Frequency per ...  │  Keywords      │
//! │   4 ███                     │  ██ rust    5  │
//! │     ███ ███                 │  ██ go      2  │
//! │   0 ███ ███ ███             │  ██ (none)  3  │
//! │     Eve Bob Amy             │                │
//! ├─────────────────────────────┴────────────────┤
//! │  q: quit   s: snapshot   o: order   l: legend│
//! └──────────────────────────────────────────────┘

use std::path::Path;
use std::time::Duration;

use mentionwatch_core::chart::{CHART_TITLE, LEGEND_TITLE, X_LABEL, Y_LABEL};
use mentionwatch_core::{ChartView, Record, StackOrder, WatchSummary};
use ratatui::{prelude::*, widgets::*};

use super::bars::{StackedBars, to_color};

/// Everything one frame needs.
pub struct Dashboard<'a> {
    pub view: &'a ChartView,
    pub source: &'a Path,
    pub order: StackOrder,
    pub legend_top_first: bool,
    pub summary: WatchSummary,
    pub last_record: Option<&'a Record>,
    pub last_rejected: Option<&'a str>,
    pub last_export: Option<&'a Path>,
    pub export_error: Option<&'a str>,
    pub uptime: Duration,
}

pub fn draw(f: &mut Frame, d: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(8),    // chart + legend
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], d);
    draw_main(f, rows[1], d);
    draw_keys(f, rows[2], d);
}

fn draw_title(f: &mut Frame, area: Rect, d: &Dashboard) {
    let s = &d.summary;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 📊 mentionwatch ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  watching: "),
            Span::styled(
                d.source.display().to_string(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(
                format!(
                    "  #{}  {} skipped  {}s ",
                    s.records,
                    s.malformed,
                    d.uptime.as_secs()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    let last = match d.last_record {
        Some(r) => Line::from(vec![
            Span::styled("  last: ", Style::default().fg(Color::DarkGray)),
            Span::styled(r.author.as_str(), Style::default().bold()),
            Span::raw(" → "),
            Span::raw(r.keyword.as_str()),
        ]),
        None => Line::from(Span::styled(
            "  waiting for new JSON messages…",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(last).block(block), area);
}

fn draw_main(f: &mut Frame, area: Rect, d: &Dashboard) {
    let widest = d
        .view
        .series
        .iter()
        .map(|s| s.keyword.chars().count())
        .max()
        .unwrap_or(0)
        .min(64) as u16;
    let legend_w = (widest + 14).clamp(18, 36);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(legend_w)])
        .split(area);

    draw_chart(f, cols[0], d);
    draw_legend(f, cols[1], d);
}

fn draw_chart(f: &mut Frame, area: Rect, d: &Dashboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {CHART_TITLE} "),
            Style::default().bold(),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" x: {X_LABEL}   y: {Y_LABEL} "),
            Style::default().fg(Color::DarkGray),
        )));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if d.view.is_empty() {
        let msg = Paragraph::new("Waiting for records…")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner);
        return;
    }
    f.render_widget(StackedBars::new(d.view), inner);
}

fn draw_legend(f: &mut Frame, area: Rect, d: &Dashboard) {
    let direction = if d.legend_top_first { "↓" } else { "↑" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {LEGEND_TITLE} {direction} "));

    let widest = d
        .view
        .series
        .iter()
        .map(|s| s.keyword.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = d
        .view
        .legend(d.legend_top_first)
        .into_iter()
        .map(|s| {
            Line::from(vec![
                Span::styled(" ██ ", Style::default().fg(to_color(s.color))),
                Span::raw(format!("{:<widest$}", s.keyword)),
                Span::styled(
                    format!(" {:>4}", s.total()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_keys(f: &mut Frame, area: Rect, d: &Dashboard) {
    let status = if let Some(err) = d.export_error {
        format!("snapshot failed: {err}")
    } else if let Some(path) = d.last_export {
        format!("saved {}", path.display())
    } else if let Some(rejected) = d.last_rejected {
        format!("skipped {rejected}")
    } else {
        String::new()
    };

    let bar = Paragraph::new(format!(
        " q: quit   s: snapshot   o: order ({})   l: legend   {status}",
        d.order.label()
    ))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
