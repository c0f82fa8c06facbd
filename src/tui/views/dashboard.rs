//! Dashboard rendering
//!
//! Money saved, cigarettes not smoked, time since quitting, goal gauge and a
//! 30-day savings sparkline. Redrawn on every 1 Hz tick.

use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Sparkline};

use crate::i18n::Language;
use crate::profile::UserProgressSnapshot;
use crate::progress::{compute, savings_projection, ElapsedBreakdown};
use crate::tui::theme::theme;

/// Days shown in the projection chart
pub const PROJECTION_DAYS: usize = 30;

/// Elapsed time as "3d 04h 12m 09s"
pub fn format_elapsed_clock(elapsed: &ElapsedBreakdown) -> String {
    format!(
        "{}d {:02}h {:02}m {:02}s",
        elapsed.days, elapsed.hours, elapsed.minutes, elapsed.seconds
    )
}

/// Projection in whole cents for the sparkline
///
/// Non-finite values (a zero pack size) show as empty bars.
pub fn projection_bars(values: &[f64]) -> Vec<u64> {
    values
        .iter()
        .map(|v| if v.is_finite() { (v * 100.0).max(0.0) as u64 } else { 0 })
        .collect()
}

/// Render the dashboard into `area`
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    snapshot: &UserProgressSnapshot,
    language: Language,
    now: DateTime<Utc>,
) {
    let t = theme();
    let strings = language.strings();
    let report = compute(snapshot, now);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);

    // Figures
    let figures = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);

    let figure = |label: &str, value: String| {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(value, t.figure_style())),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.border))
                .title(format!(" {} ", label)),
        )
    };

    frame.render_widget(
        figure(strings.money_saved, snapshot.money(report.money_saved)),
        figures[0],
    );
    frame.render_widget(
        figure(strings.units_avoided, format!("{}", report.units_avoided)),
        figures[1],
    );
    frame.render_widget(
        figure(strings.time_passed, format_elapsed_clock(&report.elapsed)),
        figures[2],
    );

    // Goal gauge
    let percent = report.goal_progress_percent;
    let ratio = if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    " {}: {} ({}) ",
                    strings.goal_progress,
                    snapshot.goal_label,
                    snapshot.money(snapshot.goal_cost)
                )),
        )
        .gauge_style(Style::default().fg(t.gauge))
        .ratio(ratio)
        .label(format!("{:.1}%", percent));
    frame.render_widget(gauge, chunks[1]);

    // Projection
    let projection = savings_projection(snapshot, &report, PROJECTION_DAYS);
    let bars = projection_bars(&projection);
    let last = projection.last().copied().unwrap_or(report.money_saved);
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    " {} \u{2192} {} ",
                    strings.projection_title,
                    snapshot.money(last)
                )),
        )
        .data(&bars)
        .style(Style::default().fg(t.savings));
    frame.render_widget(sparkline, chunks[2]);
}
