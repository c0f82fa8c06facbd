//! Craving modal rendering
//!
//! The modal has one panel per phase: the rating dial, a busy line while the
//! text is generated, the guided wait with its activity, and the high-urge
//! panel. Layout helpers are shared with mouse handling so a click lands on
//! the same cells that were drawn.

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use crate::activities::breathing::{BreathPhase, Breathing};
use crate::activities::quiz::Quiz;
use crate::activities::tap_target::{TapTargets, Target};
use crate::activities::ActivityState;
use crate::craving::{milestones, CravingSession, Phase};
use crate::i18n::{fill, Strings};
use crate::progress::format_countdown;
use crate::rating::{rating_to_angle, MAX_RATING, MIN_RATING};
use crate::tui::layout::centered_rect;
use crate::tui::theme::theme;

const MODAL_WIDTH: u16 = 76;
const MODAL_HEIGHT: u16 = 30;
/// Terminal cells are about twice as tall as they are wide
pub const CELL_ASPECT: f64 = 0.5;
/// Width of a drawn tap target, e.g. "[3]"
const TARGET_WIDTH: u16 = 3;

/// Where the parts of the modal go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CravingLayout {
    pub modal: Rect,
    pub body: Rect,
    pub hints: Rect,
}

/// Split of the body during the guided wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidedAreas {
    pub countdown: Rect,
    pub text: Rect,
    pub milestones: Rect,
    /// Activity block including its border
    pub activity: Rect,
}

fn inset(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

pub fn craving_layout(area: Rect) -> CravingLayout {
    let modal = centered_rect(area, MODAL_WIDTH, MODAL_HEIGHT);
    let inner = inset(modal);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    CravingLayout {
        modal,
        body: chunks[0],
        hints: chunks[1],
    }
}

pub fn guided_areas(body: Rect) -> GuidedAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(6),
        ])
        .split(body);
    GuidedAreas {
        countdown: chunks[0],
        text: chunks[1],
        milestones: chunks[2],
        activity: chunks[3],
    }
}

/// Cell at the centre of the dial
pub fn dial_center(body: Rect) -> (u16, u16) {
    (body.x + body.width / 2, body.y + body.height / 2)
}

/// Pointer offset from the dial centre, corrected for the cell aspect
pub fn pointer_offset(center: (u16, u16), column: u16, row: u16) -> (f64, f64) {
    let dx = (f64::from(column) - f64::from(center.0)) * CELL_ASPECT;
    let dy = f64::from(row) - f64::from(center.1);
    (dx, dy)
}

/// Cell where a target's label starts inside the play area
pub fn target_cell(play_area: Rect, target: &Target) -> (u16, u16) {
    let x = f64::from(play_area.width.saturating_sub(TARGET_WIDTH)) * target.x / 100.0;
    let y = f64::from(play_area.height.saturating_sub(1)) * target.y / 100.0;
    (play_area.x + x as u16, play_area.y + y as u16)
}

/// Target under a click, if any
pub fn hit_target(play_area: Rect, targets: &[Target], column: u16, row: u16) -> Option<u32> {
    targets.iter().find_map(|target| {
        let (x, y) = target_cell(play_area, target);
        (row == y && column >= x && column < x + TARGET_WIDTH).then_some(target.id)
    })
}

/// Play area for tap targets (inside the activity border, below the title line)
pub fn play_area(activity: Rect) -> Rect {
    let inner = inset(activity);
    Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    }
}

/// Render the modal over `area`
pub fn render_craving_modal(frame: &mut Frame, area: Rect, session: &CravingSession, now: Instant) {
    let t = theme();
    let strings = session.language().strings();
    let layout = craving_layout(area);

    frame.render_widget(Clear, layout.modal);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.border_focused))
        .title(format!(" {} ", strings.urge_modal_title));
    frame.render_widget(block, layout.modal);

    let hints = match session.phase() {
        Phase::Rating => strings.rating_hints,
        Phase::Analyzing => "Esc",
        Phase::Guided => strings.guided_hints,
        Phase::HighUrge => strings.high_hints,
        Phase::Resolved(_) => "",
    };
    frame.render_widget(
        Paragraph::new(hints)
            .style(t.muted_style())
            .alignment(Alignment::Center),
        layout.hints,
    );

    match session.phase() {
        Phase::Rating => render_rating(frame, layout.body, session, strings),
        Phase::Analyzing => render_analyzing(frame, layout.body, strings),
        Phase::Guided => render_guided(frame, layout.body, session, strings, now),
        Phase::HighUrge => render_high_urge(frame, layout.body, session, strings),
        Phase::Resolved(_) => {}
    }
}

fn render_rating(frame: &mut Frame, body: Rect, session: &CravingSession, strings: &Strings) {
    let t = theme();
    let value = session.urge_intensity();
    let center = dial_center(body);
    let radius = (body.height / 2).saturating_sub(2).clamp(2, 8);

    for rating in MIN_RATING..=MAX_RATING {
        let angle = rating_to_angle(rating).to_radians();
        let x = f64::from(center.0) + angle.sin() * f64::from(radius) / CELL_ASPECT;
        let y = f64::from(center.1) - angle.cos() * f64::from(radius);
        let label = rating.to_string();
        let cell = Rect {
            x: (x as u16).saturating_sub(label.len() as u16 / 2),
            y: y as u16,
            width: label.len() as u16,
            height: 1,
        };
        if !body.intersects(cell) || cell.right() > body.right() || cell.bottom() > body.bottom() {
            continue;
        }
        let style = if rating == value {
            Style::default()
                .fg(t.rating_color(rating))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(t.rating_color(rating))
        };
        frame.render_widget(Paragraph::new(label).style(style), cell);
    }

    let centre_label = Rect {
        x: body.x,
        y: center.1,
        width: body.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{}: {}", strings.urge_rating_label, value),
            Style::default()
                .fg(t.rating_color(value))
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        centre_label,
    );

    let context_line = Rect {
        x: body.x,
        y: body.bottom().saturating_sub(1),
        width: body.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(format!(
            "{}: {}",
            strings.context_label,
            session.context().label(session.language())
        ))
        .style(t.input_style())
        .alignment(Alignment::Center),
        context_line,
    );
}

fn render_analyzing(frame: &mut Frame, body: Rect, strings: &Strings) {
    let t = theme();
    let line = Rect {
        y: body.y + body.height / 2,
        height: 1,
        ..body
    };
    frame.render_widget(
        Paragraph::new(strings.analyzing)
            .style(Style::default().fg(t.accent).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center),
        line,
    );
}

fn render_guided(
    frame: &mut Frame,
    body: Rect,
    session: &CravingSession,
    strings: &Strings,
    now: Instant,
) {
    let t = theme();
    let areas = guided_areas(body);

    let remaining = session.remaining_secs();
    let countdown = if remaining == 0 {
        Line::from(Span::styled(strings.countdown_done, Style::default().fg(t.milestone)))
    } else {
        Line::from(vec![
            Span::styled(format!("{}  ", strings.urge_low_title), t.header_style()),
            Span::styled(
                format_countdown(remaining),
                Style::default().fg(t.countdown).add_modifier(Modifier::BOLD),
            ),
        ])
    };
    frame.render_widget(
        Paragraph::new(vec![countdown, Line::from(strings.urge_low_text)])
            .alignment(Alignment::Center),
        areas.countdown,
    );

    render_motivation(frame, areas.text, session);

    let unlocked = session.milestones();
    let lines: Vec<Line> = milestones::THRESHOLDS
        .iter()
        .filter_map(|threshold| {
            let label = milestones::label(*threshold, session.language())?;
            Some(if unlocked.contains(*threshold) {
                Line::from(Span::styled(
                    format!("\u{2713} {}", label),
                    Style::default().fg(t.milestone),
                ))
            } else {
                Line::from(Span::styled(format!("\u{00B7} {}", label), t.muted_style()))
            })
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), areas.milestones);

    if let Some(rotator) = session.activity() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border))
            .title(format!(" {} ", rotator.kind().title(session.language())));
        frame.render_widget(block, areas.activity);
        render_activity(frame, areas.activity, rotator.state(), strings, now);
    }
}

fn render_motivation(frame: &mut Frame, area: Rect, session: &CravingSession) {
    let Some(text) = session.display_text() else {
        return;
    };
    frame.render_widget(
        Paragraph::new(format!("\u{201C}{}\u{201D}", text))
            .style(Style::default().fg(theme().text).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_activity(
    frame: &mut Frame,
    activity: Rect,
    state: &ActivityState,
    strings: &Strings,
    now: Instant,
) {
    let inner = inset(activity);
    match state {
        ActivityState::Breathing(breathing) => {
            render_breathing(frame, inner, breathing, strings, now)
        }
        ActivityState::TapTarget(targets) => render_targets(frame, activity, targets, strings),
        ActivityState::Quiz(quiz) => render_quiz(frame, inner, quiz, strings),
        ActivityState::QuickTap(quick_tap) => {
            let lines = vec![
                Line::from(strings.quick_tap_title),
                Line::from(""),
                Line::from(Span::styled(
                    quick_tap.count().to_string(),
                    theme().figure_style(),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                inner,
            );
        }
    }
}

fn breath_label(phase: BreathPhase, strings: &Strings) -> &'static str {
    match phase {
        BreathPhase::Inhale => strings.inhale,
        BreathPhase::Hold => strings.hold,
        BreathPhase::Exhale => strings.exhale,
    }
}

fn render_breathing(
    frame: &mut Frame,
    inner: Rect,
    breathing: &Breathing,
    strings: &Strings,
    now: Instant,
) {
    let t = theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            breath_label(breathing.phase(), strings),
            t.header_style(),
        ))
        .alignment(Alignment::Center),
        chunks[0],
    );

    // Fills while inhaling, holds full, empties while exhaling
    let progress = breathing.phase_progress(now);
    let ratio = match breathing.phase() {
        BreathPhase::Inhale => progress,
        BreathPhase::Hold => 1.0,
        BreathPhase::Exhale => 1.0 - progress,
    };
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(t.accent))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(""),
        chunks[1],
    );

    let count = breathing.cycles().to_string();
    frame.render_widget(
        Paragraph::new(fill(strings.breaths_completed, &[("count", count.as_str())]))
            .style(t.muted_style())
            .alignment(Alignment::Center),
        chunks[2],
    );
}

fn render_targets(frame: &mut Frame, activity: Rect, targets: &TapTargets, strings: &Strings) {
    let t = theme();
    let inner = inset(activity);
    let header = Rect { height: 1, ..inner };
    frame.render_widget(
        Paragraph::new(format!(
            "{}: {}  ({})",
            strings.score,
            targets.score(),
            strings.tap_hint
        ))
        .style(t.muted_style()),
        header,
    );

    let area = play_area(activity);
    for (index, target) in targets.targets().iter().enumerate() {
        let (x, y) = target_cell(area, target);
        let cell = Rect {
            x,
            y,
            width: TARGET_WIDTH.min(area.right().saturating_sub(x)),
            height: 1,
        };
        if cell.width == 0 || y >= area.bottom() {
            continue;
        }
        frame.render_widget(
            Paragraph::new(format!("[{}]", index + 1))
                .style(Style::default().fg(t.urge_high).add_modifier(Modifier::BOLD)),
            cell,
        );
    }
}

fn render_quiz(frame: &mut Frame, inner: Rect, quiz: &Quiz, strings: &Strings) {
    let t = theme();
    let question = quiz.current();

    let mut lines = vec![
        Line::from(Span::styled(question.prompt, t.selected_style())),
        Line::from(""),
    ];
    for (index, option) in question.options.iter().enumerate() {
        let style = match quiz.selected() {
            Some(_) if index == question.correct => Style::default().fg(t.urge_low),
            Some(selected) if selected == index => Style::default().fg(t.urge_high),
            _ => Style::default().fg(t.text),
        };
        lines.push(Line::from(Span::styled(
            format!("{}) {}", index + 1, option),
            style,
        )));
    }
    lines.push(Line::from(""));
    let verdict = match quiz.selected() {
        Some(selected) if selected == question.correct => strings.quiz_correct,
        Some(_) => strings.quiz_wrong,
        None => "",
    };
    lines.push(Line::from(vec![
        Span::styled(verdict, t.header_style()),
        Span::styled(
            format!("  {}: {}", strings.score, quiz.score()),
            t.muted_style(),
        ),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_high_urge(frame: &mut Frame, body: Rect, session: &CravingSession, strings: &Strings) {
    let t = theme();
    let snapshot = session.snapshot();
    let cost = snapshot.money(snapshot.cost_per_unit());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(body);

    frame.render_widget(
        Paragraph::new(Span::styled(
            strings.urge_high_title,
            Style::default()
                .fg(t.urge_high)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        chunks[0],
    );

    let framing = fill(
        strings.urge_high_text,
        &[("cost", cost.as_str()), ("goal", snapshot.goal_label.as_str())],
    );
    frame.render_widget(
        Paragraph::new(framing)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(vec![Line::from(vec![
            Span::styled(
                format!("-{}", cost),
                Style::default()
                    .fg(t.urge_high)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(strings.lost_from_savings, t.muted_style()),
        ])])
        .alignment(Alignment::Center),
        chunks[2],
    );

    render_motivation(frame, chunks[3], session);
}

/// One-line bar for a minimised session
pub fn render_craving_banner(frame: &mut Frame, area: Rect, session: &CravingSession) {
    let t = theme();
    let strings = session.language().strings();
    let text = format!(
        " \u{23F1} {} {} | {} ",
        strings.timer_active,
        format_countdown(session.remaining_secs()),
        strings.banner_hints
    );
    frame.render_widget(
        Paragraph::new(text).style(t.craving_banner_style()),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: u32, x: f64, y: f64) -> Target {
        Target {
            id,
            x,
            y,
            spawned_at: Instant::now(),
        }
    }

    #[test]
    fn test_layout_fits_in_small_terminals() {
        let layout = craving_layout(Rect::new(0, 0, 40, 12));
        assert_eq!(layout.modal, Rect::new(0, 0, 40, 12));
        assert_eq!(layout.hints.height, 1);
        assert_eq!(layout.body.height, 12 - 2 - 1);
    }

    #[test]
    fn test_layout_is_centered() {
        let layout = craving_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.modal, Rect::new(22, 5, MODAL_WIDTH, MODAL_HEIGHT));
    }

    #[test]
    fn test_pointer_offset_scales_columns() {
        assert_eq!(pointer_offset((40, 15), 50, 15), (5.0, 0.0));
        assert_eq!(pointer_offset((40, 15), 40, 10), (0.0, -5.0));
    }

    #[test]
    fn test_pointer_offset_maps_to_dial() {
        use crate::rating::{angle_to_rating, pointer_to_angle};

        // Straight up reads 1, a quarter turn reads 4
        let (dx, dy) = pointer_offset((40, 15), 40, 8);
        assert_eq!(angle_to_rating(pointer_to_angle(dx, dy)), 1);
        let (dx, dy) = pointer_offset((40, 15), 60, 15);
        assert_eq!(angle_to_rating(pointer_to_angle(dx, dy)), 4);
    }

    #[test]
    fn test_hit_target() {
        let area = Rect::new(10, 10, 53, 11);
        let targets = vec![target(7, 0.0, 0.0), target(8, 100.0, 100.0)];

        assert_eq!(target_cell(area, &targets[0]), (10, 10));
        assert_eq!(hit_target(area, &targets, 12, 10), Some(7));
        assert_eq!(hit_target(area, &targets, 13, 10), None);

        assert_eq!(target_cell(area, &targets[1]), (60, 20));
        assert_eq!(hit_target(area, &targets, 60, 20), Some(8));
        assert_eq!(hit_target(area, &targets, 60, 19), None);
    }

    #[test]
    fn test_play_area_sits_inside_the_border() {
        let activity = Rect::new(0, 20, 74, 8);
        assert_eq!(play_area(activity), Rect::new(1, 22, 72, 5));
    }
}
